// ============================================================
// Layer 5 — Self-Attention Gate
// ============================================================
// A learned soft feature-selection mask:
//
//   scores  = W·x + b                 [N, dim]
//   weights = softmax(scores, dim=1)  each row sums to 1
//   output  = weights ⊙ x             [N, dim]
//
// There is no query/key/value split and no mixing across
// positions: output coordinate i is input coordinate i scaled by
// its own normalised relevance. Output shape equals input shape.

use burn::{
    nn::{Linear, LinearConfig},
    prelude::*,
    tensor::activation::softmax,
};

#[derive(Config, Debug)]
pub struct SelfAttentionGateConfig {
    /// Width of the vectors being gated
    pub dim: usize,
}

impl SelfAttentionGateConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> SelfAttentionGate<B> {
        SelfAttentionGate {
            scorer: LinearConfig::new(self.dim, self.dim).init(device),
        }
    }
}

#[derive(Module, Debug)]
pub struct SelfAttentionGate<B: Backend> {
    scorer: Linear<B>,
}

impl<B: Backend> SelfAttentionGate<B> {
    /// x: [batch, dim] → [batch, dim]
    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        let weights = self.weights(x.clone());
        weights * x
    }

    /// The normalised per-position relevance, rows sum to 1.
    pub fn weights(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        softmax(self.scorer.forward(x), 1)
    }

    pub fn dim(&self) -> usize {
        self.scorer.weight.val().dims()[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::{backend::NdArray, tensor::Distribution};

    type TestBackend = NdArray;

    fn to_vec(t: Tensor<TestBackend, 2>) -> Vec<f32> {
        t.into_data().convert::<f32>().to_vec::<f32>().unwrap()
    }

    #[test]
    fn test_shape_preserving_for_any_width() {
        let device = Default::default();
        for dim in [1, 3, 32, 128] {
            let gate = SelfAttentionGateConfig::new(dim).init::<TestBackend>(&device);
            let x    = Tensor::<TestBackend, 2>::random([5, dim], Distribution::Default, &device);
            assert_eq!(gate.forward(x).dims(), [5, dim]);
            assert_eq!(gate.dim(), dim);
        }
    }

    #[test]
    fn test_weights_are_row_distributions() {
        let device = Default::default();
        let gate   = SelfAttentionGateConfig::new(8).init::<TestBackend>(&device);
        let x      = Tensor::<TestBackend, 2>::random([4, 8], Distribution::Normal(0.0, 1.0), &device);

        let sums = to_vec(gate.weights(x).sum_dim(1));
        assert!(sums.iter().all(|s| (s - 1.0).abs() < 1e-5), "row sums: {sums:?}");
    }

    #[test]
    fn test_output_is_elementwise_reweighting() {
        let device = Default::default();
        let gate   = SelfAttentionGateConfig::new(4).init::<TestBackend>(&device);
        let x = Tensor::<TestBackend, 2>::from_floats([[0.0, 2.0, -3.0, 0.0]], &device);

        let out   = to_vec(gate.forward(x.clone()));
        let input = to_vec(x);
        for (o, i) in out.iter().zip(&input) {
            // weights lie in (0, 1), so zeros stay zero and magnitudes shrink
            assert!(o.abs() <= i.abs() + 1e-6);
            if *i == 0.0 {
                assert_eq!(*o, 0.0);
            }
        }
    }
}
