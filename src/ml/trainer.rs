// ============================================================
// Layer 5 — Training Harness
// ============================================================
// `train` is architecture-agnostic: it only needs a module that
// can be differentiated (AutodiffModule) and that maps features to
// probabilities (BinaryClassifier). All three variants go through
// exactly the same loop.
//
// Per batch:
//   forward_logits → BCE-with-logits(logits, labels) → backward → Adam step
//
// The loss takes logits, not σ outputs: on unscaled columns σ
// saturates to exactly 0 or 1, where log(p) is -inf.
//
// Burn builds a fresh gradient set on every `backward()`, so there
// is no explicit zero-grad call. No early stopping, no schedule:
// the learning rate is fixed for the whole run.
//
// `run_variant` is the per-variant sequence the experiment driver
// calls: seed, build, train, evaluate, persist.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::{Context, Result};
use burn::{
    data::dataloader::{DataLoader, DataLoaderBuilder},
    module::AutodiffModule,
    nn::loss::{BinaryCrossEntropyLoss, BinaryCrossEntropyLossConfig},
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use std::path::PathBuf;

use crate::application::experiment_use_case::ExperimentConfig;
use crate::data::{
    batcher::{TabularBatch, TabularBatcher},
    dataset::TabularDataset,
};
use crate::domain::{error::PipelineError, variant::Variant};
use crate::infra::{checkpoint::CheckpointManager, metrics::MetricsLogger};
use crate::ml::{
    evaluator::evaluate,
    model::{BinaryClassifier, TabularClassifier, TabularClassifierConfig},
    EvalBackend, TrainBackend,
};

/// What one completed variant produced
#[derive(Debug, Clone)]
pub struct VariantOutcome {
    pub auc:          f64,
    pub epoch_losses: Vec<f64>,
    pub artifact:     PathBuf,
}

/// Binary cross-entropy on logits, the loss `train` expects.
pub fn bce_with_logits<B: Backend>(device: &B::Device) -> BinaryCrossEntropyLoss<B> {
    BinaryCrossEntropyLossConfig::new().with_logits(true).init(device)
}

/// Run `epochs` full passes over `loader`, one optimiser step per batch.
/// `loss_fn` must be in logits mode (see [`bce_with_logits`]).
/// Returns the trained model and the mean loss of every epoch.
pub fn train<B, M, O>(
    mut model: M,
    loader:    &dyn DataLoader<TabularBatch<B>>,
    loss_fn:   &BinaryCrossEntropyLoss<B>,
    optim:     &mut O,
    lr:        f64,
    epochs:    usize,
    mut on_epoch: impl FnMut(usize, f64),
) -> Result<(M, Vec<f64>), PipelineError>
where
    B: AutodiffBackend,
    M: AutodiffModule<B> + BinaryClassifier<B>,
    O: Optimizer<M, B>,
{
    let mut epoch_losses = Vec::with_capacity(epochs);

    for epoch in 1..=epochs {
        let mut loss_sum = 0.0f64;
        let mut batches  = 0usize;

        for batch in loader.iter() {
            let logits = model.forward_logits(batch.features);
            let loss   = loss_fn.forward(logits, batch.labels);

            loss_sum += loss.clone().into_scalar().elem::<f64>();
            batches  += 1;

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(lr, model, grads);
        }

        if batches == 0 {
            return Err(PipelineError::EmptyDataset("training set"));
        }

        let mean_loss = loss_sum / batches as f64;
        on_epoch(epoch, mean_loss);
        epoch_losses.push(mean_loss);
    }

    Ok((model, epoch_losses))
}

/// Build, train, evaluate and save one variant.
pub fn run_variant(
    cfg:           &ExperimentConfig,
    variant:       Variant,
    train_dataset: TabularDataset,
    test_dataset:  TabularDataset,
    ckpt_manager:  &CheckpointManager,
    metrics:       &MetricsLogger,
) -> Result<VariantOutcome> {
    let device: <TrainBackend as Backend>::Device = Default::default();
    TrainBackend::seed(cfg.random_state);

    let input_dim = train_dataset
        .input_dim()
        .ok_or(PipelineError::EmptyDataset("training set"))?;

    // ── Build model (fails fast on width violations) ──────────────────────────
    let model: TabularClassifier<TrainBackend> =
        TabularClassifierConfig::new(input_dim, cfg.embedding_dim, variant)
            .init(&device)
            .with_context(|| format!("building {variant} model"))?;
    tracing::info!("Model ready: {} ({} parameters)", variant, model.num_params());
    tracing::debug!(
        "{}: embedding={} attention={} gate_dim={:?}",
        variant,
        model.has_embedding(),
        model.has_attention(),
        model.gate_dim()
    );

    // ── Data loaders ──────────────────────────────────────────────────────────
    // One worker keeps batch order deterministic; only training shuffles.
    let train_loader = DataLoaderBuilder::new(TabularBatcher::<TrainBackend>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .shuffle(cfg.random_state)
        .num_workers(1)
        .build(train_dataset);

    let test_loader = DataLoaderBuilder::new(TabularBatcher::<EvalBackend>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(test_dataset);

    // ── Train ─────────────────────────────────────────────────────────────────
    let loss_fn   = bce_with_logits(&device);
    let mut optim = AdamConfig::new().with_epsilon(1e-8).init();

    let mut log_error = None;
    let (model, epoch_losses) = train(
        model,
        train_loader.as_ref(),
        &loss_fn,
        &mut optim,
        cfg.lr,
        cfg.epochs,
        |epoch, loss| {
            println!("[{variant}] Epoch {epoch:>3}/{} | loss={loss:.6}", cfg.epochs);
            if let Err(e) = metrics.log_epoch(variant, epoch, loss) {
                log_error.get_or_insert(e);
            }
        },
    )?;
    if let Some(e) = log_error {
        tracing::warn!("Could not record epoch metrics for {}: {:#}", variant, e);
    }

    // ── Evaluate (inner backend: no gradient tracking) ────────────────────────
    let auc = evaluate(&model.valid(), test_loader.as_ref())
        .with_context(|| format!("evaluating {variant}"))?;
    println!("[{variant}] AUC: {auc:.6}");

    // ── Persist ───────────────────────────────────────────────────────────────
    let artifact = ckpt_manager.save_model(&model, variant)?;
    println!("[{variant}] saved to {}", artifact.display());

    Ok(VariantOutcome { auc, epoch_losses, artifact })
}
