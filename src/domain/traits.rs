// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer loads tables through this trait so the
// experiment never depends on where or how rows are stored.
//
// Implementations:
//   - TsvLoader → tab-separated file with encoding fallback
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use crate::domain::{error::PipelineError, table::RawTable};

// ─── TableSource ──────────────────────────────────────────────────────────────
/// Any component that can produce a raw table with trimmed headers.
pub trait TableSource {
    fn load(&self) -> Result<RawTable, PipelineError>;
}
