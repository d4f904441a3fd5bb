// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust structs, enums and traits describing the experiment:
// which architecture variants exist, what a raw table looks like,
// what can go wrong, and what a finished run reports.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §6 (Enums), §10 (Traits)

/// The three architecture configurations under ablation
pub mod variant;

/// Raw, untyped tab-separated table as read from disk
pub mod table;

/// Typed error taxonomy shared by every layer
pub mod error;

/// Per-variant outcome records collected into a results table
pub mod report;

/// Core abstractions (traits) that other layers implement
pub mod traits;
