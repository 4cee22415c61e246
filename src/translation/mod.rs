/*!
 * Batch translation of subtitle cue texts.
 *
 * This module splits cue texts into fixed-size batches, dispatches one
 * provider call per batch, and enforces the cue-count parity invariant
 * with bounded retries. It is split into two submodules:
 *
 * - `engine`: batching, parity checking, and retry/backoff logic
 * - `diagnostics`: debug dumps of parity mismatches for offline inspection
 */

// Re-export main types for easier usage
pub use self::diagnostics::DiagnosticsWriter;
pub use self::engine::{BatchTranslationEngine, RetryPolicy};

// Submodules
pub mod diagnostics;
pub mod engine;
