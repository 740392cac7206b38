// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// Concerns shared by training and evaluation:
//
//   checkpoint.rs - MemN2N-{epoch}.model files, the checkpoint
//                   manifest and the saved model config
//
//   metrics.rs    - in-memory training log, perplexity and the
//                   JSON records printed to the console
//
//   progress.rs   - per-pass batch progress for --show
//
// Reference: Burn Book §5 (Checkpointing)

/// Model checkpoint saving, discovery and loading
pub mod checkpoint;

/// Training log and console reports
pub mod metrics;

/// Batch progress reporting
pub mod progress;
