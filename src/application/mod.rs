// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// Workflow coordination only: no tensor code, no file formats.
// Each use case tells the lower layers what to do in order.
//
//   config.rs         - RunConfig, the settings of one run
//   train_use_case.rs - corpus → model → epoch loop
//   eval_use_case.rs  - corpus → latest checkpoint → perplexities

/// Settings shared by both workflows
pub mod config;

/// The training workflow
pub mod train_use_case;

/// The evaluation-only workflow
pub mod eval_use_case;
