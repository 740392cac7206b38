// ============================================================
// Layer 5 - ML Layer (Burn)
// ============================================================
// All Burn model, autodiff and optimizer code lives here.
//
//   model.rs     - the multi-hop memory network
//   clip.rs      - global-norm gradient clipping
//   schedule.rs  - plateau learning-rate annealing
//   trainer.rs   - epoch loop, checkpoints
//   evaluator.rs - gradient-free pass over a split
//
// Backends:
//   default        NdArray (CPU)
//   --features wgpu  Wgpu (GPU)
// Training wraps the backend in Autodiff; validation and
// evaluation run on the bare backend.
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)
//            Sukhbaatar et al. (2015) End-To-End Memory Networks

/// The memory network module and its config
pub mod model;

/// Clips gradients by their global L2 norm
pub mod clip;

/// Divides the learning rate when validation stalls
pub mod schedule;

/// Runs the epoch loop and writes checkpoints
pub mod trainer;

/// Mean loss over a split without gradients
pub mod evaluator;

#[cfg(not(feature = "wgpu"))]
pub type InferBackend = burn::backend::NdArray;

#[cfg(feature = "wgpu")]
pub type InferBackend = burn::backend::Wgpu;

pub type TrainBackend = burn::backend::Autodiff<InferBackend>;

pub type Device = <InferBackend as burn::tensor::backend::Backend>::Device;

pub fn default_device() -> Device {
    <Device as Default>::default()
}
