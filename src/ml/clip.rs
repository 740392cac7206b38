// ============================================================
// Layer 5 - Global Norm Gradient Clipping
// ============================================================
// Burn's built-in GradientClipping works per parameter tensor.
// The memory hops share H across the whole recurrence, so the
// update is clipped on the norm of ALL gradients together:
//
//   norm = sqrt( Σ_params Σ_elems g² )
//   if norm > max_norm:  g ← g · max_norm / norm   (every param)
//
// Both passes walk the module with a ModuleVisitor so every
// parameter is reached through its ParamId.

use burn::{
    module::{AutodiffModule, ModuleVisitor, ParamId},
    optim::GradientsParams,
    prelude::*,
    tensor::backend::AutodiffBackend,
};

struct SquaredNorm<'a> {
    grads: &'a GradientsParams,
    total: f64,
}

impl<B: AutodiffBackend> ModuleVisitor<B> for SquaredNorm<'_> {
    fn visit_float<const D: usize>(&mut self, id: ParamId, _tensor: &Tensor<B, D>) {
        if let Some(grad) = self.grads.get::<B::InnerBackend, D>(id) {
            self.total += grad.powf_scalar(2.0).sum().into_scalar().elem::<f64>();
        }
    }
}

struct Rescale<'a> {
    grads: &'a mut GradientsParams,
    scale: f64,
}

impl<B: AutodiffBackend> ModuleVisitor<B> for Rescale<'_> {
    fn visit_float<const D: usize>(&mut self, id: ParamId, _tensor: &Tensor<B, D>) {
        if let Some(grad) = self.grads.remove::<B::InnerBackend, D>(id.clone()) {
            self.grads.register::<B::InnerBackend, D>(id, grad.mul_scalar(self.scale));
        }
    }
}

/// L2 norm of every gradient of `module`, taken as one vector.
pub fn global_norm<B, M>(module: &M, grads: &GradientsParams) -> f64
where
    B: AutodiffBackend,
    M: AutodiffModule<B>,
{
    let mut visitor = SquaredNorm { grads, total: 0.0 };
    module.visit(&mut visitor);
    visitor.total.sqrt()
}

/// Rescale `grads` so their global norm does not exceed `max_norm`.
/// Returns the clipped gradients and the norm measured before clipping.
pub fn clip_global_norm<B, M>(module: &M, mut grads: GradientsParams, max_norm: f64) -> (GradientsParams, f64)
where
    B: AutodiffBackend,
    M: AutodiffModule<B>,
{
    let norm = global_norm::<B, M>(module, &grads);
    if norm > max_norm && norm.is_finite() {
        let mut visitor = Rescale { grads: &mut grads, scale: max_norm / norm };
        module.visit(&mut visitor);
        tracing::trace!("Clipped gradient norm {:.4} to {:.4}", norm, max_norm);
    }
    (grads, norm)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model::{MemN2N, MemN2NConfig};
    use burn::backend::{Autodiff, NdArray};

    type TestBackend = Autodiff<NdArray>;

    fn model_and_grads() -> (MemN2N<TestBackend>, GradientsParams) {
        let device = Default::default();
        let model: MemN2N<TestBackend> = MemN2NConfig::new(4)
            .with_edim(4)
            .with_lindim(2)
            .with_nhop(2)
            .with_mem_size(2)
            .with_init_std(0.5)
            .init(&device);

        let context = Tensor::<TestBackend, 1, Int>::from_ints([0, 1, 2, 3], &device).reshape([2, 2]);
        let time    = Tensor::<TestBackend, 1, Int>::from_ints([0, 1, 0, 1], &device).reshape([2, 2]);
        let hidden  = Tensor::<TestBackend, 2>::full([2, 4], 0.1, &device);
        let targets = Tensor::<TestBackend, 1, Int>::from_ints([3, 0], &device);

        // Summed loss so the gradient is comfortably non-zero
        let loss  = model.forward_loss(context, time, hidden, targets) * 100.0;
        let grads = GradientsParams::from_grads(loss.backward(), &model);
        (model, grads)
    }

    #[test]
    fn test_clips_to_max_norm() {
        let (model, grads) = model_and_grads();
        let before = global_norm::<TestBackend, _>(&model, &grads);
        assert!(before > 0.0);

        let max_norm = before / 4.0;
        let (clipped, reported) = clip_global_norm::<TestBackend, _>(&model, grads, max_norm);

        approx::assert_relative_eq!(reported, before, max_relative = 1e-9);
        let after = global_norm::<TestBackend, _>(&model, &clipped);
        approx::assert_relative_eq!(after, max_norm, max_relative = 1e-3);
    }

    #[test]
    fn test_small_gradients_untouched() {
        let (model, grads) = model_and_grads();
        let before = global_norm::<TestBackend, _>(&model, &grads);

        let (clipped, _) = clip_global_norm::<TestBackend, _>(&model, grads, before * 10.0);
        let after = global_norm::<TestBackend, _>(&model, &clipped);
        approx::assert_relative_eq!(after, before, max_relative = 1e-6);
    }
}
