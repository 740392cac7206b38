// ============================================================
// Layer 5 - Evaluator
// ============================================================
// One read-only pass over a split: forward + cross-entropy,
// no gradients, no optimizer. Used for the validation pass of
// every training epoch and by evaluation mode.
//
// The model passed in lives on a plain (non-autodiff) backend,
// e.g. the result of `model.valid()`.

use burn::{data::dataloader::DataLoader, prelude::*};
use std::sync::Arc;

use crate::data::batcher::MemoryBatch;
use crate::infra::{metrics::mean_loss, progress::Progress};
use crate::ml::model::MemN2N;

/// Mean cross-entropy per target over one full pass of `loader`.
pub fn evaluate<B: Backend>(
    model:    &MemN2N<B>,
    loader:   &Arc<dyn DataLoader<MemoryBatch<B>>>,
    progress: &mut Progress,
) -> f64 {
    let mut total   = 0.0f64;
    let mut targets = 0usize;

    for batch in loader.iter() {
        let batch_len = batch.len();
        let loss = model.forward_loss(batch.context, batch.time, batch.hidden, batch.targets);

        // forward_loss is a mean; weight it back by the batch size
        total   += loss.into_scalar().elem::<f64>() * batch_len as f64;
        targets += batch_len;
        progress.tick();
    }
    progress.finish();

    mean_loss(total, targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::iterator::{batch_iter, BatchIterConfig};
    use crate::ml::model::MemN2NConfig;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_untrained_model_is_near_uniform() {
        let device = Default::default();
        let nwords = 6;
        let model: MemN2N<TestBackend> = MemN2NConfig::new(nwords)
            .with_edim(8)
            .with_lindim(4)
            .with_nhop(2)
            .with_mem_size(3)
            .with_init_std(0.01)
            .init(&device);

        let cfg = BatchIterConfig {
            nwords,
            batch_size: 4,
            edim: 8,
            mem_size: 3,
            init_hid: 0.1,
            is_test_data: true,
        };
        let tokens = [0, 1, 2, 3, 4, 5, 0, 1, 2];
        let loader = batch_iter::<TestBackend>(&tokens, &cfg, &device);

        let loss = evaluate(&model, &loader, &mut Progress::hidden("Validation"));

        // Tiny weights give almost uniform predictions: loss ≈ ln(nwords)
        approx::assert_abs_diff_eq!(loss, (nwords as f64).ln(), epsilon = 0.05);
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let device = Default::default();
        let model: MemN2N<TestBackend> = MemN2NConfig::new(3)
            .with_edim(4)
            .with_lindim(2)
            .with_nhop(1)
            .with_mem_size(2)
            .init(&device);
        let cfg = BatchIterConfig {
            nwords: 3,
            batch_size: 2,
            edim: 4,
            mem_size: 2,
            init_hid: 0.1,
            is_test_data: true,
        };
        let loader = batch_iter::<TestBackend>(&[0, 1, 2, 0, 1], &cfg, &device);

        let first  = evaluate(&model, &loader, &mut Progress::hidden("Validation"));
        let second = evaluate(&model, &loader, &mut Progress::hidden("Validation"));
        assert_eq!(first, second);
    }
}
