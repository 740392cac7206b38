// ============================================================
// Layer 4 - Batch Iterator
// ============================================================
// Wraps one split in Burn's DataLoader so that every call to
// `.iter()` walks the whole split once, in corpus order:
//
//   split of L tokens, batch size B
//     -> ceil(L / B) batches
//     -> the last one holds the remaining L mod B targets
//
// No shuffling and no worker threads, so two passes over the
// same split produce identical batches.
//
// `is_test_data` only names the pass in logs. What keeps an eval
// pass read-only is the backend: callers build it on
// `B::InnerBackend`, which has no autodiff, so its batches can
// never reach an optimizer step.

use burn::{
    data::dataloader::{DataLoader, DataLoaderBuilder},
    prelude::*,
};
use std::sync::Arc;

use crate::data::{
    batcher::{MemoryBatch, MemoryBatcher},
    dataset::MemoryDataset,
};

#[derive(Debug, Clone)]
pub struct BatchIterConfig {
    /// Vocabulary size; `nwords` doubles as the padding id
    pub nwords:       usize,
    pub batch_size:   usize,
    pub edim:         usize,
    pub mem_size:     usize,
    pub init_hid:     f64,
    /// Labels the pass "eval" in logs. Read-only passes come from
    /// building the loader on `B::InnerBackend`, not from this flag.
    pub is_test_data: bool,
}

impl BatchIterConfig {
    pub fn pad_id(&self) -> usize {
        self.nwords
    }

    pub fn label(&self) -> &'static str {
        if self.is_test_data { "eval" } else { "train" }
    }
}

/// Number of batches in one pass over a split of `len` tokens
pub fn batch_count(len: usize, batch_size: usize) -> usize {
    len.div_ceil(batch_size)
}

/// Build a restartable batch iterator over `tokens`.
pub fn batch_iter<B: Backend>(
    tokens: &[usize],
    cfg:    &BatchIterConfig,
    device: &B::Device,
) -> Arc<dyn DataLoader<MemoryBatch<B>>> {
    let dataset = MemoryDataset::new(tokens.to_vec(), cfg.mem_size, cfg.pad_id());
    let batcher = MemoryBatcher::<B>::new(device.clone(), cfg.edim, cfg.mem_size, cfg.init_hid);

    tracing::debug!(
        "Built {} iterator: {} tokens, {} batches of {}",
        cfg.label(),
        tokens.len(),
        batch_count(tokens.len(), cfg.batch_size),
        cfg.batch_size
    );

    DataLoaderBuilder::new(batcher)
        .batch_size(cfg.batch_size)
        .build(dataset)
}
