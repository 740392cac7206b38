// ============================================================
// Layer 4 - Memory Batcher
// ============================================================
// Implements Burn's Batcher trait to turn a Vec<MemoryItem>
// into the four tensors the memory network consumes.
//
//   context : [batch, mem_size]  Int    word ids, oldest first
//   time    : [batch, mem_size]  Int    every row is 0..mem_size
//   hidden  : [batch, edim]      Float  initial state, init_hid
//   targets : [batch]            Int    word to predict
//
// `time` indexes the temporal embeddings, so slot j of every
// window gets the same positional encoding regardless of the
// words it holds.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::domain::memory::MemoryItem;

// ─── MemoryBatch ──────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct MemoryBatch<B: Backend> {
    pub context: Tensor<B, 2, Int>,
    pub time:    Tensor<B, 2, Int>,
    pub hidden:  Tensor<B, 2>,
    pub targets: Tensor<B, 1, Int>,
}

impl<B: Backend> MemoryBatch<B> {
    /// Number of targets in this batch. The last batch of a split
    /// may be shorter than the configured batch size.
    pub fn len(&self) -> usize {
        self.targets.dims()[0]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ─── MemoryBatcher ────────────────────────────────────────────────────────────
#[derive(Clone, Debug)]
pub struct MemoryBatcher<B: Backend> {
    pub device: B::Device,
    edim:       usize,
    mem_size:   usize,
    init_hid:   f64,
}

impl<B: Backend> MemoryBatcher<B> {
    pub fn new(device: B::Device, edim: usize, mem_size: usize, init_hid: f64) -> Self {
        Self { device, edim, mem_size, init_hid }
    }
}

impl<B: Backend> Batcher<MemoryItem, MemoryBatch<B>> for MemoryBatcher<B> {
    fn batch(&self, items: Vec<MemoryItem>) -> MemoryBatch<B> {
        let batch_size = items.len();

        // Flatten the windows row by row, then reshape to [batch, mem_size]
        let context_flat: Vec<i32> = items
            .iter()
            .flat_map(|item| item.context.iter().map(|&id| id as i32))
            .collect();

        let time_flat: Vec<i32> = (0..batch_size)
            .flat_map(|_| 0..self.mem_size as i32)
            .collect();

        let targets: Vec<i32> = items.iter().map(|item| item.target as i32).collect();

        let context = Tensor::<B, 1, Int>::from_ints(context_flat.as_slice(), &self.device)
            .reshape([batch_size, self.mem_size]);

        let time = Tensor::<B, 1, Int>::from_ints(time_flat.as_slice(), &self.device)
            .reshape([batch_size, self.mem_size]);

        let hidden = Tensor::<B, 2>::full([batch_size, self.edim], self.init_hid, &self.device);

        let targets = Tensor::<B, 1, Int>::from_ints(targets.as_slice(), &self.device);

        MemoryBatch { context, time, hidden, targets }
    }
}
