use burn::data::dataset::Dataset;

use crate::domain::memory::MemoryItem;

/// Every position of one split as a memory-network example.
/// Item `i` predicts `tokens[i]` from the mem_size words before it.
pub struct MemoryDataset {
    tokens:   Vec<usize>,
    mem_size: usize,
    pad_id:   usize,
}

impl MemoryDataset {
    pub fn new(tokens: Vec<usize>, mem_size: usize, pad_id: usize) -> Self {
        Self { tokens, mem_size, pad_id }
    }
}

impl Dataset<MemoryItem> for MemoryDataset {
    fn get(&self, index: usize) -> Option<MemoryItem> {
        (index < self.tokens.len())
            .then(|| MemoryItem::at(&self.tokens, index, self.mem_size, self.pad_id))
    }

    fn len(&self) -> usize {
        self.tokens.len()
    }
}
