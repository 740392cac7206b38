// ============================================================
// Layer 4 - Data Pipeline
// ============================================================
// Everything from the raw token files to tensor batches.
//
//   {name}.{split}.txt
//       │
//       ▼
//   CorpusLoader      → words to ids, one shared Vocabulary
//       │
//       ▼
//   MemoryDataset     → one MemoryItem per target position
//       │
//       ▼
//   MemoryBatcher     → stacks items into tensors
//       │
//       ▼
//   DataLoader        → ordered, restartable pass over a split
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads the token files and builds the vocabulary
pub mod loader;

/// Implements Burn's Dataset trait over one split
pub mod dataset;

/// Implements Burn's Batcher trait for memory windows
pub mod batcher;

/// Builds the per-split DataLoader
pub mod iterator;
