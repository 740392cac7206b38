// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain Rust types describing what the system works with:
// words, their ids, and the memory windows built from them.
//
// Rules for this layer:
//   - NO Burn framework types
//   - NO file I/O
//
// Everything here is unit-testable without a tensor backend.

/// Word <-> id mapping with frequency counts
pub mod vocabulary;

/// Memory window construction for one target position
pub mod memory;

/// The three encoded splits of a dataset
pub mod corpus;

/// Abstractions the other layers implement
pub mod traits;
