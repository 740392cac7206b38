// ============================================================
// Layer 3 - Memory Window
// ============================================================
// One training example for the memory network: the word at
// `position` is the target, and the `mem_size` words before it
// are the memory.
//
// Window convention: oldest first, most recent last.
//
//   tokens   = [a, b, c, a, b, c]      mem_size = 2
//   position = 2  -> context [a, b], target c
//   position = 1  -> context [PAD, a], target b
//   position = 0  -> context [PAD, PAD], target a
//
// Positions with fewer than mem_size predecessors are padded
// at the front, so the last slot is always the previous word.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryItem {
    /// Id of the word to predict
    pub target: usize,

    /// Exactly mem_size ids, oldest first
    pub context: Vec<usize>,
}

impl MemoryItem {
    /// Build the item for `tokens[position]`.
    /// Panics if `position` is out of bounds.
    pub fn at(tokens: &[usize], position: usize, mem_size: usize, pad_id: usize) -> Self {
        Self {
            target:  tokens[position],
            context: memory_window(tokens, position, mem_size, pad_id),
        }
    }

    /// Number of padded slots at the front of the window
    pub fn padding(&self, pad_id: usize) -> usize {
        self.context.iter().take_while(|&&id| id == pad_id).count()
    }
}

/// The mem_size ids immediately preceding `position`, front-padded with `pad_id`.
pub fn memory_window(tokens: &[usize], position: usize, mem_size: usize, pad_id: usize) -> Vec<usize> {
    let start   = position.saturating_sub(mem_size);
    let missing = mem_size - (position - start);

    let mut window = Vec::with_capacity(mem_size);
    window.resize(missing, pad_id);
    window.extend_from_slice(&tokens[start..position]);
    window
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAD: usize = 99;

    #[test]
    fn test_full_window_most_recent_last() {
        // a b c a b c
        let tokens = [0, 1, 2, 0, 1, 2];
        let item   = MemoryItem::at(&tokens, 2, 2, PAD);
        assert_eq!(item.context, vec![0, 1]);
        assert_eq!(item.target, 2);

        let item = MemoryItem::at(&tokens, 5, 3, PAD);
        assert_eq!(item.context, vec![2, 0, 1]);
        assert_eq!(item.padding(PAD), 0);
    }

    #[test]
    fn test_front_padding_near_start() {
        let tokens = [7, 8, 9];
        assert_eq!(memory_window(&tokens, 0, 3, PAD), vec![PAD, PAD, PAD]);
        assert_eq!(memory_window(&tokens, 1, 3, PAD), vec![PAD, PAD, 7]);
        assert_eq!(memory_window(&tokens, 2, 3, PAD), vec![PAD, 7, 8]);

        let item = MemoryItem::at(&tokens, 1, 3, PAD);
        assert_eq!(item.padding(PAD), 2);
    }

    #[test]
    fn test_window_always_mem_size_long() {
        let tokens: Vec<usize> = (0..20).collect();
        for pos in 0..tokens.len() {
            assert_eq!(memory_window(&tokens, pos, 5, PAD).len(), 5);
        }
    }
}
