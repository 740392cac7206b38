// ============================================================
// Layer 3 - Corpus
// ============================================================
// The three token-id splits of a dataset together with the one
// vocabulary they were encoded with.

use serde::{Deserialize, Serialize};

use crate::domain::vocabulary::Vocabulary;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Corpus {
    pub vocabulary: Vocabulary,
    pub train:      Vec<usize>,
    pub valid:      Vec<usize>,
    pub test:       Vec<usize>,
}

impl Corpus {
    /// Number of real words; the model's output dimension
    pub fn nwords(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn total_tokens(&self) -> usize {
        self.train.len() + self.valid.len() + self.test.len()
    }
}
