// ============================================================
// Layer 3 - Vocabulary
// ============================================================
// Word-level vocabulary shared by the train, valid and test
// splits. Ids are handed out in first-seen order, so reading
// the splits in the same order always yields the same ids.
//
//   word2idx : token -> id
//   idx2word : id    -> token
//   counts   : id    -> number of occurrences seen so far
//
// The id one past the last real token is reserved for memory
// padding (see `pad_id`). It never appears in word2idx.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// End-of-sentence marker appended after every line when enabled
pub const EOS_TOKEN: &str = "<eos>";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    word2idx: HashMap<String, usize>,
    idx2word: Vec<String>,
    counts:   Vec<usize>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `token` and return its id.
    /// Unseen tokens get the next sequential id.
    pub fn add(&mut self, token: &str) -> usize {
        if let Some(&id) = self.word2idx.get(token) {
            self.counts[id] += 1;
            return id;
        }
        let id = self.idx2word.len();
        self.word2idx.insert(token.to_string(), id);
        self.idx2word.push(token.to_string());
        self.counts.push(1);
        id
    }

    pub fn id(&self, token: &str) -> Option<usize> {
        self.word2idx.get(token).copied()
    }

    pub fn word(&self, id: usize) -> Option<&str> {
        self.idx2word.get(id).map(String::as_str)
    }

    /// Occurrences of `token` across every split read so far
    pub fn count(&self, token: &str) -> usize {
        self.id(token).map_or(0, |id| self.counts[id])
    }

    pub fn len(&self) -> usize {
        self.idx2word.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idx2word.is_empty()
    }

    /// Id used to fill memory slots that precede the start of a split
    pub fn pad_id(&self) -> usize {
        self.len()
    }

    /// The `n` most frequent tokens, ties broken by id.
    pub fn most_common(&self, n: usize) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(usize, usize)> = self.counts.iter().copied().enumerate().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
            .into_iter()
            .take(n)
            .map(|(id, count)| (self.idx2word[id].as_str(), count))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_seen_order() {
        let mut v = Vocabulary::new();
        let ids: Vec<usize> = "a b c a b c".split_whitespace().map(|w| v.add(w)).collect();
        assert_eq!(ids, vec![0, 1, 2, 0, 1, 2]);
        assert_eq!(v.id("a"), Some(0));
        assert_eq!(v.id("c"), Some(2));
        assert_eq!(v.word(1), Some("b"));
        assert_eq!(v.len(), 3);
    }

    #[test]
    fn test_counts_accumulate() {
        let mut v = Vocabulary::new();
        for w in ["x", "y", "x", "x"] {
            v.add(w);
        }
        assert_eq!(v.count("x"), 3);
        assert_eq!(v.count("y"), 1);
        assert_eq!(v.count("missing"), 0);
    }

    #[test]
    fn test_pad_id_is_past_last_word() {
        let mut v = Vocabulary::new();
        v.add("a");
        v.add("b");
        assert_eq!(v.pad_id(), 2);
        assert_eq!(v.word(v.pad_id()), None);
    }

    #[test]
    fn test_most_common() {
        let mut v = Vocabulary::new();
        for w in "the cat the dog the cat".split_whitespace() {
            v.add(w);
        }
        assert_eq!(v.most_common(2), vec![("the", 3), ("cat", 2)]);
        assert_eq!(v.most_common(10).len(), 3);
    }

    #[test]
    fn test_empty() {
        let v = Vocabulary::new();
        assert!(v.is_empty());
        assert_eq!(v.pad_id(), 0);
    }
}
