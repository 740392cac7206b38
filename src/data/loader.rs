// ============================================================
// Layer 4 - Corpus Loader
// ============================================================
// Reads whitespace-delimited token text and encodes it with a
// shared Vocabulary.
//
// File layout:
//   {data_dir}/{data_name}.train.txt
//   {data_dir}/{data_name}.valid.txt
//   {data_dir}/{data_name}.test.txt
//
// The splits are read in exactly that order into one
// Vocabulary, so a word keeps the same id in every split and
// rebuilding from the same files gives the same ids.
//
// A missing file is an error; there is no fallback corpus.

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::corpus::Corpus;
use crate::domain::traits::CorpusSource;
use crate::domain::vocabulary::{Vocabulary, EOS_TOKEN};

/// Split names in the order they are read
pub const SPLITS: [&str; 3] = ["train", "valid", "test"];

/// Read one token file, extending `vocab` with unseen words and
/// their counts. Returns the file as a sequence of ids.
///
/// With `eos` set, `<eos>` is appended after every line.
pub fn read_data(path: &Path, vocab: &mut Vocabulary, eos: bool) -> Result<Vec<usize>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Cannot read corpus file '{}'", path.display()))?;

    let mut ids = Vec::new();
    for line in text.lines() {
        ids.extend(line.split_whitespace().map(|word| vocab.add(word)));
        if eos {
            ids.push(vocab.add(EOS_TOKEN));
        }
    }

    tracing::debug!(
        "Read {} tokens from '{}' (vocabulary now {} words)",
        ids.len(),
        path.display(),
        vocab.len()
    );
    Ok(ids)
}

/// Loads the three splits of a named dataset from a directory.
/// Implements the CorpusSource trait from Layer 3.
pub struct CorpusLoader {
    data_dir:  PathBuf,
    data_name: String,
    eos:       bool,
}

impl CorpusLoader {
    pub fn new(data_dir: impl Into<PathBuf>, data_name: impl Into<String>, eos: bool) -> Self {
        Self {
            data_dir:  data_dir.into(),
            data_name: data_name.into(),
            eos,
        }
    }

    /// `{data_dir}/{data_name}.{split}.txt`
    pub fn split_path(&self, split: &str) -> PathBuf {
        self.data_dir.join(format!("{}.{}.txt", self.data_name, split))
    }
}

impl CorpusSource for CorpusLoader {
    fn load(&self) -> Result<Corpus> {
        let mut vocabulary = Vocabulary::new();
        let mut splits = Vec::with_capacity(SPLITS.len());

        for split in SPLITS {
            let ids = read_data(&self.split_path(split), &mut vocabulary, self.eos)?;
            tracing::info!("{} split: {} tokens", split, ids.len());
            splits.push(ids);
        }

        let mut splits = splits.into_iter();
        let (train, valid, test) = match (splits.next(), splits.next(), splits.next()) {
            (Some(train), Some(valid), Some(test)) => (train, valid, test),
            _ => anyhow::bail!("Expected {} corpus splits", SPLITS.len()),
        };

        Ok(Corpus { vocabulary, train, valid, test })
    }
}
