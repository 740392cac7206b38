// ============================================================
// Layer 3 - Core Traits
// ============================================================
// The application layer reads its data through this trait,
// so it never depends on where the text files live.

use anyhow::Result;

use crate::domain::corpus::Corpus;

// ─── CorpusSource ─────────────────────────────────────────────────────────────
/// Anything that can produce the train/valid/test splits of a corpus.
///
/// Implementations:
///   - CorpusLoader -> reads `{data_dir}/{data_name}.{split}.txt`
pub trait CorpusSource {
    /// Read every split, building one shared vocabulary.
    fn load(&self) -> Result<Corpus>;
}
