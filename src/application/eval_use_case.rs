// ============================================================
// Layer 2 - EvalUseCase
// ============================================================
// Evaluation-only mode:
//
//   1. Rebuild the vocabulary from the same three files
//   2. Find the checkpoint with the largest epoch
//        none → print a diagnostic and return Ok
//   3. Rebuild the model (saved config when present)
//   4. One gradient-free pass over valid and over test
//   5. Print {"valid_perplexity", "test_perplexity"}

use anyhow::{ensure, Result};

use crate::application::config::RunConfig;
use crate::data::iterator::{batch_count, batch_iter};
use crate::domain::traits::CorpusSource;
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::{perplexity, EvalReport},
    progress::Progress,
};
use crate::ml::{evaluator::evaluate, model::MemN2N, InferBackend};

pub const NO_CHECKPOINT_MESSAGE: &str = "can not find existing model checkpoint file.";

pub struct EvalUseCase<S: CorpusSource> {
    config: RunConfig,
    source: S,
}

impl<S: CorpusSource> EvalUseCase<S> {
    pub fn new(config: RunConfig, source: S) -> Self {
        Self { config, source }
    }

    /// Returns `None` when there is no checkpoint to evaluate.
    pub fn execute(&self) -> Result<Option<EvalReport>> {
        let cfg = &self.config;
        cfg.validate()?;

        let corpus = self.source.load()?;
        let nwords = corpus.nwords();

        let ckpt = CheckpointManager::new(&cfg.checkpoint_dir)?;
        let Some(latest) = ckpt.latest()? else {
            println!("{NO_CHECKPOINT_MESSAGE}");
            return Ok(None);
        };

        let model_cfg = match ckpt.load_config()? {
            Some(saved) => {
                ensure!(
                    saved.nwords == nwords,
                    "checkpoint was trained with {} words but the corpus has {}",
                    saved.nwords,
                    nwords
                );
                saved
            }
            None => cfg.model_config(nwords),
        };
        model_cfg.validate()?;

        let device = crate::ml::default_device();
        let model: MemN2N<InferBackend> = model_cfg.init(&device);
        let model = ckpt.load_model(model, &latest, &device)?;

        // The batches must match the architecture the weights came from
        let mut batch_cfg = cfg.batch_config(nwords, true);
        batch_cfg.edim     = model_cfg.edim;
        batch_cfg.mem_size = model_cfg.mem_size;

        let valid_loader = batch_iter::<InferBackend>(&corpus.valid, &batch_cfg, &device);
        let test_loader  = batch_iter::<InferBackend>(&corpus.test, &batch_cfg, &device);

        let mut progress = Progress::new("Validation", batch_count(corpus.valid.len(), cfg.batch_size), cfg.show);
        let valid_loss   = evaluate(&model, &valid_loader, &mut progress);

        let mut progress = Progress::new("Test", batch_count(corpus.test.len(), cfg.batch_size), cfg.show);
        let test_loss    = evaluate(&model, &test_loader, &mut progress);

        let report = EvalReport {
            valid_perplexity: perplexity(valid_loss),
            test_perplexity:  perplexity(test_loss),
        };
        println!("{}", serde_json::to_string(&report)?);
        Ok(Some(report))
    }
}
