// ============================================================
// Layer 2 - TrainUseCase
// ============================================================
// Orchestrates a training run:
//
//   Step 1: Validate the configuration
//   Step 2: Read train/valid/test into one vocabulary  (Layer 4)
//   Step 3: Open the checkpoint directory              (Layer 6)
//   Step 4: Save the model config                      (Layer 6)
//   Step 5: Build the model                            (Layer 5)
//   Step 6: Run the epoch loop                         (Layer 5)

use anyhow::Result;

use crate::application::config::RunConfig;
use crate::domain::traits::CorpusSource;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::{
    model::MemN2N,
    trainer::{run_training, TrainingSummary},
    TrainBackend,
};

pub struct TrainUseCase<S: CorpusSource> {
    config: RunConfig,
    source: S,
}

impl<S: CorpusSource> TrainUseCase<S> {
    pub fn new(config: RunConfig, source: S) -> Self {
        Self { config, source }
    }

    pub fn execute(&self) -> Result<TrainingSummary> {
        let cfg = &self.config;

        // ── Step 1: Configuration ─────────────────────────────────────────────
        cfg.validate()?;

        // ── Step 2: Corpus ────────────────────────────────────────────────────
        let corpus = self.source.load()?;
        let nwords = corpus.nwords();
        tracing::info!(
            "Vocabulary: {} words over {} tokens",
            nwords,
            corpus.total_tokens()
        );
        tracing::debug!("Most common: {:?}", corpus.vocabulary.most_common(10));

        // ── Step 3 + 4: Checkpoints and config ────────────────────────────────
        let ckpt = CheckpointManager::new(&cfg.checkpoint_dir)?;
        let model_cfg = cfg.model_config(nwords);
        model_cfg.validate()?;
        ckpt.save_config(&model_cfg)?;

        // ── Step 5: Model ─────────────────────────────────────────────────────
        let device = crate::ml::default_device();
        let model: MemN2N<TrainBackend> = model_cfg.init(&device);
        tracing::info!(
            "MemN2N ready: edim={}, lindim={}, nhop={}, mem_size={}",
            cfg.edim,
            cfg.lindim,
            cfg.nhop,
            cfg.mem_size
        );

        // ── Step 6: Train ─────────────────────────────────────────────────────
        run_training(cfg, model, &corpus.train, &corpus.valid, nwords, &ckpt, &device)
    }
}
