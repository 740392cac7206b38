// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Parses the flags and hands the run to Layer 2:
//
//   (default)   train, checkpointing every 10 epochs
//   --is-test   evaluate the latest checkpoint on valid + test
//
// Reference: Rust Book §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::RunArgs;

use crate::application::{
    config::RunConfig, eval_use_case::EvalUseCase, train_use_case::TrainUseCase,
};
use crate::data::loader::CorpusLoader;

#[derive(Parser, Debug)]
#[command(
    name = "memn2n-lm",
    version,
    about = "Train a memory network language model, or evaluate its latest checkpoint."
)]
pub struct Cli {
    #[command(flatten)]
    pub args: RunArgs,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let config: RunConfig = self.args.into();
        tracing::info!("{}", serde_json::to_string(&config)?);

        let source = CorpusLoader::new(&config.data_dir, &config.data_name, config.eos);
        if config.is_test {
            EvalUseCase::new(config, source).execute()?;
        } else {
            let summary = TrainUseCase::new(config, source).execute()?;
            tracing::info!(
                "Stopped after {} epochs at learning rate {}",
                summary.epochs_run,
                summary.learning_rate
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["memn2n-lm"]);
        let cfg: RunConfig = cli.args.into();
        assert_eq!(cfg.edim, 150);
        assert_eq!(cfg.lindim, 75);
        assert_eq!(cfg.nhop, 6);
        assert_eq!(cfg.mem_size, 100);
        assert_eq!(cfg.batch_size, 128);
        assert_eq!(cfg.nepoch, 100);
        assert_eq!(cfg.init_lr, 0.01);
        assert_eq!(cfg.max_grad_norm, 50.0);
        assert_eq!(cfg.data_name, "ptb");
        assert!(!cfg.is_test);
        assert!(!cfg.show);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "memn2n-lm", "--edim", "20", "--lindim", "10", "--is-test", "--show",
            "--checkpoint-dir", "ckpt", "--data-name", "wiki",
        ]);
        let cfg: RunConfig = cli.args.into();
        assert_eq!(cfg.edim, 20);
        assert_eq!(cfg.lindim, 10);
        assert!(cfg.is_test);
        assert!(cfg.show);
        assert_eq!(cfg.checkpoint_dir, std::path::PathBuf::from("ckpt"));
        assert_eq!(cfg.data_name, "wiki");
    }

    #[test]
    fn test_underscore_flags() {
        let cli = Cli::try_parse_from([
            "memn2n-lm", "--mem_size", "20", "--batch_size", "4", "--init_lr", "0.5",
            "--init_hid", "0.2", "--init_std", "0.1", "--max_grad_norm", "5",
            "--data_dir", "corpus", "--checkpoint_dir", "ckpt", "--data_name", "wiki",
            "--is_test",
        ])
        .unwrap();
        let cfg: RunConfig = cli.args.into();
        assert_eq!(cfg.mem_size, 20);
        assert_eq!(cfg.batch_size, 4);
        assert_eq!(cfg.init_lr, 0.5);
        assert_eq!(cfg.init_hid, 0.2);
        assert_eq!(cfg.init_std, 0.1);
        assert_eq!(cfg.max_grad_norm, 5.0);
        assert_eq!(cfg.data_dir, std::path::PathBuf::from("corpus"));
        assert_eq!(cfg.checkpoint_dir, std::path::PathBuf::from("ckpt"));
        assert_eq!(cfg.data_name, "wiki");
        assert!(cfg.is_test);

        // Both spellings name the same flag
        let kebab = Cli::try_parse_from(["memn2n-lm", "--mem-size", "20"]).unwrap();
        assert_eq!(kebab.args.mem_size, 20);
    }
}
