// ============================================================
// Layer 1 - Command Line Arguments
// ============================================================
// One flat set of flags; --is-test switches from training to
// evaluation of the latest checkpoint. Multi-word flags also
// accept the underscore spelling (--mem_size, --is_test).
//
// clap's derive macros generate --help, error messages for bad
// values and the string → number conversions.

use clap::Args;
use std::path::PathBuf;

use crate::application::config::RunConfig;

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Internal state dimension
    #[arg(long, default_value_t = 150)]
    pub edim: usize,

    /// Linear part of the state (units that skip the ReLU)
    #[arg(long, default_value_t = 75)]
    pub lindim: usize,

    /// Number of memory hops
    #[arg(long, default_value_t = 6)]
    pub nhop: usize,

    /// Memory size: words of history per prediction
    #[arg(long, alias = "mem_size", default_value_t = 100)]
    pub mem_size: usize,

    #[arg(long, alias = "batch_size", default_value_t = 128)]
    pub batch_size: usize,

    /// Number of epochs to train for
    #[arg(long, default_value_t = 100)]
    pub nepoch: usize,

    /// Initial learning rate
    #[arg(long, alias = "init_lr", default_value_t = 0.01)]
    pub init_lr: f64,

    /// Initial internal state value
    #[arg(long, alias = "init_hid", default_value_t = 0.1)]
    pub init_hid: f64,

    /// Weight initialisation std
    #[arg(long, alias = "init_std", default_value_t = 0.05)]
    pub init_std: f64,

    /// Clip gradients to this global norm
    #[arg(long, alias = "max_grad_norm", default_value_t = 50.0)]
    pub max_grad_norm: f64,

    /// Directory holding {data_name}.{train,valid,test}.txt
    #[arg(long, alias = "data_dir", default_value = "data")]
    pub data_dir: PathBuf,

    #[arg(long, alias = "checkpoint_dir", default_value = "checkpoints")]
    pub checkpoint_dir: PathBuf,

    /// Dataset name
    #[arg(long, alias = "data_name", default_value = "ptb")]
    pub data_name: String,

    /// Evaluate the latest checkpoint instead of training
    #[arg(long, alias = "is_test")]
    pub is_test: bool,

    /// Log batch progress
    #[arg(long)]
    pub show: bool,

    /// Append <eos> after every line of the corpus
    #[arg(long)]
    pub eos: bool,
}

/// Boundary between Layer 1 and Layer 2:
/// the application layer never sees clap types.
impl From<RunArgs> for RunConfig {
    fn from(a: RunArgs) -> Self {
        RunConfig {
            edim:           a.edim,
            lindim:         a.lindim,
            nhop:           a.nhop,
            mem_size:       a.mem_size,
            batch_size:     a.batch_size,
            nepoch:         a.nepoch,
            init_lr:        a.init_lr,
            init_hid:       a.init_hid,
            init_std:       a.init_std,
            max_grad_norm:  a.max_grad_norm,
            data_dir:       a.data_dir,
            checkpoint_dir: a.checkpoint_dir,
            data_name:      a.data_name,
            is_test:        a.is_test,
            show:           a.show,
            eos:            a.eos,
        }
    }
}
