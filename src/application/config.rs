// ============================================================
// Layer 2 - Run Configuration
// ============================================================
// Every setting of a training or evaluation run. The CLI layer
// converts its clap arguments into this struct; nothing below
// Layer 1 sees clap types.

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::iterator::BatchIterConfig;
use crate::ml::model::MemN2NConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub edim:           usize,
    pub lindim:         usize,
    pub nhop:           usize,
    pub mem_size:       usize,
    pub batch_size:     usize,
    pub nepoch:         usize,
    pub init_lr:        f64,
    pub init_hid:       f64,
    pub init_std:       f64,
    pub max_grad_norm:  f64,
    pub data_dir:       PathBuf,
    pub checkpoint_dir: PathBuf,
    pub data_name:      String,
    pub is_test:        bool,
    pub show:           bool,
    pub eos:            bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            edim:           150,
            lindim:         75,
            nhop:           6,
            mem_size:       100,
            batch_size:     128,
            nepoch:         100,
            init_lr:        0.01,
            init_hid:       0.1,
            init_std:       0.05,
            max_grad_norm:  50.0,
            data_dir:       PathBuf::from("data"),
            checkpoint_dir: PathBuf::from("checkpoints"),
            data_name:      "ptb".to_string(),
            is_test:        false,
            show:           false,
            eos:            false,
        }
    }
}

impl RunConfig {
    /// Reject settings that cannot produce a working model.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.batch_size > 0, "batch_size must be positive");
        ensure!(self.init_lr > 0.0, "init_lr must be positive");
        ensure!(self.max_grad_norm > 0.0, "max_grad_norm must be positive");
        ensure!(
            self.lindim <= self.edim,
            "lindim ({}) cannot exceed edim ({})",
            self.lindim,
            self.edim
        );
        ensure!(self.nhop > 0, "nhop must be positive");
        ensure!(self.mem_size > 0, "mem_size must be positive");
        Ok(())
    }

    pub fn model_config(&self, nwords: usize) -> MemN2NConfig {
        MemN2NConfig::new(nwords)
            .with_edim(self.edim)
            .with_lindim(self.lindim)
            .with_nhop(self.nhop)
            .with_mem_size(self.mem_size)
            .with_init_std(self.init_std)
    }

    pub fn batch_config(&self, nwords: usize, is_test_data: bool) -> BatchIterConfig {
        BatchIterConfig {
            nwords,
            batch_size: self.batch_size,
            edim: self.edim,
            mem_size: self.mem_size,
            init_hid: self.init_hid,
            is_test_data,
        }
    }
}
