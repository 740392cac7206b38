// ============================================================
// Layer 6 - Checkpoint Manager
// ============================================================
// Saves and restores MemN2N weights.
//
// Directory layout:
//   checkpoints/
//     MemN2N-0.model        ← weights after epoch 0
//     MemN2N-10.model       ← weights after epoch 10
//     ...
//     manifest.json         ← [{epoch, path}, ...] of every save
//     memn2n_config.json    ← architecture used for the weights
//
// The latest checkpoint is the largest epoch found in either the
// manifest or a scan for `MemN2N-{epoch}.model` names, so files
// copied in by hand are picked up with or without a manifest.
// Unrelated files are ignored, but a MemN2N-*.model name whose
// epoch is not a number is an error.
//
// Weights are serialised with Burn's BinBytesRecorder at full
// precision and written under the exact checkpoint file name.
// Checkpoints are never deleted by this crate.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{anyhow, bail, Context, Result};
use burn::{
    prelude::*,
    record::{BinBytesRecorder, FullPrecisionSettings, Recorder},
};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
};

use crate::ml::model::{MemN2N, MemN2NConfig, MemN2NRecord};

pub const CHECKPOINT_PREFIX: &str = "MemN2N-";
pub const CHECKPOINT_EXT: &str = ".model";
pub const MANIFEST_FILE: &str = "manifest.json";
pub const CONFIG_FILE: &str = "memn2n_config.json";

/// A checkpoint is written on every epoch index divisible by this
pub const CHECKPOINT_EVERY: usize = 10;

type WeightsRecorder = BinBytesRecorder<FullPrecisionSettings>;

pub fn is_checkpoint_epoch(epoch: usize) -> bool {
    epoch % CHECKPOINT_EVERY == 0
}

pub fn checkpoint_file_name(epoch: usize) -> String {
    format!("{CHECKPOINT_PREFIX}{epoch}{CHECKPOINT_EXT}")
}

/// Epoch encoded in a checkpoint file name.
///
/// `None` when the name is not a checkpoint at all,
/// `Some(Err)` when it looks like one but the epoch does not parse.
pub fn parse_checkpoint_epoch(file_name: &str) -> Option<Result<usize>> {
    let epoch = file_name
        .strip_prefix(CHECKPOINT_PREFIX)?
        .strip_suffix(CHECKPOINT_EXT)?;
    Some(
        epoch
            .parse::<usize>()
            .with_context(|| format!("Malformed checkpoint file name '{file_name}'")),
    )
}

/// One saved checkpoint. `path` is relative to the checkpoint directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointEntry {
    pub epoch: usize,
    pub path:  PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    pub checkpoints: Vec<CheckpointEntry>,
}

impl Manifest {
    /// Insert or replace the entry for `entry.epoch`, keeping epochs sorted.
    pub fn upsert(&mut self, entry: CheckpointEntry) {
        self.checkpoints.retain(|e| e.epoch != entry.epoch);
        self.checkpoints.push(entry);
        self.checkpoints.sort_by_key(|e| e.epoch);
    }

    pub fn latest(&self) -> Option<&CheckpointEntry> {
        self.checkpoints.iter().max_by_key(|e| e.epoch)
    }
}

pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Open a checkpoint directory, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create checkpoint directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn resolve(&self, entry: &CheckpointEntry) -> PathBuf {
        self.dir.join(&entry.path)
    }

    /// Write the weights of `model` as `MemN2N-{epoch}.model` and record it in the manifest.
    pub fn save_model<B: Backend>(&self, model: &MemN2N<B>, epoch: usize) -> Result<CheckpointEntry> {
        let entry = CheckpointEntry {
            epoch,
            path: PathBuf::from(checkpoint_file_name(epoch)),
        };
        let path = self.resolve(&entry);

        let recorder = WeightsRecorder::new();
        let bytes = Recorder::<B>::record(&recorder, model.clone().into_record(), ())
            .map_err(|e| anyhow!("Cannot serialise checkpoint for epoch {epoch}: {e:?}"))?;
        fs::write(&path, bytes)
            .with_context(|| format!("Failed to save checkpoint to '{}'", path.display()))?;

        let mut manifest = self.read_manifest()?.unwrap_or_default();
        manifest.upsert(entry.clone());
        self.write_manifest(&manifest)?;

        tracing::info!("Saved checkpoint '{}'", path.display());
        Ok(entry)
    }

    /// Restore the weights stored in `entry` into `model`.
    /// The architecture of `model` must match the saved one.
    pub fn load_model<B: Backend>(
        &self,
        model:  MemN2N<B>,
        entry:  &CheckpointEntry,
        device: &B::Device,
    ) -> Result<MemN2N<B>> {
        let path = self.resolve(entry);
        let bytes = fs::read(&path)
            .with_context(|| format!("Cannot read checkpoint '{}'", path.display()))?;

        let recorder = WeightsRecorder::new();
        let record: MemN2NRecord<B> = Recorder::<B>::load(&recorder, bytes, device)
            .map_err(|e| anyhow!("Cannot load checkpoint '{}': {e:?}", path.display()))?;

        tracing::info!("Loaded checkpoint from epoch {}", entry.epoch);
        Ok(model.load_record(record))
    }

    /// The checkpoint with the largest epoch, if any.
    /// Files on disk count even when the manifest does not list them.
    pub fn latest(&self) -> Result<Option<CheckpointEntry>> {
        let listed = self.read_manifest()?.unwrap_or_default().checkpoints;
        let found  = self.scan()?;
        if let (Some(l), Some(f)) = (listed.iter().map(|e| e.epoch).max(), found.last()) {
            if f.epoch > l {
                tracing::warn!("Manifest is stale: latest listed epoch {l}, found {}", f.epoch);
            }
        }
        Ok(listed.into_iter().chain(found).max_by_key(|e| e.epoch))
    }

    /// Every `MemN2N-{epoch}.model` file in the directory.
    pub fn scan(&self) -> Result<Vec<CheckpointEntry>> {
        let mut found = Vec::new();
        for entry in fs::read_dir(&self.dir)
            .with_context(|| format!("Cannot read directory '{}'", self.dir.display()))?
        {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };

            match parse_checkpoint_epoch(name) {
                Some(epoch) => found.push(CheckpointEntry {
                    epoch: epoch?,
                    path:  PathBuf::from(name),
                }),
                None => tracing::debug!("Ignoring '{}' in checkpoint directory", name),
            }
        }
        found.sort_by_key(|e| e.epoch);
        Ok(found)
    }

    /// Checkpoints listed in the manifest, or `None` when there is no manifest yet.
    pub fn read_manifest(&self) -> Result<Option<Manifest>> {
        let path = self.dir.join(MANIFEST_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read manifest '{}'", path.display()))?;
        let manifest = serde_json::from_str(&json)
            .with_context(|| format!("Corrupt manifest '{}'", path.display()))?;
        Ok(Some(manifest))
    }

    fn write_manifest(&self, manifest: &Manifest) -> Result<()> {
        let path = self.dir.join(MANIFEST_FILE);
        fs::write(&path, serde_json::to_string_pretty(manifest)?)
            .with_context(|| format!("Cannot write manifest '{}'", path.display()))
    }

    /// Save the architecture so evaluation can rebuild the same model.
    pub fn save_config(&self, cfg: &MemN2NConfig) -> Result<()> {
        let path = self.dir.join(CONFIG_FILE);
        cfg.save(&path)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;
        tracing::debug!("Saved model config to '{}'", path.display());
        Ok(())
    }

    /// The saved architecture, or `None` if training never wrote one here.
    pub fn load_config(&self) -> Result<Option<MemN2NConfig>> {
        let path = self.dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(None);
        }
        match MemN2NConfig::load(&path) {
            Ok(cfg) => Ok(Some(cfg)),
            Err(e) => bail!("Cannot read config from '{}': {e:?}", path.display()),
        }
    }
}
