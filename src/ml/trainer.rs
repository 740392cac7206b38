// ============================================================
// Layer 5 - Training Loop
// ============================================================
// One epoch:
//
//   train pass       forward → summed CE → backward
//                    → global-norm clip → SGD step
//   validation pass  model.valid(), no gradients
//   log              push (train_loss, valid_loss), print record
//   anneal           lr / 1.5 when validation loss stalls
//   floor            stop at once when lr < 1e-5
//   checkpoint       every epoch index divisible by 10
//
// Gradients are taken on the summed batch loss, clipped, and the
// step uses lr / batch_len, so the update equals a step on the
// mean loss while the clip threshold applies to the batch sum.
//
// Reference: Burn Book §5 (Training)

use anyhow::Result;
use burn::{
    data::dataloader::DataLoader,
    module::AutodiffModule,
    optim::{GradientsParams, Optimizer, SgdConfig},
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use std::sync::Arc;

use crate::application::config::RunConfig;
use crate::data::{
    batcher::MemoryBatch,
    iterator::{batch_count, batch_iter},
};
use crate::infra::{
    checkpoint::{is_checkpoint_epoch, CheckpointManager},
    metrics::{mean_loss, EpochMetrics, EpochReport, TrainingLog},
    progress::Progress,
};
use crate::ml::{clip::clip_global_norm, evaluator::evaluate, model::MemN2N, schedule::LearningRateSchedule};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every configured epoch ran
    EpochBudget,
    /// The learning rate dropped below the floor
    LearningRateFloor,
}

#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub epochs_run:    usize,
    pub learning_rate: f64,
    pub stop:          StopReason,
    pub log:           TrainingLog,
}

/// Train `model` on `train`, validating on `valid` after every epoch.
pub fn run_training<B: AutodiffBackend>(
    cfg:    &RunConfig,
    model:  MemN2N<B>,
    train:  &[usize],
    valid:  &[usize],
    nwords: usize,
    ckpt:   &CheckpointManager,
    device: &B::Device,
) -> Result<TrainingSummary> {
    let mut model = model;

    // Plain SGD, no momentum; the learning rate is passed per step
    let mut optim = SgdConfig::new().init();

    let train_loader = batch_iter::<B>(train, &cfg.batch_config(nwords, false), device);
    let valid_loader = batch_iter::<B::InnerBackend>(valid, &cfg.batch_config(nwords, true), device);
    let train_batches = batch_count(train.len(), cfg.batch_size);
    let valid_batches = batch_count(valid.len(), cfg.batch_size);

    let mut schedule   = LearningRateSchedule::new(cfg.init_lr);
    let mut log        = TrainingLog::default();
    let mut epochs_run = 0;
    let mut stop       = StopReason::EpochBudget;

    for epoch in 0..cfg.nepoch {
        // ── Training pass ─────────────────────────────────────────────────────
        let mut progress = Progress::new("Train", train_batches, cfg.show);
        let (trained, train_loss) = train_epoch(
            model,
            &mut optim,
            &train_loader,
            schedule.learning_rate(),
            cfg.max_grad_norm,
            &mut progress,
        );
        model = trained;

        // ── Validation pass ───────────────────────────────────────────────────
        let mut progress = Progress::new("Validation", valid_batches, cfg.show);
        let valid_loss = evaluate(&model.valid(), &valid_loader, &mut progress);

        // ── Log ───────────────────────────────────────────────────────────────
        let metrics = EpochMetrics::new(epoch, train_loss, valid_loss);
        log.push(metrics);
        println!("{}", serde_json::to_string(&EpochReport::new(&metrics, schedule.learning_rate()))?);
        epochs_run = epoch + 1;

        // ── Annealing ─────────────────────────────────────────────────────────
        if let Some(step) = schedule.anneal(&log) {
            println!("update learning rate from {:.3} to {:.3}", step.from, step.to);
        }
        if schedule.below_floor() {
            tracing::info!(
                "Learning rate {:e} below floor, stopping after epoch {}",
                schedule.learning_rate(),
                epoch
            );
            stop = StopReason::LearningRateFloor;
            break;
        }

        // ── Checkpoint ────────────────────────────────────────────────────────
        if is_checkpoint_epoch(epoch) {
            ckpt.save_model(&model, epoch)?;
        }
    }

    tracing::info!("Training finished after {} epochs ({:?})", epochs_run, stop);
    Ok(TrainingSummary {
        epochs_run,
        learning_rate: schedule.learning_rate(),
        stop,
        log,
    })
}

/// One full pass over the training split. Returns the updated
/// model and the mean loss per target.
pub fn train_epoch<B, O>(
    mut model:     MemN2N<B>,
    optim:         &mut O,
    loader:        &Arc<dyn DataLoader<MemoryBatch<B>>>,
    learning_rate: f64,
    max_grad_norm: f64,
    progress:      &mut Progress,
) -> (MemN2N<B>, f64)
where
    B: AutodiffBackend,
    O: Optimizer<MemN2N<B>, B>,
{
    let mut total   = 0.0f64;
    let mut targets = 0usize;

    for batch in loader.iter() {
        let batch_len = batch.len();
        let loss = model.forward_loss(batch.context, batch.time, batch.hidden, batch.targets)
            * batch_len as f64;

        let batch_loss = loss.clone().into_scalar().elem::<f64>();
        total   += batch_loss;
        targets += batch_len;

        let grads = GradientsParams::from_grads(loss.backward(), &model);
        let (grads, norm) = clip_global_norm::<B, _>(&model, grads, max_grad_norm);
        tracing::trace!("batch loss {:.4}, grad norm {:.4}", batch_loss, norm);

        model = optim.step(learning_rate / batch_len as f64, model, grads);
        progress.tick();
    }
    progress.finish();

    (model, mean_loss(total, targets))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{Autodiff, NdArray};

    type TestBackend = Autodiff<NdArray>;

    fn tiny_run(dir: &std::path::Path, nepoch: usize, init_lr: f64) -> RunConfig {
        RunConfig {
            edim: 8,
            lindim: 4,
            nhop: 2,
            mem_size: 3,
            batch_size: 4,
            nepoch,
            init_lr,
            init_std: 0.1,
            checkpoint_dir: dir.to_path_buf(),
            ..Default::default()
        }
    }

    fn corpus() -> (Vec<usize>, Vec<usize>) {
        let train: Vec<usize> = (0..40).map(|i| i % 5).collect();
        let valid: Vec<usize> = (0..15).map(|i| (i + 2) % 5).collect();
        (train, valid)
    }

    #[test]
    fn test_checkpoints_only_on_multiples_of_ten() {
        let dir    = tempfile::tempdir().unwrap();
        let cfg    = tiny_run(dir.path(), 12, 0.01);
        let ckpt   = CheckpointManager::new(dir.path()).unwrap();
        let device = Default::default();
        let model: MemN2N<TestBackend> = cfg.model_config(5).init(&device);
        let (train, valid) = corpus();

        let summary = run_training(&cfg, model, &train, &valid, 5, &ckpt, &device).unwrap();

        assert_eq!(summary.stop, StopReason::EpochBudget);
        assert_eq!(summary.epochs_run, 12);
        assert_eq!(summary.log.len(), 12);
        assert!(summary.learning_rate <= 0.01);

        let epochs: Vec<usize> = ckpt.scan().unwrap().iter().map(|e| e.epoch).collect();
        assert_eq!(epochs, vec![0, 10]);
        assert_eq!(ckpt.latest().unwrap().unwrap().epoch, 10);
    }

    #[test]
    fn test_stops_immediately_below_learning_rate_floor() {
        let dir    = tempfile::tempdir().unwrap();
        let cfg    = tiny_run(dir.path(), 5, 5e-6);
        let ckpt   = CheckpointManager::new(dir.path()).unwrap();
        let device = Default::default();
        let model: MemN2N<TestBackend> = cfg.model_config(5).init(&device);
        let (train, valid) = corpus();

        let summary = run_training(&cfg, model, &train, &valid, 5, &ckpt, &device).unwrap();

        assert_eq!(summary.stop, StopReason::LearningRateFloor);
        assert_eq!(summary.epochs_run, 1);
        // The floor check runs before the checkpoint of epoch 0
        assert!(ckpt.latest().unwrap().is_none());
    }

    #[test]
    fn test_training_lowers_loss_on_repeating_corpus() {
        let dir    = tempfile::tempdir().unwrap();
        let cfg    = tiny_run(dir.path(), 1, 0.5);
        let device = Default::default();
        let mut model: MemN2N<TestBackend> = cfg.model_config(5).init(&device);
        let (train, _) = corpus();

        let loader = batch_iter::<TestBackend>(&train, &cfg.batch_config(5, false), &device);
        let mut optim = SgdConfig::new().init();

        let mut losses = Vec::new();
        for _ in 0..15 {
            let (next, loss) = train_epoch(model, &mut optim, &loader, cfg.init_lr, 50.0, &mut Progress::hidden("Train"));
            model = next;
            losses.push(loss);
        }

        assert!(losses.iter().all(|l| l.is_finite()));
        assert!(losses.last().unwrap() < losses.first().unwrap());
    }
}
