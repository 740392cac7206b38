// ============================================================
// Layer 5 - Learning Rate Schedule
// ============================================================
// Plateau annealing driven by the validation loss:
//
//   valid[t] > valid[t-1] * 0.9999   →   lr ← lr / 1.5
//   lr < 1e-5                         →   stop training
//
// The learning rate only ever goes down.

use crate::infra::metrics::TrainingLog;

pub const LR_DECAY: f64 = 1.5;
pub const STALL_RATIO: f64 = 0.9999;
pub const LR_FLOOR: f64 = 1e-5;

#[derive(Debug, Clone)]
pub struct LearningRateSchedule {
    learning_rate: f64,
}

/// Learning rate before and after one annealing step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Annealed {
    pub from: f64,
    pub to:   f64,
}

impl LearningRateSchedule {
    pub fn new(init_lr: f64) -> Self {
        Self { learning_rate: init_lr }
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Decay the learning rate if the latest epoch stalled.
    pub fn anneal(&mut self, log: &TrainingLog) -> Option<Annealed> {
        if !log.stalled(STALL_RATIO) {
            return None;
        }
        let from = self.learning_rate;
        self.learning_rate /= LR_DECAY;
        Some(Annealed { from, to: self.learning_rate })
    }

    pub fn below_floor(&self) -> bool {
        self.learning_rate < LR_FLOOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::metrics::EpochMetrics;

    #[test]
    fn test_no_anneal_while_improving() {
        let mut schedule = LearningRateSchedule::new(0.01);
        let mut log = TrainingLog::default();
        for (epoch, loss) in [5.0, 4.5, 4.0].into_iter().enumerate() {
            log.push(EpochMetrics::new(epoch, loss, loss));
            assert_eq!(schedule.anneal(&log), None);
        }
        assert_eq!(schedule.learning_rate(), 0.01);
    }

    #[test]
    fn test_anneal_divides_by_decay() {
        let mut schedule = LearningRateSchedule::new(0.03);
        let mut log = TrainingLog::default();
        log.push(EpochMetrics::new(0, 5.0, 4.0));
        log.push(EpochMetrics::new(1, 4.9, 4.2));

        let step = schedule.anneal(&log).unwrap();
        assert_eq!(step.from, 0.03);
        approx::assert_relative_eq!(step.to, 0.02, max_relative = 1e-12);
        approx::assert_relative_eq!(schedule.learning_rate(), 0.02, max_relative = 1e-12);
    }

    #[test]
    fn test_learning_rate_never_increases_and_hits_floor() {
        let mut schedule = LearningRateSchedule::new(0.01);
        let mut log = TrainingLog::default();
        let mut previous = schedule.learning_rate();
        let mut steps = 0;

        // Flat validation loss stalls every epoch
        for epoch in 0..100 {
            log.push(EpochMetrics::new(epoch, 4.0, 4.0));
            schedule.anneal(&log);
            assert!(schedule.learning_rate() <= previous);
            previous = schedule.learning_rate();
            steps += 1;
            if schedule.below_floor() {
                break;
            }
        }

        assert!(schedule.below_floor());
        // 0.01 / 1.5^k < 1e-5 first holds at k = 18, reached on epoch 18
        assert_eq!(steps, 19);
    }
}
