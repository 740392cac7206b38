// ============================================================
// Layer 6 - Training Log and Reports
// ============================================================
// Keeps one (train_loss, valid_loss) pair per finished epoch.
// The log lives in memory only; the annealing check reads it
// and it is dropped with the run.
//
// Console records are serialised with serde_json, e.g.
//   {"epoch":3,"perplexity":212.4,"valid_perplexity":230.1,"learning_rate":0.01}
//
// Perplexity = exp(mean cross-entropy per word).

use serde::{Deserialize, Serialize};

pub fn perplexity(mean_loss: f64) -> f64 {
    mean_loss.exp()
}

/// Mean of a summed loss; NaN for an empty split.
pub fn mean_loss(total: f64, targets: usize) -> f64 {
    if targets > 0 { total / targets as f64 } else { f64::NAN }
}

/// One row of the training log
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// Epoch index, starting at 0
    pub epoch: usize,

    /// Mean cross-entropy per training word
    pub train_loss: f64,

    /// Mean cross-entropy per validation word
    pub valid_loss: f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, valid_loss: f64) -> Self {
        Self { epoch, train_loss, valid_loss }
    }

    pub fn perplexity(&self) -> f64 {
        perplexity(self.train_loss)
    }

    pub fn valid_perplexity(&self) -> f64 {
        perplexity(self.valid_loss)
    }
}

/// Append-only log of finished epochs.
#[derive(Debug, Clone, Default)]
pub struct TrainingLog {
    entries: Vec<EpochMetrics>,
}

impl TrainingLog {
    pub fn push(&mut self, metrics: EpochMetrics) {
        self.entries.push(metrics);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&EpochMetrics> {
        self.entries.last()
    }

    pub fn entries(&self) -> &[EpochMetrics] {
        &self.entries
    }

    /// True when the latest validation loss is above `ratio` times the one before it.
    /// Needs at least two entries.
    pub fn stalled(&self, ratio: f64) -> bool {
        match self.entries.as_slice() {
            [.., previous, current] => current.valid_loss > previous.valid_loss * ratio,
            _ => false,
        }
    }
}

/// Per-epoch status record printed during training
#[derive(Debug, Clone, Serialize)]
pub struct EpochReport {
    pub epoch:            usize,
    pub perplexity:       f64,
    pub valid_perplexity: f64,
    pub learning_rate:    f64,
}

impl EpochReport {
    pub fn new(metrics: &EpochMetrics, learning_rate: f64) -> Self {
        Self {
            epoch:            metrics.epoch,
            perplexity:       metrics.perplexity(),
            valid_perplexity: metrics.valid_perplexity(),
            learning_rate,
        }
    }
}

/// Summary record printed by evaluation mode
#[derive(Debug, Clone, Serialize)]
pub struct EvalReport {
    pub valid_perplexity: f64,
    pub test_perplexity:  f64,
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stalled_needs_two_epochs() {
        let mut log = TrainingLog::default();
        assert!(!log.stalled(0.9999));
        log.push(EpochMetrics::new(0, 5.0, 5.0));
        assert!(!log.stalled(0.9999));
    }

    #[test]
    fn test_stalled_compares_last_two() {
        let mut log = TrainingLog::default();
        log.push(EpochMetrics::new(0, 5.0, 5.0));
        log.push(EpochMetrics::new(1, 4.0, 4.0));
        assert!(!log.stalled(0.9999));

        // 3.9999 > 4.0 * 0.9999 = 3.9996: improvement too small
        log.push(EpochMetrics::new(2, 3.9, 3.9999));
        assert!(log.stalled(0.9999));
    }

    #[test]
    fn test_perplexity_is_exp_of_mean_loss() {
        approx::assert_relative_eq!(perplexity(0.0), 1.0);
        approx::assert_relative_eq!(perplexity(2.0_f64.ln()), 2.0, max_relative = 1e-12);
        approx::assert_relative_eq!(mean_loss(12.0, 4), 3.0);
        assert!(mean_loss(1.0, 0).is_nan());
    }

    #[test]
    fn test_report_serialises_fields() {
        let m    = EpochMetrics::new(7, 0.0, 0.0);
        let json = serde_json::to_string(&EpochReport::new(&m, 0.01)).unwrap();
        assert!(json.contains("\"epoch\":7"));
        assert!(json.contains("\"perplexity\":1.0"));
        assert!(json.contains("\"valid_perplexity\":1.0"));
        assert!(json.contains("\"learning_rate\":0.01"));
    }
}
