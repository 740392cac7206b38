// ============================================================
// Layer 6 - Progress Reporting
// ============================================================
// With --show, every pass over a split logs how far it got:
//
//   Train: 128/1291 batches
//   ...
//   Train: 1291/1291 batches
//
// Lines go through tracing at roughly every 10% and once at the
// end. Without --show nothing is emitted.

const REPORT_STEPS: usize = 10;

pub struct Progress {
    label:   &'static str,
    total:   usize,
    done:    usize,
    every:   usize,
    enabled: bool,
}

impl Progress {
    pub fn new(label: &'static str, total: usize, enabled: bool) -> Self {
        Self {
            label,
            total,
            done: 0,
            every: (total / REPORT_STEPS).max(1),
            enabled,
        }
    }

    /// A progress tracker that never logs
    pub fn hidden(label: &'static str) -> Self {
        Self::new(label, 0, false)
    }

    pub fn tick(&mut self) {
        self.done += 1;
        if self.enabled && self.done % self.every == 0 && self.done < self.total {
            tracing::info!("{}: {}/{} batches", self.label, self.done, self.total);
        }
    }

    pub fn finish(&self) {
        if self.enabled {
            tracing::info!("{}: {}/{} batches", self.label, self.done, self.total);
        }
    }

    pub fn done(&self) -> usize {
        self.done
    }
}
