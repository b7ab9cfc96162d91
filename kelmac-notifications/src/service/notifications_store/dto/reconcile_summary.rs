use super::ApplyOutcome;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub inserted: usize,
    pub replaced: usize,
    pub unchanged: usize,
    pub stale: usize,
    pub tombstoned: usize,
}

impl ReconcileSummary {
    pub fn record(&mut self, outcome: ApplyOutcome) {
        match outcome {
            ApplyOutcome::Inserted => self.inserted += 1,
            ApplyOutcome::Replaced => self.replaced += 1,
            ApplyOutcome::Unchanged => self.unchanged += 1,
            ApplyOutcome::Stale => self.stale += 1,
            ApplyOutcome::Tombstoned => self.tombstoned += 1,
            ApplyOutcome::Deleted | ApplyOutcome::DeletedUnknown => {}
        }
    }

    pub fn changed(&self) -> bool {
        self.inserted + self.replaced > 0
    }
}
