use destructure::Mutation;
use time::{Date, Duration};
use vodca::References;

use crate::entity::{AcceptedDate, ReturnedDate};

/// Time-based penalty rules applied when books come back late.
#[derive(Debug, Clone, Eq, PartialEq, References, Mutation)]
pub struct LendingPolicy {
    overdue_after_days: i64,
    lock_window_days: i64,
    lock_threshold: i64,
    unlock_after_days: i64,
}

impl LendingPolicy {
    pub fn new(
        overdue_after_days: i64,
        lock_window_days: i64,
        lock_threshold: i64,
        unlock_after_days: i64,
    ) -> Self {
        Self {
            overdue_after_days,
            lock_window_days,
            lock_threshold,
            unlock_after_days,
        }
    }

    pub fn is_overdue(&self, accepted: &AcceptedDate, returned: &ReturnedDate) -> bool {
        returned.days_since(accepted) > self.overdue_after_days
    }

    /// Inclusive range of return dates whose overdue orders count toward a lock.
    pub fn lock_window(&self, returned: &ReturnedDate) -> (Date, Date) {
        let end = *returned.as_ref();
        let start = end.saturating_sub(Duration::days(self.lock_window_days));
        (start, end)
    }

    pub fn should_lock(&self, prior_overdue: i64) -> bool {
        prior_overdue > self.lock_threshold
    }

    pub fn may_unlock(&self, last_overdue: &ReturnedDate, today: Date) -> bool {
        (today - *last_overdue.as_ref()).whole_days() > self.unlock_after_days
    }
}

pub trait DependOnLendingPolicy: 'static + Sync + Send {
    fn lending_policy(&self) -> &LendingPolicy;
}

impl Default for LendingPolicy {
    fn default() -> Self {
        Self {
            overdue_after_days: 20,
            lock_window_days: 30,
            lock_threshold: 3,
            unlock_after_days: 20,
        }
    }
}
