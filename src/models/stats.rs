use serde::{Deserialize, Serialize};

use crate::models::{PrayerRequest, RequestStatus};

/// Header counters for the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestStats {
    pub total: usize,
    pub praying: usize,
    pub answered: usize,
    pub this_week: usize,
}

impl RequestStats {
    /// `this_week` comes from the grouped view, so it honours the active
    /// filter; the other counts cover every request.
    pub fn compute(requests: &[PrayerRequest], this_week: usize) -> Self {
        let count = |status: RequestStatus| requests.iter().filter(|r| r.status == status).count();
        Self {
            total: requests.len(),
            praying: count(RequestStatus::Praying),
            answered: count(RequestStatus::Answered),
            this_week,
        }
    }

    pub fn answered_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.answered as f64 / self.total as f64
        }
    }
}
