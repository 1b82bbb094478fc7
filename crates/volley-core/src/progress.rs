//! Progress snapshots for observers polling a running dispatch.
//!
//! `claimed` drives the headline fraction; `completed` trails it by the
//! requests still in flight.

/// Point-in-time view of a run (CLI-friendly).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressStats {
    /// Requests claimed by workers so far.
    pub claimed: u64,
    /// Requests whose outcome has been emitted.
    pub completed: u64,
    /// Total requests in the plan.
    pub total: u64,
    /// Seconds since the run started (0 before it starts).
    pub elapsed_secs: f64,
}

impl ProgressStats {
    /// Fraction claimed in [0.0, 1.0]; 1.0 when there is no work.
    pub fn fraction(&self) -> f64 {
        fraction(self.claimed, self.total)
    }

    pub fn in_flight(&self) -> u64 {
        self.claimed.saturating_sub(self.completed)
    }

    /// Completed requests per second (0 if elapsed is 0).
    pub fn requests_per_sec(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.completed as f64 / self.elapsed_secs
    }

    /// Estimated seconds remaining (None if nothing completed yet).
    pub fn eta_secs(&self) -> Option<f64> {
        let remaining = self.total.saturating_sub(self.completed);
        if remaining == 0 {
            return Some(0.0);
        }
        let rate = self.requests_per_sec();
        if rate <= 0.0 {
            return None;
        }
        Some(remaining as f64 / rate)
    }
}

pub(crate) fn fraction(done: u64, total: u64) -> f64 {
    if total == 0 {
        return 1.0;
    }
    (done as f64 / total as f64).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(claimed: u64, completed: u64, total: u64, elapsed_secs: f64) -> ProgressStats {
        ProgressStats {
            claimed,
            completed,
            total,
            elapsed_secs,
        }
    }

    #[test]
    fn zero_total_is_complete() {
        assert_eq!(stats(0, 0, 0, 0.0).fraction(), 1.0);
        assert_eq!(stats(0, 0, 0, 0.0).eta_secs(), Some(0.0));
    }

    #[test]
    fn fraction_uses_claims() {
        let s = stats(5, 2, 10, 1.0);
        assert!((s.fraction() - 0.5).abs() < 1e-9);
        assert_eq!(s.in_flight(), 3);
    }

    #[test]
    fn rate_and_eta() {
        let s = stats(6, 4, 10, 2.0);
        assert!((s.requests_per_sec() - 2.0).abs() < 1e-9);
        assert!((s.eta_secs().unwrap() - 3.0).abs() < 1e-9);
        assert_eq!(stats(1, 0, 10, 0.0).eta_secs(), None);
    }
}
