//! Incident arrival rate.
//!
//! The estimate is a cumulative average: every counted incident since the window opened,
//! divided by the minutes elapsed since the first of them. It falls while the stream is quiet
//! and jumps when incidents burst; it is not a sliding window.

use crate::models::{PoissonPoint, RateEstimate};
use chrono::{DateTime, Utc};
use std::time::Duration;

pub const DEFAULT_POISSON_RANGE: u64 = 20;

const MILLIS_PER_MINUTE: f64 = 60_000.0;

/// When, if ever, the estimator forgets its window. Both are off by default, in which case the
/// window lives as long as the process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetPolicy {
    pub on_reconnect: bool,
    pub idle_after: Option<Duration>,
}

#[derive(Debug, Default)]
pub struct RateEstimator {
    estimate: RateEstimate,
    last_incident: Option<DateTime<Utc>>,
    policy: ResetPolicy,
}

impl RateEstimator {
    pub fn new(policy: ResetPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Counts one incident. The first one fixes the window start.
    pub fn record(&mut self, now: DateTime<Utc>) {
        if self.estimate.cumulative_count == 0 {
            self.estimate.window_start = Some(now);
        }
        self.estimate.cumulative_count += 1;
        self.last_incident = Some(now);
    }

    /// Recomputes the value for `now` and returns it.
    pub fn tick(&mut self, now: DateTime<Utc>) -> f64 {
        if self.idle_expired(now) {
            tracing::info!(
                count = self.estimate.cumulative_count,
                "incident stream idle, resetting rate window"
            );
            self.reset();
            return self.estimate.value;
        }

        let Some(start) = self.estimate.window_start else {
            return self.estimate.value;
        };
        let elapsed_ms = (now - start).num_milliseconds();
        if elapsed_ms > 0 {
            let elapsed_minutes = elapsed_ms as f64 / MILLIS_PER_MINUTE;
            self.estimate.value = self.estimate.cumulative_count as f64 / elapsed_minutes;
        }
        self.estimate.value
    }

    /// Called by the transport after it re-establishes a connection. Returns whether the
    /// window was reset.
    pub fn on_reconnect(&mut self) -> bool {
        if self.policy.on_reconnect {
            self.reset();
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.estimate = RateEstimate::default();
        self.last_incident = None;
    }

    pub fn estimate(&self) -> RateEstimate {
        self.estimate
    }

    pub fn value(&self) -> f64 {
        self.estimate.value
    }

    pub fn policy(&self) -> ResetPolicy {
        self.policy
    }

    fn idle_expired(&self, now: DateTime<Utc>) -> bool {
        let (Some(idle), Some(last)) = (self.policy.idle_after, self.last_incident) else {
            return false;
        };
        match (now - last).to_std() {
            Ok(quiet) => quiet >= idle,
            Err(_) => false,
        }
    }
}

/// Poisson probabilities around `lambda`, for `k` in
/// `[max(0, floor(lambda - range)), ceil(lambda + range))`.
///
/// Works in log space with a running `ln(k!)`, so large `k` neither recurses nor overflows.
pub fn poisson_series(lambda: f64, range: u64) -> Vec<PoissonPoint> {
    let lambda = if lambda.is_finite() && lambda > 0.0 {
        lambda
    } else {
        0.0
    };
    let range = range as f64;
    let k_start = (lambda - range).floor().max(0.0) as u64;
    let k_end = (lambda + range).ceil().max(0.0) as u64;

    let mut ln_factorial = (2..=k_start).map(|i| (i as f64).ln()).sum::<f64>();
    let mut series = Vec::with_capacity(k_end.saturating_sub(k_start) as usize);
    for k in k_start..k_end {
        if k > k_start {
            ln_factorial += (k as f64).ln();
        }
        let probability = if lambda == 0.0 {
            if k == 0 {
                1.0
            } else {
                0.0
            }
        } else {
            (k as f64 * lambda.ln() - lambda - ln_factorial).exp()
        };
        series.push(PoissonPoint { k, probability });
    }
    series
}
