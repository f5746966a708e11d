//! Per-client request rate limiting.
//!
//! Fixed counting windows per client key, one per minute and one per
//! day. The limiter is owned by whoever constructs it and shared
//! explicitly; there is no ambient state. `check_at` takes the current
//! instant from the caller so tests can drive the clock directly.

use std::collections::HashMap;
use std::time::{Duration, Instant};

const MINUTE_WINDOW: Duration = Duration::from_secs(60);
const DAY_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// The request may proceed.
    Allowed,
    /// The per-minute window is full.
    PerMinuteExceeded,
    /// The per-day window is full.
    PerDayExceeded,
}

impl RateDecision {
    pub fn is_allowed(self) -> bool {
        matches!(self, RateDecision::Allowed)
    }
}

/// One counting window: requests seen since `started`.
#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    started: Instant,
}

/// Fixed-window request limiter keyed by client address.
#[derive(Debug)]
pub struct RequestLimiter {
    /// client key -> (minute window, day window)
    counters: HashMap<String, (Window, Window)>,
    per_minute: u32,
    per_day: u32,
}

impl RequestLimiter {
    /// Create a limiter with the given per-minute and per-day budgets.
    pub fn new(per_minute: u32, per_day: u32) -> Self {
        Self {
            counters: HashMap::new(),
            per_minute,
            per_day,
        }
    }

    /// Count a request from `key` at the current time and decide it.
    pub fn check(&mut self, key: &str) -> RateDecision {
        self.check_at(key, Instant::now())
    }

    /// Count a request from `key` at the given instant and decide it.
    ///
    /// A window whose span has elapsed resets before counting. Rejected
    /// requests still count, so a client that keeps hammering stays
    /// rejected until its window turns over.
    pub fn check_at(&mut self, key: &str, now: Instant) -> RateDecision {
        let fresh = Window { count: 0, started: now };
        let (minute, day) = self
            .counters
            .entry(key.to_string())
            .or_insert((fresh, fresh));

        if now.duration_since(minute.started) >= MINUTE_WINDOW {
            minute.count = 0;
            minute.started = now;
        }
        if now.duration_since(day.started) >= DAY_WINDOW {
            day.count = 0;
            day.started = now;
        }

        minute.count += 1;
        day.count += 1;

        if minute.count > self.per_minute {
            RateDecision::PerMinuteExceeded
        } else if day.count > self.per_day {
            RateDecision::PerDayExceeded
        } else {
            RateDecision::Allowed
        }
    }
}

impl Default for RequestLimiter {
    fn default() -> Self {
        Self::new(20, 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(base: Instant, secs: u64) -> Instant {
        base + Duration::from_secs(secs)
    }

    #[test]
    fn allows_under_minute_limit() {
        let mut rl = RequestLimiter::new(3, 100);
        let t0 = Instant::now();
        for _ in 0..3 {
            assert_eq!(rl.check_at("1.2.3.4", t0), RateDecision::Allowed);
        }
    }

    #[test]
    fn rejects_over_minute_limit() {
        let mut rl = RequestLimiter::new(3, 100);
        let t0 = Instant::now();
        for _ in 0..3 {
            assert!(rl.check_at("1.2.3.4", t0).is_allowed());
        }
        assert_eq!(rl.check_at("1.2.3.4", t0), RateDecision::PerMinuteExceeded);
        assert_eq!(rl.check_at("1.2.3.4", t0), RateDecision::PerMinuteExceeded);
    }

    #[test]
    fn minute_window_resets() {
        let mut rl = RequestLimiter::new(2, 100);
        let t0 = Instant::now();
        assert!(rl.check_at("a", t0).is_allowed());
        assert!(rl.check_at("a", at(t0, 1)).is_allowed());
        assert_eq!(rl.check_at("a", at(t0, 2)), RateDecision::PerMinuteExceeded);
        // 60 seconds after the window opened, the counter starts over
        assert_eq!(rl.check_at("a", at(t0, 60)), RateDecision::Allowed);
    }

    #[test]
    fn day_limit_caps_across_minute_windows() {
        let mut rl = RequestLimiter::new(2, 3);
        let t0 = Instant::now();
        assert!(rl.check_at("a", t0).is_allowed());
        assert!(rl.check_at("a", at(t0, 1)).is_allowed());
        // new minute window, third request of the day
        assert!(rl.check_at("a", at(t0, 61)).is_allowed());
        // still within a fresh minute budget but over the daily one
        assert_eq!(rl.check_at("a", at(t0, 122)), RateDecision::PerDayExceeded);
    }

    #[test]
    fn day_window_resets() {
        let mut rl = RequestLimiter::new(10, 2);
        let t0 = Instant::now();
        assert!(rl.check_at("a", t0).is_allowed());
        assert!(rl.check_at("a", at(t0, 1)).is_allowed());
        assert_eq!(rl.check_at("a", at(t0, 2)), RateDecision::PerDayExceeded);
        assert_eq!(
            rl.check_at("a", at(t0, 24 * 60 * 60)),
            RateDecision::Allowed
        );
    }

    #[test]
    fn independent_clients() {
        let mut rl = RequestLimiter::new(1, 100);
        let t0 = Instant::now();
        assert!(rl.check_at("1.1.1.1", t0).is_allowed());
        assert_eq!(rl.check_at("1.1.1.1", t0), RateDecision::PerMinuteExceeded);
        assert!(rl.check_at("2.2.2.2", t0).is_allowed());
    }

    #[test]
    fn wall_clock_wrapper_allows_first_request() {
        let mut rl = RequestLimiter::default();
        assert!(rl.check("9.9.9.9").is_allowed());
    }

    #[test]
    fn default_budgets() {
        let rl = RequestLimiter::default();
        assert_eq!(rl.per_minute, 20);
        assert_eq!(rl.per_day, 100);
    }

    #[test]
    fn twenty_first_request_in_a_minute_is_rejected() {
        let mut rl = RequestLimiter::default();
        let t0 = Instant::now();
        for _ in 0..20 {
            assert!(rl.check_at("flood", t0).is_allowed());
        }
        assert_eq!(rl.check_at("flood", t0), RateDecision::PerMinuteExceeded);
    }
}
