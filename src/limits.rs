//! Negotiated session limits and record-rate enforcement.
//!
//! The server announces its limits in `ServerHello`; both sides then hold a
//! [`SessionLimits`] and the enforcing side runs a [`RateLimiter`] per peer.

use crate::clock::TICKS_PER_MILLISECOND;
use crate::records::{RateLimit, ServerHello};

/// Limits a session operates under, as negotiated during the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    /// Heartbeat interval in milliseconds.
    pub heartbeat_rate: u32,
    /// Maximum records per rate window.
    pub rate_limit: u32,
    /// Maximum accepted payload length in bytes.
    pub payload_limit: u32,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            heartbeat_rate: 5000,
            rate_limit: 1000,
            payload_limit: 1024,
        }
    }
}

impl SessionLimits {
    /// Adopt the limits a server announced.
    pub fn from_server_hello(hello: &ServerHello) -> Self {
        Self {
            heartbeat_rate: hello.heartbeat_rate,
            rate_limit: hello.rate_limit,
            payload_limit: hello.payload_limit,
        }
    }
}

/// Outcome of counting one record against the rate window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitStatus {
    /// Under the limit.
    Ok,
    /// Approaching the limit; the peer should back off.
    Warning,
    /// Limit reached; further records in this window are violations.
    Exceeded,
}

/// Fixed-window record counter.
///
/// Counts records per window; warns once traffic reaches 90% of the limit
/// and reports `Exceeded` at the limit. The window resets when `check` is
/// called past its end.
#[derive(Debug, Clone, Copy)]
pub struct RateLimiter {
    limit: u32,
    window_ticks: i64,
    window_start: i64,
    count: u32,
}

impl RateLimiter {
    /// A limiter allowing `limit` records per `window_ticks` ticks.
    pub fn new(limit: u32, window_ticks: i64) -> Self {
        Self {
            limit,
            window_ticks,
            window_start: 0,
            count: 0,
        }
    }

    /// One-second window sized from negotiated session limits.
    pub fn from_limits(limits: &SessionLimits) -> Self {
        Self::new(limits.rate_limit, 1000 * TICKS_PER_MILLISECOND)
    }

    /// Tick at which the current window resets.
    pub fn window_reset(&self) -> i64 {
        self.window_start + self.window_ticks
    }

    /// Count one record received at `now_ticks` and classify the result.
    pub fn check(&mut self, now_ticks: i64) -> RateLimitStatus {
        if self.count == 0 || now_ticks >= self.window_reset() {
            self.window_start = now_ticks;
            self.count = 0;
        }

        self.count = self.count.saturating_add(1);

        if self.count >= self.limit {
            RateLimitStatus::Exceeded
        } else if self.count as u64 * 10 >= self.limit as u64 * 9 {
            RateLimitStatus::Warning
        } else {
            RateLimitStatus::Ok
        }
    }

    /// Build the wire notice for the current window state.
    pub fn to_record(&self, now_ticks: i64, warning: bool) -> RateLimit {
        RateLimit {
            timestamp: now_ticks,
            rate_limit_reset: self.window_reset(),
            warning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_protocol_defaults() {
        let limits = SessionLimits::default();
        assert_eq!(limits.heartbeat_rate, 5000);
        assert_eq!(limits.rate_limit, 1000);
        assert_eq!(limits.payload_limit, 1024);
    }

    #[test]
    fn limits_adopt_server_hello() {
        let hello = ServerHello {
            game_version: 1,
            local_time_offset: 0,
            heartbeat_rate: 2500,
            rate_limit: 120,
            payload_limit: 4096,
        };
        let limits = SessionLimits::from_server_hello(&hello);
        assert_eq!(limits.heartbeat_rate, 2500);
        assert_eq!(limits.rate_limit, 120);
        assert_eq!(limits.payload_limit, 4096);
    }

    #[test]
    fn limiter_warns_then_exceeds() {
        let mut limiter = RateLimiter::new(10, 1000);

        for _ in 0..8 {
            assert_eq!(limiter.check(0), RateLimitStatus::Ok);
        }
        // 9th of 10 crosses the 90% warning threshold.
        assert_eq!(limiter.check(0), RateLimitStatus::Warning);
        assert_eq!(limiter.check(0), RateLimitStatus::Exceeded);
        assert_eq!(limiter.check(0), RateLimitStatus::Exceeded);
    }

    #[test]
    fn window_resets_counting() {
        let mut limiter = RateLimiter::new(2, 1000);
        assert_eq!(limiter.check(0), RateLimitStatus::Ok);
        assert_eq!(limiter.check(0), RateLimitStatus::Exceeded);

        // Past the window end the count starts over.
        assert_eq!(limiter.check(1000), RateLimitStatus::Ok);
        assert_eq!(limiter.window_reset(), 2000);
    }

    #[test]
    fn notice_carries_window_reset() {
        let mut limiter = RateLimiter::new(5, 1000);
        limiter.check(100);

        let record = limiter.to_record(150, true);
        assert_eq!(record.timestamp, 150);
        assert_eq!(record.rate_limit_reset, 1100);
        assert!(record.warning);
    }
}
