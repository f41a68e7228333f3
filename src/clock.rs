//! Heartbeat round-trip measurement and clock-offset estimation.
//!
//! Timestamps across the protocol are in ticks of 100 ns, matching the
//! resolution the handshake and rate-limit records use. The three heartbeat
//! phases form one measurement:
//!
//! 1. the originator sends `Initial` stamped with its clock,
//! 2. the responder echoes `FirstTrip` with its measured one-way delay
//!    (responder clock minus the echoed timestamp, so it still contains the
//!    clock offset between the peers),
//! 3. the originator closes with `LastTrip`: RTT is its own clock minus the
//!    echoed timestamp, and the offset estimate is the responder's delay
//!    minus half the RTT.

use crate::records::Heartbeat;
use crate::types::ErrorCode;
use std::time::Duration;
use thiserror::Error;

/// Ticks per second (one tick = 100 ns).
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// Ticks per millisecond.
pub const TICKS_PER_MILLISECOND: i64 = TICKS_PER_SECOND / 1000;

/// Convert a duration to protocol ticks, saturating at `i64::MAX`.
pub fn duration_to_ticks(duration: Duration) -> i64 {
    let nanos = duration.as_nanos() / 100;
    i64::try_from(nanos).unwrap_or(i64::MAX)
}

/// Convert non-negative ticks to a duration; negative values clamp to zero.
pub fn ticks_to_duration(ticks: i64) -> Duration {
    if ticks <= 0 {
        return Duration::ZERO;
    }
    Duration::from_nanos((ticks as u64).saturating_mul(100))
}

/// A heartbeat arrived in a phase the exchange did not expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unexpected heartbeat phase: expected {expected}")]
pub struct PhaseError {
    /// Phase that would have been valid here.
    pub expected: &'static str,
}

impl PhaseError {
    /// The on-wire error code for an out-of-order heartbeat.
    pub fn error_code(&self) -> ErrorCode {
        ErrorCode::SequenceError
    }
}

/// Tracks heartbeat exchanges and the resulting round-trip time and clock
/// offset estimates for one peer.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeartbeatClock {
    round_trip_time: Option<i64>,
    time_offset: Option<i64>,
}

impl HeartbeatClock {
    /// Fresh clock with no measurements yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a measurement: the record the originator sends.
    pub fn initiate(&self, now_ticks: i64) -> Heartbeat {
        Heartbeat::Initial {
            timestamp: now_ticks,
        }
    }

    /// Answer a received `Initial`: echo its timestamp with the delay
    /// measured on the responder's clock.
    pub fn respond(&self, heartbeat: &Heartbeat, now_ticks: i64) -> Result<Heartbeat, PhaseError> {
        match *heartbeat {
            Heartbeat::Initial { timestamp } => Ok(Heartbeat::FirstTrip {
                timestamp,
                // Timestamps come off the wire; saturate instead of
                // overflowing on hostile extremes.
                propagation_delay: now_ticks.saturating_sub(timestamp),
            }),
            _ => Err(PhaseError { expected: "Initial" }),
        }
    }

    /// Close the measurement from a received `FirstTrip`: store RTT and the
    /// clock-offset estimate, and produce the final `LastTrip` record.
    pub fn complete(
        &mut self,
        heartbeat: &Heartbeat,
        now_ticks: i64,
    ) -> Result<Heartbeat, PhaseError> {
        match *heartbeat {
            Heartbeat::FirstTrip {
                timestamp,
                propagation_delay,
            } => {
                let round_trip_time = now_ticks.saturating_sub(timestamp);
                self.round_trip_time = Some(round_trip_time);
                self.time_offset = Some(propagation_delay.saturating_sub(round_trip_time / 2));
                Ok(Heartbeat::LastTrip { round_trip_time })
            }
            _ => Err(PhaseError {
                expected: "FirstTrip",
            }),
        }
    }

    /// Most recent round-trip time in ticks, if a measurement completed.
    pub fn round_trip_time(&self) -> Option<i64> {
        self.round_trip_time
    }

    /// Most recent peer clock-offset estimate in ticks. Positive means the
    /// peer's clock runs ahead of ours.
    pub fn time_offset(&self) -> Option<i64> {
        self.time_offset
    }
}
