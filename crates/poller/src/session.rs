//! Local live view of one machine.
//!
//! Holds the last successfully fetched reading and status. Failed fetches
//! never clear held state; instead the time since the last success is
//! tracked so callers can surface staleness.

use std::time::{Duration, Instant};

use crate::client::{LiveReading, StatusRow};

/// The poller's in-memory picture of the watched machine.
pub struct LiveView {
    latest_reading: Option<LiveReading>,
    current_status: Option<StatusRow>,
    last_reading_update: Option<Instant>,
    last_status_update: Option<Instant>,
    last_manual_refresh: Option<Instant>,
    refresh_debounce: Duration,
}

impl LiveView {
    pub fn new(refresh_debounce: Duration) -> Self {
        Self {
            latest_reading: None,
            current_status: None,
            last_reading_update: None,
            last_status_update: None,
            last_manual_refresh: None,
            refresh_debounce,
        }
    }

    /// Store a freshly fetched reading and reset its staleness clock.
    pub fn apply_reading(&mut self, reading: LiveReading, now: Instant) {
        self.latest_reading = Some(reading);
        self.last_reading_update = Some(now);
    }

    /// Store a freshly fetched status and reset its staleness clock.
    pub fn apply_status(&mut self, status: StatusRow, now: Instant) {
        self.current_status = Some(status);
        self.last_status_update = Some(now);
    }

    pub fn latest_reading(&self) -> Option<&LiveReading> {
        self.latest_reading.as_ref()
    }

    pub fn current_status(&self) -> Option<&StatusRow> {
        self.current_status.as_ref()
    }

    /// Time since the last successful reading fetch, if any succeeded.
    pub fn reading_staleness(&self, now: Instant) -> Option<Duration> {
        self.last_reading_update.map(|t| now - t)
    }

    /// Time since the last successful status fetch, if any succeeded.
    pub fn status_staleness(&self, now: Instant) -> Option<Duration> {
        self.last_status_update.map(|t| now - t)
    }

    /// Whether a manual refresh may fire now. Consumes the debounce window
    /// when it returns true.
    pub fn try_manual_refresh(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_manual_refresh {
            if now - last < self.refresh_debounce {
                return false;
            }
        }
        self.last_manual_refresh = Some(now);
        true
    }
}
