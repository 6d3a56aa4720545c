//! Polling client for the machwatch backend.
//!
//! Periodically fetches the latest sensor reading and current status for
//! one machine and holds them as a local live view, tolerating backend
//! outages by keeping the last good state and tracking staleness.

pub mod client;
pub mod config;
pub mod session;
