//! Sensor reading model and DTOs.

use chrono::Utc;
use machwatch_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// One immutable sensor reading from the `sensor_data` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SensorReading {
    pub id: DbId,
    pub machine_id: DbId,
    pub temperature1: f64,
    pub temperature2: f64,
    pub temperature3: f64,
    pub temperature4: f64,
    pub speed1: f64,
    pub speed2: f64,
    pub speed3: f64,
    pub speed4: f64,
    pub door1_open: bool,
    pub door2_open: bool,
    pub recorded_at: Timestamp,
}

impl SensorReading {
    /// Synthesized all-zero reading for machines without stored samples.
    ///
    /// `id` is 0 to mark the row as synthetic; real rows start at 1.
    pub fn zero_reading(machine_id: DbId) -> Self {
        Self {
            id: 0,
            machine_id,
            temperature1: 0.0,
            temperature2: 0.0,
            temperature3: 0.0,
            temperature4: 0.0,
            speed1: 0.0,
            speed2: 0.0,
            speed3: 0.0,
            speed4: 0.0,
            door1_open: false,
            door2_open: false,
            recorded_at: Utc::now(),
        }
    }
}

/// DTO for appending a new reading.
#[derive(Debug, Clone)]
pub struct CreateSensorReading {
    pub machine_id: DbId,
    pub temperatures: [f64; 4],
    pub speeds: [f64; 4],
    pub doors_open: [bool; 2],
}

/// Per-door "last seen closed" timestamps, used to compute how long each
/// door has been open for the door-alert grace rule.
#[derive(Debug, Clone, FromRow)]
pub struct DoorClosedTimes {
    pub door1_last_closed: Option<Timestamp>,
    pub door2_last_closed: Option<Timestamp>,
    /// Oldest reading for the machine, the fallback when a door has never
    /// been seen closed.
    pub first_reading: Option<Timestamp>,
}
