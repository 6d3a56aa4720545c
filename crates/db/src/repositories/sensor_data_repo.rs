//! Repository for the append-only `sensor_data` table.

use machwatch_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::sensor_data::{CreateSensorReading, DoorClosedTimes, SensorReading};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, machine_id, temperature1, temperature2, temperature3, temperature4, \
                       speed1, speed2, speed3, speed4, door1_open, door2_open, recorded_at";

/// How many rows the history endpoint returns at most.
const HISTORY_LIMIT: i64 = 100;

/// Provides append/read operations for sensor readings. There is no update:
/// readings are immutable snapshots.
pub struct SensorDataRepo;

impl SensorDataRepo {
    /// Append a reading, returning the stored row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSensorReading,
    ) -> Result<SensorReading, sqlx::Error> {
        let query = format!(
            "INSERT INTO sensor_data
                (machine_id, temperature1, temperature2, temperature3, temperature4,
                 speed1, speed2, speed3, speed4, door1_open, door2_open)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SensorReading>(&query)
            .bind(input.machine_id)
            .bind(input.temperatures[0])
            .bind(input.temperatures[1])
            .bind(input.temperatures[2])
            .bind(input.temperatures[3])
            .bind(input.speeds[0])
            .bind(input.speeds[1])
            .bind(input.speeds[2])
            .bind(input.speeds[3])
            .bind(input.doors_open[0])
            .bind(input.doors_open[1])
            .fetch_one(pool)
            .await
    }

    /// The most recent reading for a machine, if any.
    pub async fn latest_for_machine(
        pool: &PgPool,
        machine_id: DbId,
    ) -> Result<Option<SensorReading>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sensor_data
             WHERE machine_id = $1
             ORDER BY recorded_at DESC, id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, SensorReading>(&query)
            .bind(machine_id)
            .fetch_optional(pool)
            .await
    }

    /// The last 100 readings for a machine, newest first.
    pub async fn history_for_machine(
        pool: &PgPool,
        machine_id: DbId,
    ) -> Result<Vec<SensorReading>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sensor_data
             WHERE machine_id = $1
             ORDER BY recorded_at DESC, id DESC
             LIMIT {HISTORY_LIMIT}"
        );
        sqlx::query_as::<_, SensorReading>(&query)
            .bind(machine_id)
            .fetch_all(pool)
            .await
    }

    /// When each door of a machine was last recorded closed, plus the oldest
    /// reading timestamp as a fallback for never-closed doors.
    pub async fn door_closed_times(
        pool: &PgPool,
        machine_id: DbId,
    ) -> Result<DoorClosedTimes, sqlx::Error> {
        sqlx::query_as::<_, DoorClosedTimes>(
            "SELECT
                (SELECT recorded_at FROM sensor_data
                  WHERE machine_id = $1 AND door1_open = FALSE
                  ORDER BY recorded_at DESC LIMIT 1) AS door1_last_closed,
                (SELECT recorded_at FROM sensor_data
                  WHERE machine_id = $1 AND door2_open = FALSE
                  ORDER BY recorded_at DESC LIMIT 1) AS door2_last_closed,
                (SELECT MIN(recorded_at) FROM sensor_data
                  WHERE machine_id = $1) AS first_reading",
        )
        .bind(machine_id)
        .fetch_one(pool)
        .await
    }

    /// Purge every reading. Administrative operation; returns the row count.
    pub async fn delete_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sensor_data").execute(pool).await?;
        Ok(result.rows_affected())
    }

    /// Purge readings older than `cutoff` (retention job). Returns the row
    /// count.
    pub async fn delete_older_than(pool: &PgPool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sensor_data WHERE recorded_at < $1")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
