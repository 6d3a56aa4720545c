//! Repository for the `machines` table.

use machwatch_core::types::DbId;
use sqlx::PgPool;

use crate::models::machine::{CreateMachine, Machine, UpdateMachine};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, model, machine_type, serial_number, location, \
                       last_service, created_at, updated_at";

/// Provides CRUD operations for machines.
pub struct MachineRepo;

impl MachineRepo {
    /// Insert a new machine, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateMachine) -> Result<Machine, sqlx::Error> {
        let query = format!(
            "INSERT INTO machines (name, model, machine_type, serial_number, location, last_service)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, NOW()))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Machine>(&query)
            .bind(&input.name)
            .bind(&input.model)
            .bind(&input.machine_type)
            .bind(&input.serial_number)
            .bind(&input.location)
            .bind(input.last_service)
            .fetch_one(pool)
            .await
    }

    /// Find a machine by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Machine>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM machines WHERE id = $1");
        sqlx::query_as::<_, Machine>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a machine with the given id exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let found: Option<(DbId,)> = sqlx::query_as("SELECT id FROM machines WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(found.is_some())
    }

    /// List all machines, most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Machine>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM machines ORDER BY created_at DESC");
        sqlx::query_as::<_, Machine>(&query).fetch_all(pool).await
    }

    /// Patch a machine. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMachine,
    ) -> Result<Option<Machine>, sqlx::Error> {
        let query = format!(
            "UPDATE machines SET
                name = COALESCE($2, name),
                model = COALESCE($3, model),
                machine_type = COALESCE($4, machine_type),
                serial_number = COALESCE($5, serial_number),
                location = COALESCE($6, location),
                last_service = COALESCE($7, last_service),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Machine>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.model)
            .bind(&input.machine_type)
            .bind(&input.serial_number)
            .bind(&input.location)
            .bind(input.last_service)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a machine. Readings, statuses, and alerts cascade.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM machines WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
