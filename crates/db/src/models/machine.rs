//! Machine entity model and DTOs.

use machwatch_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full machine row from the `machines` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Machine {
    pub id: DbId,
    pub name: String,
    pub model: String,
    pub machine_type: String,
    pub serial_number: String,
    pub location: String,
    pub last_service: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new machine.
#[derive(Debug)]
pub struct CreateMachine {
    pub name: String,
    pub model: String,
    pub machine_type: String,
    pub serial_number: String,
    pub location: String,
    /// Defaults to NOW() when absent.
    pub last_service: Option<Timestamp>,
}

/// DTO for patching an existing machine. `None` fields are left untouched.
#[derive(Debug, Default)]
pub struct UpdateMachine {
    pub name: Option<String>,
    pub model: Option<String>,
    pub machine_type: Option<String>,
    pub serial_number: Option<String>,
    pub location: Option<String>,
    pub last_service: Option<Timestamp>,
}
