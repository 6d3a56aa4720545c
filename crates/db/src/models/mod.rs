//! Row models and DTOs, one module per table.

pub mod alert;
pub mod machine;
pub mod machine_status;
pub mod sensor_data;
pub mod user;
