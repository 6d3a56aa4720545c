//! HTTP request handlers, one module per resource.

pub mod alerts;
pub mod machine_status;
pub mod machines;
pub mod sensor_data;
pub mod users;
