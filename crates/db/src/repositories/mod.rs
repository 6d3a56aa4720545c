//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod alert_repo;
pub mod machine_repo;
pub mod machine_status_repo;
pub mod sensor_data_repo;
pub mod user_repo;

pub use alert_repo::AlertRepo;
pub use machine_repo::MachineRepo;
pub use machine_status_repo::MachineStatusRepo;
pub use sensor_data_repo::SensorDataRepo;
pub use user_repo::UserRepo;
