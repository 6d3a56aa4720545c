use std::sync::Arc;

use machwatch_core::evaluator::MonitorPolicy;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable; inner data is behind `Arc` or already `Clone`. The
/// database pool is the only shared mutable resource in the process.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: machwatch_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Threshold policy used by the sensor ingestion evaluator.
    pub policy: Arc<MonitorPolicy>,
}
