//! Machine operating status.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Operating status of a machine.
///
/// Stored as lowercase text in the `machine_status` table; the most recent
/// row per machine is its current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Online,
    Offline,
    Maintenance,
    Error,
}

impl StatusKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusKind::Online => "online",
            StatusKind::Offline => "offline",
            StatusKind::Maintenance => "maintenance",
            StatusKind::Error => "error",
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(StatusKind::Online),
            "offline" => Ok(StatusKind::Offline),
            "maintenance" => Ok(StatusKind::Maintenance),
            "error" => Ok(StatusKind::Error),
            other => Err(CoreError::Validation(format!(
                "Unknown machine status: {other}"
            ))),
        }
    }
}
