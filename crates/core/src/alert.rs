//! Alert classification types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// What kind of condition an alert reports.
///
/// Stored as lowercase text in the `alerts` table. At most one *active*
/// alert per (machine, type) may exist; see the partial unique index in
/// the `create_alerts_table` migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Temperature,
    Door,
    Speed,
    Maintenance,
    Other,
}

impl AlertType {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertType::Temperature => "temperature",
            AlertType::Door => "door",
            AlertType::Speed => "speed",
            AlertType::Maintenance => "maintenance",
            AlertType::Other => "other",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "temperature" => Ok(AlertType::Temperature),
            "door" => Ok(AlertType::Door),
            "speed" => Ok(AlertType::Speed),
            "maintenance" => Ok(AlertType::Maintenance),
            "other" => Ok(AlertType::Other),
            unknown => Err(CoreError::Validation(format!(
                "Unknown alert type: {unknown}"
            ))),
        }
    }
}

/// How urgent an alert is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            unknown => Err(CoreError::Validation(format!(
                "Unknown severity: {unknown}"
            ))),
        }
    }
}
