//! Job object status enumeration.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Progress of a job object. Only `in_progress` objects accept new schedule
/// entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectStatus {
    #[default]
    InProgress,
    Paused,
    Completed,
}

impl ObjectStatus {
    /// Map any stored value onto a status. Unknown values become `in_progress`.
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "paused" => Self::Paused,
            "completed" => Self::Completed,
            _ => Self::InProgress,
        }
    }

    /// Whether new work can be scheduled on the object.
    pub fn accepts_schedule(&self) -> bool {
        matches!(self, Self::InProgress)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Paused => "paused",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for ObjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ObjectStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::normalize(&raw))
    }
}
