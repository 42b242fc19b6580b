//! Mirror file configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Location of the JSON mirror files and the security log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding every mirror file.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_users_file")]
    pub users_file: String,
    #[serde(default = "default_workers_file")]
    pub workers_file: String,
    #[serde(default = "default_objects_file")]
    pub objects_file: String,
    /// Schedule entries keep the historical `timesheets` file name.
    #[serde(default = "default_schedule_file")]
    pub schedule_file: String,
    #[serde(default = "default_security_log")]
    pub security_log_file: String,
}

impl StorageConfig {
    /// Resolve a file name against the data directory.
    pub fn path_of(&self, file: &str) -> PathBuf {
        PathBuf::from(&self.data_dir).join(file)
    }

    /// Configuration rooted at another directory, keeping the file names.
    pub fn rooted_at(dir: impl Into<String>) -> Self {
        Self {
            data_dir: dir.into(),
            ..Self::default()
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            users_file: default_users_file(),
            workers_file: default_workers_file(),
            objects_file: default_objects_file(),
            schedule_file: default_schedule_file(),
            security_log_file: default_security_log(),
        }
    }
}

fn default_data_dir() -> String {
    "storage".to_string()
}

fn default_users_file() -> String {
    "users.json".to_string()
}

fn default_workers_file() -> String {
    "workers.json".to_string()
}

fn default_objects_file() -> String {
    "objects.json".to_string()
}

fn default_schedule_file() -> String {
    "timesheets.json".to_string()
}

fn default_security_log() -> String {
    "security.log".to_string()
}
