//! JSON mirror files.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use sitecrew_core::error::{AppError, ErrorKind};
use sitecrew_core::result::AppResult;

/// Durable copy of one collection: a top-level JSON array in a single file.
#[derive(Debug, Clone)]
pub struct JsonMirror {
    path: PathBuf,
}

impl JsonMirror {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record. `None` when the file does not exist yet.
    pub async fn read<T: DeserializeOwned>(&self) -> AppResult<Option<Vec<T>>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read {}", self.path.display()),
                    e,
                ));
            }
        };

        if raw.trim().is_empty() {
            return Ok(Some(Vec::new()));
        }

        serde_json::from_str(&raw).map(Some).map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Malformed mirror file {}: {e}", self.path.display()),
                e,
            )
        })
    }

    /// Rewrite the whole file.
    ///
    /// The array is written to a sibling temporary file first and renamed
    /// over the mirror, so a crash mid-write leaves the previous version.
    pub async fn write<T: Serialize>(&self, records: &[T]) -> AppResult<()> {
        let body = serde_json::to_vec_pretty(records)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create {}", parent.display()),
                    e,
                )
            })?;
        }

        let tmp = self.temp_path();
        tokio::fs::write(&tmp, &body).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write {}", tmp.display()),
                e,
            )
        })?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to replace {}", self.path.display()),
                e,
            )
        })?;

        debug!(path = %self.path.display(), bytes = body.len(), "Mirror written");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
