//! Append-only security event log.
//!
//! One event per line: `RFC3339 timestamp | event | details`.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::warn;

use sitecrew_core::error::{AppError, ErrorKind};
use sitecrew_core::result::AppResult;

/// Security-relevant events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityEvent {
    LoginSuccess,
    LoginFailed,
    LoginLocked,
    Logout,
    CsrfFailed,
}

impl SecurityEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoginSuccess => "login_success",
            Self::LoginFailed => "login_failed",
            Self::LoginLocked => "login_locked",
            Self::Logout => "logout",
            Self::CsrfFailed => "csrf_failed",
        }
    }
}

impl fmt::Display for SecurityEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed log line.
#[derive(Debug, Clone, Serialize)]
pub struct SecurityLogEntry {
    pub timestamp: String,
    pub event: String,
    pub details: String,
}

/// Line-oriented security log file.
#[derive(Debug)]
pub struct SecurityLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl SecurityLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append an event stamped with the current time.
    ///
    /// Failures are logged and swallowed; a broken log never fails a request.
    pub async fn record(&self, event: SecurityEvent, details: &str) {
        if let Err(e) = self.append(event, details, Utc::now()).await {
            warn!(event = %event, error = %e, "Failed to write security log");
        }
    }

    async fn append(&self, event: SecurityEvent, details: &str, at: DateTime<Utc>) -> AppResult<()> {
        let line = format!(
            "{} | {} | {}\n",
            at.to_rfc3339(),
            event,
            sanitize(details)
        );

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// The newest `limit` entries, newest first. An absent log is empty.
    pub async fn read_recent(&self, limit: usize) -> AppResult<Vec<SecurityLogEntry>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read {}", self.path.display()),
                    e,
                ));
            }
        };

        Ok(raw
            .lines()
            .rev()
            .filter(|line| !line.trim().is_empty())
            .take(limit)
            .map(parse_line)
            .collect())
    }
}

fn sanitize(details: &str) -> String {
    details.replace(['\r', '\n'], " ")
}

fn parse_line(line: &str) -> SecurityLogEntry {
    let mut parts = line.splitn(3, " | ");
    let timestamp = parts.next().unwrap_or_default().trim().to_string();
    let event = parts.next().unwrap_or_default().trim().to_string();
    let details = parts.next().unwrap_or_default().trim().to_string();
    SecurityLogEntry {
        timestamp,
        event,
        details,
    }
}
