//! Worker repository implementation.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use sitecrew_core::error::AppError;
use sitecrew_core::result::AppResult;
use sitecrew_core::traits::{Record, Repository};
use sitecrew_core::types::id::{UserId, WorkerId};
use sitecrew_entity::Worker;

use crate::collection::Collection;
use crate::repositories::user::UserRepository;

/// Which workers a listing covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerScope {
    Active,
    Fired,
    #[default]
    All,
}

impl WorkerScope {
    pub fn includes(self, worker: &Worker) -> bool {
        match self {
            Self::Active => worker.is_active(),
            Self::Fired => worker.is_fired,
            Self::All => true,
        }
    }
}

/// Worker listing criteria. Blank criteria match everything.
#[derive(Debug, Clone, Default)]
pub struct WorkerFilter {
    pub scope: WorkerScope,
    /// Case-insensitive substring of the name.
    pub search: Option<String>,
    /// Exact position.
    pub position: Option<String>,
}

impl WorkerFilter {
    pub fn matches(&self, worker: &Worker) -> bool {
        if !self.scope.includes(worker) {
            return false;
        }
        let search = self.search.as_deref().map(str::trim).unwrap_or_default();
        if !search.is_empty() && !worker.name.to_lowercase().contains(&search.to_lowercase()) {
            return false;
        }
        let position = self.position.as_deref().map(str::trim).unwrap_or_default();
        position.is_empty() || worker.position == position
    }
}

/// Repository for worker profiles. Deleting a worker fires it.
pub struct WorkerRepository {
    records: Collection<Worker>,
    users: Arc<UserRepository>,
}

impl WorkerRepository {
    pub async fn open(path: impl Into<PathBuf>, users: Arc<UserRepository>) -> AppResult<Self> {
        Ok(Self {
            records: Collection::open(path).await?,
            users,
        })
    }

    /// Active worker linked to a login account.
    pub async fn find_by_user_id(&self, user_id: &UserId) -> Option<Worker> {
        self.records
            .find(|w| w.is_active() && w.user_id.as_ref() == Some(user_id))
            .await
    }

    /// Workers that can still be scheduled.
    pub async fn find_active(&self) -> Vec<Worker> {
        self.records.filter(Worker::is_active).await
    }

    pub async fn search(&self, filter: &WorkerFilter) -> Vec<Worker> {
        self.records.filter(|w| filter.matches(w)).await
    }

    /// Distinct non-blank positions among the workers in scope, sorted.
    pub async fn positions(&self, scope: WorkerScope) -> Vec<String> {
        let workers = self.records.read().await;
        workers
            .iter()
            .filter(|w| scope.includes(w))
            .map(|w| w.position.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Link an active worker to a login account.
    pub async fn link_user(&self, worker_id: &WorkerId, user_id: &UserId) -> AppResult<Worker> {
        if !self.users.exists(user_id).await {
            return Err(AppError::validation(format!("user '{user_id}' does not exist")));
        }

        let mut guard = self.records.lock().await;
        let worker = guard
            .get(worker_id)
            .ok_or_else(|| AppError::not_found(format!("worker '{worker_id}' not found")))?;
        if !worker.is_active() {
            return Err(AppError::validation("a fired worker cannot be linked to a user"));
        }
        if worker.user_id.as_ref() == Some(user_id) {
            return Ok(worker.clone());
        }
        ensure_user_unlinked(guard.iter(), user_id, worker_id)?;

        let now = Utc::now();
        let linked = guard
            .modify(worker_id, |w| {
                w.user_id = Some(user_id.clone());
                w.updated_at = Some(now);
            })
            .await?;
        info!(worker_id = %worker_id, user_id = %user_id, "Worker linked to user");
        Ok(linked)
    }

    /// Drop every link to a login account. Returns how many workers changed.
    pub async fn clear_user_link(&self, user_id: &UserId) -> AppResult<usize> {
        let mut guard = self.records.lock().await;
        let linked: Vec<WorkerId> = guard
            .iter()
            .filter(|w| w.user_id.as_ref() == Some(user_id))
            .map(|w| w.id.clone())
            .collect();

        let now = Utc::now();
        for worker_id in &linked {
            guard
                .modify(worker_id, |w| {
                    w.user_id = None;
                    w.updated_at = Some(now);
                })
                .await?;
        }
        if !linked.is_empty() {
            info!(user_id = %user_id, count = linked.len(), "Cleared worker links");
        }
        Ok(linked.len())
    }

    /// Every identifier must name an existing, active worker.
    pub async fn ensure_schedulable(&self, ids: &[WorkerId]) -> AppResult<()> {
        let workers = self.records.read().await;
        for id in ids {
            match workers.iter().find(|w| &w.id == id) {
                None => {
                    return Err(AppError::validation(format!("worker '{id}' does not exist")));
                }
                Some(w) if !w.is_active() => {
                    return Err(AppError::validation(format!(
                        "worker '{}' is fired and cannot be scheduled",
                        w.name
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    async fn check_user_link(&self, worker: &Worker) -> AppResult<()> {
        if let Some(user_id) = &worker.user_id {
            if !self.users.exists(user_id).await {
                return Err(AppError::validation(format!("user '{user_id}' does not exist")));
            }
        }
        Ok(())
    }
}

fn ensure_user_unlinked<'a>(
    mut workers: impl Iterator<Item = &'a Worker>,
    user_id: &UserId,
    except: &WorkerId,
) -> AppResult<()> {
    if let Some(other) = workers
        .find(|w| w.is_active() && &w.id != except && w.user_id.as_ref() == Some(user_id))
    {
        return Err(AppError::conflict(format!(
            "user '{user_id}' is already linked to worker '{}'",
            other.name
        )));
    }
    Ok(())
}

#[async_trait]
impl Repository<Worker> for WorkerRepository {
    async fn find_all(&self) -> Vec<Worker> {
        self.records.snapshot().await
    }

    async fn find_by_id(&self, id: &WorkerId) -> AppResult<Worker> {
        self.records.get(id).await
    }

    async fn create(&self, mut worker: Worker) -> AppResult<Worker> {
        let now = Utc::now();
        worker.is_fired = false;
        worker.fired_at = None;
        worker.created_at = Some(now);
        worker.updated_at = Some(now);
        worker.normalize();
        worker.validate()?;

        let mut guard = self.records.lock().await;
        self.check_user_link(&worker).await?;
        if let Some(user_id) = &worker.user_id {
            ensure_user_unlinked(guard.iter(), user_id, &worker.id)?;
        }
        guard.insert(worker).await
    }

    async fn update(&self, mut worker: Worker) -> AppResult<Worker> {
        let mut guard = self.records.lock().await;
        let stored = guard
            .get(&worker.id)
            .ok_or_else(|| AppError::not_found(format!("worker '{}' not found", worker.id)))?;
        worker.keep_server_fields(stored);
        worker.updated_at = Some(Utc::now());
        worker.normalize();
        worker.validate()?;
        guard.replace(worker).await
    }

    async fn delete(&self, id: &WorkerId) -> AppResult<()> {
        self.records.lock().await.remove(id, Utc::now()).await?;
        Ok(())
    }

    async fn count(&self) -> usize {
        self.records.len().await
    }
}
