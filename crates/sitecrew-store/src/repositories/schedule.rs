//! Schedule entry repository implementation.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use sitecrew_core::error::AppError;
use sitecrew_core::result::AppResult;
use sitecrew_core::traits::{Record, Repository};
use sitecrew_core::types::id::{ScheduleEntryId, WorkerId};
use sitecrew_entity::ScheduleEntry;

use crate::collection::Collection;
use crate::repositories::object::ObjectRepository;
use crate::repositories::worker::WorkerRepository;

/// Repository for schedule entries.
///
/// References are checked against the worker and object collections at
/// write time only. An entry whose worker is fired later stays valid.
pub struct ScheduleRepository {
    records: Collection<ScheduleEntry>,
    workers: Arc<WorkerRepository>,
    objects: Arc<ObjectRepository>,
}

impl ScheduleRepository {
    pub async fn open(
        path: impl Into<PathBuf>,
        workers: Arc<WorkerRepository>,
        objects: Arc<ObjectRepository>,
    ) -> AppResult<Self> {
        Ok(Self {
            records: Collection::open(path).await?,
            workers,
            objects,
        })
    }

    /// Entries that include the given worker.
    pub async fn find_for_worker(&self, worker_id: &WorkerId) -> Vec<ScheduleEntry> {
        self.records
            .filter(|e| e.worker_ids.contains(worker_id))
            .await
    }

    /// Entries on one calendar day (`YYYY-MM-DD`).
    pub async fn find_by_date(&self, date: &str) -> Vec<ScheduleEntry> {
        let date = date.trim();
        self.records.filter(|e| e.date == date).await
    }

    async fn prepare(&self, entry: &mut ScheduleEntry) -> AppResult<()> {
        entry.normalize();
        entry.validate()?;
        self.workers.ensure_schedulable(&entry.worker_ids).await?;
        self.objects.ensure_schedulable(&entry.object_ids).await?;
        Ok(())
    }
}

#[async_trait]
impl Repository<ScheduleEntry> for ScheduleRepository {
    async fn find_all(&self) -> Vec<ScheduleEntry> {
        self.records.snapshot().await
    }

    async fn find_by_id(&self, id: &ScheduleEntryId) -> AppResult<ScheduleEntry> {
        self.records.get(id).await
    }

    async fn create(&self, mut entry: ScheduleEntry) -> AppResult<ScheduleEntry> {
        let mut guard = self.records.lock().await;
        self.prepare(&mut entry).await?;
        guard.insert(entry).await
    }

    async fn update(&self, mut entry: ScheduleEntry) -> AppResult<ScheduleEntry> {
        let mut guard = self.records.lock().await;
        let stored = guard
            .get(&entry.id)
            .ok_or_else(|| AppError::not_found(format!("schedule entry '{}' not found", entry.id)))?;
        entry.keep_server_fields(stored);
        self.prepare(&mut entry).await?;
        guard.replace(entry).await
    }

    async fn delete(&self, id: &ScheduleEntryId) -> AppResult<()> {
        self.records.lock().await.remove(id, Utc::now()).await?;
        Ok(())
    }

    async fn count(&self) -> usize {
        self.records.len().await
    }
}
