//! Job object repository implementation.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use sitecrew_core::error::AppError;
use sitecrew_core::result::AppResult;
use sitecrew_core::traits::{Record, Repository};
use sitecrew_core::types::id::ObjectId;
use sitecrew_entity::JobObject;

use crate::collection::Collection;
use crate::repositories::user::UserRepository;

/// Repository for job objects.
pub struct ObjectRepository {
    records: Collection<JobObject>,
    users: Arc<UserRepository>,
}

impl ObjectRepository {
    pub async fn open(path: impl Into<PathBuf>, users: Arc<UserRepository>) -> AppResult<Self> {
        Ok(Self {
            records: Collection::open(path).await?,
            users,
        })
    }

    /// Every identifier must name an existing object that is in progress.
    pub async fn ensure_schedulable(&self, ids: &[ObjectId]) -> AppResult<()> {
        let objects = self.records.read().await;
        for id in ids {
            match objects.iter().find(|o| &o.id == id) {
                None => {
                    return Err(AppError::validation(format!("object '{id}' does not exist")));
                }
                Some(o) if !o.status.accepts_schedule() => {
                    return Err(AppError::validation(format!(
                        "object '{}' is {} and cannot be scheduled",
                        o.name, o.status
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    async fn prepare(&self, object: &mut JobObject) -> AppResult<()> {
        object.normalize();
        object.validate()?;
        if let Some(user_id) = &object.responsible_user_id {
            if !self.users.exists(user_id).await {
                return Err(AppError::validation(format!(
                    "responsible user '{user_id}' does not exist"
                )));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Repository<JobObject> for ObjectRepository {
    async fn find_all(&self) -> Vec<JobObject> {
        self.records.snapshot().await
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<JobObject> {
        self.records.get(id).await
    }

    async fn create(&self, mut object: JobObject) -> AppResult<JobObject> {
        let mut guard = self.records.lock().await;
        self.prepare(&mut object).await?;
        guard.insert(object).await
    }

    async fn update(&self, mut object: JobObject) -> AppResult<JobObject> {
        let mut guard = self.records.lock().await;
        if guard.get(&object.id).is_none() {
            return Err(AppError::not_found(format!("object '{}' not found", object.id)));
        }
        self.prepare(&mut object).await?;
        guard.replace(object).await
    }

    async fn delete(&self, id: &ObjectId) -> AppResult<()> {
        self.records.lock().await.remove(id, Utc::now()).await?;
        Ok(())
    }

    async fn count(&self) -> usize {
        self.records.len().await
    }
}
