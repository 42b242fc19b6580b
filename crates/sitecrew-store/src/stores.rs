//! All collections of the application, loaded together at startup.

use std::sync::Arc;

use tracing::info;

use sitecrew_core::config::storage::StorageConfig;
use sitecrew_core::result::AppResult;
use sitecrew_core::traits::PasswordHashing;

use crate::repositories::{ObjectRepository, ScheduleRepository, UserRepository, WorkerRepository};
use crate::security_log::SecurityLog;

/// Every repository plus the security log, built once and shared.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<UserRepository>,
    pub workers: Arc<WorkerRepository>,
    pub objects: Arc<ObjectRepository>,
    pub schedule: Arc<ScheduleRepository>,
    pub security_log: Arc<SecurityLog>,
}

impl Stores {
    /// Load every mirror. Any I/O or parse failure is fatal to startup.
    pub async fn open(config: &StorageConfig, hasher: Arc<dyn PasswordHashing>) -> AppResult<Self> {
        tokio::fs::create_dir_all(&config.data_dir).await?;

        let users = Arc::new(UserRepository::open(config.path_of(&config.users_file), hasher).await?);
        let workers = Arc::new(
            WorkerRepository::open(config.path_of(&config.workers_file), Arc::clone(&users)).await?,
        );
        let objects = Arc::new(
            ObjectRepository::open(config.path_of(&config.objects_file), Arc::clone(&users)).await?,
        );
        let schedule = Arc::new(
            ScheduleRepository::open(
                config.path_of(&config.schedule_file),
                Arc::clone(&workers),
                Arc::clone(&objects),
            )
            .await?,
        );
        let security_log = Arc::new(SecurityLog::new(
            config.path_of(&config.security_log_file),
        ));

        info!(data_dir = %config.data_dir, "Stores loaded");

        Ok(Self {
            users,
            workers,
            objects,
            schedule,
            security_log,
        })
    }
}
