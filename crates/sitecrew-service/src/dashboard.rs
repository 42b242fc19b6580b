//! Headline counters for the landing page.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::Serialize;

use sitecrew_core::traits::Repository;
use sitecrew_entity::ObjectStatus;
use sitecrew_store::repositories::{ObjectRepository, ScheduleRepository, WorkerRepository};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Day the assignment count refers to, `YYYY-MM-DD`.
    pub date: String,
    /// Schedule entries on that day.
    pub today_assignments: usize,
    /// Workers not fired.
    pub active_workers: usize,
    /// Objects not completed.
    pub active_objects: usize,
}

pub struct DashboardService {
    workers: Arc<WorkerRepository>,
    objects: Arc<ObjectRepository>,
    schedule: Arc<ScheduleRepository>,
}

impl DashboardService {
    pub fn new(
        workers: Arc<WorkerRepository>,
        objects: Arc<ObjectRepository>,
        schedule: Arc<ScheduleRepository>,
    ) -> Self {
        Self {
            workers,
            objects,
            schedule,
        }
    }

    /// Counters for the server's local calendar day.
    pub async fn stats(&self) -> DashboardStats {
        self.stats_on(Local::now().date_naive()).await
    }

    pub async fn stats_on(&self, day: NaiveDate) -> DashboardStats {
        let date = day.format("%Y-%m-%d").to_string();
        let today_assignments = self.schedule.find_by_date(&date).await.len();
        let active_workers = self.workers.find_active().await.len();
        let active_objects = self
            .objects
            .find_all()
            .await
            .iter()
            .filter(|o| o.status != ObjectStatus::Completed)
            .count();

        DashboardStats {
            date,
            today_assignments,
            active_workers,
            active_objects,
        }
    }
}
