//! In-memory stores for tests and embedding
//!
//! Documents are cloned in and out, so callers see the same
//! load/mutate/save behaviour as with SQLite. Every job save is also kept in
//! a history so progress sequences can be inspected afterwards.

use async_trait::async_trait;
use seatmap_common::{Error, Event, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::{EventStore, JobStore};
use crate::models::{ImportJob, JobStatus};

#[derive(Debug)]
pub struct MemoryStore {
    events: RwLock<HashMap<String, Event>>,
    jobs: RwLock<HashMap<Uuid, ImportJob>>,
    job_history: RwLock<Vec<ImportJob>>,
    /// Event saves allowed before saves start failing (usize::MAX = never)
    event_save_budget: AtomicUsize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            events: RwLock::new(HashMap::new()),
            jobs: RwLock::new(HashMap::new()),
            job_history: RwLock::new(Vec::new()),
            event_save_budget: AtomicUsize::new(usize::MAX),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every event save after the first `saves` fail
    pub fn fail_event_saves_after(&self, saves: usize) {
        self.event_save_budget.store(saves, Ordering::SeqCst);
    }

    /// Every persisted version of one job, in save order
    pub async fn job_history(&self, job_id: Uuid) -> Vec<ImportJob> {
        self.job_history
            .read()
            .await
            .iter()
            .filter(|job| job.id == job_id)
            .cloned()
            .collect()
    }

    async fn record_job(&self, job: &ImportJob) {
        self.jobs.write().await.insert(job.id, job.clone());
        self.job_history.write().await.push(job.clone());
    }

    fn take_event_save(&self) -> Result<()> {
        let granted = self
            .event_save_budget
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| match left {
                usize::MAX => Some(usize::MAX),
                0 => None,
                n => Some(n - 1),
            })
            .is_ok();

        if granted {
            Ok(())
        } else {
            Err(Error::Internal("Simulated event save failure".to_string()))
        }
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn find_event(&self, event_id: &str) -> Result<Option<Event>> {
        Ok(self.events.read().await.get(event_id).cloned())
    }

    async fn save_event(&self, event: &Event) -> Result<()> {
        self.take_event_save()?;
        self.events
            .write()
            .await
            .insert(event.id.clone(), event.clone());
        Ok(())
    }

    async fn create_event(&self, event: &Event) -> Result<()> {
        let mut events = self.events.write().await;
        if events.contains_key(&event.id) {
            return Err(Error::InvalidInput(format!("Event already exists: {}", event.id)));
        }
        events.insert(event.id.clone(), event.clone());
        Ok(())
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = self.events.read().await.values().cloned().collect();
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(events)
    }

    async fn delete_event(&self, event_id: &str) -> Result<bool> {
        Ok(self.events.write().await.remove(event_id).is_some())
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn create_job(&self, job: &ImportJob) -> Result<()> {
        if self.jobs.read().await.contains_key(&job.id) {
            return Err(Error::InvalidInput(format!("Import job already exists: {}", job.id)));
        }
        self.record_job(job).await;
        Ok(())
    }

    async fn save_job(&self, job: &ImportJob) -> Result<()> {
        let mut jobs = self.jobs.write().await;
        if jobs.get(&job.id).is_some_and(|stored| stored.is_terminal()) {
            return Err(Error::InvalidInput(format!(
                "Import job {} is already finished",
                job.id
            )));
        }
        jobs.insert(job.id, job.clone());
        self.job_history.write().await.push(job.clone());
        Ok(())
    }

    async fn claim_job(&self, job: &ImportJob) -> Result<bool> {
        let mut jobs = self.jobs.write().await;
        match jobs.get(&job.id) {
            Some(stored) if stored.status == JobStatus::Pending => {}
            _ => return Ok(false),
        }
        jobs.insert(job.id, job.clone());
        self.job_history.write().await.push(job.clone());
        Ok(true)
    }

    async fn find_job(&self, job_id: Uuid) -> Result<Option<ImportJob>> {
        Ok(self.jobs.read().await.get(&job_id).cloned())
    }

    async fn list_jobs_with_status(&self, status: JobStatus) -> Result<Vec<ImportJob>> {
        let mut jobs: Vec<ImportJob> = self
            .jobs
            .read()
            .await
            .values()
            .filter(|job| job.status == status)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ColumnMapping;

    #[tokio::test]
    async fn test_event_save_budget() {
        let store = MemoryStore::new();
        let event = Event::new("Gala");

        store.fail_event_saves_after(1);
        store.save_event(&event).await.unwrap();
        assert!(store.save_event(&event).await.is_err());
    }

    #[tokio::test]
    async fn test_create_event_rejects_duplicate() {
        let store = MemoryStore::new();
        let event = Event::new("Gala");
        store.create_event(&event).await.unwrap();
        assert!(store.create_event(&event).await.is_err());
        assert!(store.delete_event(&event.id).await.unwrap());
        assert!(!store.delete_event(&event.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_finished_job_rejects_saves_and_claims() {
        let store = MemoryStore::new();
        let mut job = ImportJob::new("e".to_string(), String::new(), ColumnMapping::default(), false);
        store.create_job(&job).await.unwrap();

        job.start(0).unwrap();
        assert!(store.claim_job(&job).await.unwrap());
        assert!(!store.claim_job(&job).await.unwrap());

        let running = job.clone();
        job.complete().unwrap();
        store.save_job(&job).await.unwrap();

        assert!(store.save_job(&running).await.is_err());
        assert!(!store.claim_job(&running).await.unwrap());
        let stored = store.find_job(job.id).await.unwrap().unwrap();
        assert_eq!(stored.status, JobStatus::Done);
    }

    #[tokio::test]
    async fn test_job_history_tracks_saves() {
        let store = MemoryStore::new();
        let mut job = ImportJob::new("e".to_string(), String::new(), ColumnMapping::default(), false);
        store.create_job(&job).await.unwrap();
        job.start(0).unwrap();
        store.save_job(&job).await.unwrap();

        let history = store.job_history(job.id).await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].status, JobStatus::Pending);
        assert_eq!(history[1].status, JobStatus::Running);
        assert_eq!(
            store.list_jobs_with_status(JobStatus::Running).await.unwrap().len(),
            1
        );
    }
}
