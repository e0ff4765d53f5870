/// The persisted job collection and its read-modify-write mutations

use crate::job::{Job, JobStatus};
use serde::{Deserialize, Serialize};

/// chrome.storage.local key holding the job list
pub const JOBS_KEY: &str = "jobs";

/// chrome.storage.local key holding user settings
pub const SETTINGS_KEY: &str = "settings";

/// Root storage structure, serialized as a bare list of jobs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobCollection {
    pub jobs: Vec<Job>,
}

impl JobCollection {
    pub fn new() -> Self {
        JobCollection { jobs: Vec::new() }
    }

    pub fn from_jobs(jobs: Vec<Job>) -> Self {
        JobCollection { jobs }
    }

    /// Newest captures go to the front
    pub fn add(&mut self, job: Job) {
        self.jobs.insert(0, job);
    }

    pub fn get(&self, job_id: &str) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == job_id)
    }

    /// Change only the status of the matching job
    pub fn set_status(&mut self, job_id: &str, status: JobStatus) -> bool {
        self.jobs
            .iter_mut()
            .find(|j| j.id == job_id)
            .map(|job| {
                job.status = status;
            })
            .is_some()
    }

    pub fn remove(&mut self, job_id: &str) -> bool {
        let original_len = self.jobs.len();
        self.jobs.retain(|j| j.id != job_id);
        self.jobs.len() < original_len
    }

    /// Drop every archived job, returning how many were removed
    pub fn clear_archive(&mut self) -> usize {
        let original_len = self.jobs.len();
        self.jobs.retain(|j| j.status != JobStatus::Archive);
        original_len - self.jobs.len()
    }

    pub fn count(&self, status: JobStatus) -> usize {
        self.jobs.iter().filter(|j| j.status == status).count()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
