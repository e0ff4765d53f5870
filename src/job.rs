/// Data structures for tracked job applications
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Column a job lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Inbox,
    Applied,
    Archive,
}

impl JobStatus {
    pub const ALL: [JobStatus; 3] = [JobStatus::Inbox, JobStatus::Applied, JobStatus::Archive];

    /// Identifier used both in storage and as the drop target id
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Inbox => "inbox",
            JobStatus::Applied => "applied",
            JobStatus::Archive => "archive",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            JobStatus::Inbox => "Inbox",
            JobStatus::Applied => "Applied",
            JobStatus::Archive => "Archive",
        }
    }
}

/// A persisted job record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, alias = "notes")]
    pub note: String,
    #[serde(default)]
    pub priority: bool,
    pub status: JobStatus,
    #[serde(default)]
    pub created_at: i64,
}

/// Contents of the capture form before it becomes a `Job`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobDraft {
    pub title: String,
    pub company: String,
    pub url: String,
    pub note: String,
    pub priority: bool,
}

impl JobDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(())
    }

    /// Build an inbox record stamped with `created_at` (ms since epoch)
    pub fn into_job(self, created_at: i64) -> Result<Job, ValidationError> {
        self.validate()?;

        Ok(Job {
            id: new_job_id(),
            title: self.title.trim().to_string(),
            company: self.company.trim().to_string(),
            url: self.url,
            note: self.note,
            priority: self.priority,
            status: JobStatus::Inbox,
            created_at,
        })
    }
}

pub fn new_job_id() -> String {
    Uuid::new_v4().to_string()
}

/// The active browser tab as reported by `chrome.tabs.query`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabInfo {
    pub id: Option<i32>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
}
