/// Board derivation and status transitions: partition, sort, cap, move

use crate::config::BoardSettings;
use crate::job::{Job, JobStatus};

/// One rendered column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnView {
    pub status: JobStatus,
    /// Newest first, at most the column's cap
    pub visible: Vec<Job>,
    /// Jobs of this status not rendered because of the cap
    pub hidden: usize,
    pub total: usize,
}

impl ColumnView {
    fn build(status: JobStatus, mut jobs: Vec<Job>, limit: Option<usize>) -> Self {
        // sort_by is stable, so equal timestamps keep collection order
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = jobs.len();
        if let Some(limit) = limit {
            jobs.truncate(limit);
        }
        let hidden = total - jobs.len();

        ColumnView {
            status,
            visible: jobs,
            hidden,
            total,
        }
    }
}

/// The three columns derived from the stored collection
#[derive(Debug, Clone, PartialEq)]
pub struct BoardView {
    pub inbox: ColumnView,
    pub applied: ColumnView,
    pub archive: ColumnView,
}

impl BoardView {
    pub fn columns(&self) -> [&ColumnView; 3] {
        [&self.inbox, &self.applied, &self.archive]
    }

    pub fn column(&self, status: JobStatus) -> &ColumnView {
        match status {
            JobStatus::Inbox => &self.inbox,
            JobStatus::Applied => &self.applied,
            JobStatus::Archive => &self.archive,
        }
    }
}

/// Derive the board from the full collection without touching it
pub fn derive_board(jobs: &[Job], settings: &BoardSettings) -> BoardView {
    let group = |status: JobStatus| -> Vec<Job> {
        jobs.iter().filter(|j| j.status == status).cloned().collect()
    };

    BoardView {
        inbox: ColumnView::build(JobStatus::Inbox, group(JobStatus::Inbox), Some(settings.inbox_limit)),
        applied: ColumnView::build(JobStatus::Applied, group(JobStatus::Applied), None),
        archive: ColumnView::build(JobStatus::Archive, group(JobStatus::Archive), Some(settings.archive_limit)),
    }
}

/// A status change requested by a drop
#[derive(Debug, Clone, PartialEq)]
pub struct Move {
    pub job_id: String,
    pub from: JobStatus,
    pub to: JobStatus,
}

/// Cosmetic reaction to a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// inbox → applied
    Celebrate,
    /// applied → archive
    Encourage,
}

impl Feedback {
    pub fn message(self) -> &'static str {
        match self {
            Feedback::Celebrate => "Great job! 🎉",
            Feedback::Encourage => "Next one will be better! 💪",
        }
    }
}

impl Move {
    pub fn feedback(&self) -> Option<Feedback> {
        match (self.from, self.to) {
            (JobStatus::Inbox, JobStatus::Applied) => Some(Feedback::Celebrate),
            (JobStatus::Applied, JobStatus::Archive) => Some(Feedback::Encourage),
            _ => None,
        }
    }
}

/// What a column received from a drop: the dragged job id and the column itself.
///
/// The id comes from the drag payload; a missing or blank one is no drop at all.
pub fn drop_payload(job_id: Option<String>, column: JobStatus) -> Option<(String, JobStatus)> {
    let job_id = job_id?.trim().to_string();
    if job_id.is_empty() {
        return None;
    }
    Some((job_id, column))
}

/// Turn a drop into a move, or `None` when there is nothing to do:
/// unknown job, or a drop onto the job's own column
pub fn plan_move(jobs: &[Job], job_id: &str, target: JobStatus) -> Option<Move> {
    let job = jobs.iter().find(|j| j.id == job_id)?;

    if job.status == target {
        return None;
    }

    Some(Move {
        job_id: job.id.clone(),
        from: job.status,
        to: target,
    })
}

/// "3 days ago", "1 hour ago", "Just now"
pub fn format_time_ago(now_ms: i64, created_at_ms: i64) -> String {
    let seconds = (now_ms - created_at_ms).max(0) / 1000;
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    let plural = |n: i64, unit: &str| format!("{} {}{} ago", n, unit, if n > 1 { "s" } else { "" });

    if days > 0 {
        plural(days, "day")
    } else if hours > 0 {
        plural(hours, "hour")
    } else if minutes > 0 {
        plural(minutes, "minute")
    } else {
        "Just now".to_string()
    }
}
