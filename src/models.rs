// Data models for the task list

use eyre::{Result, eyre};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single to-do item held by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    ToDo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// All statuses, in display order
    pub const ALL: [TaskStatus; 3] = [TaskStatus::ToDo, TaskStatus::InProgress, TaskStatus::Done];

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::ToDo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }

    /// Status for a record imported with a completion flag
    pub fn from_completed(completed: bool) -> Self {
        if completed { TaskStatus::Done } else { TaskStatus::ToDo }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for TaskStatus {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect();

        match normalized.as_str() {
            "todo" => Ok(TaskStatus::ToDo),
            "inprogress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            _ => Err(eyre!("Unknown status: {} (expected To Do, In Progress or Done)", s)),
        }
    }
}

/// Input for creating a task; omitted fields take the store defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Partial update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }

    pub(crate) fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
    }
}

/// Record shape served by the seed source
///
/// Matches the demo API (`{"userId", "id", "title", "completed"}`); extra
/// fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "id")]
    pub external_id: u64,
    pub title: String,
    pub completed: bool,
}

impl RawRecord {
    pub fn into_task(self) -> Task {
        Task {
            id: self.external_id,
            description: format!("Description for Task {}", self.external_id),
            title: self.title,
            status: TaskStatus::from_completed(self.completed),
        }
    }
}
