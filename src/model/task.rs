use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{ColumnId, ProjectId, TaskId, UserId};
use super::user::User;

/// A task card living in exactly one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub project_id: ProjectId,
    pub column_id: ColumnId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Rank among the tasks of `column_id` (0 = top)
    pub position: i64,
    #[serde(default)]
    pub created_by: Option<UserId>,
    #[serde(default)]
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Resolved through `task_assignees`; never sent to the backend
    #[serde(default)]
    pub assignees: Vec<User>,
}

/// Fields accepted when creating a task
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub created_by: Option<UserId>,
}

impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        NewTask {
            title: title.into(),
            ..Default::default()
        }
    }
}

impl Task {
    pub fn is_assigned_to(&self, user_id: &str) -> bool {
        self.assignees.iter().any(|u| u.id.as_str() == user_id)
    }
}
