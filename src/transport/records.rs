//! Wire schema: one typed record per backend collection.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::Collection;
use crate::model::{
    Column, ColumnId, Project, ProjectId, Role, Task, TaskId, User, UserId,
};

/// A record stored in a known collection
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: Collection;
}

/// A partial update against a known collection
pub trait Patch: Serialize + Send + Sync {
    const COLLECTION: Collection;

    fn is_empty(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub owner_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRecord {
    pub id: ColumnId,
    pub project_id: ProjectId,
    pub name: String,
    pub position: i64,
    #[serde(default)]
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    pub project_id: ProjectId,
    pub column_id: ColumnId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub position: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub task_id: TaskId,
    pub user_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl Record for ProjectRecord {
    const COLLECTION: Collection = Collection::Projects;
}

impl Record for ColumnRecord {
    const COLLECTION: Collection = Collection::BoardColumns;
}

impl Record for TaskRecord {
    const COLLECTION: Collection = Collection::Tasks;
}

impl Record for AssignmentRecord {
    const COLLECTION: Collection = Collection::TaskAssignees;
}

impl Record for UserRecord {
    const COLLECTION: Collection = Collection::Users;
}

/// Column fields that can be patched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
}

impl ColumnPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        ColumnPatch {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn position(position: i64) -> Self {
        ColumnPatch {
            position: Some(position),
            ..Default::default()
        }
    }
}

impl Patch for ColumnPatch {
    const COLLECTION: Collection = Collection::BoardColumns;

    fn is_empty(&self) -> bool {
        self.name.is_none() && self.position.is_none()
    }
}

/// Task fields that can be patched. `updated_at` is stamped by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_id: Option<ColumnId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Patch for TaskPatch {
    const COLLECTION: Collection = Collection::Tasks;

    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.column_id.is_none()
            && self.position.is_none()
    }
}

// ---------------------------------------------------------------------------
// Model <-> record conversions
// ---------------------------------------------------------------------------

impl From<&Project> for ProjectRecord {
    fn from(p: &Project) -> Self {
        ProjectRecord {
            id: p.id.clone(),
            name: p.name.clone(),
            owner_id: p.owner_id.clone(),
            created_at: p.created_at,
            archived_at: p.archived_at,
        }
    }
}

impl From<ProjectRecord> for Project {
    fn from(r: ProjectRecord) -> Self {
        Project {
            id: r.id,
            name: r.name,
            owner_id: r.owner_id,
            created_at: r.created_at,
            archived_at: r.archived_at,
        }
    }
}

impl From<&Column> for ColumnRecord {
    fn from(c: &Column) -> Self {
        ColumnRecord {
            id: c.id.clone(),
            project_id: c.project_id.clone(),
            name: c.name.clone(),
            position: c.position,
            is_default: c.is_default,
            created_at: c.created_at,
        }
    }
}

impl From<ColumnRecord> for Column {
    fn from(r: ColumnRecord) -> Self {
        Column {
            id: r.id,
            project_id: r.project_id,
            name: r.name,
            position: r.position,
            is_default: r.is_default,
            created_at: r.created_at,
        }
    }
}

impl From<&Task> for TaskRecord {
    fn from(t: &Task) -> Self {
        TaskRecord {
            id: t.id.clone(),
            project_id: t.project_id.clone(),
            column_id: t.column_id.clone(),
            title: t.title.clone(),
            description: t.description.clone(),
            due_date: t.due_date,
            position: t.position,
            created_by: t.created_by.clone(),
            archived_at: t.archived_at,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

impl TaskRecord {
    /// Local task with assignees resolved by the caller
    pub fn into_task(self, assignees: Vec<User>) -> Task {
        Task {
            id: self.id,
            project_id: self.project_id,
            column_id: self.column_id,
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            position: self.position,
            created_by: self.created_by,
            archived_at: self.archived_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
            assignees,
        }
    }
}

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        User {
            id: r.id,
            name: r.name,
            email: r.email,
            role: r.role,
            created_at: r.created_at,
        }
    }
}
