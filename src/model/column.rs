use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{ColumnId, ProjectId};

/// A column on a project board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub project_id: ProjectId,
    pub name: String,
    /// Rank among the project's columns (0 = leftmost)
    pub position: i64,
    /// Default columns are seeded with the project and cannot be deleted
    #[serde(default)]
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

impl Column {
    pub fn new(project_id: ProjectId, name: impl Into<String>, position: i64) -> Self {
        Column {
            id: ColumnId::generate(),
            project_id,
            name: name.into(),
            position,
            is_default: false,
            created_at: Utc::now(),
        }
    }
}
