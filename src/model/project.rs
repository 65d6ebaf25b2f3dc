use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{ProjectId, UserId};

/// A project owning a set of columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub owner_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub archived_at: Option<DateTime<Utc>>,
}

impl Project {
    /// A fresh, unsaved project with a generated id
    pub fn new(name: impl Into<String>, owner_id: Option<UserId>) -> Self {
        Project {
            id: ProjectId::generate(),
            name: name.into(),
            owner_id,
            created_at: Utc::now(),
            archived_at: None,
        }
    }

    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }
}
