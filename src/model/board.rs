use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::column::Column;
use super::ids::{ColumnId, ProjectId, TaskId};
use super::project::Project;
use super::task::Task;
use super::user::User;

/// The in-memory entity store: everything the board shows for the
/// current project, normalized by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardState {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub current_project_id: Option<ProjectId>,
    #[serde(default)]
    pub columns: IndexMap<ColumnId, Column>,
    #[serde(default)]
    pub tasks: IndexMap<TaskId, Task>,
    #[serde(default)]
    pub users: Vec<User>,
}

/// Entities ranked among siblings by an integer position
pub trait Ranked {
    fn rank_id(&self) -> &str;
    fn position(&self) -> i64;
    fn created_at(&self) -> DateTime<Utc>;
}

impl Ranked for Column {
    fn rank_id(&self) -> &str {
        self.id.as_str()
    }
    fn position(&self) -> i64 {
        self.position
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Ranked for Task {
    fn rank_id(&self) -> &str {
        self.id.as_str()
    }
    fn position(&self) -> i64 {
        self.position
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Display order of a sibling set: position ascending, then newest first,
/// then id. Ties only occur while a sibling set is not yet normalized.
pub fn sibling_order<T: Ranked>(a: &T, b: &T) -> Ordering {
    a.position()
        .cmp(&b.position())
        .then_with(|| b.created_at().cmp(&a.created_at()))
        .then_with(|| a.rank_id().cmp(b.rank_id()))
}

impl BoardState {
    pub fn current_project(&self) -> Option<&Project> {
        let id = self.current_project_id.as_ref()?;
        self.projects.iter().find(|p| &p.id == id)
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id.as_str() == id)
    }

    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.get(id)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// Columns of a project in board order
    pub fn ordered_columns(&self, project_id: &str) -> Vec<&Column> {
        let mut columns: Vec<&Column> = self
            .columns
            .values()
            .filter(|c| c.project_id.as_str() == project_id)
            .collect();
        columns.sort_by(|a, b| sibling_order(*a, *b));
        columns
    }

    /// Tasks of a column in board order
    pub fn ordered_tasks(&self, column_id: &str) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self
            .tasks
            .values()
            .filter(|t| t.column_id.as_str() == column_id)
            .collect();
        tasks.sort_by(|a, b| sibling_order(*a, *b));
        tasks
    }

    /// Where a task sits: its column and its index in board order
    pub fn task_location(&self, task_id: &str) -> Option<(ColumnId, usize)> {
        let task = self.task(task_id)?;
        let index = self
            .ordered_tasks(task.column_id.as_str())
            .iter()
            .position(|t| t.id.as_str() == task_id)?;
        Some((task.column_id.clone(), index))
    }

    /// Index of a column among its project's columns
    pub fn column_index(&self, column_id: &str) -> Option<usize> {
        let column = self.column(column_id)?;
        self.ordered_columns(column.project_id.as_str())
            .iter()
            .position(|c| c.id.as_str() == column_id)
    }

    /// Repair a dangling `current_project_id`: fall back to the first
    /// project, or to none. Returns true if the pointer changed.
    pub fn fix_current_project(&mut self) -> bool {
        let valid = match &self.current_project_id {
            Some(id) => self.projects.iter().any(|p| &p.id == id),
            None => self.projects.is_empty(),
        };
        if valid {
            return false;
        }
        self.current_project_id = self.projects.first().map(|p| p.id.clone());
        true
    }
}
