//! Local mutations of the entity store. No I/O: the engine decides when
//! these run relative to the remote calls.

use chrono::{DateTime, Utc};

use crate::model::{BoardState, Column, ColumnId, Task, TaskId};
use crate::ops::position::PositionChange;
use crate::transport::{ColumnPatch, TaskPatch};

/// Error type for store lookups
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("task not found: {0}")]
    TaskNotFound(String),
    #[error("column not found: {0}")]
    ColumnNotFound(String),
}

/// Ordered `(id, position)` pairs of a project's columns
pub fn column_siblings(state: &BoardState, project_id: &str) -> Vec<(ColumnId, i64)> {
    state
        .ordered_columns(project_id)
        .into_iter()
        .map(|c| (c.id.clone(), c.position))
        .collect()
}

/// Ordered `(id, position)` pairs of a column's tasks
pub fn task_siblings(state: &BoardState, column_id: &str) -> Vec<(TaskId, i64)> {
    state
        .ordered_tasks(column_id)
        .into_iter()
        .map(|t| (t.id.clone(), t.position))
        .collect()
}

pub fn insert_column(state: &mut BoardState, column: Column) {
    state.columns.insert(column.id.clone(), column);
}

/// Merge the provided fields into a column
pub fn merge_column(
    state: &mut BoardState,
    column_id: &str,
    patch: &ColumnPatch,
) -> Result<(), StoreError> {
    let column = state
        .columns
        .get_mut(column_id)
        .ok_or_else(|| StoreError::ColumnNotFound(column_id.to_string()))?;
    if let Some(name) = &patch.name {
        column.name = name.clone();
    }
    if let Some(position) = patch.position {
        column.position = position;
    }
    Ok(())
}

/// Remove a column together with every task it holds.
/// Returns the number of tasks removed.
pub fn remove_column_cascade(state: &mut BoardState, column_id: &str) -> Result<usize, StoreError> {
    state
        .columns
        .shift_remove(column_id)
        .ok_or_else(|| StoreError::ColumnNotFound(column_id.to_string()))?;
    let before = state.tasks.len();
    state.tasks.retain(|_, t| t.column_id.as_str() != column_id);
    Ok(before - state.tasks.len())
}

pub fn insert_task(state: &mut BoardState, task: Task) {
    state.tasks.insert(task.id.clone(), task);
}

/// Merge the provided fields into a task and stamp `updated_at`
pub fn merge_task(
    state: &mut BoardState,
    task_id: &str,
    patch: &TaskPatch,
    now: DateTime<Utc>,
) -> Result<(), StoreError> {
    let task = state
        .tasks
        .get_mut(task_id)
        .ok_or_else(|| StoreError::TaskNotFound(task_id.to_string()))?;
    if let Some(title) = &patch.title {
        task.title = title.clone();
    }
    if let Some(description) = &patch.description {
        task.description = Some(description.clone());
    }
    if let Some(due_date) = patch.due_date {
        task.due_date = Some(due_date);
    }
    if let Some(column_id) = &patch.column_id {
        task.column_id = column_id.clone();
    }
    if let Some(position) = patch.position {
        task.position = position;
    }
    task.updated_at = patch.updated_at.unwrap_or(now);
    Ok(())
}

pub fn remove_task(state: &mut BoardState, task_id: &str) -> Result<Task, StoreError> {
    state
        .tasks
        .shift_remove(task_id)
        .ok_or_else(|| StoreError::TaskNotFound(task_id.to_string()))
}

/// Apply a task placement: the moved task joins `to_column`, and every
/// changed sibling takes its new position. All touched tasks get `now`.
pub fn apply_task_move(
    state: &mut BoardState,
    task_id: &str,
    to_column: &ColumnId,
    changes: &[PositionChange<TaskId>],
    now: DateTime<Utc>,
) -> Result<(), StoreError> {
    let moved = state
        .tasks
        .get_mut(task_id)
        .ok_or_else(|| StoreError::TaskNotFound(task_id.to_string()))?;
    moved.column_id = to_column.clone();
    moved.updated_at = now;

    for change in changes {
        let task = state
            .tasks
            .get_mut(change.id.as_str())
            .ok_or_else(|| StoreError::TaskNotFound(change.id.to_string()))?;
        task.position = change.to;
        task.updated_at = now;
    }
    Ok(())
}

/// Give columns their new positions
pub fn apply_column_positions(
    state: &mut BoardState,
    changes: &[PositionChange<ColumnId>],
) -> Result<(), StoreError> {
    for change in changes {
        merge_column(state, change.id.as_str(), &ColumnPatch::position(change.to))?;
    }
    Ok(())
}
