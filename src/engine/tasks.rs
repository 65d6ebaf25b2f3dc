use futures::future::join_all;

use super::commit::{Compensation, Mutation, Settlement};
use super::error::{EngineError, Result};
use super::{Engine, remote};
use crate::io::snapshot::SnapshotStore;
use crate::model::{Column, NewTask, NewTaskPlacement, Task, TaskId};
use crate::ops::position::{append_position, insert_at};
use crate::ops::store_ops;
use crate::transport::{
    AssignmentRecord, Collection, Filter, TaskPatch, TaskRecord, Transport,
};

impl<T: Transport, S: SnapshotStore> Engine<T, S> {
    /// Column lookup that also checks the column belongs to `project_id`
    fn column_in_project(&self, column_id: &str, project_id: &str) -> Result<&Column> {
        let column = self
            .state
            .column(column_id)
            .ok_or_else(|| EngineError::ColumnNotFound(column_id.to_string()))?;
        if column.project_id.as_str() != project_id {
            return Err(EngineError::ColumnProjectMismatch {
                column: column_id.to_string(),
                project: project_id.to_string(),
            });
        }
        Ok(column)
    }

    fn existing_task(&self, task_id: &str) -> Result<&Task> {
        self.state
            .task(task_id)
            .ok_or_else(|| EngineError::TaskNotFound(task_id.to_string()))
    }

    /// Create a task in a column. The title is trimmed and must not be
    /// empty; where it lands follows `board.new_task_placement`.
    pub async fn create_task(
        &mut self,
        project_id: &str,
        column_id: &str,
        input: NewTask,
    ) -> Result<Task> {
        let title = input.title.trim();
        if title.is_empty() {
            return Err(EngineError::EmptyTitle);
        }
        let column = self.column_in_project(column_id, project_id)?;

        let position = match self.config.board.new_task_placement {
            NewTaskPlacement::Head => 0,
            NewTaskPlacement::Tail => append_position(
                self.state
                    .ordered_tasks(column_id)
                    .iter()
                    .map(|t| t.position),
            ),
        };
        let now = Self::now();
        let task = Task {
            id: TaskId::generate(),
            project_id: column.project_id.clone(),
            column_id: column.id.clone(),
            title: title.to_string(),
            description: input.description,
            due_date: input.due_date,
            position,
            created_by: input.created_by,
            archived_at: None,
            created_at: now,
            updated_at: now,
            assignees: Vec::new(),
        };

        let mut mutation = Mutation::begin("create_task", Compensation::None);
        mutation.dispatch();
        let created = remote::create(&self.transport, &[TaskRecord::from(&task)]).await;
        mutation.settle(created.is_ok());
        self.record(mutation);
        created?;

        store_ops::insert_task(&mut self.state, task.clone());
        self.save();
        tracing::info!(task = %task.id, column = column_id, position, "created task");
        Ok(task)
    }

    /// Patch a task. `updated_at` is always refreshed.
    pub async fn update_task(&mut self, task_id: &str, mut patch: TaskPatch) -> Result<()> {
        let task = self.existing_task(task_id)?;
        if let Some(title) = patch.title.as_mut() {
            let trimmed = title.trim();
            if trimmed.is_empty() {
                return Err(EngineError::EmptyTitle);
            }
            *title = trimmed.to_string();
        }
        if let Some(column_id) = &patch.column_id {
            self.column_in_project(column_id.as_str(), task.project_id.as_str())?;
        }
        let now = Self::now();
        patch.updated_at = Some(now);

        let mut mutation = Mutation::begin("update_task", Compensation::None);
        mutation.dispatch();
        let updated = remote::update(&self.transport, &Filter::by("id", task_id), &patch).await;
        mutation.settle(updated.is_ok());
        self.record(mutation);
        updated?;

        store_ops::merge_task(&mut self.state, task_id, &patch, now)?;
        self.save();
        tracing::info!(task = task_id, "updated task");
        Ok(())
    }

    pub async fn delete_task(&mut self, task_id: &str) -> Result<()> {
        self.existing_task(task_id)?;

        let mut mutation = Mutation::begin("delete_task", Compensation::None);
        mutation.dispatch();
        let removed =
            remote::remove(&self.transport, Collection::Tasks, &Filter::by("id", task_id)).await;
        mutation.settle(removed.is_ok());
        self.record(mutation);
        removed?;

        store_ops::remove_task(&mut self.state, task_id)?;
        self.save();
        tracing::info!(task = task_id, "deleted task");
        Ok(())
    }

    /// Move a task to `to_index` of `to_column_id`.
    ///
    /// The new order is applied and saved locally before anything is sent.
    /// If any position update fails the board is reloaded from the backend
    /// and the error returned.
    pub async fn move_task(
        &mut self,
        task_id: &str,
        to_column_id: &str,
        to_index: usize,
    ) -> Result<()> {
        let task = self.existing_task(task_id)?;
        let to_column = self
            .column_in_project(to_column_id, task.project_id.as_str())?
            .id
            .clone();

        let siblings = store_ops::task_siblings(&self.state, to_column_id);
        let moved = TaskId::from(task_id);
        let placement = insert_at(&siblings, &moved, to_index);
        if placement.is_noop() {
            return Ok(());
        }

        let mut mutation = Mutation::begin("move_task", Compensation::Reload);
        let now = Self::now();
        store_ops::apply_task_move(&mut self.state, task_id, &to_column, &placement.changes, now)?;
        self.save();

        let requests: Vec<(Filter, TaskPatch)> = placement
            .changes
            .iter()
            .map(|change| {
                let patch = TaskPatch {
                    column_id: (change.id == moved).then(|| to_column.clone()),
                    position: Some(change.to),
                    updated_at: Some(now),
                    ..Default::default()
                };
                (Filter::by("id", &change.id), patch)
            })
            .collect();

        mutation.dispatch();
        let results = join_all(
            requests
                .iter()
                .map(|(filter, patch)| remote::update(&self.transport, filter, patch)),
        )
        .await;
        let failure = results.into_iter().find_map(|r| r.err());

        if mutation.settle(failure.is_none()) == Settlement::ReloadRequired {
            let reloaded = self.load_from_backend().await;
            if let Err(e) = &reloaded {
                tracing::warn!(error = %e, "reload after failed move also failed");
            }
            mutation.compensated(reloaded.is_ok());
        }
        self.record(mutation);

        match failure {
            None => {
                tracing::info!(
                    task = task_id,
                    column = to_column_id,
                    index = placement.index,
                    "moved task"
                );
                Ok(())
            }
            Some(e) => {
                tracing::warn!(task = task_id, error = %e, "move failed, board reloaded");
                Err(e)
            }
        }
    }

    /// Assign a user, then reload so the task's assignees are fresh.
    /// Assigning a user who is already on the task sends nothing.
    pub async fn assign_user_to_task(&mut self, task_id: &str, user_id: &str) -> Result<()> {
        if self.existing_task(task_id)?.is_assigned_to(user_id) {
            tracing::debug!(task = task_id, user = user_id, "user already assigned");
            return Ok(());
        }
        let record = AssignmentRecord {
            task_id: task_id.into(),
            user_id: user_id.into(),
        };

        let mut mutation = Mutation::begin("assign_user", Compensation::None);
        mutation.dispatch();
        let created = remote::create(&self.transport, &[record]).await;
        mutation.settle(created.is_ok());
        self.record(mutation);
        created?;

        tracing::info!(task = task_id, user = user_id, "assigned user");
        self.load_from_backend().await
    }

    pub async fn unassign_user_from_task(&mut self, task_id: &str, user_id: &str) -> Result<()> {
        self.existing_task(task_id)?;
        let filter = Filter::by("task_id", task_id).and("user_id", user_id);

        let mut mutation = Mutation::begin("unassign_user", Compensation::None);
        mutation.dispatch();
        let removed = remote::remove(&self.transport, Collection::TaskAssignees, &filter).await;
        mutation.settle(removed.is_ok());
        self.record(mutation);
        removed?;

        tracing::info!(task = task_id, user = user_id, "unassigned user");
        self.load_from_backend().await
    }
}
