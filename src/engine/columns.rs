use futures::future::join_all;

use super::commit::{Compensation, Mutation};
use super::error::{EngineError, MutationReport, Result};
use super::{Engine, remote};
use crate::io::snapshot::SnapshotStore;
use crate::model::{Column, ColumnId, ProjectId};
use crate::ops::position::{PositionChange, append_position, insert_at};
use crate::ops::store_ops;
use crate::transport::{Collection, ColumnPatch, ColumnRecord, Filter, Patch, Transport};

impl<T: Transport, S: SnapshotStore> Engine<T, S> {
    /// Append a column to a project. It shows up locally once the backend
    /// has accepted it.
    pub async fn create_column(&mut self, project_id: &str, name: &str) -> Result<Column> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::EmptyName);
        }
        let position = append_position(
            self.state
                .ordered_columns(project_id)
                .iter()
                .map(|c| c.position),
        );
        let column = Column::new(ProjectId::from(project_id), name, position);

        let mut mutation = Mutation::begin("create_column", Compensation::None);
        mutation.dispatch();
        let created = remote::create(&self.transport, &[ColumnRecord::from(&column)]).await;
        mutation.settle(created.is_ok());
        self.record(mutation);
        created?;

        store_ops::insert_column(&mut self.state, column.clone());
        self.save();
        tracing::info!(column = %column.id, name, position, "created column");
        Ok(column)
    }

    /// Send the provided fields and merge them locally on success
    pub async fn update_column(&mut self, column_id: &str, mut patch: ColumnPatch) -> Result<()> {
        if self.state.column(column_id).is_none() {
            return Err(EngineError::ColumnNotFound(column_id.to_string()));
        }
        if let Some(name) = patch.name.as_mut() {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err(EngineError::EmptyName);
            }
            *name = trimmed.to_string();
        }
        if patch.is_empty() {
            return Ok(());
        }

        let mut mutation = Mutation::begin("update_column", Compensation::None);
        mutation.dispatch();
        let updated = remote::update(&self.transport, &Filter::by("id", column_id), &patch).await;
        mutation.settle(updated.is_ok());
        self.record(mutation);
        updated?;

        store_ops::merge_column(&mut self.state, column_id, &patch)?;
        self.save();
        tracing::info!(column = column_id, "updated column");
        Ok(())
    }

    /// Delete a column and its tasks. Default columns are refused.
    ///
    /// Tasks are deleted one by one first; failures there are reported but
    /// do not stop the column delete. Nothing is removed locally unless the
    /// column delete succeeds.
    pub async fn delete_column(&mut self, column_id: &str) -> Result<MutationReport> {
        let column = self
            .state
            .column(column_id)
            .ok_or_else(|| EngineError::ColumnNotFound(column_id.to_string()))?;
        if column.is_default {
            return Err(EngineError::DefaultColumnProtected(column_id.to_string()));
        }
        let task_ids: Vec<String> = self
            .state
            .ordered_tasks(column_id)
            .iter()
            .map(|t| t.id.to_string())
            .collect();

        let mut mutation = Mutation::begin("delete_column", Compensation::None);
        mutation.dispatch();
        let mut report = MutationReport::default();
        for task_id in task_ids {
            let filter = Filter::by("id", &task_id);
            if let Err(e) = remote::remove(&self.transport, Collection::Tasks, &filter).await {
                tracing::warn!(task = %task_id, error = %e, "task delete failed");
                report.push(task_id, e);
            }
        }

        let removed = remote::remove(
            &self.transport,
            Collection::BoardColumns,
            &Filter::by("id", column_id),
        )
        .await;
        mutation.settle(removed.is_ok());
        self.record(mutation);
        removed?;

        let tasks = store_ops::remove_column_cascade(&mut self.state, column_id)?;
        self.save();
        tracing::info!(column = column_id, tasks, "deleted column");
        Ok(report)
    }

    /// Move a column to `new_index` among its project's columns, renumber
    /// and reload.
    pub async fn reorder_columns(
        &mut self,
        column_id: &str,
        new_index: usize,
    ) -> Result<MutationReport> {
        let column = self
            .state
            .column(column_id)
            .ok_or_else(|| EngineError::ColumnNotFound(column_id.to_string()))?;
        let siblings = store_ops::column_siblings(&self.state, column.project_id.as_str());
        let placement = insert_at(&siblings, &ColumnId::from(column_id), new_index);
        let mut report = MutationReport::default();
        if placement.is_noop() || placement.changes.is_empty() {
            return Ok(report);
        }

        let requests: Vec<(Filter, ColumnPatch)> = placement
            .changes
            .iter()
            .map(|c| (Filter::by("id", &c.id), ColumnPatch::position(c.to)))
            .collect();

        let mut mutation = Mutation::begin("reorder_columns", Compensation::None);
        mutation.dispatch();
        let results = join_all(
            requests
                .iter()
                .map(|(filter, patch)| remote::update(&self.transport, filter, patch)),
        )
        .await;

        let mut applied: Vec<PositionChange<ColumnId>> = Vec::new();
        for (change, result) in placement.changes.into_iter().zip(results) {
            match result {
                Ok(()) => applied.push(change),
                Err(e) => {
                    tracing::warn!(column = %change.id, error = %e, "column position update failed");
                    report.push(change.id.to_string(), e);
                }
            }
        }
        mutation.settle(report.is_clean());
        self.record(mutation);
        store_ops::apply_column_positions(&mut self.state, &applied)?;
        self.save();

        if let Err(e) = self.load_from_backend().await {
            tracing::warn!(error = %e, "reload after column reorder failed");
            report.push(column_id, e);
        }
        tracing::info!(column = column_id, index = placement.index, "reordered columns");
        Ok(report)
    }
}
