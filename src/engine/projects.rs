use futures::future::join_all;

use super::commit::{Compensation, Mutation};
use super::error::{EngineError, MutationReport, Result};
use super::{Engine, remote};
use crate::io::snapshot::SnapshotStore;
use crate::model::{Column, Project, ProjectId, UserId};
use crate::ops::store_ops;
use crate::transport::{ColumnRecord, ProjectRecord, Transport};

/// Result of [`Engine::create_project`]. Default columns that failed to
/// seed are listed in the report; the project itself exists.
#[derive(Debug)]
pub struct ProjectCreated {
    pub project: Project,
    pub report: MutationReport,
}

impl<T: Transport, S: SnapshotStore> Engine<T, S> {
    /// Create a project, seed its default columns and make it current
    pub async fn create_project(
        &mut self,
        name: &str,
        owner_id: Option<UserId>,
    ) -> Result<ProjectCreated> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::EmptyName);
        }
        let project = Project::new(name, owner_id);

        let mut mutation = Mutation::begin("create_project", Compensation::None);
        mutation.dispatch();
        let created = remote::create(&self.transport, &[ProjectRecord::from(&project)]).await;
        mutation.settle(created.is_ok());
        self.record(mutation);
        if let Err(e) = created {
            tracing::warn!(error = %e, name, "project create failed");
            return Err(e);
        }

        self.state.projects.push(project.clone());
        self.state.current_project_id = Some(project.id.clone());
        self.state.columns.clear();
        self.state.tasks.clear();
        self.save();

        let columns: Vec<Column> = self
            .config
            .board
            .default_columns
            .iter()
            .enumerate()
            .map(|(i, name)| Column {
                is_default: true,
                ..Column::new(project.id.clone(), name.clone(), i as i64)
            })
            .collect();
        let records: Vec<ColumnRecord> = columns.iter().map(ColumnRecord::from).collect();
        let results = join_all(
            records
                .iter()
                .map(|record| remote::create(&self.transport, std::slice::from_ref(record))),
        )
        .await;

        let mut report = MutationReport::default();
        for (column, result) in columns.into_iter().zip(results) {
            match result {
                Ok(()) => store_ops::insert_column(&mut self.state, column),
                Err(e) => {
                    tracing::warn!(column = %column.name, error = %e, "default column seed failed");
                    report.push(column.id.to_string(), e);
                }
            }
        }
        self.save();

        if let Err(e) = self.load_from_backend().await {
            tracing::warn!(error = %e, "reload after project create failed");
            report.push(project.id.to_string(), e);
        }
        tracing::info!(project = %project.id, name, "created project");
        Ok(ProjectCreated { project, report })
    }

    /// Switch the current project and load it. Unknown ids are corrected
    /// by the loader.
    pub async fn set_current_project(&mut self, project_id: &str) -> Result<()> {
        self.state.current_project_id = Some(ProjectId::from(project_id));
        self.state.columns.clear();
        self.state.tasks.clear();
        self.save();
        self.load_from_backend().await
    }
}
