use std::collections::HashMap;

use futures::future::try_join;

use super::error::Result;
use super::{Engine, remote};
use crate::io::snapshot::SnapshotStore;
use crate::model::{BoardState, Project, TaskId, User};
use crate::transport::{
    AssignmentRecord, ColumnRecord, Filter, ProjectRecord, TaskRecord, Transport, UserRecord,
};

impl<T: Transport, S: SnapshotStore> Engine<T, S> {
    /// Replace local state with the backend's view of the current project.
    ///
    /// Projects, columns and tasks must all load or nothing changes.
    /// Assignees and users are best effort.
    pub async fn load_from_backend(&mut self) -> Result<()> {
        let projects: Vec<ProjectRecord> = remote::read(&self.transport, None).await?;
        let mut loaded = BoardState {
            projects: projects.into_iter().map(Project::from).collect(),
            current_project_id: self.state.current_project_id.clone(),
            ..Default::default()
        };
        loaded.fix_current_project();

        let users: Vec<User> = match remote::read::<_, UserRecord>(&self.transport, None).await {
            Ok(rows) => rows.into_iter().map(User::from).collect(),
            Err(e) => {
                tracing::warn!(error = %e, "could not load users");
                Vec::new()
            }
        };

        if let Some(project_id) = loaded.current_project_id.clone() {
            let by_project = Filter::by("project_id", &project_id);
            let (columns, tasks) = try_join(
                remote::read::<_, ColumnRecord>(&self.transport, Some(&by_project)),
                remote::read::<_, TaskRecord>(&self.transport, Some(&by_project)),
            )
            .await?;

            let mut assigned = self.read_assignees(&tasks, &users).await;
            for record in columns {
                loaded.columns.insert(record.id.clone(), record.into());
            }
            for record in tasks {
                let assignees = assigned.remove(&record.id).unwrap_or_default();
                loaded.tasks.insert(record.id.clone(), record.into_task(assignees));
            }
        }
        loaded.users = users;

        tracing::info!(
            projects = loaded.projects.len(),
            columns = loaded.columns.len(),
            tasks = loaded.tasks.len(),
            "loaded board from backend"
        );
        self.state = loaded;
        self.save();
        Ok(())
    }

    async fn read_assignees(
        &self,
        tasks: &[TaskRecord],
        users: &[User],
    ) -> HashMap<TaskId, Vec<User>> {
        let mut assigned: HashMap<TaskId, Vec<User>> = HashMap::new();
        if tasks.is_empty() {
            return assigned;
        }
        let filter = Filter::any_of("task_id", tasks.iter().map(|t| &t.id));
        let rows: Vec<AssignmentRecord> = match remote::read(&self.transport, Some(&filter)).await
        {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(error = %e, "could not load task assignees");
                return assigned;
            }
        };
        for row in rows {
            match users.iter().find(|u| u.id == row.user_id) {
                Some(user) => assigned.entry(row.task_id).or_default().push(user.clone()),
                None => tracing::debug!(user = %row.user_id, "assignee not among loaded users"),
            }
        }
        assigned
    }
}
