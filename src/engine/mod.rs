//! The mutation engine.
//!
//! [`Engine`] owns the board state, applies mutations to it, persists them
//! through a [`Transport`] and falls back to a full reload when the backend
//! and local state may have diverged. Every mutating method takes
//! `&mut self`, so only one mutation can be in flight per engine.

pub mod commit;
mod columns;
pub mod error;
mod projects;
mod reload;
mod remote;
mod tasks;

pub use commit::{Compensation, Mutation, Phase};
pub use error::{EngineError, MutationReport, Result, StepFailure};
pub use projects::ProjectCreated;

use chrono::{DateTime, Utc};

use crate::io::snapshot::SnapshotStore;
use crate::model::{BoardState, Config};
use crate::ops::drag::{self, DragEnd, DragMove, DragSession};
use crate::transport::Transport;

pub struct Engine<T, S> {
    transport: T,
    store: S,
    config: Config,
    state: BoardState,
    last_mutation: Option<Mutation>,
}

impl<T: Transport, S: SnapshotStore> Engine<T, S> {
    /// Build an engine, restoring whatever snapshot the store holds
    pub fn new(transport: T, store: S, config: Config) -> Self {
        let mut state = store.load().unwrap_or_default();
        if state.fix_current_project() {
            tracing::info!(
                current = ?state.current_project_id,
                "snapshot pointed at a missing project"
            );
        }
        Engine {
            transport,
            store,
            config,
            state,
            last_mutation: None,
        }
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Lifecycle of the most recent mutation that reached the backend
    pub fn last_mutation(&self) -> Option<&Mutation> {
        self.last_mutation.as_ref()
    }

    /// A fresh drag session using the configured activation distance
    pub fn drag_session(&self) -> DragSession {
        DragSession::new(self.config.drag.activation_distance)
    }

    pub fn resolve_drop(&self, end: &DragEnd) -> Option<DragMove> {
        drag::resolve(&self.state, end)
    }

    /// Apply a resolved drag move
    pub async fn apply_drop(&mut self, drag_move: DragMove) -> Result<MutationReport> {
        match drag_move {
            DragMove::Task {
                task_id,
                to_column,
                to_index,
                ..
            } => {
                self.move_task(task_id.as_str(), to_column.as_str(), to_index)
                    .await?;
                Ok(MutationReport::default())
            }
            DragMove::Column {
                column_id,
                to_index,
                ..
            } => self.reorder_columns(column_id.as_str(), to_index).await,
        }
    }

    fn save(&self) {
        if let Err(e) = self.store.save(&self.state) {
            tracing::warn!(error = %e, "could not save snapshot");
        }
    }

    fn record(&mut self, mutation: Mutation) {
        tracing::debug!(name = mutation.name(), phase = %mutation.phase(), "mutation settled");
        self.last_mutation = Some(mutation);
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }
}
