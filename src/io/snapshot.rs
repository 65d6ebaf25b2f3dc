//! Local snapshot of the board, restored on startup and rewritten after
//! every state transition.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::atomic_write;
use crate::model::BoardState;

/// Bumped whenever the snapshot layout changes; other versions are ignored
pub const SNAPSHOT_VERSION: u32 = 5;

/// On-disk snapshot layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    #[serde(flatten)]
    pub state: BoardState,
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("could not write snapshot {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Where the engine keeps its local snapshot
pub trait SnapshotStore {
    fn load(&self) -> Option<BoardState>;
    fn save(&self, state: &BoardState) -> Result<(), SnapshotError>;
}

/// Snapshot store that keeps nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSnapshotStore;

impl SnapshotStore for NullSnapshotStore {
    fn load(&self) -> Option<BoardState> {
        None
    }

    fn save(&self, _state: &BoardState) -> Result<(), SnapshotError> {
        Ok(())
    }
}

/// JSON snapshot file (`state.json`)
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSnapshotStore { path: path.into() }
    }

    /// `state.json` inside a board directory
    pub fn in_dir(board_dir: &Path) -> Self {
        Self::new(board_dir.join("state.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Option<BoardState> {
        read_snapshot(&self.path)
    }

    fn save(&self, state: &BoardState) -> Result<(), SnapshotError> {
        write_snapshot(&self.path, state)
    }
}

/// Read a snapshot; missing, malformed or other-version files give `None`
pub fn read_snapshot(path: &Path) -> Option<BoardState> {
    let content = fs::read_to_string(path).ok()?;
    let snapshot: Snapshot = serde_json::from_str(&content).ok()?;
    if snapshot.version != SNAPSHOT_VERSION {
        tracing::info!(
            found = snapshot.version,
            expected = SNAPSHOT_VERSION,
            "ignoring snapshot from another version"
        );
        return None;
    }
    Some(snapshot.state)
}

pub fn write_snapshot(path: &Path, state: &BoardState) -> Result<(), SnapshotError> {
    let snapshot = Snapshot {
        version: SNAPSHOT_VERSION,
        state: state.clone(),
    };
    let content = serde_json::to_string_pretty(&snapshot)?;
    atomic_write(path, content.as_bytes()).map_err(|source| SnapshotError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Column, Project};
    use tempfile::TempDir;

    fn sample_state() -> BoardState {
        let project = Project::new("Launch", None);
        let column = Column::new(project.id.clone(), "Todo", 0);
        let mut state = BoardState {
            current_project_id: Some(project.id.clone()),
            projects: vec![project],
            ..Default::default()
        };
        state.columns.insert(column.id.clone(), column);
        state
    }

    #[test]
    fn write_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileSnapshotStore::in_dir(dir.path());
        let state = sample_state();

        store.save(&state).unwrap();
        assert_eq!(store.load(), Some(state));
    }

    #[test]
    fn read_missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        assert!(read_snapshot(&dir.path().join("state.json")).is_none());
    }

    #[test]
    fn read_malformed_json_returns_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "not json {{{").unwrap();
        assert!(read_snapshot(&path).is_none());
    }

    #[test]
    fn other_version_is_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, r#"{"version": 4, "projects": []}"#).unwrap();
        assert!(read_snapshot(&path).is_none());
    }

    #[test]
    fn minimal_snapshot_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, r#"{"version": 5}"#).unwrap();
        let state = read_snapshot(&path).unwrap();
        assert!(state.projects.is_empty());
        assert!(state.current_project_id.is_none());
        assert!(state.tasks.is_empty());
    }

    #[test]
    fn snapshot_layout_is_flat() {
        let value = serde_json::to_value(Snapshot {
            version: SNAPSHOT_VERSION,
            state: BoardState::default(),
        })
        .unwrap();
        for key in ["version", "projects", "current_project_id", "columns", "tasks", "users"] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
    }
}
