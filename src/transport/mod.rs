//! The record transport the engine persists through.
//!
//! Four verbs against named collections, each answering with a
//! [`Response`]. A transport-level failure (network, I/O) is a
//! [`TransportError`]; a backend refusal is a response with `ok: false`.

pub mod filter;
pub mod memory;
pub mod records;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use filter::{Filter, FilterValue};
pub use memory::MemoryBackend;
pub use records::*;

/// Backend collections the engine reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Projects,
    BoardColumns,
    Tasks,
    TaskAssignees,
    Users,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Projects,
        Collection::BoardColumns,
        Collection::Tasks,
        Collection::TaskAssignees,
        Collection::Users,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Projects => "projects",
            Collection::BoardColumns => "board_columns",
            Collection::Tasks => "tasks",
            Collection::TaskAssignees => "task_assignees",
            Collection::Users => "users",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend answer to any verb
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Response {
    pub fn success(data: Value) -> Self {
        Response {
            ok: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Response {
            ok: false,
            message: Some(message.into()),
            data: None,
        }
    }

    /// Decode `data` as an array of records; absent data is an empty list
    pub fn records<R: DeserializeOwned>(&self) -> Result<Vec<R>, serde_json::Error> {
        match &self.data {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => Vec::<R>::deserialize(value),
        }
    }
}

/// Error type for transport failures (the request never got an answer)
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("could not encode or decode payload: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("backend storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// The four record verbs the engine consumes
#[async_trait]
pub trait Transport: Send + Sync {
    async fn create(
        &self,
        collection: Collection,
        records: Vec<Value>,
    ) -> Result<Response, TransportError>;

    async fn update(
        &self,
        collection: Collection,
        filter: &Filter,
        patch: Value,
    ) -> Result<Response, TransportError>;

    async fn remove(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Response, TransportError>;

    async fn read(
        &self,
        collection: Collection,
        filter: Option<&Filter>,
    ) -> Result<Response, TransportError>;
}
