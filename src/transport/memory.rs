//! In-process backend implementing [`Transport`].
//!
//! Tables are plain JSON arrays keyed by collection. The backend can be
//! bound to a file (the CLI keeps its board there), records every call, and
//! can be told to fail specific requests.

use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{Collection, Filter, Response, Transport, TransportError};
use crate::io::atomic_write;

/// Which verb a call used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Create,
    Update,
    Remove,
    Read,
}

impl Verb {
    pub fn is_write(self) -> bool {
        !matches!(self, Verb::Read)
    }
}

/// One recorded request
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub verb: Verb,
    pub collection: Collection,
    pub query: Option<String>,
    pub payload: Option<Value>,
}

/// How an injected failure presents itself
#[derive(Debug, Clone, PartialEq)]
pub enum Fault {
    /// Backend answers `ok: false` with this message
    Reject(String),
    /// Request errors before any answer
    Network(String),
}

#[derive(Debug, Clone)]
struct OneShot {
    verb: Verb,
    collection: Collection,
    fault: Fault,
}

#[derive(Debug, Default)]
struct Inner {
    tables: BTreeMap<String, Vec<Value>>,
    calls: Vec<Call>,
    one_shots: VecDeque<OneShot>,
    sticky: BTreeMap<String, Fault>,
    path: Option<PathBuf>,
}

/// Shared handle to an in-memory record store. Clones see the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a backend persisted at `path`. A missing file is an empty store.
    pub fn open(path: &Path) -> Result<Self, TransportError> {
        let tables = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content)?
        } else {
            BTreeMap::new()
        };
        let backend = MemoryBackend::new();
        {
            let mut inner = backend.lock();
            inner.tables = tables;
            inner.path = Some(path.to_path_buf());
        }
        Ok(backend)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic while holding the lock leaves the tables intact
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Seed a record directly, bypassing fault injection and call logs
    pub fn insert(&self, collection: Collection, record: Value) -> Result<(), TransportError> {
        let mut inner = self.lock();
        inner
            .tables
            .entry(collection.as_str().to_string())
            .or_default()
            .push(record);
        persist(&inner)
    }

    /// Snapshot of a table's records
    pub fn records(&self, collection: Collection) -> Vec<Value> {
        self.lock()
            .tables
            .get(collection.as_str())
            .cloned()
            .unwrap_or_default()
    }

    /// Fail the next matching request once
    pub fn fail_next(&self, verb: Verb, collection: Collection, fault: Fault) {
        self.lock().one_shots.push_back(OneShot {
            verb,
            collection,
            fault,
        });
    }

    /// Fail every request against `collection` until cleared
    pub fn fail_collection(&self, collection: Collection, fault: Fault) {
        self.lock()
            .sticky
            .insert(collection.as_str().to_string(), fault);
    }

    pub fn clear_faults(&self) {
        let mut inner = self.lock();
        inner.one_shots.clear();
        inner.sticky.clear();
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Calls made since the last `take_calls`
    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut self.lock().calls)
    }

    /// Number of recorded writes (create/update/remove)
    pub fn write_count(&self) -> usize {
        self.lock().calls.iter().filter(|c| c.verb.is_write()).count()
    }

    fn handle(
        &self,
        verb: Verb,
        collection: Collection,
        filter: Option<&Filter>,
        payload: Option<Value>,
    ) -> Result<Response, TransportError> {
        let mut inner = self.lock();
        inner.calls.push(Call {
            verb,
            collection,
            query: filter.map(Filter::to_query),
            payload: payload.clone(),
        });
        tracing::debug!(?verb, %collection, query = ?filter.map(Filter::to_query), "backend call");

        if let Some(fault) = take_fault(&mut inner, verb, collection) {
            return match fault {
                Fault::Reject(message) => Ok(Response::rejected(message)),
                Fault::Network(message) => Err(TransportError::Network(message)),
            };
        }

        let response = {
            let table = inner
                .tables
                .entry(collection.as_str().to_string())
                .or_default();
            match verb {
                Verb::Create => create_rows(table, payload.unwrap_or(Value::Null)),
                Verb::Update => update_rows(table, filter, payload.unwrap_or(Value::Null)),
                Verb::Remove => remove_rows(table, filter),
                Verb::Read => Response::success(Value::Array(
                    table
                        .iter()
                        .filter(|row| filter.is_none_or(|f| f.matches(row)))
                        .cloned()
                        .collect(),
                )),
            }
        };

        if verb.is_write() && response.ok {
            persist(&inner)?;
        }
        Ok(response)
    }
}

fn take_fault(inner: &mut Inner, verb: Verb, collection: Collection) -> Option<Fault> {
    if let Some(fault) = inner.sticky.get(collection.as_str()) {
        return Some(fault.clone());
    }
    let idx = inner
        .one_shots
        .iter()
        .position(|s| s.verb == verb && s.collection == collection)?;
    inner.one_shots.remove(idx).map(|s| s.fault)
}

fn create_rows(table: &mut Vec<Value>, payload: Value) -> Response {
    let Value::Array(rows) = payload else {
        return Response::rejected("create expects a list of records");
    };
    for row in &rows {
        if !row.is_object() {
            return Response::rejected("records must be objects");
        }
        if let Some(id) = row.get("id")
            && table.iter().any(|existing| existing.get("id") == Some(id))
        {
            return Response::rejected(format!("duplicate id {}", id));
        }
    }
    table.extend(rows.iter().cloned());
    Response::success(Value::Array(rows))
}

fn update_rows(table: &mut [Value], filter: Option<&Filter>, patch: Value) -> Response {
    let Value::Object(patch) = patch else {
        return Response::rejected("update expects an object patch");
    };
    let mut updated = Vec::new();
    for row in table.iter_mut() {
        if filter.is_none_or(|f| f.matches(row))
            && let Some(fields) = row.as_object_mut()
        {
            merge(fields, &patch);
            updated.push(row.clone());
        }
    }
    Response::success(Value::Array(updated))
}

fn remove_rows(table: &mut Vec<Value>, filter: Option<&Filter>) -> Response {
    let (removed, kept): (Vec<Value>, Vec<Value>) = table
        .drain(..)
        .partition(|row| filter.is_none_or(|f| f.matches(row)));
    *table = kept;
    Response::success(Value::Array(removed))
}

fn merge(target: &mut Map<String, Value>, patch: &Map<String, Value>) {
    for (key, value) in patch {
        target.insert(key.clone(), value.clone());
    }
}

fn persist(inner: &Inner) -> Result<(), TransportError> {
    if let Some(path) = &inner.path {
        let content = serde_json::to_string_pretty(&inner.tables)?;
        atomic_write(path, content.as_bytes())?;
    }
    Ok(())
}

#[async_trait]
impl Transport for MemoryBackend {
    async fn create(
        &self,
        collection: Collection,
        records: Vec<Value>,
    ) -> Result<Response, TransportError> {
        self.handle(Verb::Create, collection, None, Some(Value::Array(records)))
    }

    async fn update(
        &self,
        collection: Collection,
        filter: &Filter,
        patch: Value,
    ) -> Result<Response, TransportError> {
        self.handle(Verb::Update, collection, Some(filter), Some(patch))
    }

    async fn remove(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Response, TransportError> {
        self.handle(Verb::Remove, collection, Some(filter), None)
    }

    async fn read(
        &self,
        collection: Collection,
        filter: Option<&Filter>,
    ) -> Result<Response, TransportError> {
        self.handle(Verb::Read, collection, filter, None)
    }
}
