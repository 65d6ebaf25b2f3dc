//! Board scenarios run against the in-memory backend.

use flowboard::engine::{Engine, EngineError, Phase};
use flowboard::io::snapshot::{FileSnapshotStore, NullSnapshotStore, SnapshotStore};
use flowboard::model::{BoardState, Config, NewTask, NewTaskPlacement, ProjectId};
use flowboard::ops::drag::{DragEnd, DragMove};
use flowboard::transport::memory::{Fault, Verb};
use flowboard::transport::{Collection, MemoryBackend, TransportError};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

type TestEngine = Engine<MemoryBackend, NullSnapshotStore>;

fn tail_config() -> Config {
    let mut config = Config::default();
    config.board.new_task_placement = NewTaskPlacement::Tail;
    config
}

async fn project_engine(config: Config) -> (TestEngine, MemoryBackend, ProjectId) {
    let backend = MemoryBackend::new();
    let mut engine = Engine::new(backend.clone(), NullSnapshotStore, config);
    let created = engine.create_project("Launch", None).await.unwrap();
    assert!(created.report.is_clean());
    backend.take_calls();
    (engine, backend, created.project.id)
}

fn column_id(state: &BoardState, name: &str) -> String {
    state
        .columns
        .values()
        .find(|c| c.name == name)
        .map(|c| c.id.to_string())
        .unwrap()
}

fn column_names(state: &BoardState, project: &ProjectId) -> Vec<(String, i64)> {
    state
        .ordered_columns(project.as_str())
        .iter()
        .map(|c| (c.name.clone(), c.position))
        .collect()
}

fn task_titles(state: &BoardState, column: &str) -> Vec<(String, i64)> {
    state
        .ordered_tasks(column)
        .iter()
        .map(|t| (t.title.clone(), t.position))
        .collect()
}

fn remote_field(backend: &MemoryBackend, collection: Collection, id: &str, field: &str) -> serde_json::Value {
    backend
        .records(collection)
        .into_iter()
        .find(|r| r["id"] == id)
        .map(|r| r[field].clone())
        .unwrap()
}

async fn add_task(engine: &mut TestEngine, project: &ProjectId, column: &str, title: &str) -> String {
    engine
        .create_task(project.as_str(), column, NewTask::titled(title))
        .await
        .unwrap()
        .id
        .to_string()
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[tokio::test]
async fn new_project_reloads_with_three_default_columns() {
    let (mut engine, _backend, project) = project_engine(Config::default()).await;
    engine.load_from_backend().await.unwrap();

    let state = engine.state();
    assert_eq!(state.current_project_id.as_ref(), Some(&project));
    assert_eq!(
        column_names(state, &project),
        vec![
            ("To do".to_string(), 0),
            ("In progress".to_string(), 1),
            ("Done".to_string(), 2)
        ]
    );
    assert!(state.columns.values().all(|c| c.is_default));
}

#[tokio::test]
async fn failed_column_seed_is_reported_not_rolled_back() {
    let backend = MemoryBackend::new();
    backend.fail_next(Verb::Create, Collection::BoardColumns, Fault::Reject("quota".into()));
    let mut engine = Engine::new(backend.clone(), NullSnapshotStore, Config::default());

    let created = engine.create_project("Launch", None).await.unwrap();
    assert_eq!(created.report.failures.len(), 1);
    assert_eq!(engine.state().projects.len(), 1);
    assert_eq!(engine.state().columns.len(), 2);
}

#[tokio::test]
async fn failed_project_create_changes_nothing() {
    let backend = MemoryBackend::new();
    backend.fail_next(Verb::Create, Collection::Projects, Fault::Network("offline".into()));
    let mut engine = Engine::new(backend.clone(), NullSnapshotStore, Config::default());

    let err = engine.create_project("Launch", None).await.unwrap_err();
    assert!(matches!(err, EngineError::Transport(TransportError::Network(_))));
    assert_eq!(engine.state(), &BoardState::default());
    assert!(backend.records(Collection::BoardColumns).is_empty());
}

#[tokio::test]
async fn switching_to_unknown_project_falls_back_to_first() {
    let (mut engine, _backend, first) = project_engine(Config::default()).await;
    engine.create_project("Second", None).await.unwrap();

    engine.set_current_project("no-such-project").await.unwrap();
    assert_eq!(engine.state().current_project_id.as_ref(), Some(&first));
    assert_eq!(engine.state().columns.len(), 3);
}

#[tokio::test]
async fn switching_projects_loads_only_that_projects_board() {
    let (mut engine, _backend, first) = project_engine(tail_config()).await;
    let todo = column_id(engine.state(), "To do");
    add_task(&mut engine, &first, &todo, "First project task").await;

    let second = engine.create_project("Second", None).await.unwrap().project.id;
    assert!(engine.state().tasks.is_empty());

    engine.set_current_project(first.as_str()).await.unwrap();
    assert_eq!(engine.state().tasks.len(), 1);
    assert!(engine.state().columns.values().all(|c| c.project_id == first));
    assert_ne!(first, second);
}

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reorder_last_column_to_front() {
    let (mut engine, backend, project) = project_engine(Config::default()).await;
    let done = column_id(engine.state(), "Done");

    let report = engine.reorder_columns(&done, 0).await.unwrap();
    assert!(report.is_clean());
    assert_eq!(
        column_names(engine.state(), &project),
        vec![
            ("Done".to_string(), 0),
            ("To do".to_string(), 1),
            ("In progress".to_string(), 2)
        ]
    );
    assert_eq!(remote_field(&backend, Collection::BoardColumns, &done, "position"), json!(0));
}

#[tokio::test]
async fn reorder_to_current_index_writes_nothing() {
    let (mut engine, backend, _project) = project_engine(Config::default()).await;
    let doing = column_id(engine.state(), "In progress");

    engine.reorder_columns(&doing, 1).await.unwrap();
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn created_and_reordered_column_survives_reload() {
    let (mut engine, _backend, project) = project_engine(Config::default()).await;
    let review = engine.create_column(project.as_str(), "  Review ").await.unwrap();
    assert_eq!(review.name, "Review");
    assert_eq!(review.position, 3);
    assert!(!review.is_default);

    engine.reorder_columns(review.id.as_str(), 1).await.unwrap();
    let resolved = column_names(engine.state(), &project);
    engine.load_from_backend().await.unwrap();
    assert_eq!(column_names(engine.state(), &project), resolved);
    assert_eq!(resolved[1].0, "Review");
}

#[tokio::test]
async fn partial_reorder_failure_is_reported() {
    let (mut engine, backend, _project) = project_engine(Config::default()).await;
    let done = column_id(engine.state(), "Done");
    backend.fail_next(Verb::Update, Collection::BoardColumns, Fault::Reject("locked".into()));

    let report = engine.reorder_columns(&done, 0).await.unwrap();
    assert_eq!(report.failures.len(), 1);
    // the reload shows what the backend actually holds
    let positions: Vec<i64> = engine.state().columns.values().map(|c| c.position).collect();
    let remote: Vec<i64> = backend
        .records(Collection::BoardColumns)
        .iter()
        .map(|r| r["position"].as_i64().unwrap())
        .collect();
    assert_eq!(positions, remote);
}

#[tokio::test]
async fn empty_column_name_is_rejected_locally() {
    let (mut engine, backend, project) = project_engine(Config::default()).await;
    let err = engine.create_column(project.as_str(), "   ").await.unwrap_err();
    assert!(matches!(err, EngineError::EmptyName));
    assert!(err.is_validation());
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn rename_column_merges_locally_after_success() {
    let (mut engine, backend, _project) = project_engine(Config::default()).await;
    let todo = column_id(engine.state(), "To do");
    engine
        .update_column(&todo, flowboard::transport::ColumnPatch::rename("Backlog"))
        .await
        .unwrap();
    assert_eq!(engine.state().column(&todo).unwrap().name, "Backlog");
    assert_eq!(remote_field(&backend, Collection::BoardColumns, &todo, "name"), json!("Backlog"));
}

#[tokio::test]
async fn update_column_with_nothing_to_send_is_a_noop() {
    let (mut engine, backend, _project) = project_engine(Config::default()).await;
    let todo = column_id(engine.state(), "To do");
    engine
        .update_column(&todo, flowboard::transport::ColumnPatch::default())
        .await
        .unwrap();
    assert!(backend.calls().is_empty());

    let err = engine
        .update_column(&todo, flowboard::transport::ColumnPatch::rename("  "))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::EmptyName));
    assert_eq!(engine.state().column(&todo).unwrap().name, "To do");
}

#[tokio::test]
async fn default_column_cannot_be_deleted() {
    let (mut engine, backend, project) = project_engine(tail_config()).await;
    let todo = column_id(engine.state(), "To do");
    add_task(&mut engine, &project, &todo, "Keep me").await;
    backend.take_calls();

    let err = engine.delete_column(&todo).await.unwrap_err();
    assert!(matches!(err, EngineError::DefaultColumnProtected(_)));
    assert!(engine.state().column(&todo).is_some());
    assert_eq!(engine.state().ordered_tasks(&todo).len(), 1);
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn deleting_a_column_removes_its_tasks() {
    let (mut engine, backend, project) = project_engine(tail_config()).await;
    let review = engine.create_column(project.as_str(), "Review").await.unwrap();
    let review_id = review.id.to_string();
    add_task(&mut engine, &project, &review_id, "One").await;
    add_task(&mut engine, &project, &review_id, "Two").await;

    let report = engine.delete_column(&review_id).await.unwrap();
    assert!(report.is_clean());
    assert!(engine.state().column(&review_id).is_none());
    assert!(engine.state().tasks.is_empty());
    assert!(backend.records(Collection::Tasks).is_empty());
    assert_eq!(backend.records(Collection::BoardColumns).len(), 3);
}

#[tokio::test]
async fn failed_task_delete_is_reported_and_column_still_goes() {
    let (mut engine, backend, project) = project_engine(tail_config()).await;
    let review = engine.create_column(project.as_str(), "Review").await.unwrap();
    let review_id = review.id.to_string();
    let stuck = add_task(&mut engine, &project, &review_id, "Stuck").await;
    backend.fail_next(Verb::Remove, Collection::Tasks, Fault::Reject("busy".into()));

    let report = engine.delete_column(&review_id).await.unwrap();
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].target, stuck);
    assert!(engine.state().column(&review_id).is_none());
    assert!(engine.state().task(&stuck).is_none());
}

#[tokio::test]
async fn failed_column_delete_keeps_local_state() {
    let (mut engine, backend, project) = project_engine(tail_config()).await;
    let review = engine.create_column(project.as_str(), "Review").await.unwrap();
    let review_id = review.id.to_string();
    backend.fail_next(Verb::Remove, Collection::BoardColumns, Fault::Network("offline".into()));

    assert!(engine.delete_column(&review_id).await.is_err());
    assert!(engine.state().column(&review_id).is_some());
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[tokio::test]
async fn blank_title_creates_nothing() {
    let (mut engine, backend, project) = project_engine(Config::default()).await;
    let todo = column_id(engine.state(), "To do");

    let err = engine
        .create_task(project.as_str(), &todo, NewTask::titled(" \t "))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::EmptyTitle));
    assert!(engine.state().tasks.is_empty());
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn head_placement_shows_newest_first() {
    let (mut engine, _backend, project) = project_engine(Config::default()).await;
    let todo = column_id(engine.state(), "To do");
    add_task(&mut engine, &project, &todo, "Older").await;
    std::thread::sleep(std::time::Duration::from_millis(5));
    add_task(&mut engine, &project, &todo, "Newer").await;

    assert_eq!(
        task_titles(engine.state(), &todo),
        vec![("Newer".to_string(), 0), ("Older".to_string(), 0)]
    );
}

#[tokio::test]
async fn tail_placement_appends() {
    let (mut engine, _backend, project) = project_engine(tail_config()).await;
    let todo = column_id(engine.state(), "To do");
    add_task(&mut engine, &project, &todo, "T1").await;
    add_task(&mut engine, &project, &todo, "T2").await;

    assert_eq!(
        task_titles(engine.state(), &todo),
        vec![("T1".to_string(), 0), ("T2".to_string(), 1)]
    );
}

#[tokio::test]
async fn update_task_trims_title_and_stamps_time() {
    let (mut engine, backend, project) = project_engine(tail_config()).await;
    let todo = column_id(engine.state(), "To do");
    let id = add_task(&mut engine, &project, &todo, "Draft").await;
    let before = engine.state().task(&id).unwrap().updated_at;
    backend.take_calls();

    let patch = flowboard::transport::TaskPatch {
        title: Some("  Final ".into()),
        ..Default::default()
    };
    engine.update_task(&id, patch).await.unwrap();

    let task = engine.state().task(&id).unwrap();
    assert_eq!(task.title, "Final");
    assert!(task.updated_at >= before);
    assert_eq!(remote_field(&backend, Collection::Tasks, &id, "title"), json!("Final"));
    assert!(backend.calls()[0].payload.as_ref().unwrap().get("updated_at").is_some());
}

#[tokio::test]
async fn delete_task_removes_remote_then_local() {
    let (mut engine, backend, project) = project_engine(tail_config()).await;
    let todo = column_id(engine.state(), "To do");
    let id = add_task(&mut engine, &project, &todo, "Gone").await;

    engine.delete_task(&id).await.unwrap();
    assert!(engine.state().task(&id).is_none());
    assert!(backend.records(Collection::Tasks).is_empty());
}

#[tokio::test]
async fn move_to_same_index_makes_no_remote_call() {
    let (mut engine, backend, project) = project_engine(tail_config()).await;
    let todo = column_id(engine.state(), "To do");
    add_task(&mut engine, &project, &todo, "T1").await;
    let t2 = add_task(&mut engine, &project, &todo, "T2").await;
    backend.take_calls();

    engine.move_task(&t2, &todo, 1).await.unwrap();
    engine.move_task(&t2, &todo, 9).await.unwrap();
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn failed_move_reloads_backend_state() {
    let (mut engine, backend, project) = project_engine(tail_config()).await;
    let todo = column_id(engine.state(), "To do");
    let done = column_id(engine.state(), "Done");
    add_task(&mut engine, &project, &todo, "T1").await;
    let t2 = add_task(&mut engine, &project, &todo, "T2").await;
    backend.fail_next(Verb::Update, Collection::Tasks, Fault::Network("offline".into()));

    let err = engine.move_task(&t2, &done, 0).await.unwrap_err();
    assert!(matches!(err, EngineError::Transport(TransportError::Network(_))));
    assert_eq!(engine.state().task(&t2).unwrap().column_id.as_str(), todo);
    assert_eq!(engine.state().task_location(&t2), Some((todo.as_str().into(), 1)));
    assert_eq!(engine.last_mutation().unwrap().phase(), Phase::Compensated);
}

#[tokio::test]
async fn successful_move_commits() {
    let (mut engine, backend, project) = project_engine(tail_config()).await;
    let todo = column_id(engine.state(), "To do");
    let done = column_id(engine.state(), "Done");
    let t1 = add_task(&mut engine, &project, &todo, "T1").await;

    engine.move_task(&t1, &done, 0).await.unwrap();
    assert_eq!(engine.last_mutation().unwrap().phase(), Phase::Committed);
    assert_eq!(remote_field(&backend, Collection::Tasks, &t1, "column_id"), json!(done));
}

// ---------------------------------------------------------------------------
// Drag and drop
// ---------------------------------------------------------------------------

#[tokio::test]
async fn drop_task_on_earlier_sibling() {
    let (mut engine, backend, project) = project_engine(tail_config()).await;
    let todo = column_id(engine.state(), "To do");
    let t1 = add_task(&mut engine, &project, &todo, "T1").await;
    let t2 = add_task(&mut engine, &project, &todo, "T2").await;

    let drag_move = engine
        .resolve_drop(&DragEnd::new(t2.as_str(), Some(t1.as_str())))
        .unwrap();
    engine.apply_drop(drag_move).await.unwrap();

    assert_eq!(
        task_titles(engine.state(), &todo),
        vec![("T2".to_string(), 0), ("T1".to_string(), 1)]
    );
    assert_eq!(remote_field(&backend, Collection::Tasks, &t2, "position"), json!(0));
    assert_eq!(remote_field(&backend, Collection::Tasks, &t1, "position"), json!(1));
}

#[tokio::test]
async fn drop_task_on_column_appends() {
    let (mut engine, backend, project) = project_engine(tail_config()).await;
    let todo = column_id(engine.state(), "To do");
    let done = column_id(engine.state(), "Done");
    let t = add_task(&mut engine, &project, &todo, "T").await;
    add_task(&mut engine, &project, &done, "D1").await;
    add_task(&mut engine, &project, &done, "D2").await;

    let drag_move = engine
        .resolve_drop(&DragEnd::new(t.as_str(), Some(done.as_str())))
        .unwrap();
    assert!(matches!(drag_move, DragMove::Task { to_index: 2, .. }));
    engine.apply_drop(drag_move).await.unwrap();

    let task = engine.state().task(&t).unwrap();
    assert_eq!(task.column_id.as_str(), done);
    assert_eq!(task.position, 2);
    assert_eq!(remote_field(&backend, Collection::Tasks, &t, "column_id"), json!(done));
    assert_eq!(remote_field(&backend, Collection::Tasks, &t, "position"), json!(2));
}

#[tokio::test]
async fn drop_column_on_column_reorders() {
    let (mut engine, _backend, project) = project_engine(Config::default()).await;
    let todo = column_id(engine.state(), "To do");
    let done = column_id(engine.state(), "Done");

    let drag_move = engine
        .resolve_drop(&DragEnd::new(done.as_str(), Some(todo.as_str())))
        .unwrap();
    engine.apply_drop(drag_move).await.unwrap();
    assert_eq!(column_names(engine.state(), &project)[0].0, "Done");
}

#[tokio::test]
async fn drop_renumbers_head_inserted_tasks() {
    let (mut engine, backend, project) = project_engine(Config::default()).await;
    let todo = column_id(engine.state(), "To do");
    let t1 = add_task(&mut engine, &project, &todo, "T1").await;
    std::thread::sleep(std::time::Duration::from_millis(5));
    let t2 = add_task(&mut engine, &project, &todo, "T2").await;
    assert_eq!(
        task_titles(engine.state(), &todo),
        vec![("T2".to_string(), 0), ("T1".to_string(), 0)]
    );

    let drag_move = engine
        .resolve_drop(&DragEnd::new(t2.as_str(), Some(t1.as_str())))
        .unwrap();
    engine.apply_drop(drag_move).await.unwrap();

    assert_eq!(
        task_titles(engine.state(), &todo),
        vec![("T1".to_string(), 0), ("T2".to_string(), 1)]
    );
    assert_eq!(remote_field(&backend, Collection::Tasks, &t1, "position"), json!(0));
    assert_eq!(remote_field(&backend, Collection::Tasks, &t2, "position"), json!(1));
    assert_eq!(engine.last_mutation().unwrap().phase(), Phase::Committed);
}

#[tokio::test]
async fn drag_session_uses_configured_threshold() {
    use flowboard::ops::drag::Point;

    let mut config = Config::default();
    config.drag.activation_distance = 20.0;
    let (engine, _backend, _project) = project_engine(config).await;
    let mut session = engine.drag_session();
    session.press("x", Point::new(0.0, 0.0));
    session.pointer_move(Point::new(10.0, 10.0));
    assert!(!session.is_dragging());
    session.pointer_move(Point::new(20.0, 10.0));
    assert!(session.is_dragging());
}

// ---------------------------------------------------------------------------
// Reload and assignment
// ---------------------------------------------------------------------------

fn seed_user(backend: &MemoryBackend, id: &str, name: &str) {
    backend
        .insert(
            Collection::Users,
            json!({
                "id": id,
                "name": name,
                "email": format!("{}@example.com", name.to_lowercase()),
                "role": "member",
                "created_at": "2025-01-01T00:00:00Z"
            }),
        )
        .unwrap();
}

#[tokio::test]
async fn assignment_round_trip() {
    let (mut engine, backend, project) = project_engine(tail_config()).await;
    seed_user(&backend, "u1", "Ana");
    let todo = column_id(engine.state(), "To do");
    let t = add_task(&mut engine, &project, &todo, "T").await;

    engine.assign_user_to_task(&t, "u1").await.unwrap();
    assert!(engine.state().task(&t).unwrap().is_assigned_to("u1"));
    assert_eq!(engine.state().users.len(), 1);

    engine.unassign_user_from_task(&t, "u1").await.unwrap();
    assert!(engine.state().task(&t).unwrap().assignees.is_empty());
    assert!(backend.records(Collection::TaskAssignees).is_empty());
}

#[tokio::test]
async fn assigning_twice_keeps_one_row() {
    let (mut engine, backend, project) = project_engine(tail_config()).await;
    seed_user(&backend, "u1", "Ana");
    let todo = column_id(engine.state(), "To do");
    let t = add_task(&mut engine, &project, &todo, "T").await;

    engine.assign_user_to_task(&t, "u1").await.unwrap();
    backend.take_calls();
    engine.assign_user_to_task(&t, "u1").await.unwrap();

    assert!(backend.calls().is_empty());
    assert_eq!(backend.records(Collection::TaskAssignees).len(), 1);
    let names: Vec<&str> = engine
        .state()
        .task(&t)
        .unwrap()
        .assignees
        .iter()
        .map(|u| u.name.as_str())
        .collect();
    assert_eq!(names, vec!["Ana"]);
}

#[tokio::test]
async fn unassign_treats_user_id_literally() {
    let (mut engine, backend, project) = project_engine(tail_config()).await;
    seed_user(&backend, "u1", "Ana");
    seed_user(&backend, "u2", "Bo");
    let todo = column_id(engine.state(), "To do");
    let t = add_task(&mut engine, &project, &todo, "T").await;
    engine.assign_user_to_task(&t, "u1").await.unwrap();
    engine.assign_user_to_task(&t, "u2").await.unwrap();

    engine.unassign_user_from_task(&t, "u1,u2").await.unwrap();
    assert_eq!(backend.records(Collection::TaskAssignees).len(), 2);
    assert_eq!(engine.state().task(&t).unwrap().assignees.len(), 2);
}

#[tokio::test]
async fn assignee_read_failure_is_tolerated() {
    let (mut engine, backend, project) = project_engine(tail_config()).await;
    seed_user(&backend, "u1", "Ana");
    let todo = column_id(engine.state(), "To do");
    let t = add_task(&mut engine, &project, &todo, "T").await;
    engine.assign_user_to_task(&t, "u1").await.unwrap();

    backend.fail_collection(Collection::TaskAssignees, Fault::Reject("denied".into()));
    engine.load_from_backend().await.unwrap();
    assert_eq!(engine.state().tasks.len(), 1);
    assert!(engine.state().task(&t).unwrap().assignees.is_empty());
}

#[tokio::test]
async fn assignees_are_read_with_task_id_list() {
    let (mut engine, backend, project) = project_engine(tail_config()).await;
    let todo = column_id(engine.state(), "To do");
    let a = add_task(&mut engine, &project, &todo, "A").await;
    let b = add_task(&mut engine, &project, &todo, "B").await;
    backend.take_calls();

    engine.load_from_backend().await.unwrap();
    let query = backend
        .calls()
        .into_iter()
        .find(|c| c.collection == Collection::TaskAssignees)
        .and_then(|c| c.query)
        .unwrap();
    assert!(query == format!("task_id={},{}", a, b) || query == format!("task_id={},{}", b, a));
}

#[tokio::test]
async fn failed_task_read_leaves_state_unchanged() {
    let (mut engine, backend, project) = project_engine(tail_config()).await;
    let todo = column_id(engine.state(), "To do");
    add_task(&mut engine, &project, &todo, "T").await;
    let before = engine.state().clone();
    backend.fail_next(Verb::Read, Collection::Tasks, Fault::Network("offline".into()));

    assert!(engine.load_from_backend().await.is_err());
    assert_eq!(engine.state(), &before);
}

#[tokio::test]
async fn snapshot_restores_board_on_startup() {
    let tmp = TempDir::new().unwrap();
    let backend = MemoryBackend::new();
    let store = FileSnapshotStore::in_dir(tmp.path());
    let mut engine = Engine::new(backend.clone(), store.clone(), tail_config());
    let project = engine.create_project("Launch", None).await.unwrap().project.id;
    let todo = column_id(engine.state(), "To do");
    engine
        .create_task(project.as_str(), &todo, NewTask::titled("Persisted"))
        .await
        .unwrap();
    let saved = engine.state().clone();
    drop(engine);

    assert_eq!(store.load().as_ref(), Some(&saved));
    let restored = Engine::new(MemoryBackend::new(), store, tail_config());
    assert_eq!(restored.state(), &saved);
}
