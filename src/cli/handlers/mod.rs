mod init;
pub use init::cmd_init;

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::engine::{Engine, EngineError, MutationReport};
use crate::io::BOARD_DIR;
use crate::io::lock::BoardLock;
use crate::io::snapshot::FileSnapshotStore;
use crate::model::{BoardState, ColumnId, Config, NewTask, ProjectId, Role, TaskId, UserId};
use crate::ops::drag::DragEnd;
use crate::transport::{Collection, ColumnPatch, MemoryBackend, TaskPatch, UserRecord};

/// Backend table file inside the board directory
pub const BACKEND_FILE: &str = "backend.json";

type CliResult = Result<(), Box<dyn std::error::Error>>;
type BoardEngine = Engine<MemoryBackend, FileSnapshotStore>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// The directory holding `.flowboard/`: `-C` if given, else the cwd
pub fn board_root(override_dir: Option<&str>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match override_dir {
        Some(dir) => std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e).into()),
        None => Ok(std::env::current_dir()?),
    }
}

pub fn dispatch(cli: Cli, root: &Path, config: Config) -> CliResult {
    let json = cli.json;
    let command = match cli.command {
        Commands::Init(args) => return cmd_init(root, args),
        other => other,
    };

    let board_dir = root.join(BOARD_DIR);
    if !board_dir.is_dir() {
        return Err(format!("no board in {} (run `fb init`)", root.display()).into());
    }
    let _lock = BoardLock::acquire_default(&board_dir)?;
    let backend = MemoryBackend::open(&board_dir.join(BACKEND_FILE))?;
    let mut engine = Engine::new(backend, FileSnapshotStore::in_dir(&board_dir), config);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(command, &mut engine, json))
}

async fn run(command: Commands, engine: &mut BoardEngine, json: bool) -> CliResult {
    match command {
        Commands::Init(_) => Ok(()),
        Commands::Project(cmd) => cmd_project(cmd, engine, json).await,
        Commands::Column(cmd) => cmd_column(cmd, engine, json).await,
        Commands::Task(cmd) => cmd_task(cmd, engine, json).await,
        Commands::Drag(args) => cmd_drag(args, engine, json).await,
        Commands::Board => cmd_board(engine.state(), json),
        Commands::Reload => {
            engine.load_from_backend().await?;
            cmd_board(engine.state(), json)
        }
        Commands::User(cmd) => cmd_user(cmd, engine, json).await,
    }
}

// ---------------------------------------------------------------------------
// Reference resolution
// ---------------------------------------------------------------------------

fn current_project(state: &BoardState) -> Result<ProjectId, EngineError> {
    state
        .current_project()
        .map(|p| p.id.clone())
        .ok_or(EngineError::NoCurrentProject)
}

/// Project by exact id or case-insensitive name
fn resolve_project(state: &BoardState, reference: &str) -> Result<ProjectId, String> {
    if let Some(p) = state.project(reference) {
        return Ok(p.id.clone());
    }
    let matches: Vec<&ProjectId> = state
        .projects
        .iter()
        .filter(|p| p.name.eq_ignore_ascii_case(reference))
        .map(|p| &p.id)
        .collect();
    match matches.as_slice() {
        [id] => Ok((*id).clone()),
        [] => Err(format!("project not found: {}", reference)),
        _ => Err(format!("several projects are named {}; use the id", reference)),
    }
}

/// Column of the current project by id or case-insensitive name
fn resolve_column(state: &BoardState, reference: &str) -> Result<ColumnId, Box<dyn std::error::Error>> {
    let project_id = current_project(state)?;
    let columns = state.ordered_columns(project_id.as_str());
    if let Some(c) = columns.iter().find(|c| c.id.as_str() == reference) {
        return Ok(c.id.clone());
    }
    let named: Vec<&ColumnId> = columns
        .iter()
        .filter(|c| c.name.eq_ignore_ascii_case(reference))
        .map(|c| &c.id)
        .collect();
    match named.as_slice() {
        [id] => Ok((*id).clone()),
        [] => Err(format!("column not found: {}", reference).into()),
        _ => Err(format!("several columns are named {}; use the id", reference).into()),
    }
}

/// Task by exact id or unique id prefix
fn resolve_task(state: &BoardState, reference: &str) -> Result<TaskId, String> {
    if let Some(t) = state.task(reference) {
        return Ok(t.id.clone());
    }
    let matches: Vec<&TaskId> = state
        .tasks
        .keys()
        .filter(|id| id.as_str().starts_with(reference))
        .collect();
    match matches.as_slice() {
        [id] if !reference.is_empty() => Ok((*id).clone()),
        [] | [_] => Err(format!("task not found: {}", reference)),
        _ => Err(format!("task id prefix {} is ambiguous", reference)),
    }
}

/// User by id, name or email. Unknown references pass through as ids.
fn resolve_user(state: &BoardState, reference: &str) -> UserId {
    state
        .users
        .iter()
        .find(|u| {
            u.id.as_str() == reference
                || u.name.eq_ignore_ascii_case(reference)
                || u.email.eq_ignore_ascii_case(reference)
        })
        .map(|u| u.id.clone())
        .unwrap_or_else(|| UserId::from(reference))
}

/// Drag endpoints may name a task (id or prefix) or a column (id or name)
fn resolve_drag_ref(state: &BoardState, reference: &str) -> String {
    if let Ok(id) = resolve_task(state, reference) {
        return id.to_string();
    }
    if let Ok(id) = resolve_column(state, reference) {
        return id.to_string();
    }
    reference.to_string()
}

fn parse_due(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("invalid due date '{}' (expected YYYY-MM-DD)", s))
}

fn print_report(report: &MutationReport, json: bool) {
    if json {
        if !report.is_clean()
            && let Ok(text) = serde_json::to_string(&report_to_json(report))
        {
            eprintln!("{}", text);
        }
        return;
    }
    for line in format_report(report) {
        eprintln!("{}", line);
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

async fn cmd_project(cmd: ProjectCmd, engine: &mut BoardEngine, json: bool) -> CliResult {
    match cmd.action {
        ProjectAction::New(args) => {
            let owner = args.owner.as_deref().map(|o| resolve_user(engine.state(), o));
            let created = engine.create_project(&args.name, owner).await?;
            print_report(&created.report, json);
            if json {
                return print_json(&created.project);
            }
            println!("created project: {} ({})", created.project.name, created.project.id);
            Ok(())
        }
        ProjectAction::List => {
            let state = engine.state();
            if json {
                return print_json(&ProjectListJson {
                    current: state.current_project_id.as_ref().map(|id| id.as_str()),
                    projects: &state.projects,
                });
            }
            for project in &state.projects {
                let current = state.current_project_id.as_ref() == Some(&project.id);
                println!("{}", format_project_line(project, current));
            }
            Ok(())
        }
        ProjectAction::Use(args) => {
            let id = resolve_project(engine.state(), &args.project)?;
            engine.set_current_project(id.as_str()).await?;
            if json {
                return print_json(&engine.state().current_project());
            }
            if let Some(project) = engine.state().current_project() {
                println!("now on project: {}", project.name);
            }
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

async fn cmd_column(cmd: ColumnCmd, engine: &mut BoardEngine, json: bool) -> CliResult {
    match cmd.action {
        ColumnAction::Add(args) => {
            let project_id = current_project(engine.state())?;
            let column = engine.create_column(project_id.as_str(), &args.name).await?;
            if json {
                return print_json(&column);
            }
            println!("created column: {} ({})", column.name, column.id);
        }
        ColumnAction::Rename(args) => {
            let id = resolve_column(engine.state(), &args.column)?;
            engine
                .update_column(id.as_str(), ColumnPatch::rename(args.name.as_str()))
                .await?;
            if json {
                return print_json(&engine.state().column(id.as_str()));
            }
            println!("renamed column {}", id);
        }
        ColumnAction::Rm(args) => {
            let id = resolve_column(engine.state(), &args.column)?;
            let report = engine.delete_column(id.as_str()).await?;
            print_report(&report, json);
            if !json {
                println!("deleted column {}", id);
            }
        }
        ColumnAction::Mv(args) => {
            let id = resolve_column(engine.state(), &args.column)?;
            let report = engine.reorder_columns(id.as_str(), args.index).await?;
            print_report(&report, json);
            return cmd_board(engine.state(), json);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

async fn cmd_task(cmd: TaskCmd, engine: &mut BoardEngine, json: bool) -> CliResult {
    match cmd.action {
        TaskAction::Add(args) => {
            let project_id = current_project(engine.state())?;
            let column_id = resolve_column(engine.state(), &args.column)?;
            let input = NewTask {
                title: args.title,
                description: args.description,
                due_date: args.due.as_deref().map(parse_due).transpose()?,
                created_by: args
                    .created_by
                    .as_deref()
                    .map(|u| resolve_user(engine.state(), u)),
            };
            let task = engine
                .create_task(project_id.as_str(), column_id.as_str(), input)
                .await?;
            if json {
                return print_json(&task);
            }
            println!("created task: {} ({})", task.title, task.id);
        }
        TaskAction::Edit(args) => {
            let id = resolve_task(engine.state(), &args.task)?;
            let patch = TaskPatch {
                title: args.title,
                description: args.description,
                due_date: args.due.as_deref().map(parse_due).transpose()?,
                ..Default::default()
            };
            if patch.title.is_none() && patch.description.is_none() && patch.due_date.is_none() {
                return Err("nothing to change (use --title, --desc or --due)".into());
            }
            engine.update_task(id.as_str(), patch).await?;
            if json {
                return print_json(&engine.state().task(id.as_str()));
            }
            println!("updated task {}", id);
        }
        TaskAction::Rm(args) => {
            let id = resolve_task(engine.state(), &args.task)?;
            engine.delete_task(id.as_str()).await?;
            if !json {
                println!("deleted task {}", id);
            }
        }
        TaskAction::Mv(args) => {
            let id = resolve_task(engine.state(), &args.task)?;
            let column_id = resolve_column(engine.state(), &args.column)?;
            let index = args
                .index
                .unwrap_or_else(|| engine.state().ordered_tasks(column_id.as_str()).len());
            engine
                .move_task(id.as_str(), column_id.as_str(), index)
                .await?;
            return cmd_board(engine.state(), json);
        }
        TaskAction::Assign(args) => {
            let id = resolve_task(engine.state(), &args.task)?;
            let user = resolve_user(engine.state(), &args.user);
            engine.assign_user_to_task(id.as_str(), user.as_str()).await?;
            if json {
                return print_json(&engine.state().task(id.as_str()));
            }
            println!("assigned {} to task {}", user, id);
        }
        TaskAction::Unassign(args) => {
            let id = resolve_task(engine.state(), &args.task)?;
            let user = resolve_user(engine.state(), &args.user);
            engine
                .unassign_user_from_task(id.as_str(), user.as_str())
                .await?;
            if json {
                return print_json(&engine.state().task(id.as_str()));
            }
            println!("unassigned {} from task {}", user, id);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Drag, board, users
// ---------------------------------------------------------------------------

async fn cmd_drag(args: DragArgs, engine: &mut BoardEngine, json: bool) -> CliResult {
    let active = resolve_drag_ref(engine.state(), &args.active);
    let over = args
        .over
        .as_deref()
        .map(|o| resolve_drag_ref(engine.state(), o));
    let end = DragEnd::new(active, over.as_deref());

    match engine.resolve_drop(&end) {
        Some(drag_move) => {
            let report = engine.apply_drop(drag_move).await?;
            print_report(&report, json);
            cmd_board(engine.state(), json)
        }
        None => {
            if !json {
                println!("nothing to move");
            }
            Ok(())
        }
    }
}

fn cmd_board(state: &BoardState, json: bool) -> CliResult {
    if json {
        return print_json(&board_to_json(state));
    }
    for line in format_board(state) {
        println!("{}", line);
    }
    Ok(())
}

async fn cmd_user(cmd: UserCmd, engine: &mut BoardEngine, json: bool) -> CliResult {
    match cmd.action {
        UserAction::Add(args) => {
            let role: Role = args.role.parse()?;
            let record = UserRecord {
                id: UserId::generate(),
                name: args.name,
                email: args.email,
                role,
                created_at: Utc::now(),
            };
            engine
                .transport()
                .insert(Collection::Users, serde_json::to_value(&record)?)?;
            engine.load_from_backend().await?;
            if json {
                return print_json(&record);
            }
            println!("added user: {} ({})", record.name, record.id);
        }
        UserAction::List => {
            let users = &engine.state().users;
            if json {
                return print_json(users);
            }
            for user in users {
                println!("{}", format_user_line(user));
            }
        }
    }
    Ok(())
}
