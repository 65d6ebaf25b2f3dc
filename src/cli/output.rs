use serde::Serialize;

use crate::engine::MutationReport;
use crate::model::{BoardState, Column, Project, Task, User};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct BoardJson<'a> {
    pub project: Option<&'a Project>,
    pub columns: Vec<ColumnJson<'a>>,
}

#[derive(Serialize)]
pub struct ColumnJson<'a> {
    #[serde(flatten)]
    pub column: &'a Column,
    pub tasks: Vec<&'a Task>,
}

#[derive(Serialize)]
pub struct ProjectListJson<'a> {
    pub current: Option<&'a str>,
    pub projects: &'a [Project],
}

#[derive(Serialize)]
pub struct FailureJson {
    pub target: String,
    pub error: String,
}

pub fn board_to_json(state: &BoardState) -> BoardJson<'_> {
    let project = state.current_project();
    let columns = match project {
        Some(p) => state
            .ordered_columns(p.id.as_str())
            .into_iter()
            .map(|column| ColumnJson {
                column,
                tasks: state.ordered_tasks(column.id.as_str()),
            })
            .collect(),
        None => Vec::new(),
    };
    BoardJson { project, columns }
}

pub fn report_to_json(report: &MutationReport) -> Vec<FailureJson> {
    report
        .failures
        .iter()
        .map(|f| FailureJson {
            target: f.target.clone(),
            error: f.error.to_string(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// Short form of an id for listings
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

pub fn format_task_line(task: &Task) -> String {
    let mut line = format!("{}  {}", short_id(task.id.as_str()), task.title);
    if let Some(due) = task.due_date {
        line.push_str(&format!("  due:{}", due));
    }
    if !task.assignees.is_empty() {
        let names: Vec<&str> = task.assignees.iter().map(|u| u.name.as_str()).collect();
        line.push_str(&format!("  @{}", names.join(",@")));
    }
    line
}

pub fn format_column_header(column: &Column, task_count: usize) -> String {
    let marker = if column.is_default { " *" } else { "" };
    format!(
        "== {} ({}){} [{}]",
        column.name,
        task_count,
        marker,
        short_id(column.id.as_str())
    )
}

pub fn format_board(state: &BoardState) -> Vec<String> {
    let Some(project) = state.current_project() else {
        return vec!["no current project (create one with `fb project new <name>`)".to_string()];
    };
    let mut lines = vec![format!("# {}", project.name)];
    for column in state.ordered_columns(project.id.as_str()) {
        let tasks = state.ordered_tasks(column.id.as_str());
        lines.push(String::new());
        lines.push(format_column_header(column, tasks.len()));
        for (i, task) in tasks.iter().enumerate() {
            lines.push(format!("{:>3}. {}", i, format_task_line(task)));
        }
    }
    lines
}

pub fn format_project_line(project: &Project, current: bool) -> String {
    let marker = if current { "*" } else { " " };
    format!("{} {}  {}", marker, short_id(project.id.as_str()), project.name)
}

pub fn format_user_line(user: &User) -> String {
    format!("{}  {} <{}> ({})", short_id(user.id.as_str()), user.name, user.email, user.role)
}

pub fn format_report(report: &MutationReport) -> Vec<String> {
    report
        .failures
        .iter()
        .map(|f| format!("warning: {} failed: {}", f.target, f.error))
        .collect()
}
