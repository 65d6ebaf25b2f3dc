use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fb", about = concat!("flowboard v", env!("CARGO_PKG_VERSION"), " - a task board you can drive from the shell"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different board directory
    #[arg(short = 'C', long = "board-dir", global = true)]
    pub board_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a board in the current directory
    Init(InitArgs),
    /// Create, list and switch projects
    Project(ProjectCmd),
    /// Manage the current project's columns
    Column(ColumnCmd),
    /// Manage tasks
    Task(TaskCmd),
    /// Drop one entity onto another, as a drag and drop would
    Drag(DragArgs),
    /// Show the current project's board
    Board,
    /// Reload the board from the backend
    Reload,
    /// Manage users
    User(UserCmd),
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing flowboard.toml with defaults
    #[arg(long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ProjectCmd {
    #[command(subcommand)]
    pub action: ProjectAction,
}

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Create a project with the default columns and switch to it
    New(ProjectNewArgs),
    /// List projects
    List,
    /// Switch the current project
    Use(ProjectUseArgs),
}

#[derive(Args)]
pub struct ProjectNewArgs {
    /// Project name
    pub name: String,
    /// Owning user (id or name)
    #[arg(long)]
    pub owner: Option<String>,
}

#[derive(Args)]
pub struct ProjectUseArgs {
    /// Project id or name
    pub project: String,
}

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ColumnCmd {
    #[command(subcommand)]
    pub action: ColumnAction,
}

#[derive(Subcommand)]
pub enum ColumnAction {
    /// Append a column
    Add(ColumnAddArgs),
    /// Rename a column
    Rename(ColumnRenameArgs),
    /// Delete a column and its tasks
    Rm(ColumnRefArg),
    /// Move a column to a new index (0 = leftmost)
    Mv(ColumnMvArgs),
}

#[derive(Args)]
pub struct ColumnAddArgs {
    /// Column name
    pub name: String,
}

#[derive(Args)]
pub struct ColumnRenameArgs {
    /// Column id or name
    pub column: String,
    /// New name
    pub name: String,
}

#[derive(Args)]
pub struct ColumnRefArg {
    /// Column id or name
    pub column: String,
}

#[derive(Args)]
pub struct ColumnMvArgs {
    /// Column id or name
    pub column: String,
    /// Target index
    pub index: usize,
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct TaskCmd {
    #[command(subcommand)]
    pub action: TaskAction,
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task to a column
    Add(TaskAddArgs),
    /// Change task fields
    Edit(TaskEditArgs),
    /// Delete a task
    Rm(TaskRefArg),
    /// Move a task to a column, optionally at an index
    Mv(TaskMvArgs),
    /// Assign a user to a task
    Assign(TaskUserArgs),
    /// Remove a user from a task
    Unassign(TaskUserArgs),
}

#[derive(Args)]
pub struct TaskAddArgs {
    /// Column id or name
    pub column: String,
    /// Task title
    pub title: String,
    /// Description
    #[arg(long = "desc")]
    pub description: Option<String>,
    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,
    /// Creating user (id or name)
    #[arg(long = "by")]
    pub created_by: Option<String>,
}

#[derive(Args)]
pub struct TaskEditArgs {
    /// Task id or unique id prefix
    pub task: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long = "desc")]
    pub description: Option<String>,
    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,
}

#[derive(Args)]
pub struct TaskRefArg {
    /// Task id or unique id prefix
    pub task: String,
}

#[derive(Args)]
pub struct TaskMvArgs {
    /// Task id or unique id prefix
    pub task: String,
    /// Destination column id or name
    pub column: String,
    /// Target index (default: end of the column)
    pub index: Option<usize>,
}

#[derive(Args)]
pub struct TaskUserArgs {
    /// Task id or unique id prefix
    pub task: String,
    /// User id or name
    pub user: String,
}

// ---------------------------------------------------------------------------
// Drag
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct DragArgs {
    /// Dragged task or column
    pub active: String,
    /// Task or column it is dropped on
    pub over: Option<String>,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct UserCmd {
    #[command(subcommand)]
    pub action: UserAction,
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Register a user in the local backend
    Add(UserAddArgs),
    /// List known users
    List,
}

#[derive(Args)]
pub struct UserAddArgs {
    pub name: String,
    pub email: String,
    /// admin, manager or member
    #[arg(long, default_value = "member")]
    pub role: String,
}
