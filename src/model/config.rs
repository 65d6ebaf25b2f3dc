use serde::{Deserialize, Serialize};

/// Configuration from flowboard.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub drag: DragConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Columns seeded (as default columns) into every new project
    #[serde(default = "default_columns")]
    pub default_columns: Vec<String>,
    #[serde(default)]
    pub new_task_placement: NewTaskPlacement,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            default_columns: default_columns(),
            new_task_placement: NewTaskPlacement::default(),
        }
    }
}

/// Where a newly created task lands in its column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewTaskPlacement {
    /// Position 0; newest tasks show first
    #[default]
    Head,
    /// One past the highest position in the column
    Tail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragConfig {
    /// Pointer travel (px) before a press turns into a drag
    #[serde(default = "default_activation_distance")]
    pub activation_distance: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        DragConfig {
            activation_distance: default_activation_distance(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// tracing-subscriber filter directive; FLOWBOARD_LOG overrides it
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            filter: default_log_filter(),
        }
    }
}

fn default_columns() -> Vec<String> {
    vec!["To do".into(), "In progress".into(), "Done".into()]
}

fn default_activation_distance() -> f64 {
    6.0
}

fn default_log_filter() -> String {
    "warn".into()
}
