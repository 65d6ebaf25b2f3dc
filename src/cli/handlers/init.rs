use std::fs;
use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::BOARD_DIR;
use crate::io::config_io::CONFIG_FILE;

const CONFIG_TEMPLATE: &str = r##"# flowboard configuration

[board]
# Columns seeded into every new project. Default columns cannot be deleted.
default_columns = ["To do", "In progress", "Done"]
# Where new tasks land in their column: "head" (newest first) or "tail"
new_task_placement = "head"

[drag]
# Pointer travel in px before a press becomes a drag
activation_distance = 6.0

[log]
# tracing filter directive; FLOWBOARD_LOG overrides it
filter = "warn"
"##;

pub fn cmd_init(root: &Path, args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let board_dir = root.join(BOARD_DIR);
    let config_path = board_dir.join(CONFIG_FILE);

    if config_path.exists() && !args.force {
        return Err(format!(
            "board already initialized in {} (use --force to reset the config)",
            board_dir.display()
        )
        .into());
    }

    fs::create_dir_all(&board_dir)?;
    fs::write(&config_path, CONFIG_TEMPLATE)?;

    println!("initialized board in {}/", board_dir.display());
    println!("next: fb project new \"My project\"");
    Ok(())
}
