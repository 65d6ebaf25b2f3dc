use clap::Parser;
use flowboard::cli::commands::Cli;
use flowboard::cli::handlers;
use flowboard::io::{BOARD_DIR, config_io};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let root = match handlers::board_root(cli.board_dir.as_deref()) {
        Ok(root) => root,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };
    // A missing board still gets defaults; `fb init` creates it
    let config = match config_io::read_config(&root.join(BOARD_DIR)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let filter = EnvFilter::try_from_env("FLOWBOARD_LOG")
        .or_else(|_| EnvFilter::try_new(&config.log.filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = handlers::dispatch(cli, &root, config) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
