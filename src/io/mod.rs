pub mod config_io;
pub mod lock;
pub mod snapshot;

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Name of the per-board state directory
pub const BOARD_DIR: &str = ".flowboard";

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
