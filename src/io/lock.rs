use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Exclusive advisory lock on a board directory.
///
/// Held by every `fb` command for its whole run so that two processes never
/// interleave writes to the same backend file. Released on drop.
pub struct BoardLock {
    _file: File,
    path: PathBuf,
}

/// Error type for lock operations
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not open lock file {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("board at {path} is locked by another fb process")]
    Busy { path: PathBuf },
}

impl BoardLock {
    /// Poll for the lock until `timeout` elapses.
    pub fn acquire(board_dir: &Path, timeout: Duration) -> Result<Self, LockError> {
        let path = board_dir.join(".lock");
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|source| LockError::Open {
                path: path.clone(),
                source,
            })?;

        let deadline = Instant::now() + timeout;
        while try_flock(&file).is_err() {
            if Instant::now() >= deadline {
                return Err(LockError::Busy {
                    path: board_dir.to_path_buf(),
                });
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        Ok(BoardLock { _file: file, path })
    }

    /// Acquire with the CLI's default wait (3 seconds)
    pub fn acquire_default(board_dir: &Path) -> Result<Self, LockError> {
        Self::acquire(board_dir, Duration::from_secs(3))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for BoardLock {
    fn drop(&mut self) {
        // flock is released with the descriptor
        let _ = fs::remove_file(&self.path);
    }
}

#[cfg(unix)]
fn try_flock(file: &File) -> std::io::Result<()> {
    use std::os::unix::io::AsRawFd;
    let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if rc == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn try_flock(_file: &File) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn lock_is_reusable_after_drop() {
        let tmp = TempDir::new().unwrap();
        let lock = BoardLock::acquire_default(tmp.path()).unwrap();
        assert!(lock.path().ends_with(".lock"));
        drop(lock);
        assert!(BoardLock::acquire_default(tmp.path()).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn second_holder_times_out() {
        let tmp = TempDir::new().unwrap();
        let _held = BoardLock::acquire_default(tmp.path()).unwrap();
        let second = BoardLock::acquire(tmp.path(), Duration::from_millis(40));
        assert!(matches!(second, Err(LockError::Busy { .. })));
    }
}
