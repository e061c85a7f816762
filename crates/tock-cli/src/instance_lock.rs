use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// File name of the pid lock next to the database.
pub const LOCK_FILE: &str = "tock.pid";

/// Held while this process is the single `tock watch` instance.
#[derive(Debug)]
pub struct InstanceLock {
    path: PathBuf,
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Take the instance lock in `dir`, reclaiming it from a dead process.
pub fn acquire(dir: &Path) -> anyhow::Result<InstanceLock> {
    let lock_path = dir.join(LOCK_FILE);

    // One retry: a stale lock is removed and taken over.
    for _ in 0..2 {
        match try_acquire(&lock_path) {
            Ok(lock) => {
                tracing::debug!(path = %lock_path.display(), "instance lock acquired");
                return Ok(lock);
            }
            Err(LockState::HeldBy(pid)) => {
                anyhow::bail!("another tock instance is already running (pid {pid})");
            }
            Err(LockState::Stale) => {
                tracing::info!(path = %lock_path.display(), "removing stale instance lock");
                let _ = std::fs::remove_file(&lock_path);
            }
            Err(LockState::Unknown) => break,
        }
    }

    anyhow::bail!(
        "could not acquire instance lock at {}; remove it if no tock process is running",
        lock_path.display()
    )
}

#[derive(Debug)]
enum LockState {
    HeldBy(i32),
    Stale,
    Unknown,
}

fn try_acquire(lock_path: &Path) -> Result<InstanceLock, LockState> {
    if let Some(parent) = lock_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    match OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(lock_path)
    {
        Ok(mut file) => {
            let pid = std::process::id();
            let _ = writeln!(file, "{pid}");
            Ok(InstanceLock {
                path: lock_path.to_path_buf(),
            })
        }
        Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
            let mut pid_buf = String::new();
            if OpenOptions::new()
                .read(true)
                .open(lock_path)
                .and_then(|mut file| file.read_to_string(&mut pid_buf))
                .is_err()
            {
                return Err(LockState::Unknown);
            }

            match pid_buf.trim().parse::<i32>().ok() {
                Some(pid) if is_process_running(pid) => Err(LockState::HeldBy(pid)),
                Some(_) => Err(LockState::Stale),
                None => Err(LockState::Unknown),
            }
        }
        Err(_) => Err(LockState::Unknown),
    }
}

fn is_process_running(pid: i32) -> bool {
    std::process::Command::new("kill")
        .arg("-0")
        .arg(pid.to_string())
        .status()
        .is_ok_and(|status| status.success())
}
