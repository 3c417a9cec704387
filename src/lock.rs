use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use crate::errors::{GitwpError, Result};
use crate::project::Project;

/// Per-project `work` lock guard that removes the lock file on drop.
#[derive(Debug)]
pub struct ProjectLock {
    file: File,
    path: PathBuf,
}

impl Drop for ProjectLock {
    fn drop(&mut self) {
        // Best-effort unlock; ignore errors
        let _ = self.file.unlock();
        let _ = fs::remove_file(&self.path);
    }
}

/// Lock file location for a project: `<tmp>/gitwp-<project>.lock`.
pub fn lock_path_for(project: &Project) -> PathBuf {
    std::env::temp_dir().join(format!("gitwp-{}.lock", project.name()))
}

/// Acquire the non-blocking exclusive `work` lock for a project.
pub fn acquire_project_lock(project: &Project) -> Result<ProjectLock> {
    acquire_lock_at(&lock_path_for(project), project.name())
}

/// Acquire a non-blocking exclusive lock at `path`; contention is `LockHeld { project }`.
pub fn acquire_lock_at(path: &Path, project: &str) -> Result<ProjectLock> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(path)?;
    match file.try_lock_exclusive() {
        Ok(()) => Ok(ProjectLock {
            file,
            path: path.to_path_buf(),
        }),
        Err(e)
            if e.kind() == io::ErrorKind::WouldBlock
                || e.kind() == fs2::lock_contended_error().kind() =>
        {
            Err(GitwpError::LockHeld {
                project: project.to_string(),
            })
        }
        Err(e) => Err(GitwpError::Io(e)),
    }
}
