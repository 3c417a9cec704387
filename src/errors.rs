//! Error mapping guide:
//! - Map io::ErrorKind::NotFound to exit code 127; all others to 1.
//! - `wp` and `stop` mirror the inner command's exit code instead of going through here.
//! - Name collisions, a single missing network and user interrupts are handled in place
//!   and never surface as `GitwpError`.
use std::io;
use std::path::PathBuf;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, GitwpError>;

#[derive(Debug, thiserror::Error)]
pub enum GitwpError {
    /// `gitwp.yml` is absent from the project root.
    #[error("gitwp.yml not found at {}", path.display())]
    MissingConfig { path: PathBuf },

    /// `gitwp.yml` exists but cannot be parsed or lacks required keys.
    #[error("invalid config {}: {message}", path.display())]
    InvalidConfig { path: PathBuf, message: String },

    #[error("unknown host type: {0}")]
    UnknownHostType(String),

    /// Shared infrastructure (network, database, proxy, images) failed to come up.
    #[error("failed to start {name} (exit: {code}){}", render_stderr(stderr))]
    InfraStartup {
        name: String,
        code: i32,
        stderr: String,
    },

    #[error("failed to start project container {name} (exit: {code}){}", render_stderr(stderr))]
    ContainerStart {
        name: String,
        code: i32,
        stderr: String,
    },

    /// A sync step (ssh export, rsync transfer, import, search-replace) exited non-zero.
    #[error("{what} failed (exit: {code})")]
    CommandFailed { what: String, code: i32 },

    #[error("cannot build image {image}: build context {} not found", path.display())]
    MissingBuildContext { image: String, path: PathBuf },

    #[error("database dump {} is outside the project tree", path.display())]
    DumpOutsideProject { path: PathBuf },

    #[error("another gitwp work session is already running for {project}")]
    LockHeld { project: String },

    #[error(transparent)]
    Io(#[from] io::Error),

    /// Spawn/wait/timeout failures reported by the exec service.
    #[error(transparent)]
    Exec(#[from] anyhow::Error),
}

fn render_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

/// Map an io::Error to a process exit code:
/// - 127 for NotFound (command not found)
/// - 1 for all other errors
pub fn exit_code_for_io_error(e: &io::Error) -> u8 {
    if e.kind() == io::ErrorKind::NotFound {
        127
    } else {
        1
    }
}

/// Convert GitwpError to exit code (parity with io::Error mapping).
pub fn exit_code_for_error(e: &GitwpError) -> u8 {
    match e {
        GitwpError::Io(ioe) => exit_code_for_io_error(ioe),
        GitwpError::Exec(err) => err
            .downcast_ref::<io::Error>()
            .map(exit_code_for_io_error)
            .unwrap_or(1),
        _ => 1,
    }
}
