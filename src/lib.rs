#![allow(clippy::module_name_repetitions)]
//! gitwp: per-project local WordPress environments on docker.
//!
//! Every project gets its own app container wired to a shared database and reverse proxy.
//! All external programs go through [`runner::CommandRunner`], so flows can be previewed
//! with `--dry-run` and exercised in tests without a docker daemon.

mod color;
pub mod config;
pub mod container;
pub mod docker;
mod errors;
pub mod infra;
pub mod lock;
pub mod project;
pub mod runner;
pub mod session;
pub mod settings;
pub mod sync;
mod telemetry;
pub mod util;

pub use color::{
    color_enabled_stderr, log_error_stderr, log_info_stderr, log_progress_stderr,
    log_warn_stderr, paint, progress, set_color_mode, warn_print, ColorMode,
};
pub use errors::{exit_code_for_error, exit_code_for_io_error, GitwpError, Result};
pub use project::Project;
pub use runner::{CommandOutput, CommandRunner, DryRunner, SystemRunner};
pub use settings::Settings;
pub use telemetry::telemetry_init;
pub use util::{shell_escape, shell_join, ShellScript};
