#![allow(clippy::module_name_repetitions)]
//! Docker command construction, runtime detection and `docker run` outcome classification.
//!
//! Builders return full argv vectors whose first element is `docker`; the runner maps that
//! to the detected runtime path and `shell_join` renders the same vector as a preview.

pub(crate) mod env;
pub(crate) mod images;
pub(crate) mod outcome;
pub(crate) mod run;
pub(crate) mod runtime;

pub use images::{build_image_args, image_exists, image_inspect_args};
pub use outcome::RunOutcome;
pub use run::{
    app_run_args, database_ping_args, database_run_args, exec_import_args,
    exec_search_replace_args, exec_wp_args, logs_follow_args, network_create_args,
    proxy_run_args, stop_args,
};
pub use runtime::container_runtime_path;
