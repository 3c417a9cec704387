//! Per-project application container lifecycle.

use std::path::Path;

use crate::color::{progress, warn_print};
use crate::docker::{app_run_args, stop_args, RunOutcome};
use crate::errors::{GitwpError, Result};
use crate::runner::CommandRunner;
use crate::settings::Settings;

/// Start the project container, replacing a same-named one at most once.
///
/// A name collision stops the existing container and retries the start. A second collision
/// (someone else restarted it in between) surfaces as `ContainerStart`.
pub fn ensure_running(
    runner: &dyn CommandRunner,
    settings: &Settings,
    project_path: &Path,
    container_name: &str,
    db_name: &str,
) -> Result<()> {
    let args = app_run_args(settings, project_path, container_name, db_name);
    let mut stopped = false;
    loop {
        let out = runner.output(&args, None)?;
        match RunOutcome::classify(&out, &settings.network) {
            RunOutcome::Started => {
                tracing::debug!(container = %container_name, "project container started");
                return Ok(());
            }
            RunOutcome::NameInUse if !stopped => {
                progress(&format!("Replacing running {container_name}"));
                let stop = runner.output(&stop_args(&[container_name]), None)?;
                if !stop.success() {
                    warn_print(&format!(
                        "docker stop {container_name} failed (exit: {}); retrying start anyway",
                        stop.code
                    ));
                }
                stopped = true;
            }
            _ => {
                return Err(GitwpError::ContainerStart {
                    name: container_name.to_string(),
                    code: out.code,
                    stderr: out.stderr,
                })
            }
        }
    }
}
