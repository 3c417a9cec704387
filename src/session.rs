//! Top-level flows behind `work`, `wp` and `stop`.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::color::{progress, warn_print};
use crate::container::ensure_running;
use crate::docker::{exec_wp_args, logs_follow_args, stop_args};
use crate::errors::Result;
use crate::infra::{ensure_database, ensure_images, ensure_proxy, wait_for_database};
use crate::lock::acquire_project_lock;
use crate::project::Project;
use crate::runner::CommandRunner;
use crate::settings::Settings;
use crate::sync::{prepare_sync, run_sync};

/// Exit code of a process killed by SIGINT.
const EXIT_SIGINT: i32 = 130;

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
extern "C" fn handle_sigint(_sig: i32) {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

/// Record Ctrl-C instead of dying, so the log follower can be torn down afterwards.
/// Returns false when the handler could not be installed.
#[cfg(unix)]
pub fn install_interrupt_handler() -> bool {
    use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};
    let act = SigAction::new(
        SigHandler::Handler(handle_sigint),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );
    let res = unsafe { signal::sigaction(Signal::SIGINT, &act) };
    report_handler_install(res.map(|_| ()))
}

#[cfg(unix)]
fn report_handler_install(res: nix::Result<()>) -> bool {
    match res {
        Ok(()) => true,
        Err(e) => {
            warn_print(&format!(
                "could not install Ctrl-C handler ({e}); an interrupt will not stop the container"
            ));
            false
        }
    }
}

#[cfg(not(unix))]
pub fn install_interrupt_handler() -> bool {
    false
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkOptions {
    /// Rebuild images even if present.
    pub build: bool,
    /// Pull the production database before handing over.
    pub sync: bool,
}

/// Bring up infra and the project container, optionally sync, then follow logs.
pub fn work(
    runner: &dyn CommandRunner,
    settings: &Settings,
    project: &Project,
    opts: WorkOptions,
) -> Result<()> {
    let _lock = acquire_project_lock(project)?;

    // Config problems must surface before anything is started.
    let plan = if opts.sync {
        Some(prepare_sync(runner, project)?)
    } else {
        None
    };

    ensure_images(runner, settings, opts.build)?;
    progress("Ensuring proxy");
    ensure_proxy(runner, settings)?;
    progress("Ensuring mysql");
    ensure_database(runner, settings)?;
    wait_for_database(runner, settings)?;

    let container = project.container_name();
    ensure_running(
        runner,
        settings,
        project.root(),
        &container,
        project.db_name(),
    )?;

    if let Some(plan) = &plan {
        run_sync(runner, project, plan)?;
    }

    progress(&format!("Working on {}", project.dev_url()));
    install_interrupt_handler();
    if stream_logs_until_interrupt(runner, &container)? {
        let code = runner.status(&stop_args(&[container.as_str()]))?;
        tracing::debug!(container = %container, code, "stopped after interrupt");
    }
    Ok(())
}

/// Follow the container logs on the terminal. Returns whether the stream ended because the
/// user pressed Ctrl-C.
pub fn stream_logs_until_interrupt(runner: &dyn CommandRunner, container: &str) -> Result<bool> {
    INTERRUPTED.store(false, Ordering::SeqCst);
    let code = runner.status(&logs_follow_args(container))?;
    let interrupted = INTERRUPTED.swap(false, Ordering::SeqCst) || code == EXIT_SIGINT;
    tracing::debug!(code, interrupted, "log stream ended");
    Ok(interrupted)
}

/// Forward `args` to wp-cli inside the project container; returns its exit code.
pub fn run_wp(runner: &dyn CommandRunner, project: &Project, args: &[String]) -> Result<i32> {
    let tty = atty::is(atty::Stream::Stdin);
    runner.status(&exec_wp_args(&project.container_name(), tty, args))
}

/// Stop the project container and both shared instances in one call.
pub fn stop(runner: &dyn CommandRunner, settings: &Settings, project: &Project) -> Result<i32> {
    let names = [
        project.container_name(),
        settings.mysql_container(),
        settings.proxy_container(),
    ];
    runner.status(&stop_args(&names))
}
