use std::process::ExitCode;

use gitwp::session::{self, WorkOptions};
use gitwp::{CommandRunner, DryRunner, GitwpError, Project, Settings, SystemRunner};

use crate::cli::Cli;

fn runner_for(cli: &Cli) -> Box<dyn CommandRunner> {
    if cli.dry_run {
        Box::new(DryRunner)
    } else {
        Box::new(SystemRunner::new(cli.verbose))
    }
}

fn fail(e: &GitwpError) -> ExitCode {
    let use_err = gitwp::color_enabled_stderr();
    gitwp::log_error_stderr(use_err, &format!("gitwp: {e}"));
    ExitCode::from(gitwp::exit_code_for_error(e))
}

/// Clamp a child exit code into the u8 range ExitCode accepts.
fn mirror(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

fn current_project() -> Result<Project, GitwpError> {
    Ok(Project::from_cwd()?)
}

pub fn run_work(cli: &Cli, build: bool, sync: bool) -> ExitCode {
    let project = match current_project() {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };
    let settings = Settings::from_env();
    let runner = runner_for(cli);
    if cli.verbose {
        let use_err = gitwp::color_enabled_stderr();
        gitwp::log_info_stderr(use_err, &format!("gitwp: project: {}", project.name()));
        gitwp::log_info_stderr(
            use_err,
            &format!("gitwp: container: {}", project.container_name()),
        );
    }
    match session::work(
        runner.as_ref(),
        &settings,
        &project,
        WorkOptions { build, sync },
    ) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

pub fn run_wp(cli: &Cli, args: &[String]) -> ExitCode {
    let project = match current_project() {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };
    let runner = runner_for(cli);
    match session::run_wp(runner.as_ref(), &project, args) {
        Ok(code) => mirror(code),
        Err(e) => fail(&e),
    }
}

pub fn run_stop(cli: &Cli) -> ExitCode {
    let project = match current_project() {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };
    let settings = Settings::from_env();
    let runner = runner_for(cli);
    match session::stop(runner.as_ref(), &settings, &project) {
        Ok(code) => mirror(code),
        Err(e) => fail(&e),
    }
}
