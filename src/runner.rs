//! The single seam through which gitwp runs external programs.
//!
//! `SystemRunner` executes for real, `DryRunner` only prints previews. Integration tests
//! substitute a recording runner to assert call sequences.

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use once_cell::sync::OnceCell;

use crate::docker::container_runtime_path;
use crate::errors::Result;
use crate::util::exec::{ExecRequest, ExecService};

/// Captured result of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; 128+N when terminated by signal N.
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }

    pub fn ok() -> Self {
        Self {
            code: 0,
            stdout: String::new(),
            stderr: String::new(),
        }
    }
}

pub trait CommandRunner {
    /// Run `argv` with stdout/stderr captured. `None` waits indefinitely.
    fn output(&self, argv: &[String], timeout: Option<Duration>) -> Result<CommandOutput>;

    /// Run `argv` attached to the terminal and return its exit code.
    fn status(&self, argv: &[String]) -> Result<i32>;

    /// True when nothing may change on the host, including local files.
    fn is_dry_run(&self) -> bool {
        false
    }
}

pub(crate) fn exit_code_of(status: &ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(sig) = status.signal() {
            return 128 + sig;
        }
    }
    1
}

fn preview_label(argv: &[String]) -> &'static str {
    match argv.first().map(String::as_str) {
        Some("docker") => "docker",
        _ => "exec",
    }
}

fn print_preview(argv: &[String]) {
    let use_err = crate::color_enabled_stderr();
    crate::log_info_stderr(
        use_err,
        &format!("gitwp: {}: {}", preview_label(argv), crate::shell_join(argv)),
    );
}

/// Runs commands on the host. `docker` in argv[0] resolves to the detected runtime path.
#[derive(Debug, Default)]
pub struct SystemRunner {
    exec: ExecService,
    verbose: bool,
    docker: OnceCell<PathBuf>,
}

impl SystemRunner {
    pub fn new(verbose: bool) -> Self {
        Self {
            exec: ExecService::default(),
            verbose,
            docker: OnceCell::new(),
        }
    }

    fn request(&self, argv: &[String]) -> Result<ExecRequest> {
        let (program, rest) = argv.split_first().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command line")
        })?;
        let program = if program == "docker" {
            self.docker
                .get_or_try_init(container_runtime_path)?
                .clone()
                .into_os_string()
        } else {
            program.into()
        };
        if self.verbose {
            print_preview(argv);
        }
        tracing::debug!(command = %crate::shell_join(argv), "running");
        Ok(ExecRequest::new(program).args(rest))
    }
}

impl CommandRunner for SystemRunner {
    fn output(&self, argv: &[String], timeout: Option<Duration>) -> Result<CommandOutput> {
        let mut req = self.request(argv)?.capture_output(true);
        if let Some(t) = timeout {
            req = req.timeout(t);
        }
        let out = self.exec.run(req)?;
        Ok(CommandOutput {
            code: exit_code_of(&out.status),
            stdout: out.stdout,
            stderr: out.stderr,
        })
    }

    fn status(&self, argv: &[String]) -> Result<i32> {
        let out = self.exec.run(self.request(argv)?)?;
        Ok(exit_code_of(&out.status))
    }
}

/// Prints what would run and reports success for everything.
#[derive(Debug, Default)]
pub struct DryRunner;

impl CommandRunner for DryRunner {
    fn output(&self, argv: &[String], _timeout: Option<Duration>) -> Result<CommandOutput> {
        print_preview(argv);
        Ok(CommandOutput::ok())
    }

    fn status(&self, argv: &[String]) -> Result<i32> {
        print_preview(argv);
        Ok(0)
    }

    fn is_dry_run(&self) -> bool {
        true
    }
}
