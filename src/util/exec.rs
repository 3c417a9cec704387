use std::ffi::OsString;
use std::io;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use wait_timeout::ChildExt;

/// Blocking command execution with optional timeouts and output capture.
///
/// A zero timeout waits indefinitely (log streaming, interactive `wp` sessions).
#[derive(Debug, Clone)]
pub struct ExecService {
    default_timeout: Duration,
}

impl ExecService {
    pub fn new(default_timeout: Duration) -> Self {
        Self { default_timeout }
    }

    pub fn run(&self, request: ExecRequest) -> Result<ExecOutput> {
        let mut cmd = Command::new(&request.program);
        cmd.args(&request.args);

        if request.capture_output {
            cmd.stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped());
        }

        let mut child = cmd.spawn().map_err(|e| {
            let kind = e.kind();
            anyhow::Error::new(io::Error::new(
                kind,
                format!("failed to spawn {:?}: {e}", request.program),
            ))
        })?;

        let mut stdout_pipe = if request.capture_output {
            child.stdout.take()
        } else {
            None
        };
        let mut stderr_pipe = if request.capture_output {
            child.stderr.take()
        } else {
            None
        };

        let timeout = request.timeout.unwrap_or(self.default_timeout);
        let started = Instant::now();
        let status = if timeout.is_zero() {
            child.wait().context("failed to wait for process")?
        } else {
            match child
                .wait_timeout(timeout)
                .context("failed to wait with timeout")?
            {
                Some(status) => status,
                None => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(anyhow!(
                        "command {:?} timed out after {:?}",
                        request.program,
                        timeout
                    ));
                }
            }
        };

        let duration = started.elapsed();
        let (stdout, stderr) = if request.capture_output {
            let stdout = read_stream(stdout_pipe.as_mut())?;
            let stderr = read_stream(stderr_pipe.as_mut())?;
            (stdout, stderr)
        } else {
            (String::new(), String::new())
        };

        tracing::debug!(
            program = ?request.program,
            code = ?status.code(),
            elapsed_ms = duration.as_millis() as u64,
            "command finished"
        );

        Ok(ExecOutput {
            status,
            duration,
            stdout,
            stderr,
        })
    }
}

// Reads after exit; docker's run/exec/inspect chatter stays far below the pipe buffer size.
fn read_stream(stream: Option<&mut impl io::Read>) -> Result<String> {
    let mut buf = String::new();
    if let Some(reader) = stream {
        reader
            .read_to_string(&mut buf)
            .context("failed to read process output")?;
    }
    Ok(buf)
}

impl Default for ExecService {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

#[derive(Debug, Default)]
pub struct ExecRequest {
    program: OsString,
    args: Vec<OsString>,
    timeout: Option<Duration>,
    capture_output: bool,
}

impl ExecRequest {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn capture_output(mut self, capture: bool) -> Self {
        self.capture_output = capture;
        self
    }
}

#[derive(Debug)]
pub struct ExecOutput {
    pub status: std::process::ExitStatus,
    pub duration: Duration,
    pub stdout: String,
    pub stderr: String,
}
