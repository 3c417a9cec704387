//! Typed interpretation of `docker run` exit status.

use crate::runner::CommandOutput;

/// Exit code docker uses when the daemon rejects a run; gitwp reads it as "name in use".
pub const EXIT_NAME_IN_USE: i32 = 125;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Started,
    /// A container with the requested name already exists.
    NameInUse,
    /// The requested network does not exist yet.
    NetworkMissing,
    Failed { code: i32, stderr: String },
}

impl RunOutcome {
    /// Classify a captured `docker run` result. The network check comes first: docker also
    /// exits 125 when the network is absent.
    pub fn classify(out: &CommandOutput, network: &str) -> Self {
        if out.success() {
            return RunOutcome::Started;
        }
        if out.stderr.contains(&format!("network {network} not found")) {
            return RunOutcome::NetworkMissing;
        }
        if out.code == EXIT_NAME_IN_USE {
            return RunOutcome::NameInUse;
        }
        RunOutcome::Failed {
            code: out.code,
            stderr: out.stderr.clone(),
        }
    }
}
