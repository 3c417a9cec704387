//! Pull a production database snapshot into the local project container.
//!
//! The transport is a closed enum with one variant today; `sync_db` returns where the dump
//! landed and the import step uses exactly that path.

use std::io;
use std::path::{Path, PathBuf};

use crate::color::progress;
use crate::config::{load_config, HostConfig, ProjectConfig};
use crate::docker::{exec_import_args, exec_search_replace_args};
use crate::errors::{GitwpError, Result};
use crate::project::Project;
use crate::runner::CommandRunner;
use crate::settings::CONTAINER_REPO_DIR;
use crate::util::reject_newlines;
use crate::ShellScript;

const REMOTE_DUMP_DIR: &str = "db_dump";
const DUMP_FILE: &str = "db.sql";
const DUMP_FILE_GZ: &str = "db.sql.gz";
const DEFAULT_WPCLI: &str = "wp";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshHost {
    pub hostname: String,
    pub username: String,
    pub repo_path: String,
    pub site_path: String,
    pub wpcli: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostDescriptor {
    Ssh(SshHost),
}

fn invalid(path: &Path, message: String) -> GitwpError {
    GitwpError::InvalidConfig {
        path: path.to_path_buf(),
        message,
    }
}

/// Present, non-blank, single-line. The value is kept exactly as written.
fn checked(value: &str, field: &str, path: &Path) -> Result<String> {
    if value.trim().is_empty() {
        return Err(invalid(path, format!("host.{field} must not be empty")));
    }
    reject_newlines(value, &format!("host.{field}")).map_err(|m| invalid(path, m))?;
    Ok(value.to_string())
}

fn required(value: &Option<String>, field: &str, path: &Path) -> Result<String> {
    match value.as_deref() {
        Some(v) => checked(v, field, path),
        None => Err(invalid(path, format!("host.{field} is required"))),
    }
}

impl HostDescriptor {
    /// Select the transport for a `host` section. `path` is only used in error messages.
    pub fn from_config(host: &HostConfig, path: &Path) -> Result<Self> {
        match host.kind.as_str() {
            "ssh" => {
                let wpcli = match host.wpcli.as_deref() {
                    Some(w) => checked(w, "wpcli", path)?,
                    None => DEFAULT_WPCLI.to_string(),
                };
                Ok(HostDescriptor::Ssh(SshHost {
                    hostname: required(&host.hostname, "hostname", path)?,
                    username: required(&host.username, "username", path)?,
                    repo_path: required(&host.repo_path, "repo_path", path)?,
                    site_path: required(&host.site_path, "site_path", path)?,
                    wpcli,
                }))
            }
            other => Err(GitwpError::UnknownHostType(other.to_string())),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            HostDescriptor::Ssh(_) => "ssh",
        }
    }

    /// Export the remote database and download it into `download_to`. Returns the local path
    /// of the compressed dump.
    pub fn sync_db(&self, runner: &dyn CommandRunner, download_to: &Path) -> Result<PathBuf> {
        match self {
            HostDescriptor::Ssh(host) => host.sync_db(runner, download_to),
        }
    }
}

impl SshHost {
    pub fn ssh_target(&self) -> String {
        format!("{}@{}", self.username, self.hostname)
    }

    fn remote_dump_dir(&self) -> String {
        format!("{}/{REMOTE_DUMP_DIR}", self.repo_path.trim_end_matches('/'))
    }

    pub fn remote_dump_path(&self) -> String {
        format!("{}/{DUMP_FILE}", self.remote_dump_dir())
    }

    /// One-line remote script: export with wp-cli, then gzip in place.
    pub fn export_script(&self) -> io::Result<String> {
        let dir = self.remote_dump_dir();
        let dump = self.remote_dump_path();
        let site = format!("--path={}", self.site_path);
        let mut script = ShellScript::strict();
        script.push_words(["mkdir", "-p", dir.as_str()]);
        script.push_words([
            self.wpcli.as_str(),
            "db",
            "export",
            site.as_str(),
            "--porcelain",
            dump.as_str(),
        ]);
        script.push_words(["gzip", "-f", dump.as_str()]);
        script.build()
    }

    pub fn ssh_args(&self) -> io::Result<Vec<String>> {
        Ok(vec![
            "ssh".to_string(),
            self.ssh_target(),
            self.export_script()?,
        ])
    }

    /// Mirror the compressed dump into `download_to/`. `--delete` prunes that directory.
    pub fn rsync_args(&self, download_to: &Path) -> Vec<String> {
        vec![
            "rsync".to_string(),
            "-avH".to_string(),
            "--delete".to_string(),
            "-e".to_string(),
            "ssh".to_string(),
            format!("{}:{}.gz", self.ssh_target(), self.remote_dump_path()),
            format!("{}/", download_to.display()),
        ]
    }

    fn sync_db(&self, runner: &dyn CommandRunner, download_to: &Path) -> Result<PathBuf> {
        tracing::debug!(host = %self.ssh_target(), "exporting remote database");
        let code = runner.status(&self.ssh_args()?)?;
        if code != 0 {
            return Err(GitwpError::CommandFailed {
                what: format!("remote export on {}", self.ssh_target()),
                code,
            });
        }
        tracing::debug!(to = %download_to.display(), "downloading dump");
        let code = runner.status(&self.rsync_args(download_to))?;
        if code != 0 {
            return Err(GitwpError::CommandFailed {
                what: "rsync download".to_string(),
                code,
            });
        }
        Ok(download_to.join(DUMP_FILE_GZ))
    }
}

/// Everything a sync needs, resolved before any container is touched.
#[derive(Debug, Clone)]
pub struct SyncPlan {
    pub config: ProjectConfig,
    pub host: HostDescriptor,
    pub download_to: PathBuf,
}

/// Prepare `.bolt/`, load `gitwp.yml` and pick the transport. Fails fast on a missing config
/// or an unknown host type. A dry-run leaves the project tree untouched.
pub fn prepare_sync(runner: &dyn CommandRunner, project: &Project) -> Result<SyncPlan> {
    if runner.is_dry_run() {
        tracing::debug!(dir = %project.state_dir().display(), "dry-run: state dir not created");
    } else {
        project.ensure_state_dir()?;
    }
    let config = load_config(project.root())?;
    let host = HostDescriptor::from_config(&config.host, &config.source)?;
    tracing::debug!(kind = host.kind(), domain = %config.domain, "sync prepared");
    Ok(SyncPlan {
        config,
        host,
        download_to: project.dump_dir(),
    })
}

/// Path of a local dump as the project container sees it under the repo mount.
pub fn container_dump_path(project: &Project, dump: &Path) -> Result<String> {
    let rel = dump
        .strip_prefix(project.root())
        .map_err(|_| GitwpError::DumpOutsideProject {
            path: dump.to_path_buf(),
        })?;
    let rel = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/");
    Ok(format!("{CONTAINER_REPO_DIR}/{rel}"))
}

pub fn import_database(
    runner: &dyn CommandRunner,
    project: &Project,
    container_name: &str,
    dump: &Path,
) -> Result<()> {
    let in_container = container_dump_path(project, dump)?;
    progress("Loading database into container");
    let code = runner.status(&exec_import_args(container_name, &in_container)?)?;
    if code != 0 {
        return Err(GitwpError::CommandFailed {
            what: "database import".to_string(),
            code,
        });
    }
    Ok(())
}

pub fn rewrite_urls(
    runner: &dyn CommandRunner,
    container_name: &str,
    from: &str,
    to: &str,
) -> Result<()> {
    progress("Replacing URLs");
    tracing::debug!(%from, %to, "search-replace");
    let code = runner.status(&exec_search_replace_args(container_name, from, to))?;
    if code != 0 {
        return Err(GitwpError::CommandFailed {
            what: "search-replace".to_string(),
            code,
        });
    }
    Ok(())
}

/// Download, import and rewrite. Expects the project container to be running.
pub fn run_sync(runner: &dyn CommandRunner, project: &Project, plan: &SyncPlan) -> Result<()> {
    let container = project.container_name();
    progress(&format!("Syncing database from {} host", plan.host.kind()));
    let dump = plan.host.sync_db(runner, &plan.download_to)?;
    import_database(runner, project, &container, &dump)?;
    rewrite_urls(runner, &container, &plan.config.domain, &project.dev_domain())
}
