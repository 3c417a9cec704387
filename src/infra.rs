/*!
Shared infrastructure: the `gitwp` network, the database and proxy containers, their images
and the local DNS resolver registration.

All `ensure_*` operations are idempotent: a name collision means the instance is already up.
The only retry is a single network creation followed by one more proxy start.
*/
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::color::{progress, warn_print};
use crate::docker::{
    build_image_args, database_ping_args, database_run_args, image_exists, network_create_args,
    proxy_run_args, RunOutcome,
};
use crate::errors::{GitwpError, Result};
use crate::runner::CommandRunner;
use crate::settings::{Settings, DNS_PORT};
use crate::ShellScript;

const DB_PING_TIMEOUT: Duration = Duration::from_secs(5);
const DB_PING_INTERVAL: Duration = Duration::from_secs(1);

fn startup_error(name: &str, outcome: RunOutcome) -> GitwpError {
    let (code, stderr) = match outcome {
        RunOutcome::Failed { code, stderr } => (code, stderr),
        RunOutcome::NetworkMissing => (125, "network not found".to_string()),
        RunOutcome::NameInUse => (125, "name already in use".to_string()),
        RunOutcome::Started => (0, String::new()),
    };
    GitwpError::InfraStartup {
        name: name.to_string(),
        code,
        stderr,
    }
}

/// Start the shared database container; an existing one counts as success.
pub fn ensure_database(runner: &dyn CommandRunner, settings: &Settings) -> Result<()> {
    let name = settings.mysql_container();
    let out = runner.output(&database_run_args(settings), None)?;
    match RunOutcome::classify(&out, &settings.network) {
        RunOutcome::Started => {
            tracing::debug!(container = %name, "database started");
            Ok(())
        }
        RunOutcome::NameInUse => {
            tracing::debug!(container = %name, "database already running");
            Ok(())
        }
        other => Err(startup_error(&name, other)),
    }
}

/// Register the resolver, then start the shared proxy container, creating the network at
/// most once if docker reports it missing.
pub fn ensure_proxy(runner: &dyn CommandRunner, settings: &Settings) -> Result<()> {
    ensure_resolver(runner, settings)?;

    let name = settings.proxy_container();
    let args = proxy_run_args(settings);
    let mut network_created = false;
    loop {
        let out = runner.output(&args, None)?;
        match RunOutcome::classify(&out, &settings.network) {
            RunOutcome::Started => {
                tracing::debug!(container = %name, "proxy started");
                return Ok(());
            }
            RunOutcome::NameInUse => {
                tracing::debug!(container = %name, "proxy already running");
                return Ok(());
            }
            RunOutcome::NetworkMissing if !network_created => {
                progress("Creating network");
                create_network(runner, settings)?;
                network_created = true;
            }
            other => return Err(startup_error(&name, other)),
        }
    }
}

/// `docker network create`; a concurrent creator winning the race is fine.
pub fn create_network(runner: &dyn CommandRunner, settings: &Settings) -> Result<()> {
    let out = runner.output(&network_create_args(settings), None)?;
    if out.success() || out.stderr.contains("already exists") {
        return Ok(());
    }
    Err(GitwpError::InfraStartup {
        name: format!("network {}", settings.network),
        code: out.code,
        stderr: out.stderr,
    })
}

/// Resolver file body pointing the dev TLD at the proxy's DNS port.
pub fn resolver_contents() -> String {
    format!("nameserver 127.0.0.1\nport {DNS_PORT}\n")
}

fn nearest_existing_ancestor(path: &Path) -> Option<PathBuf> {
    path.ancestors().find(|p| p.exists()).map(Path::to_path_buf)
}

#[cfg(unix)]
fn dir_writable(dir: &Path) -> bool {
    use nix::unistd::{access, AccessFlags};
    access(dir, AccessFlags::W_OK).is_ok()
}

#[cfg(not(unix))]
fn dir_writable(_dir: &Path) -> bool {
    true
}

/// Whether writing `file` needs elevated privileges.
pub fn resolver_needs_sudo(file: &Path) -> bool {
    let parent = file.parent().unwrap_or_else(|| Path::new("/"));
    match nearest_existing_ancestor(parent) {
        Some(dir) => !dir_writable(&dir),
        None => true,
    }
}

/// argv writing the resolver file (via `sudo` when needed). Contents go through printf so
/// the script stays a single line.
pub fn resolver_write_args(file: &Path, sudo: bool) -> io::Result<Vec<String>> {
    let dir = file
        .parent()
        .unwrap_or_else(|| Path::new("/"))
        .display()
        .to_string();
    let mut script = ShellScript::strict();
    script.push_words(["mkdir", "-p", dir.as_str()]);
    script.push(format!(
        "printf '{}' > {}",
        resolver_contents().replace('\n', "\\n"),
        crate::shell_escape(&file.display().to_string())
    ));
    let mut args = Vec::new();
    if sudo {
        args.push("sudo".to_string());
    }
    args.extend(["sh".to_string(), "-c".to_string(), script.build()?]);
    Ok(args)
}

/// Create the resolver registration if absent. Returns true when a write was attempted.
/// A failed write is reported and tolerated; the proxy still works by IP.
pub fn ensure_resolver(runner: &dyn CommandRunner, settings: &Settings) -> Result<bool> {
    let file = &settings.resolver_file;
    if file.exists() {
        return Ok(false);
    }
    let sudo = resolver_needs_sudo(file);
    if sudo {
        progress(&format!(
            "Creating {} (may have to enter your password)",
            file.display()
        ));
    } else {
        progress(&format!("Creating {}", file.display()));
    }
    let code = runner.status(&resolver_write_args(file, sudo)?)?;
    if code != 0 {
        warn_print(&format!(
            "could not create {} (exit: {code}); *.dev.gitwp names will not resolve",
            file.display()
        ));
    }
    Ok(true)
}

/// Build the app and proxy images when missing locally, or always when `force` is set.
pub fn ensure_images(runner: &dyn CommandRunner, settings: &Settings, force: bool) -> Result<()> {
    let images = [
        (&settings.app_image, settings.app_build_context()),
        (&settings.proxy_image, settings.proxy_build_context()),
    ];
    for (image, context) in images {
        if force || !image_exists(runner, image)? {
            build_image(runner, image, &context)?;
        }
    }
    Ok(())
}

pub fn build_image(runner: &dyn CommandRunner, image: &str, context: &Path) -> Result<()> {
    if !context.is_dir() {
        return Err(GitwpError::MissingBuildContext {
            image: image.to_string(),
            path: context.to_path_buf(),
        });
    }
    progress(&format!("Building {image} image"));
    let code = runner.status(&build_image_args(image, context))?;
    if code != 0 {
        return Err(GitwpError::InfraStartup {
            name: format!("image build {image}"),
            code,
            stderr: String::new(),
        });
    }
    Ok(())
}

/// Poll `mysqladmin ping` inside the database container, one attempt per second for the
/// configured budget. Returns whether the database answered; never fails on "not ready".
pub fn wait_for_database(runner: &dyn CommandRunner, settings: &Settings) -> Result<bool> {
    let attempts = settings.db_wait.as_secs();
    if attempts == 0 {
        return Ok(true);
    }
    let args = database_ping_args(settings);
    for i in 0..attempts {
        match runner.output(&args, Some(DB_PING_TIMEOUT)) {
            Ok(out) if out.success() => return Ok(true),
            Ok(out) => tracing::debug!(attempt = i + 1, code = out.code, "database not ready"),
            Err(GitwpError::Exec(e)) => {
                tracing::debug!(attempt = i + 1, error = %e, "database ping failed")
            }
            Err(e) => return Err(e),
        }
        if i + 1 < attempts {
            std::thread::sleep(DB_PING_INTERVAL);
        }
    }
    warn_print(&format!(
        "{} not ready after {}s; continuing",
        settings.mysql_container(),
        attempts
    ));
    Ok(false)
}
