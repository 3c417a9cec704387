#![allow(clippy::module_name_repetitions)]
//! argv builders for every docker invocation gitwp makes.

use std::path::Path;

use crate::docker::env::{detached_run_prefix, push_env_kv, push_mount, push_port};
use crate::settings::{
    Settings, CONTAINER_REPO_DIR, CONTAINER_SITE_DIR, DB_DEFAULT_NAME, DB_PASSWORD, DB_USER,
    DNS_PORT, MYSQL_PLATFORM,
};
use crate::ShellScript;

/// `wp` invocation prefix used inside the app container.
fn wp_prefix() -> Vec<String> {
    vec![
        "wp".to_string(),
        "--allow-root".to_string(),
        format!("--path={CONTAINER_SITE_DIR}"),
    ]
}

pub fn database_run_args(settings: &Settings) -> Vec<String> {
    let mut args = detached_run_prefix(&settings.network, &settings.mysql_container());
    args.push("--platform".to_string());
    args.push(MYSQL_PLATFORM.to_string());
    push_port(&mut args, "3306:3306");
    push_env_kv(&mut args, "MYSQL_DATABASE", DB_DEFAULT_NAME);
    push_env_kv(&mut args, "MYSQL_ROOT_PASSWORD", DB_PASSWORD);
    args.push(settings.mysql_image.clone());
    args
}

pub fn proxy_run_args(settings: &Settings) -> Vec<String> {
    let mut args = detached_run_prefix(&settings.network, &settings.proxy_container());
    push_port(&mut args, "80:80");
    push_port(&mut args, "443:443");
    push_port(&mut args, &format!("{DNS_PORT}:{DNS_PORT}"));
    push_port(&mut args, &format!("{DNS_PORT}:{DNS_PORT}/udp"));
    args.push(settings.proxy_image.clone());
    args
}

pub fn app_run_args(
    settings: &Settings,
    project_path: &Path,
    container_name: &str,
    db_name: &str,
) -> Vec<String> {
    let mut args = detached_run_prefix(&settings.network, container_name);
    push_mount(&mut args, project_path, CONTAINER_REPO_DIR);
    push_env_kv(&mut args, "WORDPRESS_DB_HOST", &settings.mysql_container());
    push_env_kv(&mut args, "WORDPRESS_DB_USER", DB_USER);
    push_env_kv(&mut args, "WORDPRESS_DB_PASSWORD", DB_PASSWORD);
    push_env_kv(&mut args, "WORDPRESS_DB_NAME", db_name);
    args.push(settings.app_image.clone());
    args
}

pub fn network_create_args(settings: &Settings) -> Vec<String> {
    vec![
        "docker".to_string(),
        "network".to_string(),
        "create".to_string(),
        settings.network.clone(),
    ]
}

pub fn stop_args<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut args = vec!["docker".to_string(), "stop".to_string()];
    args.extend(names.iter().map(|n| n.as_ref().to_string()));
    args
}

pub fn logs_follow_args(container_name: &str) -> Vec<String> {
    vec![
        "docker".to_string(),
        "logs".to_string(),
        "-f".to_string(),
        container_name.to_string(),
    ]
}

/// Readiness check run inside the database container.
pub fn database_ping_args(settings: &Settings) -> Vec<String> {
    vec![
        "docker".to_string(),
        "exec".to_string(),
        settings.mysql_container(),
        "mysqladmin".to_string(),
        "ping".to_string(),
        "-h".to_string(),
        "127.0.0.1".to_string(),
        format!("-u{DB_USER}"),
        format!("-p{DB_PASSWORD}"),
        "--silent".to_string(),
    ]
}

/// Interactive `wp` passthrough; `-t` only when stdin is a terminal.
pub fn exec_wp_args(container_name: &str, tty: bool, user_args: &[String]) -> Vec<String> {
    let mut args = vec!["docker".to_string(), "exec".to_string()];
    push_env_kv(&mut args, "PAGER", "cat");
    args.push(if tty { "-it" } else { "-i" }.to_string());
    args.push(container_name.to_string());
    args.extend(wp_prefix());
    args.extend(user_args.iter().cloned());
    args
}

/// Create the project database if absent, then stream the gzipped dump into `wp db import`.
/// `dump_in_container` is the dump's absolute path inside the container.
pub fn exec_import_args(container_name: &str, dump_in_container: &str) -> std::io::Result<Vec<String>> {
    let mut create = wp_prefix();
    create.extend(["db".to_string(), "create".to_string()]);
    let mut import = wp_prefix();
    import.extend(["db".to_string(), "import".to_string(), "-".to_string()]);

    let mut script = ShellScript::new();
    script.push(format!(
        "{} >/dev/null 2>&1 || true",
        crate::shell_join(&create)
    ));
    script.push(format!(
        "gunzip -c {} | {}",
        crate::shell_escape(dump_in_container),
        crate::shell_join(&import)
    ));

    Ok(vec![
        "docker".to_string(),
        "exec".to_string(),
        "-i".to_string(),
        container_name.to_string(),
        "bash".to_string(),
        "-o".to_string(),
        "pipefail".to_string(),
        "-c".to_string(),
        script.build()?,
    ])
}

pub fn exec_search_replace_args(container_name: &str, from: &str, to: &str) -> Vec<String> {
    let mut args = vec![
        "docker".to_string(),
        "exec".to_string(),
        "-i".to_string(),
        container_name.to_string(),
    ];
    args.extend(wp_prefix());
    args.extend([
        "search-replace".to_string(),
        "--all-tables".to_string(),
        from.to_string(),
        to.to_string(),
    ]);
    args
}
