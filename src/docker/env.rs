#![allow(clippy::module_name_repetitions)]
//! Docker `-e`, `-p` and `-v` argument helpers.

use std::path::Path;

pub(crate) fn push_env_kv(args: &mut Vec<String>, key: &str, val: &str) {
    args.push("-e".to_string());
    args.push(format!("{key}={val}"));
}

pub(crate) fn push_port(args: &mut Vec<String>, mapping: &str) {
    args.push("-p".to_string());
    args.push(mapping.to_string());
}

pub(crate) fn push_mount(args: &mut Vec<String>, host: &Path, container: &str) {
    args.push("-v".to_string());
    args.push(format!("{}:{container}", host.display()));
}

/// `docker run -d --rm --network <net> --name <name>`: every instance gitwp starts is
/// detached and self-removing, so `docker stop` is a full teardown.
pub(crate) fn detached_run_prefix(network: &str, name: &str) -> Vec<String> {
    vec![
        "docker".to_string(),
        "run".to_string(),
        "-d".to_string(),
        "--rm".to_string(),
        "--network".to_string(),
        network.to_string(),
        "--name".to_string(),
        name.to_string(),
    ]
}
