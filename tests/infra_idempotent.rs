mod support;

use std::time::Duration;

use gitwp::infra::{
    ensure_database, ensure_images, ensure_proxy, ensure_resolver, wait_for_database,
};
use gitwp::GitwpError;
use support::{quiet_settings, reply, RecordingRunner};

#[test]
fn test_ensure_twice_tolerates_existing_instances() {
    let td = tempfile::tempdir().expect("tmpdir");
    let settings = quiet_settings(td.path());
    let runner = RecordingRunner::new();
    runner
        .on("--name gitwp-mysql", vec![reply(0, ""), reply(125, "Conflict. The container name \"/gitwp-mysql\" is already in use")])
        .on("--name gitwp-proxy", vec![reply(0, ""), reply(125, "Conflict")]);

    ensure_proxy(&runner, &settings).expect("first proxy");
    ensure_database(&runner, &settings).expect("first db");
    ensure_proxy(&runner, &settings).expect("second proxy");
    ensure_database(&runner, &settings).expect("second db");

    assert_eq!(runner.count_prefix("docker run"), 4);
    assert_eq!(runner.count_prefix("docker network"), 0);
    assert_eq!(runner.count_prefix("docker stop"), 0);
}

#[test]
fn test_missing_network_is_created_once_then_retried_once() {
    let td = tempfile::tempdir().expect("tmpdir");
    let settings = quiet_settings(td.path());
    let runner = RecordingRunner::new();
    runner.on(
        "--name gitwp-proxy",
        vec![reply(125, "docker: Error response from daemon: network gitwp not found.")],
    );

    ensure_proxy(&runner, &settings).expect("proxy after network create");

    assert_eq!(
        runner.lines(),
        vec![
            "docker run -d --rm --network gitwp --name gitwp-proxy -p 80:80 -p 443:443 -p 54:54 -p 54:54/udp gitwp-proxy",
            "docker network create gitwp",
            "docker run -d --rm --network gitwp --name gitwp-proxy -p 80:80 -p 443:443 -p 54:54 -p 54:54/udp gitwp-proxy",
        ]
    );
}

#[test]
fn test_network_still_missing_after_retry_is_fatal() {
    let td = tempfile::tempdir().expect("tmpdir");
    let settings = quiet_settings(td.path());
    let runner = RecordingRunner::new();
    let missing = "Error response from daemon: network gitwp not found";
    runner.on(
        "--name gitwp-proxy",
        vec![reply(125, missing), reply(125, missing), reply(125, missing)],
    );

    let err = ensure_proxy(&runner, &settings).expect_err("must not loop");
    assert!(matches!(err, GitwpError::InfraStartup { .. }), "{err}");
    assert_eq!(runner.count_prefix("docker network create"), 1);
    assert_eq!(runner.count_prefix("docker run"), 2);
}

#[test]
fn test_network_created_concurrently_counts_as_success() {
    let td = tempfile::tempdir().expect("tmpdir");
    let settings = quiet_settings(td.path());
    let runner = RecordingRunner::new();
    runner
        .on("--name gitwp-proxy", vec![reply(125, "network gitwp not found")])
        .on("network create", vec![reply(1, "Error response from daemon: network with name gitwp already exists")]);

    ensure_proxy(&runner, &settings).expect("already exists is fine");
    assert_eq!(runner.count_prefix("docker run"), 2);
}

#[test]
fn test_database_failure_is_fatal_with_stderr() {
    let td = tempfile::tempdir().expect("tmpdir");
    let settings = quiet_settings(td.path());
    let runner = RecordingRunner::new();
    runner.on(
        "--name gitwp-mysql",
        vec![reply(1, "Bind for 0.0.0.0:3306 failed: port is already allocated")],
    );

    let err = ensure_database(&runner, &settings).expect_err("port clash");
    assert_eq!(
        err.to_string(),
        "failed to start gitwp-mysql (exit: 1): Bind for 0.0.0.0:3306 failed: port is already allocated"
    );
}

#[test]
fn test_images_built_only_when_missing_or_forced() {
    let td = tempfile::tempdir().expect("tmpdir");
    let settings = quiet_settings(td.path());

    let present = RecordingRunner::new();
    ensure_images(&present, &settings, false).expect("present");
    assert_eq!(present.count_prefix("docker build"), 0);

    let missing = RecordingRunner::new();
    missing.on("image inspect gitwp-proxy", vec![reply(1, "No such image")]);
    ensure_images(&missing, &settings, false).expect("build proxy");
    let builds: Vec<String> = missing
        .lines()
        .into_iter()
        .filter(|l| l.starts_with("docker build"))
        .collect();
    assert_eq!(
        builds,
        vec![format!(
            "docker build -t gitwp-proxy {}",
            settings.proxy_build_context().display()
        )]
    );

    let forced = RecordingRunner::new();
    ensure_images(&forced, &settings, true).expect("forced");
    assert_eq!(forced.count_prefix("docker build"), 2);
    assert_eq!(forced.count_prefix("docker image inspect"), 0);
}

#[test]
fn test_missing_build_context_is_reported() {
    let td = tempfile::tempdir().expect("tmpdir");
    let mut settings = quiet_settings(td.path());
    settings.assets_dir = td.path().join("nowhere");
    let runner = RecordingRunner::new();

    let err = ensure_images(&runner, &settings, true).expect_err("no context");
    assert!(matches!(err, GitwpError::MissingBuildContext { .. }), "{err}");
    assert_eq!(runner.count_prefix("docker build"), 0);
}

#[cfg(unix)]
#[test]
fn test_resolver_is_written_without_sudo_when_writable() {
    let td = tempfile::tempdir().expect("tmpdir");
    let mut settings = quiet_settings(td.path());
    settings.resolver_file = td.path().join("etc").join("resolver").join("gitwp");
    let runner = RecordingRunner::new();

    assert!(ensure_resolver(&runner, &settings).expect("resolver"));
    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].argv[0], "sh");
    assert!(calls[0].argv[2].contains("port 54"));

    std::fs::create_dir_all(settings.resolver_file.parent().unwrap()).unwrap();
    std::fs::write(&settings.resolver_file, "x").unwrap();
    assert!(!ensure_resolver(&runner, &settings).expect("present"));
    assert_eq!(runner.calls().len(), 1);
}

#[test]
fn test_failed_resolver_write_only_warns() {
    let td = tempfile::tempdir().expect("tmpdir");
    let mut settings = quiet_settings(td.path());
    settings.resolver_file = td.path().join("resolver.d").join("gitwp");
    let runner = RecordingRunner::new();
    runner.on("nameserver", vec![reply(1, "")]);

    ensure_proxy(&runner, &settings).expect("proxy starts anyway");
    assert_eq!(runner.count_prefix("docker run"), 1);
}

#[test]
fn test_database_wait_retries_until_ping_answers() {
    let td = tempfile::tempdir().expect("tmpdir");
    let mut settings = quiet_settings(td.path());
    settings.db_wait = Duration::from_secs(2);
    let runner = RecordingRunner::new();
    runner.on("mysqladmin ping", vec![reply(1, "connect failed")]);

    assert!(wait_for_database(&runner, &settings).expect("wait"));
    assert_eq!(runner.count_prefix("docker exec gitwp-mysql mysqladmin ping"), 2);
}

#[test]
fn test_database_wait_gives_up_without_error() {
    let td = tempfile::tempdir().expect("tmpdir");
    let mut settings = quiet_settings(td.path());
    settings.db_wait = Duration::from_secs(2);
    let runner = RecordingRunner::new();
    runner.on(
        "mysqladmin ping",
        vec![reply(1, "down"), reply(1, "down"), reply(1, "down")],
    );

    assert!(!wait_for_database(&runner, &settings).expect("not fatal"));
    assert_eq!(runner.calls().len(), 2);
}

#[test]
fn test_database_wait_disabled_makes_no_calls() {
    let td = tempfile::tempdir().expect("tmpdir");
    let settings = quiet_settings(td.path());
    let runner = RecordingRunner::new();

    assert!(wait_for_database(&runner, &settings).expect("disabled"));
    assert!(runner.calls().is_empty());
}
