mod support;

use std::path::Path;

use gitwp::container::ensure_running;
use gitwp::GitwpError;
use support::{quiet_settings, reply, RecordingRunner};

#[test]
fn test_start_fresh_container() {
    let td = tempfile::tempdir().expect("tmpdir");
    let settings = quiet_settings(td.path());
    let runner = RecordingRunner::new();

    ensure_running(&runner, &settings, Path::new("/work/demo"), "gitwp-demo", "demo")
        .expect("start");
    assert_eq!(
        runner.lines(),
        vec![
            "docker run -d --rm --network gitwp --name gitwp-demo -v /work/demo:/repo_dev \
             -e WORDPRESS_DB_HOST=gitwp-mysql -e WORDPRESS_DB_USER=root \
             -e WORDPRESS_DB_PASSWORD=pass -e WORDPRESS_DB_NAME=demo gitwp"
        ]
    );
}

#[test]
fn test_name_in_use_stops_once_then_retries_once() {
    let td = tempfile::tempdir().expect("tmpdir");
    let settings = quiet_settings(td.path());
    let runner = RecordingRunner::new();
    runner.on("--name gitwp-demo", vec![reply(125, "Conflict. The container name is already in use")]);

    ensure_running(&runner, &settings, Path::new("/work/demo"), "gitwp-demo", "demo")
        .expect("replaced");

    let lines = runner.lines();
    assert_eq!(lines.len(), 3, "{lines:?}");
    assert!(lines[0].starts_with("docker run"));
    assert_eq!(lines[1], "docker stop gitwp-demo");
    assert!(lines[2].starts_with("docker run"));
}

#[test]
fn test_second_collision_is_container_start_error() {
    let td = tempfile::tempdir().expect("tmpdir");
    let settings = quiet_settings(td.path());
    let runner = RecordingRunner::new();
    runner.on(
        "--name gitwp-demo",
        vec![reply(125, "in use"), reply(125, "in use"), reply(125, "in use")],
    );

    let err = ensure_running(&runner, &settings, Path::new("/work/demo"), "gitwp-demo", "demo")
        .expect_err("race");
    assert!(matches!(err, GitwpError::ContainerStart { code: 125, .. }), "{err}");
    assert_eq!(runner.count_prefix("docker stop"), 1);
    assert_eq!(runner.count_prefix("docker run"), 2);
}

#[test]
fn test_failed_stop_still_retries() {
    let td = tempfile::tempdir().expect("tmpdir");
    let settings = quiet_settings(td.path());
    let runner = RecordingRunner::new();
    runner
        .on("--name gitwp-demo", vec![reply(125, "in use")])
        .on("docker stop", vec![reply(1, "No such container")]);

    ensure_running(&runner, &settings, Path::new("/work/demo"), "gitwp-demo", "demo")
        .expect("retry succeeds");
    assert_eq!(runner.count_prefix("docker run"), 2);
}

#[test]
fn test_other_failure_is_not_retried() {
    let td = tempfile::tempdir().expect("tmpdir");
    let settings = quiet_settings(td.path());
    let runner = RecordingRunner::new();
    runner.on("--name gitwp-demo", vec![reply(1, "Unable to find image 'gitwp:latest' locally")]);

    let err = ensure_running(&runner, &settings, Path::new("/work/demo"), "gitwp-demo", "demo")
        .expect_err("fatal");
    assert!(err.to_string().contains("Unable to find image"), "{err}");
    assert_eq!(runner.calls().len(), 1);
}
