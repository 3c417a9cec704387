/*!
Test support helpers shared across integration tests.

- RecordingRunner: a CommandRunner fake that records every argv and replays scripted results
- quiet_settings(dir): Settings pointing at a temp assets dir and an existing resolver file,
  with the database wait disabled
- project_dir(root, name): create a project directory, optionally with a gitwp.yml
*/

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use gitwp::{CommandOutput, CommandRunner, Settings};

pub const DEMO_CONFIG: &str = "domain: example.com\nhost:\n  type: ssh\n  hostname: h\n  username: u\n  repo_path: /r\n  site_path: /s\n  wpcli: /usr/local/bin/wp\n";

/// Which trait method a recorded call went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum Via {
    Output,
    Status,
}

#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct Call {
    pub via: Via,
    pub argv: Vec<String>,
}

impl Call {
    #[allow(dead_code)]
    pub fn line(&self) -> String {
        self.argv.join(" ")
    }
}

struct Rule {
    needle: String,
    replies: Vec<CommandOutput>,
}

/// Records calls; replies come from the first rule whose needle is a substring of the
/// space-joined argv and which still has queued replies. Anything else succeeds.
#[derive(Default)]
pub struct RecordingRunner {
    calls: RefCell<Vec<Call>>,
    rules: RefCell<Vec<Rule>>,
}

#[allow(dead_code)]
pub fn reply(code: i32, stderr: &str) -> CommandOutput {
    CommandOutput {
        code,
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}

#[allow(dead_code)]
impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue replies for calls whose joined argv contains `needle`, consumed in order.
    pub fn on(&self, needle: &str, replies: Vec<CommandOutput>) -> &Self {
        self.rules.borrow_mut().push(Rule {
            needle: needle.to_string(),
            replies: replies.into_iter().rev().collect(),
        });
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(Call::line).collect()
    }

    /// Number of recorded calls whose joined argv starts with `prefix`.
    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.lines().iter().filter(|l| l.starts_with(prefix)).count()
    }

    fn answer(&self, via: Via, argv: &[String]) -> CommandOutput {
        let line = argv.join(" ");
        self.calls.borrow_mut().push(Call {
            via,
            argv: argv.to_vec(),
        });
        let mut rules = self.rules.borrow_mut();
        for rule in rules.iter_mut() {
            if line.contains(&rule.needle) {
                if let Some(r) = rule.replies.pop() {
                    return r;
                }
            }
        }
        CommandOutput::ok()
    }
}

impl CommandRunner for RecordingRunner {
    fn output(&self, argv: &[String], _timeout: Option<Duration>) -> gitwp::Result<CommandOutput> {
        Ok(self.answer(Via::Output, argv))
    }

    fn status(&self, argv: &[String]) -> gitwp::Result<i32> {
        Ok(self.answer(Via::Status, argv).code)
    }
}

/// Settings that never touch `/etc` or sleep: the resolver file already exists and the
/// build contexts are present under `dir`.
#[allow(dead_code)]
pub fn quiet_settings(dir: &Path) -> Settings {
    let assets = dir.join("assets");
    fs::create_dir_all(assets.join("docker")).expect("docker ctx");
    fs::create_dir_all(assets.join("proxy")).expect("proxy ctx");
    let resolver = dir.join("resolver").join("gitwp");
    fs::create_dir_all(resolver.parent().expect("parent")).expect("resolver dir");
    fs::write(&resolver, "nameserver 127.0.0.1\nport 54\n").expect("resolver");
    Settings {
        assets_dir: assets,
        resolver_file: resolver,
        db_wait: Duration::ZERO,
        ..Settings::default()
    }
}

#[allow(dead_code)]
pub fn project_dir(root: &Path, name: &str, config: Option<&str>) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).expect("project dir");
    if let Some(c) = config {
        fs::write(dir.join("gitwp.yml"), c).expect("write gitwp.yml");
    }
    dir
}
