//! Process-wide settings: fixed names, images, credentials and host paths.
//!
//! Defaults are constants; `Settings::from_env` applies `GITWP_*` overrides once at startup.
//! Nothing mutates a `Settings` value after construction.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_NETWORK: &str = "gitwp";
pub const DEFAULT_APP_IMAGE: &str = "gitwp";
pub const DEFAULT_PROXY_IMAGE: &str = "gitwp-proxy";
pub const DEFAULT_MYSQL_IMAGE: &str = "mysql:5.7";
pub const MYSQL_PLATFORM: &str = "linux/x86_64";
pub const DEFAULT_RESOLVER_FILE: &str = "/etc/resolver/gitwp";
pub const DEFAULT_DB_WAIT_SECS: u64 = 30;

/// Top-level suffix routed to the proxy's DNS server.
pub const DEV_TLD: &str = "dev.gitwp";
/// Port the proxy's DNS server listens on (published on the host).
pub const DNS_PORT: u16 = 54;

pub const DB_USER: &str = "root";
pub const DB_PASSWORD: &str = "pass";
pub const DB_DEFAULT_NAME: &str = "wordpress";

/// Where the project tree is mounted inside the app container.
pub const CONTAINER_REPO_DIR: &str = "/repo_dev";
/// WordPress install path inside the app container.
pub const CONTAINER_SITE_DIR: &str = "/site";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub network: String,
    pub app_image: String,
    pub proxy_image: String,
    pub mysql_image: String,
    /// Directory holding the `docker/` and `proxy/` image build contexts.
    pub assets_dir: PathBuf,
    pub resolver_file: PathBuf,
    pub db_wait: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        let assets_dir = home::home_dir()
            .map(|h| h.join(".gitwp"))
            .unwrap_or_else(|| PathBuf::from(".gitwp"));
        Self {
            network: DEFAULT_NETWORK.to_string(),
            app_image: DEFAULT_APP_IMAGE.to_string(),
            proxy_image: DEFAULT_PROXY_IMAGE.to_string(),
            mysql_image: DEFAULT_MYSQL_IMAGE.to_string(),
            assets_dir,
            resolver_file: PathBuf::from(DEFAULT_RESOLVER_FILE),
            db_wait: Duration::from_secs(DEFAULT_DB_WAIT_SECS),
        }
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Settings {
    pub fn from_env() -> Self {
        let mut s = Self::default();
        if let Some(v) = env_nonempty("GITWP_NETWORK") {
            s.network = v;
        }
        if let Some(v) = env_nonempty("GITWP_APP_IMAGE") {
            s.app_image = v;
        }
        if let Some(v) = env_nonempty("GITWP_PROXY_IMAGE") {
            s.proxy_image = v;
        }
        if let Some(v) = env_nonempty("GITWP_MYSQL_IMAGE") {
            s.mysql_image = v;
        }
        if let Some(v) = env_nonempty("GITWP_ASSETS_DIR") {
            s.assets_dir = PathBuf::from(v);
        }
        if let Some(v) = env_nonempty("GITWP_RESOLVER_FILE") {
            s.resolver_file = PathBuf::from(v);
        }
        if let Some(secs) = env_nonempty("GITWP_DB_WAIT_SECS").and_then(|v| v.parse::<u64>().ok()) {
            s.db_wait = Duration::from_secs(secs);
        }
        s
    }

    pub fn mysql_container(&self) -> String {
        format!("{}-mysql", self.network)
    }

    pub fn proxy_container(&self) -> String {
        format!("{}-proxy", self.network)
    }

    pub fn app_build_context(&self) -> PathBuf {
        self.assets_dir.join("docker")
    }

    pub fn proxy_build_context(&self) -> PathBuf {
        self.assets_dir.join("proxy")
    }
}
