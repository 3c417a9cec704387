//! Per-project descriptor (`gitwp.yml`) loading.
//!
//! The `host` section is kept loosely typed here; `HostDescriptor::from_config`
//! decides per `type` which keys are required, so an unknown type is reported
//! as such rather than as a missing-field parse error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::{GitwpError, Result};

pub const CONFIG_FILE_NAME: &str = "gitwp.yml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectConfig {
    /// Production hostname, rewritten to the dev domain after a sync.
    pub domain: String,
    pub host: HostConfig,
    /// Path the config was read from (not part of the YAML document).
    #[serde(skip)]
    pub source: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HostConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub hostname: Option<String>,
    pub username: Option<String>,
    pub repo_path: Option<String>,
    pub site_path: Option<String>,
    pub wpcli: Option<String>,
}

pub fn config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_FILE_NAME)
}

/// Load `gitwp.yml` from the project root; absence is `MissingConfig`.
pub fn load_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = config_path(project_root);
    let content = match fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(GitwpError::MissingConfig { path });
        }
        Err(e) => return Err(GitwpError::Io(e)),
    };
    parse_config(&content, &path)
}

pub fn parse_config(content: &str, path: &Path) -> Result<ProjectConfig> {
    let mut cfg: ProjectConfig =
        serde_yaml::from_str(content).map_err(|e| GitwpError::InvalidConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    if cfg.domain.trim().is_empty() {
        return Err(GitwpError::InvalidConfig {
            path: path.to_path_buf(),
            message: "domain must not be empty".to_string(),
        });
    }
    cfg.source = path.to_path_buf();
    Ok(cfg)
}
