//! Project identity derived from the working directory, plus its `.bolt/` state directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::settings::DEV_TLD;

pub const STATE_DIR_NAME: &str = ".bolt";
pub const DUMP_DIR_NAME: &str = "dump";
pub const CONTAINER_PREFIX: &str = "gitwp";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    root: PathBuf,
    name: String,
}

impl Project {
    /// Build a project from a directory; relative paths are made absolute against the cwd.
    pub fn from_dir(dir: &Path) -> io::Result<Self> {
        let root = if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            std::env::current_dir()?.join(dir)
        };
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("cannot derive a project name from {}", root.display()),
                )
            })?;
        Ok(Self { root, name })
    }

    pub fn from_cwd() -> io::Result<Self> {
        Self::from_dir(&std::env::current_dir()?)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lowercased directory name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn container_name(&self) -> String {
        format!("{CONTAINER_PREFIX}-{}", self.name)
    }

    pub fn db_name(&self) -> &str {
        &self.name
    }

    pub fn dev_domain(&self) -> String {
        format!("{}.{DEV_TLD}", self.name)
    }

    pub fn dev_url(&self) -> String {
        format!("http://{}", self.dev_domain())
    }

    pub fn state_dir(&self) -> PathBuf {
        self.root.join(STATE_DIR_NAME)
    }

    /// Dedicated mirror target for synced dumps (rsync --delete runs against it).
    pub fn dump_dir(&self) -> PathBuf {
        self.state_dir().join(DUMP_DIR_NAME)
    }

    /// Create `.bolt/` with an ignore-all `.gitignore`, and `.bolt/dump/`. Idempotent.
    pub fn ensure_state_dir(&self) -> io::Result<PathBuf> {
        let dir = self.state_dir();
        fs::create_dir_all(&dir)?;
        let gitignore = dir.join(".gitignore");
        if !gitignore.exists() {
            fs::write(&gitignore, "*\n")?;
        }
        fs::create_dir_all(self.dump_dir())?;
        Ok(dir)
    }
}
