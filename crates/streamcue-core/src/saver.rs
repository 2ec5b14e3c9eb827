//! Output directory resolution and artifact writes

use crate::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolves and owns the writable output directory. Modules receive a shared
/// handle and persist their derived artifacts through it.
pub struct Saver {
    dir: PathBuf,
}

impl Saver {
    pub fn new(base: &Path) -> Result<Self> {
        let dir = base.join("output");
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// A named subdirectory of the save root, created on first use.
    pub fn sub_dir(&self, name: &str) -> Result<PathBuf> {
        let dir = self.dir.join(name);
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Write an artifact into the save directory, replacing any previous one.
    pub fn save(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.dir.join(name);
        std::fs::write(&path, contents)?;
        debug!(file = %path.display(), bytes = contents.len(), "artifact written");
        Ok(path)
    }
}
