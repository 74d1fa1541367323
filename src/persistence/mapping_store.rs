//! Storage for the last imported mapping.
//!
//! The store is a single key in the config directory holding the canonical
//! JSON of the import, so the mapping survives a restart.

use std::io;
use std::path::PathBuf;
use tracing::debug;

/// Storage key of the imported mapping
pub const MAPPING_KEY: &str = "gamepad-mapping";

#[derive(Clone, Debug)]
pub struct MappingStore {
    dir: PathBuf,
}

impl MappingStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", MAPPING_KEY))
    }

    /// Stored bytes, `None` if nothing was imported yet
    pub async fn load(&self) -> io::Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.path()).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn save(&self, bytes: &[u8]) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path();
        tokio::fs::write(&path, bytes).await?;
        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }

    pub async fn clear(&self) -> io::Result<()> {
        match tokio::fs::remove_file(self.path()).await {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}
