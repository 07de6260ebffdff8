//! Persistence of uploaded files below the media root.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Destination for uploaded image bytes.
pub trait ImageStorage {
    /// Write `bytes` to the relative storage `path`.
    fn save(&self, path: &str, bytes: &[u8]) -> io::Result<()>;
    /// Delete a previously saved file.
    fn remove(&self, path: &str) -> io::Result<()>;
}

/// Stores files on the local filesystem under a root directory.
#[derive(Clone, Debug)]
pub struct MediaStorage {
    root: PathBuf,
}

impl MediaStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a relative storage path, refusing anything that would escape the root.
    fn resolve(&self, path: &str) -> io::Result<PathBuf> {
        let relative = Path::new(path);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("refusing to store outside media root: {path}"),
            ));
        }
        Ok(self.root.join(relative))
    }
}

impl ImageStorage for MediaStorage {
    fn save(&self, path: &str, bytes: &[u8]) -> io::Result<()> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, bytes)?;
        log::info!("Stored upload at {}", target.display());
        Ok(())
    }

    fn remove(&self, path: &str) -> io::Result<()> {
        let target = self.resolve(path)?;
        fs::remove_file(&target)?;
        log::info!("Removed upload at {}", target.display());
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_below_root() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MediaStorage::new(dir.path());

        storage.save("uploads/product/abc.png", b"data").unwrap();

        let written = fs::read(dir.path().join("uploads/product/abc.png")).unwrap();
        assert_eq!(written, b"data");
    }

    #[test]
    fn refuses_paths_escaping_root() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MediaStorage::new(dir.path());

        assert!(storage.save("../evil.png", b"x").is_err());
        assert!(storage.save("/etc/passwd", b"x").is_err());
        assert!(storage.remove("../evil.png").is_err());
    }

    #[test]
    fn removes_saved_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MediaStorage::new(dir.path());

        storage.save("uploads/user/abc.png", b"data").unwrap();
        storage.remove("uploads/user/abc.png").unwrap();

        assert!(!dir.path().join("uploads/user/abc.png").exists());
        assert!(storage.remove("uploads/user/abc.png").is_err());
    }
}
