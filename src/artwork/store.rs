use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Where encoded cover images live, addressed by file name.
pub trait ArtworkStore: Send + Sync {
    fn path_for(&self, file_name: &str) -> PathBuf;

    fn exists(&self, file_name: &str) -> bool;

    fn read(&self, file_name: &str) -> io::Result<Vec<u8>>;

    /// Write (or overwrite) a file and return its path.
    fn write(&self, file_name: &str, bytes: &[u8]) -> io::Result<PathBuf>;
}

/// One image file per cache key inside a single directory.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ArtworkStore for DirectoryStore {
    fn path_for(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    fn exists(&self, file_name: &str) -> bool {
        self.path_for(file_name).is_file()
    }

    fn read(&self, file_name: &str) -> io::Result<Vec<u8>> {
        fs::read(self.path_for(file_name))
    }

    fn write(&self, file_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.root)?;
        let path = self.path_for(file_name);
        fs::write(&path, bytes)?;
        Ok(path)
    }
}
