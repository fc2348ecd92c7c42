use std::fs;
use std::io;
use std::path::Path;

/// Abstraction over the file reads the crate performs, so configuration loading
/// and browser profile lookup can run against a mock in tests.
#[cfg_attr(test, mockall::automock)]
pub trait FileSystem {
    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Read the entire contents of a file into a string
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// Real file system implementation that delegates to std::fs
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_real_filesystem_reads_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{}").unwrap();

        let fs = RealFileSystem;
        assert!(fs.exists(&path));
        assert_eq!(fs.read_to_string(&path).unwrap(), "{}");
        assert!(!fs.exists(&dir.path().join("missing.json")));
        assert!(fs.read_to_string(&dir.path().join("missing.json")).is_err());
    }
}
