//! File access for the template compiler.
//!
//! Everything the compiler and the freshness check need from the file system
//! goes through [`Vfs`], so tests can swap the disk for an in-memory tree with
//! hand-picked modification times.

use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Read/stat capability consumed by the compiler.
pub trait Vfs: Send + Sync {
    /// Read a file as UTF-8 text.
    fn read(&self, path: &Path) -> io::Result<String>;

    /// Last modification time of a file.
    fn mtime(&self, path: &Path) -> io::Result<SystemTime>;
}

/// The real file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskFs;

impl Vfs for DiskFs {
    fn read(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn mtime(&self, path: &Path) -> io::Result<SystemTime> {
        path.metadata().and_then(|m| m.modified())
    }
}

#[cfg(test)]
pub use memory::MemoryFs;


#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_disk_read_and_mtime() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.html");
        fs::write(&path, "<html></html>").unwrap();

        assert_eq!(DiskFs.read(&path).unwrap(), "<html></html>");
        assert!(DiskFs.mtime(&path).is_ok());
    }

    #[test]
    fn test_disk_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.html");
        assert!(DiskFs.read(&path).is_err());
        assert!(DiskFs.mtime(&path).is_err());
    }

    #[test]
    fn test_memory_fs_roundtrip() {
        let fs = MemoryFs::new();
        fs.write("/site/index.html", "hi", 10);
        assert_eq!(fs.read(Path::new("/site/index.html")).unwrap(), "hi");
        fs.remove("/site/index.html");
        assert!(fs.mtime(Path::new("/site/index.html")).is_err());
    }
}
