//! Read capability used by the passes that consult companion files.
//!
//! Include expansion and component-data loading only need to check, read and
//! list files; abstracting that keeps both passes testable without a disk.

use std::io;
use std::path::Path;

/// Filesystem reads needed by the transformation passes.
pub trait FileSource: Send + Sync {
    /// Whether a regular file exists at `path`.
    fn is_file(&self, path: &Path) -> bool;
    /// Read a whole file as UTF-8.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
    /// File names (not paths) directly inside `dir`, sorted.
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<String>>;
}

/// [`FileSource`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

impl FileSource for FsSource {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn list_dir(&self, dir: &Path) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use std::collections::BTreeMap;
    use std::io;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use super::FileSource;

    /// In-memory file tree that also records every read.
    #[derive(Default)]
    pub(crate) struct MemorySource {
        files: BTreeMap<PathBuf, String>,
        reads: Mutex<Vec<PathBuf>>,
    }

    impl MemorySource {
        pub(crate) fn with(mut self, path: &str, content: &str) -> Self {
            self.files.insert(PathBuf::from(path), content.to_string());
            self
        }

        pub(crate) fn reads(&self) -> Vec<PathBuf> {
            self.reads.lock().expect("reads lock").clone()
        }
    }

    impl FileSource for MemorySource {
        fn is_file(&self, path: &Path) -> bool {
            self.files.contains_key(path)
        }

        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            self.reads.lock().expect("reads lock").push(path.to_path_buf());
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
        }

        fn list_dir(&self, dir: &Path) -> io::Result<Vec<String>> {
            let names: Vec<String> = self
                .files
                .keys()
                .filter(|p| p.parent() == Some(dir))
                .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
                .collect();
            if names.is_empty() {
                return Err(io::Error::new(io::ErrorKind::NotFound, "no such directory"));
            }
            Ok(names)
        }
    }
}
