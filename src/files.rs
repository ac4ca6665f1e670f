//! Python file discovery for the `check` command.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use pycomments_core::error::PyCommentsError;
use thiserror::Error;
use walkdir::WalkDir;

/// Error type for file operations.
#[derive(Debug, Error)]
pub enum FileError {
    /// File not found.
    #[error("file not found: {path}")]
    NotFound { path: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for file operations.
pub type FileResult<T> = Result<T, FileError>;

impl From<FileError> for PyCommentsError {
    fn from(err: FileError) -> Self {
        match err {
            FileError::NotFound { path } => PyCommentsError::FileNotFound { path },
            FileError::Io(err) => PyCommentsError::internal(err.to_string()),
        }
    }
}

/// Expand `paths` into Python files.
///
/// Files are taken as given, whatever their extension. Directories are
/// walked for `*.py`, skipping hidden directories and the usual build and
/// environment directories. Results are sorted and deduplicated.
pub fn collect_python_files(paths: &[PathBuf]) -> FileResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            collect_from_dir(path, &mut files)?;
        } else {
            return Err(FileError::NotFound {
                path: path.display().to_string(),
            });
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn collect_from_dir(root: &Path, files: &mut Vec<PathBuf>) -> FileResult<()> {
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_excluded(entry.file_name()));
    for entry in walker {
        let entry = entry.map_err(|err| FileError::Io(io::Error::other(err.to_string())))?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "py") {
            files.push(path.to_path_buf());
        }
    }
    Ok(())
}

fn is_excluded(name: &std::ffi::OsStr) -> bool {
    let name = name.to_string_lossy();
    name.starts_with('.')
        || matches!(
            name.as_ref(),
            "__pycache__" | "node_modules" | "venv" | "target"
        )
}

/// Read a source file as raw bytes.
pub fn read_source(path: &Path) -> FileResult<Vec<u8>> {
    fs::read(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => FileError::NotFound {
            path: path.display().to_string(),
        },
        _ => FileError::Io(err),
    })
}
