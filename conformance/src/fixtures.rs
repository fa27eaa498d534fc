//! Fixture discovery: every `.ttl` file below a directory, in path order.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// Setup problems that make a run meaningless.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// The fixture directory does not exist.
    #[error("fixture directory {0} does not exist")]
    MissingDirectory(PathBuf),
    /// The directory holds no Turtle documents.
    #[error("no .ttl fixtures below {0}")]
    Empty(PathBuf),
}

/// One Turtle document under test.
#[derive(Debug, Clone)]
pub struct Fixture {
    /// File stem, used as the result key.
    pub name: String,
    /// Full path.
    pub path: PathBuf,
    /// File contents.
    pub source: String,
}

/// Reads every `.ttl` file below `dir`.
///
/// # Errors
///
/// Returns [`FixtureError`] if `dir` is missing or empty, or an I/O error if
/// a fixture cannot be read.
pub fn discover(dir: &Path) -> Result<Vec<Fixture>> {
    if !dir.is_dir() {
        return Err(FixtureError::MissingDirectory(dir.to_path_buf()).into());
    }

    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && e.path().extension().is_some_and(|x| x == "ttl"))
        .map(|e| e.into_path())
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(FixtureError::Empty(dir.to_path_buf()).into());
    }

    paths
        .into_iter()
        .map(|path| {
            let source = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok(Fixture { name, path, source })
        })
        .collect()
}
