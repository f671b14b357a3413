//! Directory scanner that turns a folder of images into portfolio items.
//!
//! - Directory traversal using walkdir
//! - Image detection by file extension
//! - Stable name ordering so the carousel order is deterministic

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::models::{is_image_extension, PortfolioItem};

/// Configuration for the directory scanner.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Whether to descend into subdirectories.
    pub recursive: bool,
    /// Maximum directory depth when recursive (0 = unlimited).
    pub max_depth: usize,
    /// Whether to follow symbolic links.
    pub follow_symlinks: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            recursive: false,
            max_depth: 0,
            follow_symlinks: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("failed to read directory {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Collect the displayable images under `path`, sorted by file name.
///
/// Unreadable entries are skipped with a warning; only a missing or
/// unreadable root directory is an error.
pub fn scan_directory(path: &Path, config: &ScanConfig) -> Result<Vec<PortfolioItem>, ScanError> {
    if !path.is_dir() {
        return Err(ScanError::NotADirectory(path.to_path_buf()));
    }
    // Surface permission problems on the root up front; walkdir would only
    // report them as a skipped entry.
    std::fs::read_dir(path).map_err(|source| ScanError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let depth = if !config.recursive {
        1
    } else if config.max_depth == 0 {
        usize::MAX
    } else {
        config.max_depth
    };

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(path)
        .max_depth(depth)
        .follow_links(config.follow_symlinks)
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = ?err, "Skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let is_image = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(is_image_extension);
        if is_image {
            paths.push(entry.into_path());
        }
    }

    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()).then_with(|| a.cmp(b)));
    debug!(count = paths.len(), path = %path.display(), "Scan finished");

    Ok(paths.iter().map(|p| PortfolioItem::from_path(p)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};

    fn touch(path: &Path) {
        File::create(path).unwrap();
    }

    #[test]
    fn test_non_recursive_scan() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b.png"));
        touch(&dir.path().join("a.jpg"));
        touch(&dir.path().join("notes.txt"));
        fs::create_dir(dir.path().join("nested")).unwrap();
        touch(&dir.path().join("nested").join("c.jpg"));

        let items = scan_directory(dir.path(), &ScanConfig::default()).unwrap();
        let names: Vec<_> = items
            .iter()
            .map(|i| i.image_path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.png"]);
    }

    #[test]
    fn test_recursive_scan_includes_nested() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.jpg"));
        fs::create_dir(dir.path().join("nested")).unwrap();
        touch(&dir.path().join("nested").join("c.webp"));

        let config = ScanConfig {
            recursive: true,
            ..ScanConfig::default()
        };
        let items = scan_directory(dir.path(), &config).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_hidden_files_skipped() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join(".hidden.jpg"));
        touch(&dir.path().join("shown.jpg"));

        let items = scan_directory(dir.path(), &ScanConfig::default()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title.as_deref(), Some("Shown"));
    }

    #[test]
    fn test_missing_directory_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            scan_directory(&missing, &ScanConfig::default()),
            Err(ScanError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_items_carry_ids_and_captions() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("grand-canyon.jpg"));

        let items = scan_directory(dir.path(), &ScanConfig::default()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, items[0].image_path.to_string_lossy());
        assert_eq!(items[0].title.as_deref(), Some("Grand canyon"));
    }
}
