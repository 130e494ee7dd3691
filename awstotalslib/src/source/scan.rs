//! Recursive discovery of AWStats data files.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

/// Check if a directory entry should be skipped during traversal.
fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// List every regular file below `root`.
///
/// Entries (files or directories) whose name starts with `.` are skipped
/// together with everything beneath them. Siblings are visited in
/// file-name order so repeated calls return the same sequence.
///
/// A missing or unreadable root yields an empty list. Unreadable
/// subdirectories are skipped and the walk continues elsewhere.
pub fn list_files(root: impl AsRef<Path>) -> Vec<PathBuf> {
    let root = root.as_ref();

    let root = match root.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            debug!(path = %root.display(), error = %e, "data directory not readable");
            return Vec::new();
        }
    };

    if !root.is_dir() {
        return Vec::new();
    }

    let walker = WalkDir::new(&root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter();

    let mut files = Vec::new();

    for entry in walker.filter_entry(|e| {
        // Always include the root directory
        if e.depth() == 0 {
            return true;
        }
        let name = e.file_name().to_str().unwrap_or("");
        !is_hidden(name)
    }) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                debug!(error = %e, "skipping unreadable entry");
                continue;
            }
        };

        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    files
}

/// Find the first file below `root` whose file name is exactly `name`.
pub fn find_file(root: impl AsRef<Path>, name: &str) -> Option<PathBuf> {
    list_files(root)
        .into_iter()
        .find(|p| p.file_name().and_then(|n| n.to_str()) == Some(name))
}
