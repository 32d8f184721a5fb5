use crate::config::{ErrorPolicy, FilterConfig};
use crate::errors::Result;
use crate::filters::is_hidden;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Collects every file under `root` that passes `filter`.
///
/// The walk is depth-first with the entries of each directory visited in file
/// name order, so the same tree always yields the same list. Symbolic links
/// are followed; a link pointing back at one of its ancestors is reported as a
/// loop error rather than walked again. Each file is listed once, even when
/// several links lead to it.
///
/// Unreadable entries are handed to `on_error`.
pub fn walk(root: &Path, filter: &FilterConfig, on_error: ErrorPolicy) -> Result<Vec<PathBuf>> {
    let root = std::path::absolute(root)?;
    let show_hidden = filter.show_hidden;

    let mut files = Vec::new();
    let mut seen = HashSet::new();

    let walker = WalkDir::new(&root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || show_hidden || !is_hidden(entry.file_name()));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                on_error.recover(err)?;
                continue;
            }
        };

        if !entry.file_type().is_file() || !filter.accepts(entry.path()) {
            continue;
        }

        let identity = fs::canonicalize(entry.path()).unwrap_or_else(|_| entry.path().to_path_buf());
        if seen.insert(identity) {
            files.push(entry.into_path());
        }
    }

    debug!("Found {} files under {}", files.len(), root.display());
    Ok(files)
}
