//! One-level directory listing with a stable, visible ordering.

use std::{
    cmp::Ordering,
    fs,
    path::Path,
    time::SystemTime,
};

use serde::Serialize;
use tracing::{debug, error, warn};

use crate::{
    error::{BrowseError, Result},
    resolve::relative_to,
};

/// Names never shown in a listing.
pub const SKIP_NAMES: &[&str] = &[".git"];

/// One file or directory in a listing or tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    /// Relative to the repository root, `/`-separated. Empty for the root.
    pub path: String,
    pub is_dir: bool,
    /// The entry itself is a symbolic link.
    pub is_symlink: bool,
    /// Bytes; 0 for directories and when metadata could not be read.
    pub size: u64,
    pub modified: Option<SystemTime>,
    pub children: Vec<Entry>,
    /// Whether `children` was populated for this request.
    pub expanded: bool,
}

impl Entry {
    /// Name as shown in views: directories get a trailing `/`.
    pub fn display_name(&self) -> String {
        if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// Wire shape of an entry for the lazy listing API.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EntryRecord {
    pub name: String,
    pub path: String,
    pub is_directory: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl From<&Entry> for EntryRecord {
    fn from(entry: &Entry) -> Self {
        Self {
            name: entry.name.clone(),
            path: entry.path.clone(),
            is_directory: entry.is_dir,
            size: (!entry.is_dir).then_some(entry.size),
        }
    }
}

/// Directories first, then case-insensitive by name, then exact name.
pub fn entry_order(a: &Entry, b: &Entry) -> Ordering {
    b.is_dir
        .cmp(&a.is_dir)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

/// True when the symlink at `link` resolves to a path under `root`.
/// Dangling links count as outside.
fn link_stays_inside(root: &Path, link: &Path) -> bool {
    link.canonicalize()
        .map(|target| target.starts_with(root))
        .unwrap_or(false)
}

/// Lists the immediate children of `dir`, which must lie under `root`.
///
/// Children come back unexpanded. A child whose metadata cannot be read is
/// kept with size 0; a child with a non-UTF-8 name is skipped.
pub fn list_dir(root: &Path, dir: &Path) -> Result<Vec<Entry>> {
    if !dir.is_dir() {
        return Err(BrowseError::NotADirectory(
            relative_to(root, dir).unwrap_or_else(|| dir.display().to_string()),
        ));
    }

    let reader = fs::read_dir(dir).map_err(|e| {
        error!("Failed to read directory {}: {}", dir.display(), e);
        BrowseError::Io(e)
    })?;

    let mut entries = Vec::new();
    for dir_entry in reader {
        let dir_entry = match dir_entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };

        let name = match dir_entry.file_name().into_string() {
            Ok(n) => n,
            Err(_) => {
                warn!("Skipping entry with non-UTF8 filename in {}", dir.display());
                continue;
            }
        };
        if SKIP_NAMES.contains(&name.as_str()) {
            continue;
        }

        let entry_path = dir_entry.path();
        let Some(path) = relative_to(root, &entry_path) else {
            continue;
        };

        let is_symlink = dir_entry
            .file_type()
            .map(|t| t.is_symlink())
            .unwrap_or(false);

        // Links are followed only when their target stays under the root, so
        // nothing about files outside it is reported.
        let (is_dir, size, modified) = if !is_symlink || link_stays_inside(root, &entry_path) {
            match fs::metadata(&entry_path) {
                Ok(metadata) => {
                    let is_dir = metadata.is_dir();
                    let size = if is_dir { 0 } else { metadata.len() };
                    (is_dir, size, metadata.modified().ok())
                }
                Err(e) => {
                    warn!("Failed to get metadata for {}: {}", entry_path.display(), e);
                    let is_dir = dir_entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                    (is_dir, 0, None)
                }
            }
        } else {
            debug!("Not following symlink {} out of root", entry_path.display());
            let modified = fs::symlink_metadata(&entry_path)
                .and_then(|m| m.modified())
                .ok();
            (false, 0, modified)
        };

        entries.push(Entry {
            name,
            path,
            is_dir,
            is_symlink,
            size,
            modified,
            children: Vec::new(),
            expanded: false,
        });
    }

    entries.sort_by(entry_order);
    Ok(entries)
}
