//! Confines untrusted request paths to the repository root.

use std::{
    io,
    path::{Component, Path, PathBuf},
};

use tracing::{error, info, warn};

use crate::error::{BrowseError, Result};

/// Lexically normalizes a request path into a `/`-separated root-relative
/// path.
///
/// `.` components are dropped and `..` pops the previous component. Absolute
/// inputs and `..` that would climb above the root are
/// [`BrowseError::ForbiddenPath`], decided before the filesystem is touched,
/// so escapes to missing paths are still reported as forbidden. Inputs with
/// NUL bytes name nothing on disk and are [`BrowseError::NotFound`].
pub fn normalize(relative: &str) -> Result<String> {
    if relative.contains('\0') {
        info!("Rejecting path with NUL byte: {:?}", relative);
        return Err(BrowseError::NotFound(relative.escape_default().to_string()));
    }

    let mut parts: Vec<&str> = Vec::new();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str().unwrap_or_default()),
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.pop().is_none() {
                    warn!("Path traversal attempt: '{}' escapes root", relative);
                    return Err(BrowseError::ForbiddenPath(relative.to_string()));
                }
            }
            Component::RootDir | Component::Prefix(_) => {
                warn!("Path traversal attempt: '{}' is absolute", relative);
                return Err(BrowseError::ForbiddenPath(relative.to_string()));
            }
        }
    }
    Ok(parts.join("/"))
}

/// Resolves `relative` against `root` and returns the canonical absolute path.
///
/// `root` must already be canonical. The input must pass [`normalize`]; the
/// join of the original input is then canonicalized, so `..` after a symlink
/// follows the filesystem. The result is `root` itself or a descendant of it,
/// compared component by component so `/data/repo-other` never passes for
/// `/data/repo`. Symlinks that lead outside the root are rejected with
/// [`BrowseError::ForbiddenPath`].
pub fn resolve(root: &Path, relative: &str) -> Result<PathBuf> {
    normalize(relative)?;
    let joined = root.join(relative);

    let canonical = match joined.canonicalize() {
        Ok(path) => path,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Path not found: {}", joined.display());
            return Err(BrowseError::NotFound(relative.to_string()));
        }
        Err(e) if e.kind() == io::ErrorKind::InvalidInput => {
            info!("Invalid path '{}': {}", joined.display(), e);
            return Err(BrowseError::NotFound(relative.to_string()));
        }
        Err(e) => {
            error!("Failed to canonicalize path '{}': {}", joined.display(), e);
            return Err(BrowseError::Io(e));
        }
    };

    if canonical.starts_with(root) {
        Ok(canonical)
    } else {
        warn!(
            "Path traversal attempt: '{}' resolved to '{}' which is outside root '{}'",
            relative,
            canonical.display(),
            root.display()
        );
        Err(BrowseError::ForbiddenPath(relative.to_string()))
    }
}

/// Forward-slash path of `path` relative to `root`, or `None` if `path` is
/// not under `root`.
pub fn relative_to(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}
