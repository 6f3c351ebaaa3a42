//! Recursive tree construction on top of [`list_dir`].

use std::path::Path;

use tracing::warn;

use crate::{
    error::Result,
    listing::{list_dir, Entry},
    resolve::relative_to,
};

/// How far a tree is expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion<'a> {
    /// Recurse into every directory. Used for the main directory view.
    Full,
    /// Recurse only into directories on the way to (and including) the given
    /// root-relative path. Used for the sidebar.
    AlongPath(&'a str),
}

impl Expansion<'_> {
    fn should_expand(&self, dir_path: &str) -> bool {
        match self {
            Expansion::Full => true,
            Expansion::AlongPath(target) => is_ancestor_or_self(dir_path, target),
        }
    }
}

/// Component-wise check that `dir` is `target` or one of its ancestors.
///
/// `a` is an ancestor of `a/b` but not of `ab/c`.
pub fn is_ancestor_or_self(dir: &str, target: &str) -> bool {
    let mut target_parts = target.split('/').filter(|p| !p.is_empty() && *p != ".");
    dir.split('/')
        .filter(|p| !p.is_empty() && *p != ".")
        .all(|part| target_parts.next() == Some(part))
}

/// Builds the tree rooted at `dir` (which must lie under `root`).
///
/// The returned node is always expanded. Symlinked directories are listed
/// but never descended into. Only a failure to list `dir` itself is an
/// error; descendants that cannot be listed stay collapsed.
pub fn build_tree(root: &Path, dir: &Path, mode: Expansion<'_>) -> Result<Entry> {
    build_tree_with(root, dir, mode, &mut |d| list_dir(root, d))
}

fn build_tree_with<F>(root: &Path, dir: &Path, mode: Expansion<'_>, list: &mut F) -> Result<Entry>
where
    F: FnMut(&Path) -> Result<Vec<Entry>>,
{
    let path = relative_to(root, dir).unwrap_or_default();
    let name = if path.is_empty() {
        "root".to_string()
    } else {
        dir.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.clone())
    };

    let mut node = Entry {
        name,
        path,
        is_dir: true,
        is_symlink: false,
        size: 0,
        modified: None,
        children: list(dir)?,
        expanded: true,
    };
    expand_children(root, &mut node.children, mode, list);
    Ok(node)
}

fn expand_children<F>(root: &Path, children: &mut [Entry], mode: Expansion<'_>, list: &mut F)
where
    F: FnMut(&Path) -> Result<Vec<Entry>>,
{
    for child in children.iter_mut() {
        if !child.is_dir || child.is_symlink || !mode.should_expand(&child.path) {
            continue;
        }
        let child_dir = root.join(&child.path);
        match list(&child_dir) {
            Ok(grandchildren) => {
                child.children = grandchildren;
                child.expanded = true;
                expand_children(root, &mut child.children, mode, list);
            }
            Err(e) => {
                warn!("Leaving '{}' collapsed: {}", child.path, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, io};
    use tempfile::{tempdir, TempDir};

    use crate::{error::BrowseError, listing::EntryRecord};

    /// a/b/c.txt, a/d/e.txt, ab/f.txt, z/g.txt, top.txt
    fn setup() -> io::Result<(TempDir, std::path::PathBuf)> {
        let temp = tempdir()?;
        let root = temp.path().canonicalize()?;
        fs::create_dir_all(root.join("a/b"))?;
        fs::create_dir_all(root.join("a/d"))?;
        fs::create_dir_all(root.join("ab"))?;
        fs::create_dir_all(root.join("z"))?;
        fs::write(root.join("a/b/c.txt"), "c")?;
        fs::write(root.join("a/d/e.txt"), "ee")?;
        fs::write(root.join("ab/f.txt"), "fff")?;
        fs::write(root.join("z/g.txt"), "gggg")?;
        fs::write(root.join("top.txt"), "top")?;
        Ok((temp, root))
    }

    fn child<'a>(node: &'a Entry, name: &str) -> &'a Entry {
        node.children
            .iter()
            .find(|c| c.name == name)
            .unwrap_or_else(|| panic!("missing child {name} in {}", node.path))
    }

    #[test]
    fn ancestor_check_respects_component_boundaries() {
        assert!(is_ancestor_or_self("a", "a/b/c.txt"));
        assert!(is_ancestor_or_self("a/b", "a/b/c.txt"));
        assert!(is_ancestor_or_self("a/b/c.txt", "a/b/c.txt"));
        assert!(is_ancestor_or_self("", "a"));
        assert!(!is_ancestor_or_self("ab", "a/b/c.txt"));
        assert!(!is_ancestor_or_self("a", "ab/f.txt"));
        assert!(!is_ancestor_or_self("a/b/c", "a/b"));
    }

    #[test]
    fn expands_only_along_target() -> io::Result<()> {
        let (_temp, root) = setup()?;
        let tree = build_tree(&root, &root, Expansion::AlongPath("a/b/c.txt")).unwrap();

        assert!(tree.expanded);
        assert_eq!(tree.path, "");

        let a = child(&tree, "a");
        assert!(a.expanded);
        let b = child(a, "b");
        assert!(b.expanded);
        assert_eq!(b.children.len(), 1);
        assert_eq!(b.children[0].path, "a/b/c.txt");

        let d = child(a, "d");
        assert!(!d.expanded);
        assert!(d.children.is_empty());

        for sibling in ["ab", "z"] {
            let node = child(&tree, sibling);
            assert!(!node.expanded, "{sibling} should stay collapsed");
            assert!(node.children.is_empty());
        }
        Ok(())
    }

    #[test]
    fn empty_target_expands_nothing_below_root() -> io::Result<()> {
        let (_temp, root) = setup()?;
        let tree = build_tree(&root, &root, Expansion::AlongPath("")).unwrap();
        assert!(tree.expanded);
        assert!(tree
            .children
            .iter()
            .filter(|c| c.is_dir)
            .all(|c| !c.expanded && c.children.is_empty()));
        Ok(())
    }

    #[test]
    fn full_expansion_reaches_every_directory() -> io::Result<()> {
        let (_temp, root) = setup()?;
        let tree = build_tree(&root, &root.join("a"), Expansion::Full).unwrap();

        assert_eq!(tree.name, "a");
        assert_eq!(tree.path, "a");
        let names: Vec<&str> = tree.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["b", "d"]);
        assert!(tree.children.iter().all(|c| c.expanded));
        assert_eq!(child(&tree, "d").children[0].size, 2);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn does_not_descend_into_symlinked_directories() -> io::Result<()> {
        let (_temp, root) = setup()?;
        std::os::unix::fs::symlink(&root, root.join("a").join("loop"))?;

        let tree = build_tree(&root, &root, Expansion::Full).unwrap();
        let link = child(child(&tree, "a"), "loop");
        assert!(link.is_dir);
        assert!(!link.expanded);
        assert!(link.children.is_empty());
        Ok(())
    }

    #[test]
    fn unreadable_subdirectory_stays_collapsed() -> io::Result<()> {
        let (_temp, root) = setup()?;
        let locked = root.join("a").join("d");
        let mut list = |d: &Path| {
            if d == locked.as_path() {
                Err(BrowseError::Io(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "permission denied",
                )))
            } else {
                list_dir(&root, d)
            }
        };

        let tree = build_tree_with(&root, &root, Expansion::Full, &mut list).unwrap();
        let a = child(&tree, "a");
        assert!(a.expanded);
        let d = child(a, "d");
        assert!(!d.expanded);
        assert!(d.children.is_empty());
        assert!(child(a, "b").expanded);
        assert!(child(&tree, "z").expanded);
        Ok(())
    }

    #[test]
    fn directory_removed_mid_build_stays_collapsed() -> io::Result<()> {
        let (_temp, root) = setup()?;
        let mut list = |d: &Path| {
            let entries = list_dir(&root, d);
            if d == root.as_path() {
                fs::remove_dir_all(root.join("z"))?;
            }
            entries
        };

        let tree = build_tree_with(&root, &root, Expansion::Full, &mut list).unwrap();
        let z = child(&tree, "z");
        assert!(!z.expanded);
        assert!(z.children.is_empty());
        assert!(child(&tree, "a").expanded);
        Ok(())
    }

    #[test]
    fn sidebar_agrees_with_one_level_listing() -> io::Result<()> {
        let (_temp, root) = setup()?;
        let tree = build_tree(&root, &root, Expansion::AlongPath("a/b/c.txt")).unwrap();

        let levels = [("", &tree), ("a", child(&tree, "a")), ("a/b", child(child(&tree, "a"), "b"))];
        for (rel, node) in levels {
            let listed: Vec<EntryRecord> = list_dir(&root, &root.join(rel))
                .unwrap()
                .iter()
                .map(EntryRecord::from)
                .collect();
            let from_tree: Vec<EntryRecord> = node.children.iter().map(EntryRecord::from).collect();
            assert_eq!(listed, from_tree, "mismatch at '{rel}'");
        }
        Ok(())
    }
}
