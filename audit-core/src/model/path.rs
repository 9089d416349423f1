//! src/model/path.rs
//! ============================================================================
//! # Path helpers for `/`-delimited record paths
//!
//! Record paths are opaque strings, never filesystem paths. A path's segments
//! before the last `/` form its folder; the last segment is its display name.

pub const SEPARATOR: char = '/';

/// Last segment of a path (the whole path when it has no separator).
#[must_use]
pub fn base_name(path: &str) -> &str {
    path.rsplit_once(SEPARATOR).map_or(path, |(_, name)| name)
}

/// Immediate parent folder, or `None` for root-level paths.
#[must_use]
pub fn parent_folder(path: &str) -> Option<&str> {
    path.rsplit_once(SEPARATOR).map(|(parent, _)| parent)
}

/// First segment of a path that lives inside at least one folder.
#[must_use]
pub fn top_level_folder(path: &str) -> Option<&str> {
    path.split_once(SEPARATOR).map(|(head, _)| head)
}

/// Every folder prefix of `path`, shallowest first.
///
/// `"a/b/c.txt"` yields `"a"`, `"a/b"`; a root-level path yields nothing.
pub fn ancestor_folders(path: &str) -> impl Iterator<Item = &str> {
    path.match_indices(SEPARATOR).map(move |(idx, _)| &path[..idx])
}

/// True when `path` lies anywhere below `folder` (strict prefix `folder/`).
#[must_use]
pub fn is_descendant_of(path: &str, folder: &str) -> bool {
    path.len() > folder.len()
        && path.starts_with(folder)
        && path[folder.len()..].starts_with(SEPARATOR)
}

/// True when `path` is a direct child of `folder` (no further `/` after it).
#[must_use]
pub fn is_direct_child_of(path: &str, folder: &str) -> bool {
    is_descendant_of(path, folder) && !path[folder.len() + 1..].contains(SEPARATOR)
}

/// Join a folder and a name, treating an empty folder as the root.
#[must_use]
pub fn join(folder: &str, name: &str) -> String {
    if folder.is_empty() {
        name.to_string()
    } else {
        format!("{folder}{SEPARATOR}{name}")
    }
}

/// Replace the leading `old_prefix` of `path` with `new_prefix`.
///
/// Matches when `path == old_prefix` or `path` starts with `old_prefix/`;
/// the remainder is preserved verbatim. Returns `None` when it doesn't match.
#[must_use]
pub fn rewrite_prefix(path: &str, old_prefix: &str, new_prefix: &str) -> Option<String> {
    if path == old_prefix {
        Some(new_prefix.to_string())
    } else if is_descendant_of(path, old_prefix) {
        Some(format!("{new_prefix}{}", &path[old_prefix.len()..]))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_name_and_parent() {
        assert_eq!(base_name("src/lib/b.js"), "b.js");
        assert_eq!(base_name("README.md"), "README.md");
        assert_eq!(parent_folder("src/lib/b.js"), Some("src/lib"));
        assert_eq!(parent_folder("README.md"), None);
        assert_eq!(top_level_folder("src/lib/b.js"), Some("src"));
    }

    #[test]
    fn test_ancestor_folders_shallowest_first() {
        let ancestors: Vec<&str> = ancestor_folders("a/b/c/d.txt").collect();
        assert_eq!(ancestors, vec!["a", "a/b", "a/b/c"]);
        assert_eq!(ancestor_folders("d.txt").count(), 0);
    }

    #[test]
    fn test_descendant_requires_separator_boundary() {
        assert!(is_descendant_of("src/a.js", "src"));
        assert!(!is_descendant_of("srcx/a.js", "src"));
        assert!(!is_descendant_of("src", "src"));
        assert!(is_direct_child_of("a/x.txt", "a"));
        assert!(!is_direct_child_of("a/b/y.txt", "a"));
    }

    #[test]
    fn test_rewrite_prefix_exact_and_nested() {
        assert_eq!(rewrite_prefix("src", "src", "dst/src"), Some("dst/src".into()));
        assert_eq!(
            rewrite_prefix("src/lib/b.js", "src", "dst/src"),
            Some("dst/src/lib/b.js".into())
        );
        assert_eq!(rewrite_prefix("srcx/a.js", "src", "dst/src"), None);
    }
}
