//! src/model/tree.rs
//! ============================================================================
//! # Path Tree: hierarchical projection of the flat record collection
//!
//! The tree is never stored. It is rebuilt from scratch from the records on
//! every structural change, so there is nothing to invalidate. Folder nodes
//! exist iff some record path has them as a prefix; folder identity is the
//! cumulative path, so `src` and `lib/src` are distinct nodes.
//!
//! Sibling order: folders before files, then by name (byte-wise, not
//! locale-aware), then by id so records sharing a path stay deterministic.

use ahash::AHashMap;
use compact_str::CompactString;
use std::{
    cmp::Ordering,
    collections::{BTreeMap, BTreeSet},
};

use crate::model::{path, record::FileRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKind {
    Folder,
    File,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s: &'_ str = match self {
            Self::Folder => "folder",
            Self::File => "file",
        };

        write!(f, "{s}")
    }
}

/// Derived tree node borrowing from the record collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode<'a> {
    /// Folder: full folder path. File: the record's id.
    pub id: String,

    pub kind: NodeKind,

    /// Last path segment.
    pub name: CompactString,

    /// Folders only; always empty for files.
    pub children: Vec<TreeNode<'a>>,

    /// Files only.
    pub record: Option<&'a FileRecord>,
}

impl<'a> TreeNode<'a> {
    fn folder(id: String, name: &str) -> Self {
        Self {
            id,
            kind: NodeKind::Folder,
            name: CompactString::from(name),
            children: Vec::new(),
            record: None,
        }
    }

    fn file(record: &'a FileRecord, name: &str) -> Self {
        Self {
            id: record.id.to_string(),
            kind: NodeKind::File,
            name: CompactString::from(name),
            children: Vec::new(),
            record: Some(record),
        }
    }

    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    /// Depth-first count of file leaves below (or at) this node.
    #[must_use]
    pub fn file_count(&self) -> usize {
        match self.kind {
            NodeKind::File => 1,
            NodeKind::Folder => self.children.iter().map(TreeNode::file_count).sum(),
        }
    }

    fn sort_recursive(&mut self) {
        sort_siblings(&mut self.children);
    }
}

fn sibling_order(a: &TreeNode<'_>, b: &TreeNode<'_>) -> Ordering {
    a.kind
        .cmp(&b.kind)
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}

fn sort_siblings(nodes: &mut [TreeNode<'_>]) {
    for node in nodes.iter_mut() {
        node.sort_recursive();
    }
    nodes.sort_by(sibling_order);
}

/// Built tree plus every folder path it contains.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileTree<'a> {
    pub roots: Vec<TreeNode<'a>>,
    pub folder_paths: BTreeSet<String>,
}

impl<'a> FileTree<'a> {
    /// Locate a folder node by its full path.
    #[must_use]
    pub fn find_folder(&self, folder: &str) -> Option<&TreeNode<'a>> {
        let mut level: &[TreeNode<'a>] = &self.roots;
        let mut found: Option<&TreeNode<'a>> = None;
        for segment in folder.split(path::SEPARATOR) {
            let node = level
                .iter()
                .find(|node| node.is_folder() && node.name.as_str() == segment)?;
            level = &node.children;
            found = Some(node);
        }
        found
    }

    /// Locate the leaf of a record by walking its path segments.
    #[must_use]
    pub fn find_file(&self, record: &FileRecord) -> Option<&TreeNode<'a>> {
        let level: &[TreeNode<'a>] = match path::parent_folder(&record.path) {
            Some(folder) => &self.find_folder(folder)?.children,
            None => &self.roots,
        };
        level
            .iter()
            .find(|node| node.kind == NodeKind::File && node.id == record.id.as_str())
    }

    /// Pre-order walk over rows a tree view would show: roots plus the
    /// children of every folder present in `expanded`.
    #[must_use]
    pub fn visible_rows(&self, expanded: &BTreeSet<String>) -> Vec<TreeRow<'_, 'a>> {
        let mut rows = Vec::new();
        collect_rows(&self.roots, 0, expanded, &mut rows);
        rows
    }
}

/// One line of a rendered tree.
#[derive(Debug, Clone, Copy)]
pub struct TreeRow<'t, 'a> {
    pub depth: usize,
    pub node: &'t TreeNode<'a>,
    pub expanded: bool,
}

fn collect_rows<'t, 'a>(
    nodes: &'t [TreeNode<'a>],
    depth: usize,
    expanded: &BTreeSet<String>,
    rows: &mut Vec<TreeRow<'t, 'a>>,
) {
    for node in nodes {
        let is_open = node.is_folder() && expanded.contains(&node.id);
        rows.push(TreeRow {
            depth,
            node,
            expanded: is_open,
        });
        if is_open {
            collect_rows(&node.children, depth + 1, expanded, rows);
        }
    }
}

/// Derive the folder/file tree from a flat record collection.
///
/// Every record becomes exactly one file leaf. A file and a folder with the
/// same name at the same level stay distinct siblings.
#[must_use]
pub fn build_tree(records: &[FileRecord]) -> FileTree<'_> {
    let mut tree = FileTree::default();

    for record in records {
        let mut level: &mut Vec<TreeNode<'_>> = &mut tree.roots;
        let (folders, name) = match record.path.rsplit_once(path::SEPARATOR) {
            Some((folders, name)) => (Some(folders), name),
            None => (None, record.path.as_str()),
        };

        if let Some(folders) = folders {
            let mut cumulative_end = 0;
            for (depth, segment) in folders.split(path::SEPARATOR).enumerate() {
                cumulative_end += if depth == 0 {
                    segment.len()
                } else {
                    segment.len() + 1
                };
                let folder_path = &folders[..cumulative_end];
                tree.folder_paths.insert(folder_path.to_string());

                let idx = match level
                    .iter()
                    .position(|node| node.is_folder() && node.name.as_str() == segment)
                {
                    Some(idx) => idx,
                    None => {
                        level.push(TreeNode::folder(folder_path.to_string(), segment));
                        level.len() - 1
                    }
                };
                level = &mut level[idx].children;
            }
        }

        level.push(TreeNode::file(record, name));
    }

    sort_siblings(&mut tree.roots);
    tree
}

/// Folder path -> "every descendant file is checked".
///
/// Only folders that contain at least one record appear; unknown folders
/// report incomplete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderCompletion {
    status: BTreeMap<String, bool>,
}

impl FolderCompletion {
    #[must_use]
    pub fn is_complete(&self, folder: &str) -> bool {
        self.status.get(folder).copied().unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.status.iter().map(|(folder, done)| (folder.as_str(), *done))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.status.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status.is_empty()
    }
}

/// Compute folder completion in one pass over the records.
///
/// Each record contributes to every one of its ancestor folders, which is
/// `O(records × depth)` instead of re-filtering the collection per folder.
#[must_use]
pub fn folder_completion(records: &[FileRecord]) -> FolderCompletion {
    // (descendant files, checked descendant files)
    let mut tally: AHashMap<&str, (usize, usize)> = AHashMap::new();
    for record in records {
        for folder in path::ancestor_folders(&record.path) {
            let entry = tally.entry(folder).or_insert((0, 0));
            entry.0 += 1;
            if record.checked {
                entry.1 += 1;
            }
        }
    }

    FolderCompletion {
        status: tally
            .into_iter()
            .map(|(folder, (total, checked))| (folder.to_string(), total > 0 && total == checked))
            .collect(),
    }
}

/// Sorted, de-duplicated immediate parent folders of every record.
#[must_use]
pub fn unique_folders(records: &[FileRecord]) -> Vec<String> {
    records
        .iter()
        .filter_map(FileRecord::folder)
        .map(str::to_string)
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

/// Depth-1 folder names across the collection.
#[must_use]
pub fn top_level_folders(records: &[FileRecord]) -> BTreeSet<String> {
    records
        .iter()
        .filter_map(|record| path::top_level_folder(&record.path))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(paths: &[&str]) -> Vec<FileRecord> {
        paths
            .iter()
            .enumerate()
            .map(|(idx, p)| FileRecord::new(*p).with_id(format!("r{idx}")))
            .collect()
    }

    fn assert_sorted(nodes: &[TreeNode<'_>]) {
        for pair in nodes.windows(2) {
            assert_ne!(sibling_order(&pair[0], &pair[1]), Ordering::Greater);
            if pair[0].kind == pair[1].kind {
                assert!(pair[0].name <= pair[1].name);
            }
        }
        for node in nodes {
            if node.kind == NodeKind::File {
                assert!(node.children.is_empty());
            }
            assert_sorted(&node.children);
        }
    }

    #[test]
    fn test_every_record_has_a_reachable_leaf() {
        let recs = records(&[
            "README.md",
            "src/app.js",
            "src/components/Header.js",
            "src/utils/helpers.js",
            "lib/src/x.rs",
        ]);
        let tree = build_tree(&recs);

        for record in &recs {
            let leaf = tree.find_file(record).expect("leaf must exist");
            assert_eq!(leaf.record, Some(record));
            assert_eq!(leaf.name.as_str(), record.name());
        }
        assert_eq!(tree.roots.iter().map(TreeNode::file_count).sum::<usize>(), recs.len());
    }

    #[test]
    fn test_folder_identity_is_cumulative_path() {
        let recs = records(&["src/a.rs", "lib/src/b.rs"]);
        let tree = build_tree(&recs);

        assert!(tree.folder_paths.contains("src"));
        assert!(tree.folder_paths.contains("lib/src"));
        assert_eq!(tree.find_folder("lib/src").unwrap().id, "lib/src");
        assert_eq!(tree.find_folder("src").unwrap().children.len(), 1);
    }

    #[test]
    fn test_siblings_sorted_folders_first_ordinal() {
        let recs = records(&["b.txt", "Z/q.txt", "a/z.txt", "A.txt", "a/b/c.txt", "a/B.txt"]);
        let tree = build_tree(&recs);

        assert_sorted(&tree.roots);
        let names: Vec<&str> = tree.roots.iter().map(|n| n.name.as_str()).collect();
        // uppercase sorts before lowercase byte-wise
        assert_eq!(names, vec!["Z", "a", "A.txt", "b.txt"]);
        let inner: Vec<&str> = tree.roots[1].children.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(inner, vec!["b", "B.txt", "z.txt"]);
    }

    #[test]
    fn test_file_and_folder_with_same_name_coexist() {
        let recs = records(&["src", "src/main.rs"]);
        let tree = build_tree(&recs);

        assert_eq!(tree.roots.len(), 2);
        assert_eq!(tree.roots[0].kind, NodeKind::Folder);
        assert_eq!(tree.roots[1].kind, NodeKind::File);
        assert_eq!(tree.roots[0].name, tree.roots[1].name);
    }

    #[test]
    fn test_duplicate_paths_stay_distinct_leaves() {
        let recs = records(&["a/x.txt", "a/x.txt"]);
        let tree = build_tree(&recs);

        let folder = tree.find_folder("a").unwrap();
        assert_eq!(folder.children.len(), 2);
        assert_ne!(folder.children[0].id, folder.children[1].id);
    }

    #[test]
    fn test_folder_completion_tracks_checked_state() {
        let mut recs = records(&["a/x.txt", "a/y.txt", "a/b/z.txt", "c.txt"]);
        let now = chrono::Utc::now();
        recs[0].set_checked(true, now);
        recs[2].set_checked(true, now);

        let completion = folder_completion(&recs);
        assert!(!completion.is_complete("a"));
        assert!(completion.is_complete("a/b"));
        assert!(!completion.is_complete("missing"));
        assert_eq!(completion.len(), 2);

        recs[1].set_checked(true, now);
        assert!(folder_completion(&recs).is_complete("a"));
    }

    #[test]
    fn test_completion_matches_naive_definition() {
        let mut recs = records(&["a/1", "a/2", "a/b/3", "a/b/c/4", "d/5", "d/e/6", "7"]);
        let now = chrono::Utc::now();
        for idx in [0, 2, 3, 5] {
            recs[idx].set_checked(true, now);
        }

        let completion = folder_completion(&recs);
        for folder in &build_tree(&recs).folder_paths {
            let members: Vec<&FileRecord> = recs
                .iter()
                .filter(|r| path::is_descendant_of(&r.path, folder))
                .collect();
            let expected = !members.is_empty() && members.iter().all(|r| r.checked);
            assert_eq!(completion.is_complete(folder), expected, "folder {folder}");
        }
    }

    #[test]
    fn test_visible_rows_respects_expanded_set() {
        let recs = records(&["a/x.txt", "a/b/y.txt", "root.txt"]);
        let tree = build_tree(&recs);

        let collapsed = tree.visible_rows(&BTreeSet::new());
        assert_eq!(collapsed.len(), 2);

        let expanded: BTreeSet<String> = ["a".to_string()].into();
        let rows = tree.visible_rows(&expanded);
        let names: Vec<(usize, &str)> = rows.iter().map(|r| (r.depth, r.node.name.as_str())).collect();
        assert_eq!(names, vec![(0, "a"), (1, "b"), (1, "x.txt"), (0, "root.txt")]);
    }

    #[test]
    fn test_unique_and_top_level_folders() {
        let recs = records(&["src/a.js", "src/lib/b.js", "src/c.js", "README.md"]);

        assert_eq!(unique_folders(&recs), vec!["src".to_string(), "src/lib".to_string()]);
        assert_eq!(top_level_folders(&recs), ["src".to_string()].into());
    }
}
