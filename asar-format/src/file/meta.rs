use std::collections::btree_map::{self, BTreeMap, Entry};

use crate::error::FormatError;
use crate::path::AsarPath;
use crate::record::{Directory, FileRecord, Node};

/// The flat view of an archive: every file keyed by its full archive path.
///
/// Converts to and from the nested [`Directory`] tree stored in the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AsarMetadata {
    pub(crate) entries: BTreeMap<AsarPath, FileRecord>,
}

impl AsarMetadata {
    pub fn new() -> AsarMetadata {
        AsarMetadata::default()
    }

    /// Flattens a header tree. Directories with no files beneath them produce no entries.
    pub fn from_tree(root: &Directory) -> AsarMetadata {
        let mut entries = BTreeMap::new();
        flatten_into(&mut entries, None, root);
        AsarMetadata { entries }
    }

    /// Builds a fresh header tree from the flat entries.
    pub fn to_tree(&self) -> Result<Directory, FormatError> {
        let mut root = Directory::new();
        for (path, record) in self.entries.iter() {
            insert_into(&mut root, path, *record)?;
        }
        Ok(root)
    }

    #[inline(always)]
    pub fn insert(&mut self, path: AsarPath, record: FileRecord) -> Option<FileRecord> {
        self.entries.insert(path, record)
    }

    #[inline(always)]
    pub fn get(&self, path: &AsarPath) -> Option<&FileRecord> {
        self.entries.get(path)
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in path order.
    #[inline(always)]
    pub fn iter(&self) -> btree_map::Iter<'_, AsarPath, FileRecord> {
        self.entries.iter()
    }
}

impl FromIterator<(AsarPath, FileRecord)> for AsarMetadata {
    fn from_iter<I: IntoIterator<Item = (AsarPath, FileRecord)>>(iter: I) -> Self {
        AsarMetadata {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a AsarMetadata {
    type Item = (&'a AsarPath, &'a FileRecord);
    type IntoIter = btree_map::Iter<'a, AsarPath, FileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn flatten_into(
    out: &mut BTreeMap<AsarPath, FileRecord>,
    parent: Option<&AsarPath>,
    dir: &Directory,
) {
    for (name, node) in dir.files.iter() {
        let path = AsarPath::join_name(parent, name);
        match node {
            Node::Directory(child) => flatten_into(out, Some(&path), child),
            Node::File(record) => {
                out.insert(path, *record);
            }
        }
    }
}

fn insert_into(root: &mut Directory, path: &AsarPath, record: FileRecord) -> Result<(), FormatError> {
    let conflict = || FormatError::PathConflict { path: path.clone() };

    let mut segments = path.iter().peekable();
    let mut cwd = root;

    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            return match cwd.files.entry(segment.to_string()) {
                Entry::Vacant(slot) => {
                    slot.insert(Node::File(record));
                    Ok(())
                }
                Entry::Occupied(_) => Err(conflict()),
            };
        }

        let node = cwd
            .files
            .entry(segment.to_string())
            .or_insert_with(|| Node::Directory(Directory::new()));

        cwd = match node {
            Node::Directory(dir) => dir,
            Node::File(_) => return Err(conflict()),
        };
    }

    Ok(())
}
