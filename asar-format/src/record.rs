use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::FormatError;

/// A node of the header tree: either a named directory or a file leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Directory(Directory),
    File(FileRecord),
}

impl Node {
    #[inline(always)]
    pub fn as_file(&self) -> Option<&FileRecord> {
        match self {
            Node::File(file) => Some(file),
            _ => None,
        }
    }

    #[inline(always)]
    pub fn as_directory(&self) -> Option<&Directory> {
        match self {
            Node::Directory(dir) => Some(dir),
            _ => None,
        }
    }
}

/// A directory of the header tree. The root of every archive header is a `Directory`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Directory {
    /// Child nodes keyed by their name. Names are single path segments.
    pub files: BTreeMap<String, Node>,
}

impl Directory {
    pub fn new() -> Directory {
        Directory::default()
    }

    pub(crate) fn from_raw(raw: RawNode) -> Result<Directory, FormatError> {
        match Node::from_raw(String::new(), raw)? {
            Node::Directory(dir) => Ok(dir),
            Node::File(_) => Err(FormatError::Shape {
                path: String::new(),
                reason: "header root must be a directory",
            }),
        }
    }
}

/// Where a file's bytes are located.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileRecord {
    /// Position of the data relative to the start of the content region.
    pub offset: u64,

    /// Exact length of the data.
    pub size: u64,

    /// The data is not stored in the archive but beside it on disk, at the same
    /// relative path. `offset` carries no meaning for such records.
    pub unpacked: bool,
}

impl FileRecord {
    #[inline(always)]
    pub fn new(offset: u64, size: u64) -> FileRecord {
        FileRecord {
            offset,
            size,
            unpacked: false,
        }
    }

    #[inline(always)]
    pub fn unpacked(size: u64) -> FileRecord {
        FileRecord {
            offset: 0,
            size,
            unpacked: true,
        }
    }

    /// One past the last content byte, or `None` if the range overflows.
    #[inline(always)]
    pub fn end(&self) -> Option<u64> {
        self.offset.checked_add(self.size)
    }
}

impl Serialize for FileRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        if self.unpacked {
            map.serialize_entry("size", &self.size)?;
            map.serialize_entry("unpacked", &true)?;
        } else {
            // offsets are decimal strings on the wire
            map.serialize_entry("offset", &self.offset.to_string())?;
            map.serialize_entry("size", &self.size)?;
        }
        map.end()
    }
}

/// The untyped shape of a header node as it appears in JSON, before the
/// directory/file distinction has been checked.
#[derive(Debug, Deserialize)]
pub(crate) struct RawNode {
    #[serde(default)]
    files: Option<BTreeMap<String, RawNode>>,
    #[serde(default)]
    offset: Option<RawOffset>,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    unpacked: Option<bool>,
    #[serde(default)]
    link: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawOffset {
    Text(String),
    Number(u64),
}

fn child_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

impl Node {
    fn from_raw(path: String, raw: RawNode) -> Result<Node, FormatError> {
        let RawNode {
            files,
            offset,
            size,
            unpacked,
            link,
        } = raw;

        if let Some(files) = files {
            if offset.is_some() || size.is_some() || unpacked.is_some() || link.is_some() {
                return Err(FormatError::Shape {
                    path,
                    reason: "directory carries file fields",
                });
            }

            let mut dir = Directory::new();
            for (name, child) in files {
                if name.is_empty() || name.contains('/') {
                    return Err(FormatError::Shape {
                        path: child_path(&path, &name),
                        reason: "entry name is empty or contains a separator",
                    });
                }
                let child = Node::from_raw(child_path(&path, &name), child)?;
                dir.files.insert(name, child);
            }
            return Ok(Node::Directory(dir));
        }

        if link.is_some() {
            return Err(FormatError::Shape {
                path,
                reason: "link entries are not supported",
            });
        }

        let unpacked = unpacked.unwrap_or(false);
        if unpacked {
            return Ok(Node::File(FileRecord::unpacked(size.unwrap_or(0))));
        }

        let offset = match offset {
            Some(RawOffset::Number(n)) => n,
            Some(RawOffset::Text(value)) => match value.parse::<u64>() {
                Ok(n) => n,
                Err(_) => return Err(FormatError::InvalidOffset { path, value }),
            },
            None => {
                return Err(FormatError::Shape {
                    path,
                    reason: "file has no offset",
                })
            }
        };

        let size = size.ok_or_else(|| FormatError::Shape {
            path: path.clone(),
            reason: "file has no size",
        })?;

        Ok(Node::File(FileRecord::new(offset, size)))
    }
}
