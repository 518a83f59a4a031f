use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::FormatError;
use crate::header::{AsarHeader, MAGIC, PREFIX_LEN};
use crate::record::{Directory, RawNode};

pub(crate) trait DeserializeOwned: Sized {
    fn deserialize_owned<R: Read>(reader: &mut R) -> std::io::Result<Self>;
}

impl DeserializeOwned for AsarHeader {
    fn deserialize_owned<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let magic = reader.read_u32::<LittleEndian>()?;
        let total_size = reader.read_u32::<LittleEndian>()?;
        let header_size = reader.read_u32::<LittleEndian>()?;
        let document_size = reader.read_u32::<LittleEndian>()?;

        tracing::debug!(
            bytes = PREFIX_LEN,
            magic,
            total_size,
            header_size,
            document_size,
            "deserialized AsarHeader"
        );

        Ok(AsarHeader {
            magic,
            total_size,
            header_size,
            document_size,
        })
    }
}

/// Parses the frame prefix and the JSON header out of a whole archive buffer.
pub(crate) fn read_frame(buf: &[u8]) -> Result<(AsarHeader, Directory), FormatError> {
    if buf.len() < PREFIX_LEN {
        return Err(FormatError::Truncated {
            needed: PREFIX_LEN,
            actual: buf.len(),
        });
    }

    let header = AsarHeader::deserialize_owned(&mut &buf[..PREFIX_LEN])
        .map_err(|_| FormatError::Truncated {
            needed: PREFIX_LEN,
            actual: buf.len(),
        })?;

    if header.magic != MAGIC {
        return Err(FormatError::BadMagic(header.magic));
    }

    let end = header.header_end();
    if end > buf.len() {
        return Err(FormatError::Truncated {
            needed: end,
            actual: buf.len(),
        });
    }

    let raw: RawNode = serde_json::from_slice(&buf[PREFIX_LEN..end])?;
    let root = Directory::from_raw(raw)?;

    tracing::debug!(
        start = format_args!("{:#x}", PREFIX_LEN),
        end = format_args!("{:#x}", end),
        bytes = end - PREFIX_LEN,
        "deserialized header document"
    );

    Ok((header, root))
}
