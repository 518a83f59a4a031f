use std::io::{Result, Write};

use byteorder::{LittleEndian, WriteBytesExt};

use crate::header::{AsarHeader, PREFIX_LEN};

// `total_size` must still fit in a u32 after alignment.
const MAX_DOCUMENT_SIZE: u32 = u32::MAX - 8;

pub(crate) trait Serialize {
    fn write<W: Write>(&self, writer: &mut W) -> Result<()>;
}

impl Serialize for AsarHeader {
    fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32::<LittleEndian>(self.magic)?;
        writer.write_u32::<LittleEndian>(self.total_size)?;
        writer.write_u32::<LittleEndian>(self.header_size)?;
        writer.write_u32::<LittleEndian>(self.document_size)?;
        tracing::debug!(
            bytes = PREFIX_LEN,
            total_size = self.total_size,
            header_size = self.header_size,
            document_size = self.document_size,
            "serialized AsarHeader"
        );
        Ok(())
    }
}

/// Writes the prefix, the JSON document and zero padding up to the content region.
pub(crate) fn write_frame<W: Write>(writer: &mut W, document: &[u8]) -> Result<AsarHeader> {
    let document_size = u32::try_from(document.len())
        .ok()
        .filter(|len| *len <= MAX_DOCUMENT_SIZE)
        .ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "header document too large for the frame prefix",
            )
        })?;
    let header = AsarHeader::for_document(document_size);

    header.write(writer)?;
    writer.write_all(document)?;

    let padding = header.content_start() - header.header_end();
    writer.write_all(&[0u8; 3][..padding])?;

    tracing::debug!(
        start = format_args!("{:#x}", PREFIX_LEN),
        end = format_args!("{:#x}", header.content_start()),
        padding,
        "serialized header document"
    );

    Ok(header)
}
