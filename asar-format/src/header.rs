/// Length in bytes of the fixed frame prefix.
pub const PREFIX_LEN: usize = 16;

/// Value of the first prefix field. Archives carry it as a size-of-size marker.
pub const MAGIC: u32 = 0x4;

/// The 16-byte frame prefix: four little-endian `u32`s preceding the JSON header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AsarHeader {
    pub magic: u32,
    /// Always `header_size + 4`.
    pub total_size: u32,
    /// `document_size` rounded up to a multiple of 4.
    pub header_size: u32,
    /// Exact byte length of the JSON header.
    pub document_size: u32,
}

#[inline(always)]
pub(crate) const fn align4(value: usize) -> usize {
    (value + 3) & !3
}

impl AsarHeader {
    pub(crate) fn for_document(document_size: u32) -> AsarHeader {
        let header_size = align4(document_size as usize) as u32;
        AsarHeader {
            magic: MAGIC,
            total_size: header_size + 4,
            header_size,
            document_size,
        }
    }

    /// Byte offset one past the end of the JSON document.
    #[inline(always)]
    pub fn header_end(&self) -> usize {
        PREFIX_LEN + self.document_size as usize
    }

    /// Byte offset of the content region, the first multiple of 4 at or after `header_end`.
    #[inline(always)]
    pub fn content_start(&self) -> usize {
        align4(self.header_end())
    }
}
