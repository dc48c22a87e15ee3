use std::{
    io::{self, Read},
    ops::Range,
};

use byteorder::{LittleEndian, ReadBytesExt};

use super::consts::LumpType;
use crate::binaries::BinaryData;

/// A record type stored as a fixed stride array in one lump.
pub trait Lump: BinaryData {
    /// Engine limit, exceeding it only produces a warning.
    fn max() -> usize;
    fn lump_type() -> LumpType;
}

/// Directory entry of the header.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct BSPLump {
    file_ofs: i32, // offset into file (bytes)
    file_len: i32, // length of lump (bytes)
}

impl BSPLump {
    pub fn new(file_ofs: i32, file_len: i32) -> Self {
        Self { file_ofs, file_len }
    }

    pub fn raw(&self) -> (i32, i32) {
        (self.file_ofs, self.file_len)
    }

    /// Byte range within the file. Only meaningful once the header has been validated.
    pub fn range(&self) -> Range<usize> {
        let start = self.file_ofs.max(0) as usize;
        start..start + self.file_len.max(0) as usize
    }

    pub fn len(&self) -> usize {
        self.file_len.max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.file_len <= 0
    }
}

impl BinaryData for BSPLump {
    const SIZE: usize = 8;

    fn read<R: Read>(buffer: &mut R) -> io::Result<Self> {
        Ok(Self {
            file_ofs: buffer.read_i32::<LittleEndian>()?,
            file_len: buffer.read_i32::<LittleEndian>()?,
        })
    }
}
