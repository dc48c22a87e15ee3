use std::io::{self, Read};

use byteorder::{LittleEndian, ReadBytesExt};

use super::{
    consts::{LumpType, MAX_MAP_CLIPNODES},
    Lump,
};
use crate::binaries::BinaryData;

/// Node of the collision hulls 1 to 3. Negative children are leaf contents rather than leaf ids.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BSPClipNode {
    pub plane_num: i32,
    pub children: [i16; 2],
}

impl BinaryData for BSPClipNode {
    const SIZE: usize = 8;

    fn read<R: Read>(buffer: &mut R) -> io::Result<Self> {
        Ok(Self {
            plane_num: buffer.read_i32::<LittleEndian>()?,
            children: [
                buffer.read_i16::<LittleEndian>()?,
                buffer.read_i16::<LittleEndian>()?,
            ],
        })
    }
}

impl Lump for BSPClipNode {
    fn max() -> usize {
        MAX_MAP_CLIPNODES
    }

    fn lump_type() -> LumpType {
        LumpType::ClipNodes
    }
}
