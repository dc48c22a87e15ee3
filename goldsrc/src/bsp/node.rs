use std::io::{self, Read};

use byteorder::{LittleEndian, ReadBytesExt};

use super::{
    consts::{LumpType, MAX_MAP_NODES},
    Lump,
};
use crate::binaries::{read_i16x3, BinaryData};

/// Where a branch of the tree leads.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeChild {
    Node(usize),
    Leaf(usize),
}

impl NodeChild {
    /// Non-negative values index the node lump, a negative `n` is leaf `!n` (`-(n + 1)`).
    pub fn from_raw(raw: i32) -> Self {
        if raw >= 0 {
            NodeChild::Node(raw as usize)
        } else {
            NodeChild::Leaf(!raw as usize)
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BSPNode {
    pub plane_num: i32,
    /// Front and back child, sign encoded.
    pub children: [i16; 2],
    pub mins: [i16; 3], // bounding box, for frustum culling
    pub maxs: [i16; 3],
    pub first_face: u16,
    pub num_faces: u16, // counting both sides
}

impl BSPNode {
    pub fn front(&self) -> NodeChild {
        NodeChild::from_raw(self.children[0] as i32)
    }

    pub fn back(&self) -> NodeChild {
        NodeChild::from_raw(self.children[1] as i32)
    }
}

impl BinaryData for BSPNode {
    const SIZE: usize = 24;

    fn read<R: Read>(buffer: &mut R) -> io::Result<Self> {
        Ok(Self {
            plane_num: buffer.read_i32::<LittleEndian>()?,
            children: [
                buffer.read_i16::<LittleEndian>()?,
                buffer.read_i16::<LittleEndian>()?,
            ],
            mins: read_i16x3(buffer)?,
            maxs: read_i16x3(buffer)?,
            first_face: buffer.read_u16::<LittleEndian>()?,
            num_faces: buffer.read_u16::<LittleEndian>()?,
        })
    }
}

impl Lump for BSPNode {
    fn max() -> usize {
        MAX_MAP_NODES
    }

    fn lump_type() -> LumpType {
        LumpType::Nodes
    }
}
