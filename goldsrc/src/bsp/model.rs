use std::{
    io::{self, Read},
    ops::Range,
};

use byteorder::{LittleEndian, ReadBytesExt};
use glam::Vec3;

use super::{
    consts::{LumpType, MAX_MAP_HULLS, MAX_MAP_MODELS},
    Lump,
};
use crate::binaries::BinaryData;

/// An entry of the model lump. Model 0 is the world, the rest are brush entities.
///
/// Each model carries the root of its render tree and the roots of the collision hulls.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BSPHull {
    mins: Vec3,
    maxs: Vec3,
    origin: Vec3,
    head_nodes: [i32; MAX_MAP_HULLS],
    vis_leafs: i32, // not including the solid leaf 0
    first_face: i32,
    num_faces: i32,
}

impl BSPHull {
    pub fn maxs(&self) -> Vec3 {
        self.maxs
    }

    pub fn mins(&self) -> Vec3 {
        self.mins
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Root of the render tree (index 0) or of a collision hull (1-3).
    pub fn head_node(&self, hull: usize) -> Option<i32> {
        self.head_nodes.get(hull).copied()
    }

    pub fn head_nodes(&self) -> [i32; MAX_MAP_HULLS] {
        self.head_nodes
    }

    pub fn vis_leafs(&self) -> usize {
        self.vis_leafs.max(0) as usize
    }

    pub fn faces(&self) -> Range<usize> {
        let first = self.first_face.max(0) as usize;
        first..first + self.num_faces.max(0) as usize
    }
}

impl BinaryData for BSPHull {
    const SIZE: usize = 64;

    fn read<R: Read>(buffer: &mut R) -> io::Result<Self> {
        let mins = Vec3::read(buffer)?;
        let maxs = Vec3::read(buffer)?;
        let origin = Vec3::read(buffer)?;
        let mut head_nodes = [0; MAX_MAP_HULLS];
        buffer.read_i32_into::<LittleEndian>(&mut head_nodes)?;

        Ok(Self {
            mins,
            maxs,
            origin,
            head_nodes,
            vis_leafs: buffer.read_i32::<LittleEndian>()?,
            first_face: buffer.read_i32::<LittleEndian>()?,
            num_faces: buffer.read_i32::<LittleEndian>()?,
        })
    }
}

impl Lump for BSPHull {
    fn max() -> usize {
        MAX_MAP_MODELS
    }

    fn lump_type() -> LumpType {
        LumpType::Models
    }
}
