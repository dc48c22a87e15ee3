use std::{
    io::{self, Read},
    ops::Range,
};

use byteorder::{LittleEndian, ReadBytesExt};
use num_traits::FromPrimitive;

use super::{
    consts::{LeafContents, LumpType, MAX_MAP_LEAFS, MAX_MAP_MARKSURFACES},
    Lump,
};
use crate::binaries::{read_i16x3, BinaryData};

/// Convex region at the bottom of the tree.
///
/// Leaf 0 is the shared solid leaf outside the map. Every other leaf lists the surfaces that
/// bound it through the mark surface lump and points at its row of the visibility lump.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BSPLeaf {
    pub contents: i32,
    /// Offset into the visibility lump, -1 when the leaf has no visibility row.
    pub vis_ofs: i32,
    pub mins: [i16; 3],
    pub maxs: [i16; 3],
    pub first_mark_surface: u16,
    pub num_mark_surfaces: u16,
    pub ambient_level: [u8; 4],
}

impl BSPLeaf {
    pub fn contents(&self) -> Option<LeafContents> {
        LeafContents::from_i32(self.contents)
    }

    pub fn vis_offset(&self) -> Option<usize> {
        usize::try_from(self.vis_ofs).ok()
    }

    /// Indices into the mark surface lump.
    pub fn mark_surfaces(&self) -> Range<usize> {
        let first = self.first_mark_surface as usize;
        first..first + self.num_mark_surfaces as usize
    }
}

impl BinaryData for BSPLeaf {
    const SIZE: usize = 28;

    fn read<R: Read>(buffer: &mut R) -> io::Result<Self> {
        let contents = buffer.read_i32::<LittleEndian>()?;
        let vis_ofs = buffer.read_i32::<LittleEndian>()?;
        let mins = read_i16x3(buffer)?;
        let maxs = read_i16x3(buffer)?;
        let first_mark_surface = buffer.read_u16::<LittleEndian>()?;
        let num_mark_surfaces = buffer.read_u16::<LittleEndian>()?;
        let mut ambient_level = [0; 4];
        buffer.read_exact(&mut ambient_level)?;

        Ok(Self {
            contents,
            vis_ofs,
            mins,
            maxs,
            first_mark_surface,
            num_mark_surfaces,
            ambient_level,
        })
    }
}

impl Lump for BSPLeaf {
    fn max() -> usize {
        MAX_MAP_LEAFS
    }

    fn lump_type() -> LumpType {
        LumpType::Leaves
    }
}

/// Surface id referenced from a leaf.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BSPMarkSurface(pub u16);

impl BinaryData for BSPMarkSurface {
    const SIZE: usize = 2;

    fn read<R: Read>(buffer: &mut R) -> io::Result<Self> {
        Ok(Self(buffer.read_u16::<LittleEndian>()?))
    }
}

impl Lump for BSPMarkSurface {
    fn max() -> usize {
        MAX_MAP_MARKSURFACES
    }

    fn lump_type() -> LumpType {
        LumpType::MarkSurfaces
    }
}
