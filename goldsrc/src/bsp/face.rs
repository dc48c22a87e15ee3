use std::{
    io::{self, Read},
    ops::Range,
};

use byteorder::{LittleEndian, ReadBytesExt};

use super::{
    consts::{LumpType, MAX_MAP_FACES},
    Lump,
};
use crate::binaries::BinaryData;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FaceSide {
    /// Faces the same way as its plane.
    Front,
    Back,
}

/// Light styles slot value meaning "no style".
pub const NO_LIGHT_STYLE: u8 = 0xFF;

///Surface
///
/// A planar convex polygon. Its vertices are found by walking `num_edges` surfedges from
/// `first_edge`, the sign of each surfedge tells which end of the edge comes first so the
/// polygon is traced in a consistent winding.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BSPFace {
    pub plane_num: u16,
    /// Zero if the face points the same way as its plane.
    pub side: u16,
    /// Index into the surfedge array.
    pub first_edge: i32,
    /// Number of surfedges, equal to the number of vertices.
    pub num_edges: u16,
    pub tex_info: u16,
    /// Switchable lighting styles, the first being 0xFF means the face has no lightmap.
    pub styles: [u8; 4],
    /// Byte offset into the lighting lump.
    pub light_ofs: i32,
}

impl BSPFace {
    pub fn side(&self) -> FaceSide {
        if self.side == 0 {
            FaceSide::Front
        } else {
            FaceSide::Back
        }
    }

    /// Indices into the surfedge array.
    pub fn edges(&self) -> Range<usize> {
        let first = self.first_edge.max(0) as usize;
        first..first + self.num_edges as usize
    }

    /// Offset of the light samples, `None` for unlit faces.
    pub fn light_offset(&self) -> Option<usize> {
        if self.styles[0] == NO_LIGHT_STYLE {
            return None;
        }
        usize::try_from(self.light_ofs).ok()
    }
}

impl BinaryData for BSPFace {
    const SIZE: usize = 20;

    fn read<R: Read>(buffer: &mut R) -> io::Result<Self> {
        let plane_num = buffer.read_u16::<LittleEndian>()?;
        let side = buffer.read_u16::<LittleEndian>()?;
        let first_edge = buffer.read_i32::<LittleEndian>()?;
        let num_edges = buffer.read_u16::<LittleEndian>()?;
        let tex_info = buffer.read_u16::<LittleEndian>()?;
        let mut styles = [0; 4];
        buffer.read_exact(&mut styles)?;

        Ok(Self {
            plane_num,
            side,
            first_edge,
            num_edges,
            tex_info,
            styles,
            light_ofs: buffer.read_i32::<LittleEndian>()?,
        })
    }
}

impl Lump for BSPFace {
    fn max() -> usize {
        MAX_MAP_FACES
    }

    fn lump_type() -> LumpType {
        LumpType::Faces
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(styles: [u8; 4], light_ofs: i32) -> BSPFace {
        BSPFace {
            plane_num: 0,
            side: 1,
            first_edge: 10,
            num_edges: 4,
            tex_info: 0,
            styles,
            light_ofs,
        }
    }

    #[test]
    fn lightmap_sentinels() {
        assert_eq!(face([0, 255, 255, 255], 96).light_offset(), Some(96));
        assert_eq!(face([255, 255, 255, 255], 96).light_offset(), None);
        assert_eq!(face([0, 255, 255, 255], -1).light_offset(), None);
    }

    #[test]
    fn edge_range_and_side() {
        let f = face([0; 4], 0);
        assert_eq!(f.edges(), 10..14);
        assert_eq!(f.side(), FaceSide::Back);
    }
}
