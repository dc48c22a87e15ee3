use std::io::{self, Read};

use byteorder::{LittleEndian, ReadBytesExt};

use super::{
    consts::{LumpType, MAX_MAP_EDGES, MAX_MAP_SURFEDGES},
    Lump,
};
use crate::binaries::BinaryData;

///Edge
///
///Each edge is simply a pair of vertex indices. Edges are shared between adjacent surfaces and
///are usually reached through the surfedge array. Edge 0 is never referenced, since its sign could not be told apart.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BSPEdge {
    pub v: [u16; 2], // vertex indices
}

impl BinaryData for BSPEdge {
    const SIZE: usize = 4;

    fn read<R: Read>(buffer: &mut R) -> io::Result<Self> {
        Ok(Self {
            v: [
                buffer.read_u16::<LittleEndian>()?,
                buffer.read_u16::<LittleEndian>()?,
            ],
        })
    }
}

impl Lump for BSPEdge {
    fn max() -> usize {
        MAX_MAP_EDGES
    }

    fn lump_type() -> LumpType {
        LumpType::Edges
    }
}

/// Direction an edge is traversed in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Winding {
    /// First vertex to second.
    Forward,
    /// Second vertex to first.
    Reversed,
}

/// A decoded surfedge.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EdgeRef {
    pub index: usize,
    pub winding: Winding,
}

impl EdgeRef {
    /// The vertex the directed edge starts from.
    pub fn start_vertex(&self, edge: &BSPEdge) -> u16 {
        match self.winding {
            Winding::Forward => edge.v[0],
            Winding::Reversed => edge.v[1],
        }
    }
}

///Surfedge
///
///A signed index into the edge array. The absolute value picks the edge, positive traverses it
///forwards and negative backwards.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BSPSurfEdge {
    pub index: i32,
}

impl BSPSurfEdge {
    pub fn edge_ref(&self) -> EdgeRef {
        EdgeRef {
            index: self.index.unsigned_abs() as usize,
            winding: if self.index > 0 {
                Winding::Forward
            } else {
                Winding::Reversed
            },
        }
    }
}

impl BinaryData for BSPSurfEdge {
    const SIZE: usize = 4;

    fn read<R: Read>(buffer: &mut R) -> io::Result<Self> {
        Ok(Self {
            index: buffer.read_i32::<LittleEndian>()?,
        })
    }
}

impl Lump for BSPSurfEdge {
    fn max() -> usize {
        MAX_MAP_SURFEDGES
    }

    fn lump_type() -> LumpType {
        LumpType::SurfEdges
    }
}
