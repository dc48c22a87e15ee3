use flagset::flags;
use num_derive::FromPrimitive;

use super::{
    clipnode::BSPClipNode, edges::BSPEdge, edges::BSPSurfEdge, face::BSPFace, leaf::BSPLeaf,
    leaf::BSPMarkSurface, model::BSPHull, node::BSPNode, plane::BSPPlane, textures::BSPTexInfo,
};
use crate::binaries::BinaryData;

pub const HEADER_LUMPS: usize = 15;

/// Quake and its derivatives, 8-bit lightmaps and a shared palette.
pub const BSP_VERSION_QUAKE: i32 = 29;
/// Half-Life, RGB lightmaps and palettes stored with every texture.
pub const BSP_VERSION_GOLDSRC: i32 = 30;

// upper design bounds, exceeding them is tolerated but logged
pub const MAX_MAP_HULLS: usize = 4;
pub const MAX_MAP_MODELS: usize = 400;
pub const MAX_MAP_ENTSTRING: usize = 128 * 1024;
pub const MAX_MAP_PLANES: usize = 32767;
pub const MAX_MAP_NODES: usize = 32767;
pub const MAX_MAP_CLIPNODES: usize = 32767;
pub const MAX_MAP_LEAFS: usize = 8192;
pub const MAX_MAP_VERTS: usize = 65535;
pub const MAX_MAP_FACES: usize = 65535;
pub const MAX_MAP_MARKSURFACES: usize = 65535;
pub const MAX_MAP_TEXINFO: usize = 8192;
pub const MAX_MAP_EDGES: usize = 256000;
pub const MAX_MAP_SURFEDGES: usize = 512000;
pub const MAX_MAP_TEXTURES: usize = 512;
pub const MAX_MAP_LIGHTING: usize = 0x200000;
pub const MAX_MAP_VISIBILITY: usize = 0x200000;

pub const MIP_LEVELS: usize = 4;

#[derive(Copy, Clone, FromPrimitive, Debug, PartialEq, Eq, Hash)]
pub enum LumpType {
    Entities = 0,
    Planes = 1,
    MipTextures = 2,
    Vertices = 3,
    Visibility = 4,
    Nodes = 5,
    TexInfo = 6,
    Faces = 7,
    Lighting = 8,
    ClipNodes = 9,
    Leaves = 10,
    MarkSurfaces = 11,
    Edges = 12,
    SurfEdges = 13,
    Models = 14,
}

impl LumpType {
    /// Record size of array lumps, `None` for lumps that are raw bytes.
    pub fn stride(self) -> Option<usize> {
        match self {
            LumpType::Entities
            | LumpType::MipTextures
            | LumpType::Visibility
            | LumpType::Lighting => None,
            LumpType::Planes => Some(BSPPlane::SIZE),
            LumpType::Vertices => Some(glam::Vec3::SIZE),
            LumpType::Nodes => Some(BSPNode::SIZE),
            LumpType::TexInfo => Some(BSPTexInfo::SIZE),
            LumpType::Faces => Some(BSPFace::SIZE),
            LumpType::ClipNodes => Some(BSPClipNode::SIZE),
            LumpType::Leaves => Some(BSPLeaf::SIZE),
            LumpType::MarkSurfaces => Some(BSPMarkSurface::SIZE),
            LumpType::Edges => Some(BSPEdge::SIZE),
            LumpType::SurfEdges => Some(BSPSurfEdge::SIZE),
            LumpType::Models => Some(BSPHull::SIZE),
        }
    }
}

/// Leaf contents. Unlike brush contents these are plain negative ids, not flags.
#[derive(Copy, Clone, FromPrimitive, Debug, PartialEq, Eq)]
pub enum LeafContents {
    Empty = -1,
    Solid = -2,
    Water = -3,
    Slime = -4,
    Lava = -5,
    Sky = -6,
    Origin = -7, // removed at csg time
    Clip = -8,   // changed to contents_solid
    Current0 = -9,
    Current90 = -10,
    Current180 = -11,
    Current270 = -12,
    CurrentUp = -13,
    CurrentDown = -14,
    Translucent = -15,
}

flags! {
    pub enum TexInfoFlags: i32 {
        /// sky or liquid, no lightmap and no subdivision
        Special = 0x1,
    }
}
