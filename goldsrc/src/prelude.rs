pub use crate::bsp::{
    clipnode::BSPClipNode,
    consts::{LeafContents, LumpType},
    edges::{BSPEdge, BSPSurfEdge, EdgeRef, Winding},
    face::BSPFace,
    header::BSPHeader,
    leaf::{BSPLeaf, BSPMarkSurface},
    lightmap::{LightmapExtents, LightmapTile},
    model::BSPHull,
    node::{BSPNode, NodeChild},
    plane::BSPPlane,
    textures::{BSPMipTex, BSPTexInfo},
    vis::{PotentiallyVisible, VisibleLeaves},
    BSPFile,
};
pub use crate::game_data::{
    load_map, CompressedEntryPolicy, LoadOptions, MapConfig, MissingTexturePolicy,
    UnlitSurfacePolicy,
};
pub use crate::map::Map;
pub use crate::meshes::SurfaceMesh;
pub use crate::palette::Palette;
pub use crate::texture::Texture;
pub use crate::wad::Wad3;
