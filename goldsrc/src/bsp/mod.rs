pub mod clipnode;
pub mod consts;
pub mod edges;
pub mod face;
pub mod file;
pub mod header;
pub mod leaf;
pub mod lightmap;
pub mod lump;
pub mod model;
pub mod node;
pub mod plane;
pub mod textures;
pub mod tree;
pub mod vert;
pub mod vis;

pub use file::BSPFile;
pub use lump::Lump;

// https://developer.valvesoftware.com/wiki/BSP_(GoldSrc)
//
// A map file starts with a version number and a directory of 15 lumps. Most lumps are flat
// arrays of fixed size records that reference each other by index: leaves list surfaces through
// the mark surface lump, surfaces list edges through the surfedge lump, edges index vertices.
//
// Version 29 is the original Quake format, version 30 is the same layout used by Half-Life
// with coloured lighting and textures that carry their own palette.
//
// Everything is little-endian.
