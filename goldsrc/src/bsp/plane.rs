use std::io::{self, Read};

use byteorder::{LittleEndian, ReadBytesExt};
use glam::Vec3;

use super::{
    consts::{LumpType, MAX_MAP_PLANES},
    Lump,
};
use crate::binaries::BinaryData;

///Plane
///
///The basis of the BSP geometry is defined by planes, which are used as splitting surfaces across the BSP tree structure.
///
/// The plane is the set of points satisfying `dot(normal, p) = dist`. Points with a positive
/// distance are in front of the plane, the rest are behind it.
///
/// `axis` is 0-2 when the plane is axial in X, Y or Z, and 3-5 for the axis it is closest to otherwise.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BSPPlane {
    pub normal: Vec3, // normal vector
    pub dist: f32,    // distance from origin
    pub axis: i32,    // plane axis identifier
}

impl BSPPlane {
    /// Signed distance of `point` from the plane.
    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.normal.dot(point) - self.dist
    }
}

impl BinaryData for BSPPlane {
    const SIZE: usize = 20;

    fn read<R: Read>(buffer: &mut R) -> io::Result<Self> {
        Ok(Self {
            normal: Vec3::read(buffer)?,
            dist: buffer.read_f32::<LittleEndian>()?,
            axis: buffer.read_i32::<LittleEndian>()?,
        })
    }
}

impl Lump for BSPPlane {
    fn max() -> usize {
        MAX_MAP_PLANES
    }

    fn lump_type() -> LumpType {
        LumpType::Planes
    }
}
