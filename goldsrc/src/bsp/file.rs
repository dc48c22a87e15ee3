use super::{
    clipnode::BSPClipNode,
    consts::LumpType,
    edges::{BSPEdge, BSPSurfEdge},
    face::BSPFace,
    header::BSPHeader,
    leaf::{BSPLeaf, BSPMarkSurface},
    lump::Lump,
    model::BSPHull,
    node::BSPNode,
    plane::BSPPlane,
    textures::BSPTexInfo,
};
use crate::error::BspError;

/// A validated map file.
///
/// Owns the raw bytes and hands out records on demand, every access is bounds checked
/// against the lump it belongs to.
pub struct BSPFile {
    header: BSPHeader,
    data: Vec<u8>,
}

impl BSPFile {
    pub fn parse(data: Vec<u8>) -> Result<Self, BspError> {
        let header = BSPHeader::parse(&data)?;
        let file = Self { header, data };

        log::debug!("{:?}", file.header);

        file.check_limit::<BSPPlane>();
        file.check_limit::<glam::Vec3>();
        file.check_limit::<BSPNode>();
        file.check_limit::<BSPTexInfo>();
        file.check_limit::<BSPFace>();
        file.check_limit::<BSPClipNode>();
        file.check_limit::<BSPLeaf>();
        file.check_limit::<BSPMarkSurface>();
        file.check_limit::<BSPEdge>();
        file.check_limit::<BSPSurfEdge>();
        file.check_limit::<BSPHull>();

        Ok(file)
    }

    fn check_limit<T: Lump>(&self) {
        let count = self.count::<T>();
        if count > T::max() {
            log::warn!(
                "{:?} lump has {} entries, engine limit is {}",
                T::lump_type(),
                count,
                T::max()
            );
        }
    }

    pub fn header(&self) -> &BSPHeader {
        &self.header
    }

    pub fn version(&self) -> i32 {
        self.header.version()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Raw view of a lump, for lumps that are not record arrays.
    pub fn lump_bytes(&self, lump: LumpType) -> &[u8] {
        self.data
            .get(self.header.get_lump_header(lump).range())
            .unwrap_or(&[])
    }

    pub fn count<T: Lump>(&self) -> usize {
        self.header.get_lump_header(T::lump_type()).len() / T::SIZE
    }

    pub fn get<T: Lump>(&self, index: usize) -> Result<T, BspError> {
        let count = self.count::<T>();
        if index >= count {
            return Err(BspError::IndexOutOfRange {
                lump: T::lump_type(),
                index,
                count,
            });
        }
        let start = index * T::SIZE;
        let bytes = self
            .lump_bytes(T::lump_type())
            .get(start..start + T::SIZE)
            .ok_or_else(|| BspError::corrupt(format!("{:?} lump truncated", T::lump_type())))?;

        Ok(T::from_bytes(bytes)?)
    }

    /// Decodes the whole lump.
    pub fn get_lump<T: Lump>(&self) -> Result<Box<[T]>, BspError> {
        (0..self.count::<T>()).map(|i| self.get(i)).collect()
    }
}
