use std::io::{self, Read};

use byteorder::{LittleEndian, ReadBytesExt};
use flagset::FlagSet;
use glam::{DVec2, Vec2, Vec3};

use super::{
    consts::{LumpType, TexInfoFlags, MAX_MAP_TEXINFO, MIP_LEVELS},
    Lump,
};
use crate::{
    binaries::{cleanup_name, read_name, BinaryData},
    error::BspError,
};

///Texinfo
///
/// Maps world space onto texture space. A vertex `p` lands on texel
/// `(dot(p, s) + s_offset, dot(p, t) + t_offset)`, before dividing by the texture size.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BSPTexInfo {
    pub s: Vec3,
    pub s_offset: f32,
    pub t: Vec3,
    pub t_offset: f32,
    /// Index into the mip texture lump.
    pub tex_id: i32,
    pub flags: i32,
}

impl BSPTexInfo {
    pub fn flags(&self) -> FlagSet<TexInfoFlags> {
        FlagSet::new_truncated(self.flags)
    }

    /// Texel space coordinates of a world position.
    pub fn project(&self, pos: Vec3) -> Vec2 {
        Vec2::new(
            pos.dot(self.s) + self.s_offset,
            pos.dot(self.t) + self.t_offset,
        )
    }

    /// Same as [`Self::project`] in double precision, light extents are sensitive to rounding.
    pub fn project_f64(&self, pos: Vec3) -> DVec2 {
        let pos = pos.as_dvec3();
        DVec2::new(
            pos.dot(self.s.as_dvec3()) + self.s_offset as f64,
            pos.dot(self.t.as_dvec3()) + self.t_offset as f64,
        )
    }

    /// Texture coordinates normalised by the texture size.
    pub fn texture_uv(&self, pos: Vec3, width: u32, height: u32) -> Vec2 {
        let st = self.project(pos);
        Vec2::new(st.x / width.max(1) as f32, st.y / height.max(1) as f32)
    }
}

impl BinaryData for BSPTexInfo {
    const SIZE: usize = 40;

    fn read<R: Read>(buffer: &mut R) -> io::Result<Self> {
        Ok(Self {
            s: Vec3::read(buffer)?,
            s_offset: buffer.read_f32::<LittleEndian>()?,
            t: Vec3::read(buffer)?,
            t_offset: buffer.read_f32::<LittleEndian>()?,
            tex_id: buffer.read_i32::<LittleEndian>()?,
            flags: buffer.read_i32::<LittleEndian>()?,
        })
    }
}

impl Lump for BSPTexInfo {
    fn max() -> usize {
        MAX_MAP_TEXINFO
    }

    fn lump_type() -> LumpType {
        LumpType::TexInfo
    }
}

/// Header shared by embedded and archived textures.
///
/// Offsets are relative to the start of this header. When the first offset is zero the pixels
/// are not stored in the map and must be looked up by name in a wad.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BSPMipTex {
    pub name: [u8; 16],
    pub width: u32,
    pub height: u32,
    pub offsets: [u32; MIP_LEVELS],
}

impl BSPMipTex {
    pub fn name(&self) -> String {
        cleanup_name(&self.name)
    }

    pub fn is_external(&self) -> bool {
        self.offsets[0] == 0
    }
}

impl BinaryData for BSPMipTex {
    const SIZE: usize = 40;

    fn read<R: Read>(buffer: &mut R) -> io::Result<Self> {
        let name = read_name(buffer)?;
        let width = buffer.read_u32::<LittleEndian>()?;
        let height = buffer.read_u32::<LittleEndian>()?;
        let mut offsets = [0; MIP_LEVELS];
        buffer.read_u32_into::<LittleEndian>(&mut offsets)?;
        Ok(Self {
            name,
            width,
            height,
            offsets,
        })
    }
}

/// Reads the mip texture lump directory: a count followed by one offset per texture slot.
///
/// `None` marks a slot with offset -1.
pub fn mip_texture_offsets(lump: &[u8]) -> Result<Vec<Option<usize>>, BspError> {
    if lump.is_empty() {
        return Ok(Vec::new());
    }
    let mut buffer = lump;
    let count = buffer.read_i32::<LittleEndian>()?;
    let count = usize::try_from(count)
        .map_err(|_| BspError::corrupt(format!("negative mip texture count {count}")))?;

    if 4 + count * 4 > lump.len() {
        return Err(BspError::corrupt(format!(
            "mip texture directory of {count} entries does not fit in {} bytes",
            lump.len()
        )));
    }

    (0..count)
        .map(|_| -> Result<Option<usize>, BspError> {
            let ofs = buffer.read_i32::<LittleEndian>()?;
            Ok(match ofs {
                -1 => None,
                o if o >= 0 && (o as usize) < lump.len() => Some(o as usize),
                o => {
                    return Err(BspError::corrupt(format!(
                        "mip texture offset {o} outside lump of {} bytes",
                        lump.len()
                    )))
                }
            })
        })
        .collect()
}
