use std::fmt;

use byteorder::{LittleEndian, ReadBytesExt};
use num_traits::FromPrimitive;

use super::{
    consts::{LumpType, BSP_VERSION_GOLDSRC, BSP_VERSION_QUAKE, HEADER_LUMPS},
    lump::BSPLump,
};
use crate::{binaries::BinaryData, error::BspError};

#[derive(Copy, Clone, PartialEq, Eq)]
pub struct BSPHeader {
    version: i32,
    lumps: [BSPLump; HEADER_LUMPS],
}

impl fmt::Debug for BSPHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("BSPHeader");
        s.field("version", &self.version);
        for (i, lump) in self.lumps.iter().enumerate() {
            if let Some(ty) = LumpType::from_usize(i) {
                s.field(&format!("{ty:?}"), &lump.raw());
            }
        }
        s.finish()
    }
}

impl BSPHeader {
    /// 4 byte version followed by the lump directory.
    pub const SIZE: usize = 4 + HEADER_LUMPS * BSPLump::SIZE;

    /// Reads and validates the header against the buffer it came from.
    ///
    /// Every lump must lie inside `data` and array lumps must be a whole number of records,
    /// so nothing downstream has to re-check the directory.
    pub fn parse(data: &[u8]) -> Result<Self, BspError> {
        let mut buffer = data;

        if data.len() < 4 {
            return Err(BspError::corrupt(format!(
                "file is {} bytes, too short for a header",
                data.len()
            )));
        }
        let version = buffer.read_i32::<LittleEndian>()?;
        if version != BSP_VERSION_QUAKE && version != BSP_VERSION_GOLDSRC {
            return Err(BspError::UnsupportedVersion(version));
        }
        if data.len() < Self::SIZE {
            return Err(BspError::corrupt(format!(
                "file is {} bytes, too short for a header",
                data.len()
            )));
        }

        let mut lumps = [BSPLump::default(); HEADER_LUMPS];
        for lump in lumps.iter_mut() {
            *lump = BSPLump::read(&mut buffer)?;
        }

        let header = Self { version, lumps };
        header.validate(data.len())?;
        Ok(header)
    }

    fn validate(&self, file_len: usize) -> Result<(), BspError> {
        for (i, lump) in self.lumps.iter().enumerate() {
            let Some(ty) = LumpType::from_usize(i) else {
                continue;
            };
            let (ofs, len) = lump.raw();

            if ofs < 0 || len < 0 {
                return Err(BspError::corrupt(format!(
                    "{ty:?} lump has negative offset {ofs} or size {len}"
                )));
            }
            if ofs as usize + len as usize > file_len {
                return Err(BspError::corrupt(format!(
                    "{ty:?} lump {ofs}+{len} runs past the end of the file ({file_len} bytes)"
                )));
            }
            if let Some(stride) = ty.stride() {
                if len as usize % stride != 0 {
                    return Err(BspError::corrupt(format!(
                        "{ty:?} lump size {len} is not a multiple of {stride}"
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn get_lump_header(&self, lump: LumpType) -> &BSPLump {
        &self.lumps[lump as usize]
    }
}
