use std::{
    io::{self, Read},
    sync::Arc,
};

use ahash::AHashMap;
use byteorder::{LittleEndian, ReadBytesExt};

use crate::{
    binaries::{cleanup_name, read_name, BinaryData},
    error::WadError,
    game_data::CompressedEntryPolicy,
    texture::{decode_miptex, Texture},
};

// https://developer.valvesoftware.com/wiki/WAD
//
// A wad starts with the "WAD3" magic, the number of directory entries and the offset of the
// directory. The directory is an array of 32 byte entries pointing at the lumps, which are
// mip textures laid out exactly like the ones embedded in version 30 maps.

pub const WAD3_MAGIC: &[u8; 4] = b"WAD3";
/// Entry type of mip textures, the only kind loaded.
pub const TYP_MIPTEX: u8 = 0x43;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WadEntry {
    pub offset: i32,    // from the start of the file
    pub disk_size: i32, // size in the archive
    pub size: i32,      // uncompressed size
    pub kind: u8,
    pub compressed: u8,
    pub padding: u16,
    pub name: [u8; 16],
}

impl WadEntry {
    pub fn name(&self) -> String {
        cleanup_name(&self.name)
    }
}

impl BinaryData for WadEntry {
    const SIZE: usize = 32;

    fn read<R: Read>(buffer: &mut R) -> io::Result<Self> {
        Ok(Self {
            offset: buffer.read_i32::<LittleEndian>()?,
            disk_size: buffer.read_i32::<LittleEndian>()?,
            size: buffer.read_i32::<LittleEndian>()?,
            kind: buffer.read_u8()?,
            compressed: buffer.read_u8()?,
            padding: buffer.read_u16::<LittleEndian>()?,
            name: read_name(buffer)?,
        })
    }
}

/// Texture archive, decoded up front.
#[derive(Debug, Default)]
pub struct Wad3 {
    textures: AHashMap<String, Arc<Texture>>,
    skipped: Vec<String>,
}

impl Wad3 {
    pub fn parse(data: &[u8], policy: CompressedEntryPolicy) -> Result<Self, WadError> {
        let mut buffer = data;
        let mut magic = [0; 4];
        buffer.read_exact(&mut magic)?;
        if &magic != WAD3_MAGIC {
            return Err(WadError::InvalidMagic(magic));
        }
        let dir_count = buffer.read_i32::<LittleEndian>()?;
        let dir_offset = buffer.read_i32::<LittleEndian>()?;

        let (Ok(dir_count), Ok(dir_offset)) =
            (usize::try_from(dir_count), usize::try_from(dir_offset))
        else {
            return Err(WadError::CorruptData(format!(
                "directory {dir_count} entries at {dir_offset}"
            )));
        };
        let directory = data
            .get(dir_offset..dir_offset + dir_count * WadEntry::SIZE)
            .ok_or_else(|| {
                WadError::CorruptData(format!(
                    "directory of {dir_count} entries at {dir_offset} runs past the end ({} bytes)",
                    data.len()
                ))
            })?;

        let mut wad = Wad3::default();
        for raw in directory.chunks_exact(WadEntry::SIZE) {
            let entry = WadEntry::from_bytes(raw)?;
            let name = entry.name();

            if entry.compressed != 0 {
                match policy {
                    CompressedEntryPolicy::RejectArchive => {
                        return Err(WadError::UnsupportedCompression(name))
                    }
                    CompressedEntryPolicy::SkipEntry => {
                        log::warn!("WAD: {name} is compressed, skipping");
                        wad.skipped.push(name);
                        continue;
                    }
                }
            }

            if entry.kind != TYP_MIPTEX {
                log::debug!("WAD: {name} has type {:#x}, ignored", entry.kind);
                continue;
            }

            let start = usize::try_from(entry.offset)
                .ok()
                .filter(|&ofs| ofs < data.len())
                .ok_or_else(|| {
                    WadError::CorruptData(format!("{name} at offset {}", entry.offset))
                })?;
            let texture = decode_miptex(&data[start..], None)?;

            log::debug!("WAD: {name} {}x{}", texture.width(), texture.height());
            wad.textures.entry(name).or_insert_with(|| Arc::new(texture));
        }

        log::info!(
            "Loaded wad with {} textures, {} skipped",
            wad.textures.len(),
            wad.skipped.len()
        );
        Ok(wad)
    }

    /// Case insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&Arc<Texture>> {
        self.textures.get(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Names of compressed entries that were left out.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }
}
