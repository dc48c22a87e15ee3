use std::io::{self, Read};

use byteorder::{LittleEndian, ReadBytesExt};
use glam::Vec3;

/// A fixed size record stored little-endian on disk.
///
/// Records are decoded field by field so the in-memory layout never has to match the file.
pub trait BinaryData: Sized {
    /// Size of one record on disk, in bytes.
    const SIZE: usize;

    fn read<R: Read>(buffer: &mut R) -> io::Result<Self>;

    /// Decodes one record from the start of `bytes`.
    fn from_bytes(mut bytes: &[u8]) -> io::Result<Self> {
        Self::read(&mut bytes)
    }
}

impl BinaryData for Vec3 {
    const SIZE: usize = 12;

    fn read<R: Read>(buffer: &mut R) -> io::Result<Self> {
        Ok(Vec3::new(
            buffer.read_f32::<LittleEndian>()?,
            buffer.read_f32::<LittleEndian>()?,
            buffer.read_f32::<LittleEndian>()?,
        ))
    }
}

pub(crate) fn read_i16x3<R: Read>(buffer: &mut R) -> io::Result<[i16; 3]> {
    Ok([
        buffer.read_i16::<LittleEndian>()?,
        buffer.read_i16::<LittleEndian>()?,
        buffer.read_i16::<LittleEndian>()?,
    ])
}

pub(crate) fn read_name<R: Read>(buffer: &mut R) -> io::Result<[u8; 16]> {
    let mut name = [0; 16];
    buffer.read_exact(&mut name)?;
    Ok(name)
}

/// Texture names are NUL padded and compared without case.
pub fn cleanup_name(bytes: &[u8]) -> String {
    let len = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..len])
        .trim()
        .to_ascii_lowercase()
}
