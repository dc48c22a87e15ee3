use std::{fmt, io};

use thiserror::Error;

use crate::bsp::consts::LumpType;

#[derive(Debug, Error)]
pub enum BspError {
    #[error("unsupported bsp version {0}, expected 29 or 30")]
    UnsupportedVersion(i32),
    #[error("corrupt map data: {0}")]
    CorruptData(String),
    #[error("{lump:?} index {index} out of range ({count} entries)")]
    IndexOutOfRange {
        lump: LumpType,
        index: usize,
        count: usize,
    },
    #[error("lightmap block {width}x{height} does not fit a 32x32 tile")]
    LightmapTooLarge { width: usize, height: usize },
    #[error("texture {0:?} not found in the map or any wad")]
    MissingTexture(String),
    #[error(transparent)]
    Wad(#[from] WadError),
    #[error(transparent)]
    Palette(#[from] PaletteError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl BspError {
    pub(crate) fn corrupt(msg: impl Into<String>) -> Self {
        Self::CorruptData(msg.into())
    }
}

#[derive(Debug, Error)]
pub enum WadError {
    #[error("bad wad magic {0:?}, expected WAD3")]
    InvalidMagic([u8; 4]),
    #[error("wad entry {0:?} is compressed")]
    UnsupportedCompression(String),
    #[error("corrupt wad data: {0}")]
    CorruptData(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaletteError {
    #[error("palette must be exactly 768 bytes, got {0}")]
    InvalidLength(usize),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Ini(#[from] ini::Error),
    #[error(transparent)]
    Parse(#[from] ini::ParseError),
    #[error("missing [{0}] section")]
    MissingSection(&'static str),
    #[error("missing key {key:?} in [{section}]")]
    MissingKey {
        section: &'static str,
        key: &'static str,
    },
    #[error("{value:?} is not a valid {key}")]
    InvalidPolicy { key: &'static str, value: String },
}

/// Malformed miptex payload, shared by embedded and archived textures.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("miptex {name:?}: {reason}")]
pub struct MipTexError {
    pub name: String,
    pub reason: &'static str,
}

impl From<MipTexError> for BspError {
    fn from(e: MipTexError) -> Self {
        Self::CorruptData(e.to_string())
    }
}

impl From<MipTexError> for WadError {
    fn from(e: MipTexError) -> Self {
        Self::CorruptData(e.to_string())
    }
}

/// Something wrong with the input that did not stop the map from loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// Mip texture slot with offset -1.
    AbsentTextureSlot { tex_id: usize },
    MissingTexture { name: String },
    /// Surface with fewer than three edges.
    DegenerateSurface { surface: usize, edges: usize },
    UnlitSurfaceDropped { surface: usize },
    CompressedEntrySkipped { name: String },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AbsentTextureSlot { tex_id } => write!(f, "texture slot {tex_id} is empty"),
            Self::MissingTexture { name } => write!(f, "texture {name:?} could not be resolved"),
            Self::DegenerateSurface { surface, edges } => {
                write!(f, "surface {surface} has only {edges} edges")
            }
            Self::UnlitSurfaceDropped { surface } => {
                write!(f, "surface {surface} has no lightmap and was dropped")
            }
            Self::CompressedEntrySkipped { name } => {
                write!(f, "compressed wad entry {name:?} skipped")
            }
        }
    }
}
