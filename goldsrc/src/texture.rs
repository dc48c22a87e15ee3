use std::sync::Arc;

use crate::{
    binaries::BinaryData,
    bsp::{
        consts::{BSP_VERSION_QUAKE, MAX_MAP_TEXTURES},
        textures::{mip_texture_offsets, BSPMipTex},
    },
    error::{BspError, LoadWarning, MipTexError},
    game_data::MissingTexturePolicy,
    palette::{Palette, PALETTE_BYTES},
    wad::Wad3,
};

/// Largest side accepted for a mip texture.
const MAX_TEXTURE_SIZE: u32 = 4096;

/// Decoded level 0 of a mip texture, RGB8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Texture {
    name: String,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Texture {
    pub fn from_indices(
        name: String,
        width: u32,
        height: u32,
        indices: &[u8],
        palette: &Palette,
    ) -> Self {
        Self {
            name,
            width,
            height,
            pixels: palette.expand_indices(indices),
        }
    }

    /// Single colour texture, used in place of textures that cannot be found.
    pub fn solid(name: String, width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let texels = width as usize * height as usize;
        Self {
            name,
            width,
            height,
            pixels: rgb.repeat(texels),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// Decodes a mip texture starting at `bytes[0]`.
///
/// Without a `shared` palette the palette is read from behind the last mip level, as stored
/// by wad3 archives and version 30 maps.
pub fn decode_miptex(bytes: &[u8], shared: Option<&Palette>) -> Result<Texture, MipTexError> {
    let header = BSPMipTex::from_bytes(bytes).map_err(|_| MipTexError {
        name: String::new(),
        reason: "header truncated",
    })?;
    let name = header.name();
    let fail = |reason| MipTexError {
        name: name.clone(),
        reason,
    };

    let (w, h) = (header.width, header.height);
    if w == 0 || h == 0 || w > MAX_TEXTURE_SIZE || h > MAX_TEXTURE_SIZE {
        return Err(fail("bad dimensions"));
    }
    let texels = w as usize * h as usize;

    let start = header.offsets[0] as usize;
    let indices = bytes
        .get(start..start + texels)
        .ok_or_else(|| fail("pixels out of bounds"))?;

    let embedded;
    let palette = match shared {
        Some(palette) => palette,
        None => {
            // smallest mip level, then a 2 byte colour count
            let ofs = header.offsets[3] as usize + (w as usize / 8) * (h as usize / 8) + 2;
            let raw = bytes
                .get(ofs..ofs + PALETTE_BYTES)
                .ok_or_else(|| fail("palette out of bounds"))?;
            embedded = Palette::from_bytes(raw).map_err(|_| fail("bad palette"))?;
            &embedded
        }
    };

    Ok(Texture::from_indices(name.clone(), w, h, indices, palette))
}

/// Turns the mip texture lump into decoded textures.
///
/// Embedded textures are decoded in place, external ones are looked up by name in the wads
/// in order, the first archive holding the name wins.
pub struct TextureResolver<'a> {
    version: i32,
    palette: &'a Palette,
    wads: &'a [Wad3],
    policy: MissingTexturePolicy,
}

impl<'a> TextureResolver<'a> {
    pub fn new(
        version: i32,
        palette: &'a Palette,
        wads: &'a [Wad3],
        policy: MissingTexturePolicy,
    ) -> Self {
        Self {
            version,
            palette,
            wads,
            policy,
        }
    }

    /// One entry per texture slot, `None` where the slot is empty or unresolved.
    pub fn resolve_all(
        &self,
        lump: &[u8],
        warnings: &mut Vec<LoadWarning>,
    ) -> Result<Vec<Option<Arc<Texture>>>, BspError> {
        let offsets = mip_texture_offsets(lump)?;
        if offsets.len() > MAX_MAP_TEXTURES {
            log::warn!(
                "{} textures, engine limit is {}",
                offsets.len(),
                MAX_MAP_TEXTURES
            );
        }

        let mut textures = Vec::with_capacity(offsets.len());
        for (tex_id, offset) in offsets.into_iter().enumerate() {
            let Some(offset) = offset else {
                log::warn!("Texture slot {tex_id} is empty");
                warnings.push(LoadWarning::AbsentTextureSlot { tex_id });
                textures.push(None);
                continue;
            };
            textures.push(self.resolve(&lump[offset..], warnings)?);
        }
        Ok(textures)
    }

    /// Resolves the mip texture at the start of `bytes`.
    pub fn resolve(
        &self,
        bytes: &[u8],
        warnings: &mut Vec<LoadWarning>,
    ) -> Result<Option<Arc<Texture>>, BspError> {
        let header = BSPMipTex::from_bytes(bytes)
            .map_err(|_| BspError::corrupt("mip texture header truncated"))?;

        if !header.is_external() {
            let shared = (self.version == BSP_VERSION_QUAKE).then_some(self.palette);
            return Ok(Some(Arc::new(decode_miptex(bytes, shared)?)));
        }

        let name = header.name();
        if let Some(texture) = self.find_in_wads(&name) {
            log::debug!("Texture {name} found in wad");
            return Ok(Some(texture.clone()));
        }

        match self.policy {
            MissingTexturePolicy::Fail => Err(BspError::MissingTexture(name)),
            MissingTexturePolicy::Skip => {
                log::warn!("Texture {name} not found, surfaces using it are skipped");
                warnings.push(LoadWarning::MissingTexture { name });
                Ok(None)
            }
            MissingTexturePolicy::Placeholder => {
                log::warn!("Texture {name} not found, using a placeholder");
                warnings.push(LoadWarning::MissingTexture { name: name.clone() });
                Ok(Some(Arc::new(Texture::solid(
                    name,
                    header.width.clamp(1, MAX_TEXTURE_SIZE),
                    header.height.clamp(1, MAX_TEXTURE_SIZE),
                    [255, 255, 255],
                ))))
            }
        }
    }

    fn find_in_wads(&self, name: &str) -> Option<&Arc<Texture>> {
        self.wads.iter().find_map(|wad| wad.get(name))
    }
}
