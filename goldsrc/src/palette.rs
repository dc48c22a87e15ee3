use crate::error::PaletteError;

pub const PALETTE_COLORS: usize = 256;
/// Size of a palette on disk: 256 RGB triples with no header.
pub const PALETTE_BYTES: usize = PALETTE_COLORS * 3;

/// Maps 8-bit texel indices to RGB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: [[u8; 3]; PALETTE_COLORS],
}

impl Palette {
    pub fn from_bytes(data: &[u8]) -> Result<Self, PaletteError> {
        if data.len() != PALETTE_BYTES {
            return Err(PaletteError::InvalidLength(data.len()));
        }
        let mut colors = [[0; 3]; PALETTE_COLORS];
        for (color, rgb) in colors.iter_mut().zip(data.chunks_exact(3)) {
            color.copy_from_slice(rgb);
        }
        Ok(Self { colors })
    }

    pub fn rgb(&self, index: u8) -> [u8; 3] {
        self.colors[index as usize]
    }

    /// Converts palette indices to tightly packed RGB8.
    pub fn expand_indices(&self, indices: &[u8]) -> Vec<u8> {
        indices.iter().flat_map(|&i| self.rgb(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient() -> Vec<u8> {
        (0..=255u8).flat_map(|i| [i, 0, 255 - i]).collect()
    }

    #[test]
    fn loads_palette_bytes() {
        let palette = Palette::from_bytes(&gradient()).unwrap();
        assert_eq!(palette.rgb(0), [0, 0, 255]);
        assert_eq!(palette.rgb(255), [255, 0, 0]);
    }

    #[test]
    fn expands_indices_to_rgb() {
        let palette = Palette::from_bytes(&[10u8, 20, 30].repeat(256)).unwrap();
        assert_eq!(
            palette.expand_indices(&[0, 255]),
            vec![10, 20, 30, 10, 20, 30]
        );
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(
            Palette::from_bytes(&[0; 767]),
            Err(PaletteError::InvalidLength(767))
        );
        assert_eq!(
            Palette::from_bytes(&[0; 769]),
            Err(PaletteError::InvalidLength(769))
        );
    }
}
