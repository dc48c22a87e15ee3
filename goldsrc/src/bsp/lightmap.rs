use glam::{DVec2, Vec2};

use super::consts::BSP_VERSION_QUAKE;
use crate::error::BspError;

/// Width and height of the tile every surface lightmap is copied into.
pub const LIGHTMAP_SIZE: usize = 32;
pub const LIGHTMAP_CHANNELS: usize = 3;
/// World units covered by one light sample.
pub const LUXEL_SIZE: f64 = 16.0;

/// Light samples of one surface in the top left corner of a fixed 32x32 RGB tile.
///
/// Texels outside the used block are full bright.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LightmapTile {
    width: usize,
    height: usize,
    data: Box<[u8]>,
}

impl LightmapTile {
    /// Tile used by surfaces without light data.
    pub fn full_bright() -> Self {
        Self {
            width: 1,
            height: 1,
            data: vec![255; LIGHTMAP_SIZE * LIGHTMAP_SIZE * LIGHTMAP_CHANNELS].into_boxed_slice(),
        }
    }

    /// Used block size in texels.
    pub fn block_size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// RGB8 texels, rows of `LIGHTMAP_SIZE * 3` bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn texel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= LIGHTMAP_SIZE || y >= LIGHTMAP_SIZE {
            return None;
        }
        let i = (y * LIGHTMAP_SIZE + x) * LIGHTMAP_CHANNELS;
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }
}

/// Texture space bounds of a surface, snapped outwards to the 16 unit light grid.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LightmapExtents {
    min: DVec2,
    max: DVec2,
}

impl LightmapExtents {
    /// Bounds of the projected vertices. Projections must be done in double precision, see
    /// [`super::textures::BSPTexInfo::project_f64`].
    pub fn from_points(points: impl IntoIterator<Item = DVec2>) -> Self {
        let (min, max) = points.into_iter().fold(
            (DVec2::splat(f64::MAX), DVec2::splat(f64::MIN)),
            |(min, max), p| (min.min(p), max.max(p)),
        );
        if min.x > max.x {
            return Self {
                min: DVec2::ZERO,
                max: DVec2::ZERO,
            };
        }

        Self {
            min: (min / LUXEL_SIZE).floor() * LUXEL_SIZE,
            max: (max / LUXEL_SIZE).ceil() * LUXEL_SIZE,
        }
    }

    pub fn min(&self) -> DVec2 {
        self.min
    }

    pub fn max(&self) -> DVec2 {
        self.max
    }

    pub fn extent(&self) -> DVec2 {
        self.max - self.min
    }

    /// Number of light samples along each axis, saturating for absurd extents.
    pub fn block_size(&self) -> (usize, usize) {
        let blocks = (self.extent() / LUXEL_SIZE).floor();
        (
            (blocks.x as usize).saturating_add(1),
            (blocks.y as usize).saturating_add(1),
        )
    }

    /// Lightmap coordinate of a projected vertex inside the tile.
    ///
    /// Clamped half a block in from the used area so filtering never picks up the
    /// full bright border.
    pub fn lightmap_uv(&self, st: DVec2) -> Vec2 {
        let (w, h) = self.block_size();
        let extent = self.extent();
        Vec2::new(
            remap(st.x, self.min.x, extent.x, w),
            remap(st.y, self.min.y, extent.y, h),
        )
    }
}

fn remap(value: f64, min: f64, extent: f64, blocks: usize) -> f32 {
    let size = LIGHTMAP_SIZE as f64;
    let frac = if extent == 0.0 {
        0.0
    } else {
        (value - min) / extent
    };
    let hi = (blocks as f64 - 1.0) / size;
    let lo = 1.0 / size;
    (frac * hi).clamp(lo, hi.max(lo)) as f32
}

/// Lightmap coordinate for surfaces drawn with [`LightmapTile::full_bright`].
pub fn full_bright_uv() -> Vec2 {
    Vec2::splat(1.0 / LIGHTMAP_SIZE as f32)
}

/// Copies the light samples of one surface out of the lighting lump.
///
/// Quake maps store one intensity per sample which is spread over the three channels,
/// later versions store RGB.
pub fn extract_lightmap(
    lighting: &[u8],
    offset: usize,
    extents: &LightmapExtents,
    version: i32,
) -> Result<LightmapTile, BspError> {
    if !extents.extent().is_finite() {
        return Err(BspError::corrupt(format!(
            "lightmap extents {:?} to {:?} are not finite",
            extents.min(),
            extents.max()
        )));
    }
    let (width, height) = extents.block_size();
    if width > LIGHTMAP_SIZE || height > LIGHTMAP_SIZE {
        return Err(BspError::LightmapTooLarge { width, height });
    }

    let channels = if version == BSP_VERSION_QUAKE {
        1
    } else {
        LIGHTMAP_CHANNELS
    };
    let len = width * height * channels;
    let samples = lighting.get(offset..offset + len).ok_or_else(|| {
        BspError::corrupt(format!(
            "lightmap {width}x{height} at {offset} runs past the lighting lump ({} bytes)",
            lighting.len()
        ))
    })?;

    let mut data = vec![255; LIGHTMAP_SIZE * LIGHTMAP_SIZE * LIGHTMAP_CHANNELS];
    for y in 0..height {
        for x in 0..width {
            let src = (y * width + x) * channels;
            let dst = (y * LIGHTMAP_SIZE + x) * LIGHTMAP_CHANNELS;
            if channels == 1 {
                data[dst..dst + 3].fill(samples[src]);
            } else {
                data[dst..dst + 3].copy_from_slice(&samples[src..src + 3]);
            }
        }
    }

    Ok(LightmapTile {
        width,
        height,
        data: data.into_boxed_slice(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extents(points: &[(f64, f64)]) -> LightmapExtents {
        LightmapExtents::from_points(points.iter().map(|&(x, y)| DVec2::new(x, y)))
    }

    #[test]
    fn snaps_to_light_grid() {
        let e = extents(&[(-3.0, 17.0), (40.0, 20.0), (10.0, 47.5)]);
        assert_eq!(e.min(), DVec2::new(-16.0, 16.0));
        assert_eq!(e.max(), DVec2::new(48.0, 48.0));
        assert_eq!(e.block_size(), (5, 3));
    }

    #[test]
    fn aligned_points_stay_put() {
        let e = extents(&[(0.0, 0.0), (64.0, 64.0)]);
        assert_eq!(e.extent(), DVec2::new(64.0, 64.0));
        assert_eq!(e.block_size(), (5, 5));
    }

    #[test]
    fn uv_is_clamped_inside_block() {
        let e = extents(&[(0.0, 0.0), (64.0, 32.0)]);
        let (w, h) = e.block_size();
        assert_eq!((w, h), (5, 3));

        let lo = e.lightmap_uv(DVec2::new(0.0, 0.0));
        assert_eq!(lo, Vec2::splat(1.0 / 32.0));

        let hi = e.lightmap_uv(DVec2::new(64.0, 32.0));
        assert_eq!(hi, Vec2::new(4.0 / 32.0, 2.0 / 32.0));

        let mid = e.lightmap_uv(DVec2::new(32.0, 16.0));
        assert_eq!(mid, Vec2::new(2.0 / 32.0, 1.0 / 32.0));
    }

    #[test]
    fn zero_extent_uses_lower_bound() {
        let e = extents(&[(16.0, 16.0), (16.0, 16.0)]);
        assert_eq!(e.block_size(), (1, 1));
        assert_eq!(e.lightmap_uv(DVec2::new(16.0, 16.0)), full_bright_uv());
    }

    #[test]
    fn copies_rgb_samples() {
        let e = extents(&[(0.0, 0.0), (16.0, 0.0)]);
        assert_eq!(e.block_size(), (2, 1));
        let lighting = [9, 9, 9, 1, 2, 3, 4, 5, 6];

        let tile = extract_lightmap(&lighting, 3, &e, 30).unwrap();
        assert_eq!(tile.block_size(), (2, 1));
        assert_eq!(tile.texel(0, 0), Some([1, 2, 3]));
        assert_eq!(tile.texel(1, 0), Some([4, 5, 6]));
        assert_eq!(tile.texel(2, 0), Some([255, 255, 255]));
        assert_eq!(tile.texel(0, 1), Some([255, 255, 255]));
        assert_eq!(tile.data().len(), 32 * 32 * 3);
    }

    #[test]
    fn replicates_mono_samples() {
        let e = extents(&[(0.0, 0.0), (16.0, 16.0)]);
        let tile = extract_lightmap(&[10, 20, 30, 40], 0, &e, 29).unwrap();
        assert_eq!(tile.texel(0, 0), Some([10, 10, 10]));
        assert_eq!(tile.texel(1, 1), Some([40, 40, 40]));
        assert_eq!(tile.texel(31, 31), Some([255, 255, 255]));
    }

    #[test]
    fn too_large() {
        let e = extents(&[(0.0, 0.0), (512.0, 16.0)]);
        assert!(matches!(
            extract_lightmap(&[0; 4096], 0, &e, 30),
            Err(BspError::LightmapTooLarge {
                width: 33,
                height: 2
            })
        ));
    }

    #[test]
    fn huge_extent_is_too_large() {
        let e = extents(&[(0.0, 0.0), (1e21, 16.0)]);
        assert_eq!(e.block_size(), (usize::MAX, 2));
        assert!(matches!(
            extract_lightmap(&[0; 64], 0, &e, 30),
            Err(BspError::LightmapTooLarge {
                width: usize::MAX,
                height: 2
            })
        ));
    }

    #[test]
    fn infinite_extent_is_corrupt() {
        let e = extents(&[(0.0, 0.0), (f64::INFINITY, 16.0)]);
        assert!(matches!(
            extract_lightmap(&[0; 64], 0, &e, 30),
            Err(BspError::CorruptData(_))
        ));
    }

    #[test]
    fn truncated_lighting() {
        let e = extents(&[(0.0, 0.0), (16.0, 16.0)]);
        assert!(matches!(
            extract_lightmap(&[0; 11], 0, &e, 30),
            Err(BspError::CorruptData(_))
        ));
    }

    #[test]
    fn full_bright_tile() {
        let tile = LightmapTile::full_bright();
        assert!(tile.data().iter().all(|&b| b == 255));
        assert_eq!(tile.texel(32, 0), None);
    }
}
