use std::{
    path::{Path, PathBuf},
    str::FromStr,
    time::Instant,
};

use common::vfile::VFileSystem;
use ini::{Ini, Properties};

use crate::{
    error::{BspError, ConfigError},
    map::Map,
    palette::Palette,
    wad::Wad3,
};

/// What to do with an external texture no wad provides.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MissingTexturePolicy {
    /// Leave the slot empty and drop the surfaces using it.
    #[default]
    Skip,
    /// Substitute a white texture of the declared size.
    Placeholder,
    Fail,
}

/// What to do with surfaces that carry no light samples.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum UnlitSurfacePolicy {
    /// Draw them with a shared full bright lightmap.
    #[default]
    FullBright,
    Drop,
}

/// What to do with compressed wad entries, which are not supported.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CompressedEntryPolicy {
    #[default]
    SkipEntry,
    RejectArchive,
}

impl FromStr for MissingTexturePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "placeholder" => Ok(Self::Placeholder),
            "fail" => Ok(Self::Fail),
            _ => Err(ConfigError::InvalidPolicy {
                key: "missing_texture",
                value: s.to_owned(),
            }),
        }
    }
}

impl FromStr for UnlitSurfacePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full_bright" => Ok(Self::FullBright),
            "drop" => Ok(Self::Drop),
            _ => Err(ConfigError::InvalidPolicy {
                key: "unlit_surface",
                value: s.to_owned(),
            }),
        }
    }
}

impl FromStr for CompressedEntryPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::SkipEntry),
            "reject" => Ok(Self::RejectArchive),
            _ => Err(ConfigError::InvalidPolicy {
                key: "compressed_entry",
                value: s.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    pub missing_texture: MissingTexturePolicy,
    pub unlit_surface: UnlitSurfacePolicy,
    pub compressed_entry: CompressedEntryPolicy,
}

impl LoadOptions {
    /// Reads the optional `[policy]` section, absent keys keep their defaults.
    pub fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut options = Self::default();
        let Some(policy) = ini.section(Some("policy")) else {
            return Ok(options);
        };

        if let Some(v) = policy.get("missing_texture") {
            options.missing_texture = v.parse()?;
        }
        if let Some(v) = policy.get("unlit_surface") {
            options.unlit_surface = v.parse()?;
        }
        if let Some(v) = policy.get("compressed_entry") {
            options.compressed_entry = v.parse()?;
        }
        Ok(options)
    }
}

/// Where a map and its palette and wads live, plus how to load them.
///
/// ```ini
/// [map]
/// path = maps/c1a0.bsp
/// palette = gfx/palette.lmp
/// wad = halflife.wad
/// wad = decals.wad
///
/// [policy]
/// missing_texture = placeholder
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    map: PathBuf,
    palette: PathBuf,
    wads: Vec<PathBuf>,
    options: LoadOptions,
}

impl MapConfig {
    pub fn new(map: impl Into<PathBuf>, palette: impl Into<PathBuf>) -> Self {
        Self {
            map: map.into(),
            palette: palette.into(),
            wads: Vec::new(),
            options: LoadOptions::default(),
        }
    }

    pub fn with_wad(mut self, wad: impl Into<PathBuf>) -> Self {
        self.wads.push(wad.into());
        self
    }

    pub fn with_options(mut self, options: LoadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let section = ini
            .section(Some("map"))
            .ok_or(ConfigError::MissingSection("map"))?;

        Ok(Self {
            map: required(section, "path")?.into(),
            palette: required(section, "palette")?.into(),
            wads: section.get_all("wad").map(PathBuf::from).collect(),
            options: LoadOptions::from_ini(ini)?,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_ini(&Ini::load_from_file(path)?)
    }

    pub fn map(&self) -> &Path {
        &self.map
    }

    pub fn palette(&self) -> &Path {
        &self.palette
    }

    /// Searched in order when resolving external textures.
    pub fn wads(&self) -> &[PathBuf] {
        &self.wads
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }
}

fn required<'a>(section: &'a Properties, key: &'static str) -> Result<&'a str, ConfigError> {
    section
        .get(key)
        .ok_or(ConfigError::MissingKey {
            section: "map",
            key,
        })
}

/// Reads the files named by `config` and builds the map.
pub fn load_map(config: &MapConfig, fs: &VFileSystem) -> Result<Map, BspError> {
    log::info!("Loading map {:?}", config.map());
    let now = Instant::now();

    let palette = Palette::from_bytes(&fs.read(config.palette())?)?;

    let mut wads = Vec::with_capacity(config.wads().len());
    for path in config.wads() {
        log::info!("Loading wad {path:?}");
        wads.push(Wad3::parse(
            &fs.read(path)?,
            config.options().compressed_entry,
        )?);
    }

    let map = Map::from_parts(fs.read(config.map())?, palette, wads, *config.options())?;

    log::info!("Took {:?}", now.elapsed());
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_maps::{gray_palette, miptex_embedded, quad_map, wad3_bytes};

    #[test]
    fn parses_config() {
        let ini = Ini::load_from_str(
            "[map]\npath = maps/c1a0.bsp\npalette = gfx/palette.lmp\nwad = halflife.wad\nwad = decals.wad\n\
             [policy]\nmissing_texture = Placeholder\nunlit_surface = drop\n",
        )
        .unwrap();
        let config = MapConfig::from_ini(&ini).unwrap();

        assert_eq!(config.map(), Path::new("maps/c1a0.bsp"));
        assert_eq!(config.palette(), Path::new("gfx/palette.lmp"));
        assert_eq!(
            config.wads(),
            &[PathBuf::from("halflife.wad"), PathBuf::from("decals.wad")]
        );
        assert_eq!(
            *config.options(),
            LoadOptions {
                missing_texture: MissingTexturePolicy::Placeholder,
                unlit_surface: UnlitSurfacePolicy::Drop,
                compressed_entry: CompressedEntryPolicy::SkipEntry,
            }
        );
    }

    #[test]
    fn policies_default() {
        let ini = Ini::load_from_str("[map]\npath = a.bsp\npalette = p.lmp\n").unwrap();
        let config = MapConfig::from_ini(&ini).unwrap();
        assert!(config.wads().is_empty());
        assert_eq!(*config.options(), LoadOptions::default());
    }

    #[test]
    fn config_errors() {
        let ini = Ini::load_from_str("[other]\nx = 1\n").unwrap();
        assert!(matches!(
            MapConfig::from_ini(&ini),
            Err(ConfigError::MissingSection("map"))
        ));

        let ini = Ini::load_from_str("[map]\npath = a.bsp\n").unwrap();
        assert!(matches!(
            MapConfig::from_ini(&ini),
            Err(ConfigError::MissingKey { key: "palette", .. })
        ));

        let ini =
            Ini::load_from_str("[map]\npath = a.bsp\npalette = p\n[policy]\nunlit_surface = glow\n")
                .unwrap();
        assert!(matches!(
            MapConfig::from_ini(&ini),
            Err(ConfigError::InvalidPolicy { key: "unlit_surface", .. })
        ));
    }

    #[test]
    fn loads_through_file_system() {
        let palette = gray_palette();
        let wad = wad3_bytes(&[(
            "unused",
            false,
            miptex_embedded("unused", 8, 8, 0, Some(&palette[..])),
        )]);
        let fs = VFileSystem::from_files([
            ("maps/quad.bsp", quad_map(30)),
            ("gfx/palette.lmp", palette.clone()),
            ("extra.wad", wad),
        ]);
        let config = MapConfig::new("maps/quad.bsp", "gfx/palette.lmp").with_wad("extra.wad");

        let map = load_map(&config, &fs).unwrap();
        assert_eq!(map.leaf_count(), 2);
        assert_eq!(map.wads().len(), 1);
    }

    #[test]
    fn missing_file_is_io_error() {
        let fs = VFileSystem::from_files([("gfx/palette.lmp", gray_palette())]);
        let config = MapConfig::new("maps/none.bsp", "gfx/palette.lmp");
        assert!(matches!(load_map(&config, &fs), Err(BspError::Io(_))));
    }
}
