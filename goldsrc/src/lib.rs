pub mod binaries;
pub mod bsp;
pub mod error;
pub mod game_data;
pub mod map;
pub mod meshes;
pub mod palette;
pub mod prelude;
pub mod texture;
pub mod wad;

#[cfg(test)]
pub(crate) mod test_maps;

pub use error::{BspError, ConfigError, LoadWarning, PaletteError, WadError};
pub use game_data::{load_map, LoadOptions, MapConfig};
pub use map::Map;
