pub mod level;
pub mod loader;
pub mod raw;

pub use level::{LevelError, MapLump, RawLevel};
pub use loader::{LoadError, load_level, load_palette};
pub use raw::{LumpInfo, Wad, WadError, WadKind};
