mod builder;
pub mod geometry;
mod palette;

pub use geometry::{
    Aabb, Level, Linedef, LinedefFlags, LinedefId, SECRET_SPECIAL, Sector, SectorId, Sidedef,
    SidedefId, TELEPORT_SPECIAL, Thing, Vertex, VertexId,
};

pub use builder::LevelBuilder;
pub use palette::Palette;
