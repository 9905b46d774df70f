pub mod automap;
pub mod defs;
pub mod fixed;
pub mod sim;
pub mod wad;
pub mod world;
