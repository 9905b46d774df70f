//! Just enough game simulation to give the map something to follow:
//! walking players, monsters that wake and chase, short-lived missiles.

mod components;
mod spacial;
mod systems;
mod tic;

pub use components::{
    ActorFlags, Class, Facing, InputCmd, Lifetime, Player, Position, Target, Velocity,
};
pub use spacial::{ThingGrid, ThingSpatial};
pub use systems::{angle_to, player_input};
pub use tic::{SIM_FPS, TicRunner};
