use glam::IVec2;
use hecs::Entity;

use crate::defs::{MobjFlags, ThingInfo};
use crate::fixed::Angle;

/// World-space position (16.16); `prev` is the value at the start of the
/// tic, for drawing between tics.
#[derive(Debug, Clone, Copy)]
pub struct Position {
    pub cur: IVec2,
    pub prev: IVec2,
}

impl Position {
    pub fn at(p: IVec2) -> Self {
        Self { cur: p, prev: p }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Facing {
    pub cur: Angle,
    pub prev: Angle,
}

impl Facing {
    pub fn at(a: Angle) -> Self {
        Self { cur: a, prev: a }
    }
}

/// Movement per tic, world fixed point.
#[derive(Debug, Clone, Copy, Default)]
pub struct Velocity(pub IVec2);

#[derive(Debug, Copy, Clone)]
pub struct Class(pub &'static ThingInfo);

#[derive(Clone, Copy, Debug)]
pub struct ActorFlags(pub MobjFlags);

/// What a monster is after, once woken.
#[derive(Clone, Copy, Debug, Default)]
pub struct Target(pub Option<Entity>);

#[derive(Clone, Copy, Debug)]
pub struct Player {
    pub index: usize,
    pub invisible: bool,
    /// Carries the computer area map.
    pub allmap: bool,
}

/// Tics left before the entity is removed.
#[derive(Clone, Copy, Debug)]
pub struct Lifetime(pub u32);

#[derive(Clone, Copy, Debug, Default)]
pub struct InputCmd {
    pub forward: i32, // -1, 0, +1
    pub strafe: i32,  // -1 (left) … +1 (right)
    pub turn: i32,    // -1 (left) … +1 (right)
    pub run: bool,    // Shift
    pub fire: bool,   // Space
}
