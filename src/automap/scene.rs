//! What the map reads from the game each tic and each frame.

use glam::{I64Vec2, IVec2};

use crate::fixed::{Angle, Fixed, lerp_point, world_to_map};
use crate::sim::ThingGrid;
use crate::world::Level;

pub const MAXPLAYERS: usize = 4;

/// A player as the map sees it: current and previous-tic pose in world
/// fixed point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerView {
    pub pos: IVec2,
    pub prev_pos: IVec2,
    pub angle: Angle,
    pub prev_angle: Angle,
    /// Partial invisibility; drawn near-black in netgames.
    pub invisible: bool,
    /// Computer area map power.
    pub allmap: bool,
}

impl PlayerView {
    /// A player that has not moved since the last tic.
    pub fn at(pos: IVec2, angle: Angle) -> Self {
        Self {
            pos,
            prev_pos: pos,
            angle,
            prev_angle: angle,
            invisible: false,
            allmap: false,
        }
    }

    #[inline]
    pub fn map_pos(&self) -> I64Vec2 {
        world_to_map(self.pos)
    }

    /// Pose `frac` of the way from the previous tic to this one.
    pub fn lerped(&self, frac: Fixed) -> (IVec2, Angle) {
        (
            lerp_point(self.prev_pos, self.pos, frac),
            self.prev_angle.lerp(self.angle, frac),
        )
    }
}

/// Borrowed snapshot of the game handed to the responder, ticker and
/// drawer.
pub struct AutomapWorld<'a> {
    pub level: &'a Level,
    pub players: [Option<PlayerView>; MAXPLAYERS],
    pub console: usize,
    pub things: Option<&'a ThingGrid>,
    pub netgame: bool,
    pub deathmatch: bool,
    pub spectator: Option<PlayerView>,
}

impl<'a> AutomapWorld<'a> {
    pub fn new(level: &'a Level) -> Self {
        Self {
            level,
            players: [None; MAXPLAYERS],
            console: 0,
            things: None,
            netgame: false,
            deathmatch: false,
            spectator: None,
        }
    }

    pub fn with_player(mut self, index: usize, view: PlayerView) -> Self {
        if let Some(slot) = self.players.get_mut(index) {
            *slot = Some(view);
        }
        self
    }

    /// The console player, falling back to the first one in game.
    pub fn console_player(&self) -> Option<&PlayerView> {
        self.players
            .get(self.console)
            .and_then(Option::as_ref)
            .or_else(|| self.players.iter().flatten().next())
    }

    /// Centre of the level's vertex extents, in map units.
    pub fn level_center(&self) -> I64Vec2 {
        let mut it = self.level.vertices.iter().map(|v| world_to_map(v.pos));
        let Some(first) = it.next() else {
            return I64Vec2::ZERO;
        };
        let (lo, hi) = it.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        (lo + hi) / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::{ANG90, FRACUNIT, MAPUNIT, from_int};
    use crate::world::LevelBuilder;

    #[test]
    fn console_falls_back_to_first_present() {
        let level = LevelBuilder::new("MAP01").build();
        let p = PlayerView::at(IVec2::new(from_int(5), 0), ANG90);
        let mut world = AutomapWorld::new(&level).with_player(2, p);
        world.console = 1;
        assert_eq!(world.console_player(), Some(&p));
        assert_eq!(AutomapWorld::new(&level).console_player(), None);
    }

    #[test]
    fn lerp_halfway() {
        let mut p = PlayerView::at(IVec2::new(from_int(10), 0), ANG90);
        p.prev_pos = IVec2::ZERO;
        p.prev_angle = Angle::ZERO;
        let (pos, ang) = p.lerped(FRACUNIT / 2);
        assert_eq!(pos, IVec2::new(from_int(5), 0));
        assert_eq!(ang, Angle(ANG90.0 / 2));
    }

    #[test]
    fn center_of_vertices() {
        let mut b = LevelBuilder::new("MAP01");
        let s = b.sector(0, 128);
        b.room((0, 0), (100, 40), s);
        let level = b.build();
        let world = AutomapWorld::new(&level);
        assert_eq!(world.level_center(), I64Vec2::new(50 * MAPUNIT, 20 * MAPUNIT));
    }
}
