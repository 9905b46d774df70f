//! Per-tic motion: follow, zoom, pan and colour pulses.

use glam::I64Vec2;

use super::scene::{AutomapWorld, PlayerView};
use super::transform::rotate;
use super::viewport::Viewport;
use super::Automap;
use crate::fixed::{FRACUNIT, Fixed};

/// Window centre and scale at the start of a tic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub center: I64Vec2,
    pub scale_mtof: Fixed,
}

impl ViewSnapshot {
    pub fn of(vp: &Viewport) -> Self {
        Self {
            center: vp.center(),
            scale_mtof: vp.scale_mtof,
        }
    }
}

impl Automap {
    pub fn ticker(&mut self, world: &AutomapWorld) {
        if !self.active {
            return;
        }
        self.prev = ViewSnapshot::of(&self.viewport);
        self.amclock += 1;

        if self.cfg.follow_on() {
            self.follow_player(world);
        }
        if self.ftom_zoommul != FRACUNIT {
            self.viewport.change_scale(self.mtof_zoommul);
        }
        if self.paninc != I64Vec2::ZERO {
            self.change_window_loc();
        }

        self.monster_pulse.tick();
        self.spectator_pulse.tick();
    }

    fn follow_player(&mut self, world: &AutomapWorld) {
        let Some(pos) = world.console_player().map(PlayerView::map_pos) else {
            return;
        };
        if self.last_follow != Some(pos) {
            self.viewport.follow(pos);
            self.last_follow = Some(pos);
        }
    }

    fn change_window_loc(&mut self) {
        // any manual pan leaves follow mode
        self.cfg.follow = 0;
        self.last_follow = None;
        let inc = if self.cfg.rotate_on() {
            rotate(self.paninc, -self.map_angle)
        } else {
            self.paninc
        };
        self.viewport.pan(inc);
    }

    /// Drop the previous-tic view so the next frame does not blend
    /// across a jump.
    pub(super) fn snap_interpolation(&mut self) {
        self.prev = ViewSnapshot::of(&self.viewport);
    }

    /// Viewport to draw with, `frac` of the way through the current tic.
    pub fn frame_view(&self, frac: Fixed) -> Viewport {
        if self.cfg.uncapped != 0 && frac < FRACUNIT {
            self.viewport
                .blended(self.prev.center, self.prev.scale_mtof, frac.max(0))
        } else {
            self.viewport.clone()
        }
    }
}
