//! Hooks for collaborators that draw on top of the walls.

use glam::IVec2;

use crate::defs::ThingKind;
use crate::fixed::Fixed;
use crate::sim::ThingGrid;
use crate::world::Aabb;

/// Line drawing handed to an [`Overlay`].  Coordinates are world fixed
/// point.
pub trait LineDrawer {
    /// Transform to the frame and clip, ignoring map rotation.
    fn draw_screen_line(&mut self, color: u8, x1: Fixed, y1: Fixed, x2: Fixed, y2: Fixed);
    /// Same path as the walls: rotation, map-space reject, frame clip.
    fn draw_map_line(&mut self, color: u8, x1: Fixed, y1: Fixed, x2: Fixed, y2: Fixed);
    /// World box covering everything that can be on screen this frame.
    fn visible_area(&self) -> Aabb;
    /// Fraction of the current tic, for interpolating positions.
    fn frac(&self) -> Fixed;
}

pub trait Overlay {
    fn draw_overlay(&mut self, drawer: &mut dyn LineDrawer);
}

/// Outlines the collision box of every thing in view.
pub struct HitboxOverlay<'a> {
    things: &'a ThingGrid,
    pub color: u8,
    /// Boxes drawn by the last call.
    pub drawn: usize,
}

impl<'a> HitboxOverlay<'a> {
    pub fn new(things: &'a ThingGrid, color: u8) -> Self {
        Self {
            things,
            color,
            drawn: 0,
        }
    }
}

impl Overlay for HitboxOverlay<'_> {
    fn draw_overlay(&mut self, drawer: &mut dyn LineDrawer) {
        let frac = drawer.frac();
        let mut drawn = 0;
        self.things.for_each_in_bbox(drawer.visible_area(), |t| {
            if t.kind == ThingKind::Projectile {
                return true;
            }
            let (c, _) = t.lerped(frac);
            let lo = c.saturating_sub(IVec2::splat(t.radius));
            let hi = c.saturating_add(IVec2::splat(t.radius));
            drawer.draw_map_line(self.color, lo.x, lo.y, hi.x, lo.y);
            drawer.draw_map_line(self.color, hi.x, lo.y, hi.x, hi.y);
            drawer.draw_map_line(self.color, hi.x, hi.y, lo.x, hi.y);
            drawer.draw_map_line(self.color, lo.x, hi.y, lo.x, lo.y);
            drawn += 1;
            true
        });
        self.drawn = drawn;
    }
}
