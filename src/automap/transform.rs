//! World → map → frame transforms and rotation about the window centre.

use glam::{I64Vec2, IVec2};

use super::viewport::Viewport;
use crate::fixed::{ANG90, Angle, mul64};

/// Map point → frame pixel (`CXMTOF`, `CYMTOF`).  Frame rows grow
/// downward, map Y upward.
#[inline]
pub fn to_frame(p: I64Vec2, vp: &Viewport) -> I64Vec2 {
    I64Vec2::new(
        vp.frame.x as i64 + vp.mtof(p.x - vp.origin.x),
        vp.frame.y as i64 + (vp.frame.h as i64 - vp.mtof(p.y - vp.origin.y)),
    )
}

/// Frame pixel → map point; inverse of [`to_frame`] up to one pixel.
#[inline]
pub fn from_frame(px: IVec2, vp: &Viewport) -> I64Vec2 {
    I64Vec2::new(
        vp.origin.x + vp.ftom((px.x - vp.frame.x) as i64),
        vp.origin.y + vp.ftom((vp.frame.y + vp.frame.h - px.y) as i64),
    )
}

/// Rotate about the origin with the fine tables.
#[inline]
pub fn rotate(p: I64Vec2, angle: Angle) -> I64Vec2 {
    let (s, c) = (angle.sin() as i64, angle.cos() as i64);
    I64Vec2::new(mul64(p.x, c) - mul64(p.y, s), mul64(p.x, s) + mul64(p.y, c))
}

/// How the map is turned this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RotationMode {
    /// Player always points up.
    FollowFacing,
    /// Overlay without follow: keep the last angle so the map stays put
    /// under a moving player.
    FixedOverlay,
    /// North up.
    StaticNorth,
}

impl RotationMode {
    pub fn resolve(rotate: bool, follow: bool, overlay: bool) -> Self {
        match (rotate, follow, overlay) {
            (false, _, _) => RotationMode::StaticNorth,
            (true, true, _) | (true, false, false) => RotationMode::FollowFacing,
            (true, false, true) => RotationMode::FixedOverlay,
        }
    }
}

/// Pivot and angle fixed once per frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RotationFrame {
    pub pivot: I64Vec2,
    pub angle: Angle,
    pub active: bool,
}

impl RotationFrame {
    pub const NONE: RotationFrame = RotationFrame {
        pivot: I64Vec2::ZERO,
        angle: Angle::ZERO,
        active: false,
    };

    /// Resolve the frame for `mode`; `frozen` is read for
    /// [`RotationMode::FixedOverlay`] and updated for
    /// [`RotationMode::FollowFacing`].
    pub fn new(mode: RotationMode, pivot: I64Vec2, player_angle: Angle, frozen: &mut Angle) -> Self {
        let angle = match mode {
            RotationMode::StaticNorth => return RotationFrame::NONE,
            RotationMode::FollowFacing => {
                *frozen = ANG90 - player_angle;
                *frozen
            }
            RotationMode::FixedOverlay => *frozen,
        };
        RotationFrame {
            pivot,
            angle,
            active: true,
        }
    }

    /// Turn a map point about the pivot.
    #[inline]
    pub fn apply(&self, p: I64Vec2) -> I64Vec2 {
        if !self.active {
            return p;
        }
        self.pivot + rotate(p - self.pivot, self.angle)
    }

    /// Glyph heading once the map is turned.
    #[inline]
    pub fn heading(&self, a: Angle) -> Angle {
        if self.active { a + self.angle } else { a }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::automap::raster::FrameRect;
    use crate::fixed::{ANG180, FRACUNIT, MAPUNIT, from_int};
    use proptest::prelude::*;

    fn viewport() -> Viewport {
        let mut vp = Viewport::new(FrameRect::new(0, 0, 320, 168));
        vp.level_init([IVec2::ZERO, IVec2::splat(from_int(1000))]);
        vp.center_on(I64Vec2::splat(500 * MAPUNIT));
        vp
    }

    #[test]
    fn window_corners_hit_frame_corners() {
        let vp = viewport();
        assert_eq!(to_frame(vp.origin, &vp), I64Vec2::new(0, 168));
        let top_left = I64Vec2::new(vp.origin.x, vp.far.y);
        let f = to_frame(top_left, &vp);
        assert_eq!(f.x, 0);
        assert!(f.y.abs() <= 1);
    }

    #[test]
    fn quarter_turn() {
        let p = I64Vec2::new(1000 * FRACUNIT as i64, 0);
        assert_eq!(rotate(p, ANG90), I64Vec2::new(0, 1000 * FRACUNIT as i64));
        assert_eq!(rotate(p, ANG180), I64Vec2::new(-1000 * FRACUNIT as i64, 0));
    }

    #[test]
    fn mode_resolution() {
        use RotationMode::*;
        assert_eq!(RotationMode::resolve(false, true, true), StaticNorth);
        assert_eq!(RotationMode::resolve(true, true, true), FollowFacing);
        assert_eq!(RotationMode::resolve(true, false, false), FollowFacing);
        assert_eq!(RotationMode::resolve(true, false, true), FixedOverlay);
    }

    #[test]
    fn overlay_keeps_last_facing_angle() {
        let mut frozen = Angle::ZERO;
        let pivot = I64Vec2::new(10, 10);
        let f = RotationFrame::new(RotationMode::FollowFacing, pivot, ANG90, &mut frozen);
        assert_eq!(f.angle, Angle::ZERO);

        let f = RotationFrame::new(RotationMode::FollowFacing, pivot, ANG180, &mut frozen);
        assert_eq!(f.angle, ANG90 - ANG180);
        let held = RotationFrame::new(RotationMode::FixedOverlay, pivot, Angle::ZERO, &mut frozen);
        assert_eq!(held.angle, ANG90 - ANG180);

        let off = RotationFrame::new(RotationMode::StaticNorth, pivot, ANG180, &mut frozen);
        assert_eq!(off.apply(I64Vec2::new(3, 4)), I64Vec2::new(3, 4));
        assert_eq!(off.heading(ANG90), ANG90);
    }

    #[test]
    fn pivot_is_fixed_point() {
        let mut frozen = Angle::ZERO;
        let pivot = I64Vec2::new(123_456, -654_321);
        let f = RotationFrame::new(RotationMode::FollowFacing, pivot, Angle(0x1234_5678), &mut frozen);
        assert_eq!(f.apply(pivot), pivot);
    }

    proptest! {
        #[test]
        fn pixel_map_pixel_within_one(px in 0i32..320, py in 0i32..168) {
            let vp = viewport();
            let back = to_frame(from_frame(IVec2::new(px, py), &vp), &vp);
            prop_assert!((back.x - px as i64).abs() <= 1);
            prop_assert!((back.y - py as i64).abs() <= 1);
        }

        #[test]
        fn map_frame_map_within_a_pixel(dx in 0i64..1_000_000, dy in 0i64..1_000_000) {
            let vp = viewport();
            let p = vp.origin + I64Vec2::new(dx % vp.size.x, dy % vp.size.y);
            let f = to_frame(p, &vp);
            let back = from_frame(IVec2::new(f.x as i32, f.y as i32), &vp);
            let tol = 2 * vp.scale_ftom as i64;
            prop_assert!((back.x - p.x).abs() <= tol, "{:?} vs {:?}", back, p);
            prop_assert!((back.y - p.y).abs() <= tol, "{:?} vs {:?}", back, p);
        }

        #[test]
        fn rotation_cancels(x in -(1i64 << 28)..(1i64 << 28), y in -(1i64 << 28)..(1i64 << 28), a in any::<u32>()) {
            let p = I64Vec2::new(x, y);
            let back = rotate(rotate(p, Angle(a)), -Angle(a));
            let tol = x.abs().max(y.abs()) / 8192 + 4;
            prop_assert!((back - p).abs().max_element() <= tol, "{:?} -> {:?}", p, back);
        }
    }
}
