//! Map window position, extents and the map↔frame scale pair.
//!
//! Map coordinates are world coordinates shifted down by
//! `FRACTOMAPBITS` and widened to `i64`.  `scale_mtof` maps map units to
//! pixels (`MTOF`), `scale_ftom` is its reciprocal (`FTOM`).

use glam::{I64Vec2, IVec2};
use tracing::{debug, info};

use super::raster::FrameRect;
use crate::fixed::{FRACBITS, FRACUNIT, Fixed, MAPUNIT, fixed_div, fixed_mul, lerp64, world_to_map};

/// Player radius in map units; also the smallest extent the map will zoom to.
pub const PLAYERRADIUS: i64 = 16 * MAPUNIT;

/// Pan speed in pixels per tic.
pub const F_PANINC: i32 = 4;
/// Zoom step per tic (1.02 and its reciprocal).
pub const M_ZOOMIN: Fixed = (1.02 * FRACUNIT as f64) as Fixed;
pub const M_ZOOMOUT: Fixed = (FRACUNIT as f64 / 1.02) as Fixed;
/// The map opens zoomed in by 1/0.7 over the whole-level view.
const INIT_ZOOM_DIV: Fixed = (0.7 * FRACUNIT as f64) as Fixed;

/// Level extents and the scale range they allow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub min: I64Vec2,
    pub max: I64Vec2,
    /// Whole level fits the window.
    pub min_scale_mtof: Fixed,
    /// Window is two player radii tall.
    pub max_scale_mtof: Fixed,
}

/// One pass over the level's vertices (16.16 world units).
///
/// Extents are reduced to map precision before the width is taken.  A
/// level narrower than `2 * PLAYERRADIUS` on either axis (including one
/// with no vertices) is treated as exactly that wide.
pub fn compute_bounds(vertices: impl IntoIterator<Item = IVec2>, frame: FrameRect) -> Bounds {
    let mut min = IVec2::splat(i32::MAX);
    let mut max = IVec2::splat(-i32::MAX);
    let mut any = false;
    for v in vertices {
        min = min.min(v);
        max = max.max(v);
        any = true;
    }
    if !any {
        min = IVec2::ZERO;
        max = IVec2::ZERO;
    }

    let min = world_to_map(min);
    let max = world_to_map(max);
    let extent = (max - min).max(I64Vec2::splat(2 * PLAYERRADIUS));

    let a = scale_for(frame.w, extent.x);
    let b = scale_for(frame.h, extent.y);
    Bounds {
        min,
        max,
        min_scale_mtof: a.min(b),
        max_scale_mtof: scale_for(frame.h, 2 * PLAYERRADIUS),
    }
}

/// `FixedDiv(pixels << FRACBITS, map_units)`, saturating.
fn scale_for(pixels: i32, map_units: i64) -> Fixed {
    let num = (pixels as i64) << FRACBITS;
    let den = map_units.max(1);
    if (num.unsigned_abs() >> 14) >= den.unsigned_abs() {
        return Fixed::MAX;
    }
    ((num << FRACBITS) / den).clamp(1, Fixed::MAX as i64) as Fixed
}

/// Scale and location remembered by the max-zoom toggle.
#[derive(Clone, Copy, Debug)]
struct Saved {
    origin: I64Vec2,
    size: I64Vec2,
    scale_mtof: Fixed,
}

/// The map window.  `far == origin + size` after every mutation.
#[derive(Clone, Debug)]
pub struct Viewport {
    pub frame: FrameRect,
    /// Bottom-left corner in map units (`m_x`, `m_y`).
    pub origin: I64Vec2,
    /// Extents (`m_w`, `m_h`).
    pub size: I64Vec2,
    /// Top-right corner (`m_x2`, `m_y2`).
    pub far: I64Vec2,
    pub scale_mtof: Fixed,
    pub scale_ftom: Fixed,
    pub bounds: Bounds,
    saved: Option<Saved>,
}

impl Viewport {
    pub fn new(frame: FrameRect) -> Self {
        let bounds = compute_bounds(std::iter::empty(), frame);
        let mut vp = Self {
            frame,
            origin: I64Vec2::ZERO,
            size: I64Vec2::ONE,
            far: I64Vec2::ONE,
            scale_mtof: bounds.min_scale_mtof,
            scale_ftom: fixed_div(FRACUNIT, bounds.min_scale_mtof),
            bounds,
            saved: None,
        };
        vp.activate_new_scale();
        vp
    }

    /*──────────────────────── conversions ───────────────────────*/

    /// Map distance → pixels.
    #[inline]
    pub fn mtof(&self, v: i64) -> i64 {
        (v * self.scale_mtof as i64) >> (2 * FRACBITS)
    }

    /// Pixels → map distance.
    #[inline]
    pub fn ftom(&self, px: i64) -> i64 {
        ((px << FRACBITS) * self.scale_ftom as i64) >> FRACBITS
    }

    #[inline]
    pub fn center(&self) -> I64Vec2 {
        self.origin + self.size / 2
    }

    /*──────────────────────── level set-up ──────────────────────*/

    /// Scan the level and pick the opening scale.
    pub fn level_init(&mut self, vertices: impl IntoIterator<Item = IVec2>) {
        self.bounds = compute_bounds(vertices, self.frame);
        let b = self.bounds;
        let mut scale = fixed_div(b.min_scale_mtof, INIT_ZOOM_DIV);
        if scale > b.max_scale_mtof {
            scale = b.min_scale_mtof;
        }
        self.saved = None;
        self.set_scale_raw(scale);
        self.activate_new_scale();
        info!(
            min = b.min_scale_mtof,
            max = b.max_scale_mtof,
            initial = scale,
            "automap scale range"
        );
    }

    /*──────────────────────── scale ─────────────────────────────*/

    fn set_scale_raw(&mut self, scale: Fixed) {
        self.scale_mtof = scale.max(1);
        self.scale_ftom = fixed_div(FRACUNIT, self.scale_mtof);
    }

    /// Keep the centre and size the window to the current scale.
    pub fn activate_new_scale(&mut self) {
        let center = self.center();
        self.size = I64Vec2::new(
            self.ftom(self.frame.w as i64),
            self.ftom(self.frame.h as i64),
        )
        .max(I64Vec2::ONE);
        self.origin = center - self.size / 2;
        self.far = self.origin + self.size;
    }

    /// Zoom by a 16.16 multiplier, snapping to the bounds.
    pub fn change_scale(&mut self, mul: Fixed) {
        self.set_scale_raw(fixed_mul(self.scale_mtof, mul));
        if self.scale_mtof < self.bounds.min_scale_mtof {
            self.min_out();
        } else if self.scale_mtof > self.bounds.max_scale_mtof {
            self.max_out();
        } else {
            self.activate_new_scale();
        }
    }

    /// Whole level in view.
    pub fn min_out(&mut self) {
        self.set_scale_raw(self.bounds.min_scale_mtof);
        self.activate_new_scale();
    }

    /// Closest zoom.
    pub fn max_out(&mut self) {
        self.set_scale_raw(self.bounds.max_scale_mtof);
        self.activate_new_scale();
    }

    /*──────────────────────── location ──────────────────────────*/

    /// Move by `delta` map units and keep the centre inside the level.
    pub fn pan(&mut self, delta: I64Vec2) {
        self.origin += delta;
        self.clamp_to_bounds();
    }

    pub fn clamp_to_bounds(&mut self) {
        let half = self.size / 2;
        let center = (self.origin + half).clamp(self.bounds.min, self.bounds.max.max(self.bounds.min));
        self.origin = center - half;
        self.far = self.origin + self.size;
    }

    /// Put `center` in the middle of the window, unclamped.
    pub fn center_on(&mut self, center: I64Vec2) {
        self.origin = center - self.size / 2;
        self.far = self.origin + self.size;
    }

    /// Follow a player: snap to the pixel grid so the map does not shimmer.
    pub fn follow(&mut self, pos: I64Vec2) {
        let snap = |v: i64| self.ftom(self.mtof(v));
        self.origin = I64Vec2::new(snap(pos.x), snap(pos.y)) - self.size / 2;
        self.far = self.origin + self.size;
    }

    /*──────────────────────── big-state toggle ─────────────────*/

    pub fn save_scale_and_loc(&mut self) {
        self.saved = Some(Saved {
            origin: self.origin,
            size: self.size,
            scale_mtof: self.scale_mtof,
        });
    }

    /// Undo [`save_scale_and_loc`](Self::save_scale_and_loc).  When
    /// following, the window is centred on `follow` instead of the saved
    /// spot.
    pub fn restore_scale_and_loc(&mut self, follow: Option<I64Vec2>) {
        let Some(saved) = self.saved.take() else {
            debug!("restore without a saved view");
            return;
        };
        self.size = saved.size;
        self.origin = match follow {
            Some(p) => p - self.size / 2,
            None => saved.origin,
        };
        self.far = self.origin + self.size;
        // a scale rebuilt from the width can round past the bounds
        let b = self.bounds;
        self.set_scale_raw(saved.scale_mtof.clamp(b.min_scale_mtof, b.max_scale_mtof));
    }

    /*──────────────────────── interpolation ────────────────────*/

    /// Copy blended between `prev` and `self`, for drawing between tics.
    pub fn blended(&self, prev_center: I64Vec2, prev_scale: Fixed, frac: Fixed) -> Viewport {
        let mut vp = self.clone();
        let scale = lerp64(prev_scale as i64, self.scale_mtof as i64, frac);
        vp.set_scale_raw(scale.clamp(1, Fixed::MAX as i64) as Fixed);
        vp.size = I64Vec2::new(vp.ftom(vp.frame.w as i64), vp.ftom(vp.frame.h as i64)).max(I64Vec2::ONE);
        let cur = self.center();
        let center = I64Vec2::new(
            lerp64(prev_center.x, cur.x, frac),
            lerp64(prev_center.y, cur.y, frac),
        );
        vp.center_on(center);
        vp
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::from_int;

    fn frame() -> FrameRect {
        FrameRect::new(0, 0, 320, 168)
    }

    fn square(units: i32) -> Vec<IVec2> {
        vec![IVec2::ZERO, IVec2::splat(from_int(units))]
    }

    #[test]
    fn zoom_constants() {
        assert_eq!(M_ZOOMIN, 66846);
        assert_eq!(M_ZOOMOUT, 64250);
        assert_eq!(INIT_ZOOM_DIV, 45875);
        assert_eq!(PLAYERRADIUS, 65536);
    }

    #[test]
    fn bounds_of_thousand_unit_square() {
        let b = compute_bounds(square(1000), frame());
        assert_eq!(b.min, I64Vec2::ZERO);
        assert_eq!(b.max, I64Vec2::splat(1000 * MAPUNIT));
        assert_eq!(b.min_scale_mtof, 176160);
        assert_eq!(b.max_scale_mtof, 5505024);
    }

    #[test]
    fn degenerate_level_is_floored() {
        let b = compute_bounds(vec![IVec2::splat(from_int(5))], frame());
        assert_eq!(b.min_scale_mtof, scale_for(168, 2 * PLAYERRADIUS));
        assert_eq!(b.min_scale_mtof, b.max_scale_mtof);

        let empty = compute_bounds(std::iter::empty(), frame());
        assert_eq!(empty.min, I64Vec2::ZERO);
        assert!(empty.min_scale_mtof > 0);
    }

    #[test]
    fn level_init_picks_opening_scale() {
        let mut vp = Viewport::new(frame());
        vp.level_init(square(1000));
        assert_eq!(vp.scale_mtof, fixed_div(176160, 45875));
        assert_eq!(vp.scale_ftom, fixed_div(FRACUNIT, vp.scale_mtof));
        assert_eq!(vp.far, vp.origin + vp.size);
    }

    #[test]
    fn opening_scale_falls_back_when_too_close() {
        // tiny room: min/0.7 would exceed the max scale
        let mut vp = Viewport::new(frame());
        vp.level_init(square(20));
        assert_eq!(vp.scale_mtof, vp.bounds.min_scale_mtof);
    }

    #[test]
    fn zoom_snaps_exactly_to_bounds() {
        let mut vp = Viewport::new(frame());
        vp.level_init(square(1000));
        for _ in 0..500 {
            vp.change_scale(M_ZOOMOUT);
            assert!(vp.scale_mtof >= vp.bounds.min_scale_mtof);
        }
        assert_eq!(vp.scale_mtof, vp.bounds.min_scale_mtof);

        for _ in 0..500 {
            vp.change_scale(M_ZOOMIN);
            assert!(vp.scale_mtof <= vp.bounds.max_scale_mtof);
        }
        assert_eq!(vp.scale_mtof, vp.bounds.max_scale_mtof);
    }

    #[test]
    fn rescale_keeps_center() {
        let mut vp = Viewport::new(frame());
        vp.level_init(square(1000));
        vp.center_on(I64Vec2::new(300 * MAPUNIT, 700 * MAPUNIT));
        let before = vp.center();
        vp.change_scale(M_ZOOMIN);
        assert!((vp.center() - before).abs().max_element() <= 1);
        assert_eq!(vp.size.x, vp.ftom(320));
    }

    #[test]
    fn pan_clamps_center_to_level() {
        let mut vp = Viewport::new(frame());
        vp.level_init(square(1000));
        vp.pan(I64Vec2::new(-1_000_000_000, 5_000_000_000));
        assert_eq!(vp.center(), I64Vec2::new(0, 1000 * MAPUNIT));
        assert_eq!(vp.far, vp.origin + vp.size);
    }

    #[test]
    fn save_restore_roundtrip() {
        let mut vp = Viewport::new(frame());
        vp.level_init(square(1000));
        vp.center_on(I64Vec2::splat(400 * MAPUNIT));
        let (origin, size, scale) = (vp.origin, vp.size, vp.scale_mtof);

        vp.save_scale_and_loc();
        vp.min_out();
        vp.restore_scale_and_loc(None);
        assert_eq!((vp.origin, vp.size, vp.scale_mtof), (origin, size, scale));

        vp.save_scale_and_loc();
        vp.restore_scale_and_loc(Some(I64Vec2::ZERO));
        assert_eq!(vp.center(), I64Vec2::ZERO);
    }

    #[test]
    fn restore_at_max_zoom_stays_in_bounds() {
        let mut vp = Viewport::new(frame());
        vp.level_init(square(1000));
        vp.max_out();
        let size = vp.size;

        vp.save_scale_and_loc();
        vp.min_out();
        vp.restore_scale_and_loc(None);
        assert_eq!(vp.scale_mtof, vp.bounds.max_scale_mtof);
        assert_eq!(vp.scale_ftom, fixed_div(FRACUNIT, vp.scale_mtof));
        assert_eq!(vp.size, size);
    }

    #[test]
    fn blend_endpoints() {
        let mut vp = Viewport::new(frame());
        vp.level_init(square(1000));
        let prev_center = vp.center() - I64Vec2::new(1000, 0);
        let prev_scale = vp.scale_mtof - 100;

        let at_start = vp.blended(prev_center, prev_scale, 0);
        assert_eq!(at_start.scale_mtof, prev_scale);
        assert!((at_start.center() - prev_center).abs().max_element() <= 1);

        let at_end = vp.blended(prev_center, prev_scale, FRACUNIT);
        assert_eq!(at_end.scale_mtof, vp.scale_mtof);
        assert!((at_end.center() - vp.center()).abs().max_element() <= 1);
    }
}
