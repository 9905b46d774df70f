//! Two-pass Cohen–Sutherland clipping: a cheap reject against the map
//! window, then a precise clip in frame coordinates.

use bitflags::bitflags;
use glam::{I64Vec2, IVec2};

use super::raster::FrameRect;
use super::transform::to_frame;
use super::viewport::Viewport;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Outcode: u8 {
        const LEFT   = 1;
        const RIGHT  = 2;
        const BOTTOM = 4;
        const TOP    = 8;
    }
}

/// Segment in map units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapLine {
    pub a: I64Vec2,
    pub b: I64Vec2,
}

impl MapLine {
    pub const fn new(a: I64Vec2, b: I64Vec2) -> Self {
        Self { a, b }
    }
}

/// Segment in frame pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameLine {
    pub a: IVec2,
    pub b: IVec2,
}

impl FrameLine {
    pub const fn new(a: IVec2, b: IVec2) -> Self {
        Self { a, b }
    }
}

/// Outcode of a frame point; rows grow downward, so `TOP` is `y < f_y`.
fn frame_outcode(p: I64Vec2, rect: FrameRect) -> Outcode {
    let mut oc = Outcode::empty();
    if p.y < rect.y as i64 {
        oc |= Outcode::TOP;
    } else if p.y >= (rect.y + rect.h) as i64 {
        oc |= Outcode::BOTTOM;
    }
    if p.x < rect.x as i64 {
        oc |= Outcode::LEFT;
    } else if p.x >= (rect.x + rect.w) as i64 {
        oc |= Outcode::RIGHT;
    }
    oc
}

/// Map-space outcode against the window; map Y grows upward.
fn map_outcode(p: I64Vec2, vp: &Viewport) -> Outcode {
    let mut oc = Outcode::empty();
    if p.y > vp.far.y {
        oc |= Outcode::TOP;
    } else if p.y < vp.origin.y {
        oc |= Outcode::BOTTOM;
    }
    if p.x < vp.origin.x {
        oc |= Outcode::LEFT;
    } else if p.x > vp.far.x {
        oc |= Outcode::RIGHT;
    }
    oc
}

/// Reject `line` early if it misses the window, otherwise transform and
/// clip it to the frame.  `None` means nothing is to be drawn.
pub fn clip_mline(line: &MapLine, vp: &Viewport) -> Option<FrameLine> {
    // Y first: most off-screen map lines are above or below the window
    let ya = map_outcode(line.a, vp) & (Outcode::TOP | Outcode::BOTTOM);
    let yb = map_outcode(line.b, vp) & (Outcode::TOP | Outcode::BOTTOM);
    if ya.intersects(yb) {
        return None;
    }
    if map_outcode(line.a, vp).intersects(map_outcode(line.b, vp)) {
        return None;
    }

    let a = to_frame(line.a, vp);
    let b = to_frame(line.b, vp);
    clip_frame(a, b, vp.frame)
}

/// Clip a segment already in frame coordinates (kept wide so far-away
/// endpoints cannot wrap).
pub fn clip_frame(mut a: I64Vec2, mut b: I64Vec2, rect: FrameRect) -> Option<FrameLine> {
    let mut oc1 = frame_outcode(a, rect);
    let mut oc2 = frame_outcode(b, rect);
    if oc1.intersects(oc2) {
        return None;
    }

    let top = rect.y as i64;
    let bottom = (rect.y + rect.h - 1) as i64;
    let left = rect.x as i64;
    let right = (rect.x + rect.w - 1) as i64;

    // each endpoint needs at most two moves; more means rounding is cycling
    let mut budget = 8;
    while !(oc1 | oc2).is_empty() {
        budget -= 1;
        if budget == 0 {
            return None;
        }
        let outside = if !oc1.is_empty() { oc1 } else { oc2 };

        let tmp = if outside.contains(Outcode::TOP) {
            let dy = a.y - b.y;
            let dx = b.x - a.x;
            I64Vec2::new(a.x + ratio(dx, a.y - top, dy)?, top)
        } else if outside.contains(Outcode::BOTTOM) {
            let dy = a.y - b.y;
            let dx = b.x - a.x;
            I64Vec2::new(a.x + ratio(dx, a.y - bottom, dy)?, bottom)
        } else if outside.contains(Outcode::RIGHT) {
            let dy = b.y - a.y;
            let dx = b.x - a.x;
            I64Vec2::new(right, a.y + ratio(dy, right - a.x, dx)?)
        } else if outside.contains(Outcode::LEFT) {
            let dy = b.y - a.y;
            let dx = b.x - a.x;
            I64Vec2::new(left, a.y + ratio(dy, left - a.x, dx)?)
        } else {
            I64Vec2::ZERO
        };

        if outside == oc1 {
            a = tmp;
            oc1 = frame_outcode(a, rect);
        } else {
            b = tmp;
            oc2 = frame_outcode(b, rect);
        }
        if oc1.intersects(oc2) {
            return None;
        }
    }

    Some(FrameLine::new(
        IVec2::new(a.x as i32, a.y as i32),
        IVec2::new(b.x as i32, b.y as i32),
    ))
}

/// `d * num / den`, or `None` for a zero denominator.
#[inline]
fn ratio(d: i64, num: i64, den: i64) -> Option<i64> {
    if den == 0 {
        return None;
    }
    Some(d.checked_mul(num)? / den)
}
