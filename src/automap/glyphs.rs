//! Vector glyphs drawn for players and things.
//!
//! Arrow coordinates are already in map units; triangles are unit shapes
//! (`FRACUNIT` = one radius) scaled by the thing's radius when drawn.

use glam::I64Vec2;

use super::clip::MapLine;
use super::transform::rotate;
use super::viewport::PLAYERRADIUS;
use crate::fixed::{Angle, FRACUNIT, mul64};

const fn seg(ax: i64, ay: i64, bx: i64, by: i64) -> MapLine {
    MapLine::new(I64Vec2::new(ax, ay), I64Vec2::new(bx, by))
}

const R: i64 = 8 * PLAYERRADIUS / 7;

pub static PLAYER_ARROW: [MapLine; 7] = [
    seg(-R + R / 8, 0, R, 0), // -----
    seg(R, 0, R - R / 2, R / 4), // ----->
    seg(R, 0, R - R / 2, -R / 4),
    seg(-R + R / 8, 0, -R - R / 8, R / 4), // >---->
    seg(-R + R / 8, 0, -R - R / 8, -R / 4),
    seg(-R + 3 * R / 8, 0, -R + R / 8, R / 4), // >>--->
    seg(-R + 3 * R / 8, 0, -R + R / 8, -R / 4),
];

/// Arrow with "ddt" written along the shaft.
pub static CHEAT_PLAYER_ARROW: [MapLine; 16] = [
    seg(-R + R / 8, 0, R, 0),
    seg(R, 0, R - R / 2, R / 6),
    seg(R, 0, R - R / 2, -R / 6),
    seg(-R + R / 8, 0, -R - R / 8, R / 6),
    seg(-R + R / 8, 0, -R - R / 8, -R / 6),
    seg(-R + 3 * R / 8, 0, -R + R / 8, R / 6),
    seg(-R + 3 * R / 8, 0, -R + R / 8, -R / 6),
    // d
    seg(-R / 2, 0, -R / 2, -R / 6),
    seg(-R / 2, -R / 6, -R / 2 + R / 6, -R / 6),
    seg(-R / 2 + R / 6, -R / 6, -R / 2 + R / 6, R / 4),
    // d
    seg(-R / 6, 0, -R / 6, -R / 6),
    seg(-R / 6, -R / 6, 0, -R / 6),
    seg(0, -R / 6, 0, R / 4),
    // t
    seg(R / 6, R / 4, R / 6, -R / 7),
    seg(R / 6, -R / 7, R / 6 + R / 32, -R / 7 - R / 32),
    seg(R / 6 + R / 32, -R / 7 - R / 32, R / 6 + R / 10, -R / 7),
];

const U: f64 = FRACUNIT as f64;

/// Equilateral triangle, used for monsters.
pub static TRIANGLE_GUY: [MapLine; 3] = [
    seg((-0.867 * U) as i64, (-0.5 * U) as i64, (0.867 * U) as i64, (-0.5 * U) as i64),
    seg((0.867 * U) as i64, (-0.5 * U) as i64, 0, FRACUNIT as i64),
    seg(0, FRACUNIT as i64, (-0.867 * U) as i64, (-0.5 * U) as i64),
];

/// Narrow triangle pointing along the heading, used for everything else.
pub static THINTRIANGLE_GUY: [MapLine; 3] = [
    seg((-0.5 * U) as i64, (-0.7 * U) as i64, FRACUNIT as i64, 0),
    seg(FRACUNIT as i64, 0, (-0.5 * U) as i64, (0.7 * U) as i64),
    seg((-0.5 * U) as i64, (0.7 * U) as i64, (-0.5 * U) as i64, (-0.7 * U) as i64),
];

/// Place a glyph: optional scale (16.16), rotation, then translation.
pub fn place(
    glyph: &[MapLine],
    scale: Option<i64>,
    angle: Angle,
    at: I64Vec2,
) -> impl Iterator<Item = MapLine> + '_ {
    let xform = move |p: I64Vec2| {
        let p = match scale {
            Some(s) => I64Vec2::new(mul64(s, p.x), mul64(s, p.y)),
            None => p,
        };
        let p = if angle == Angle::ZERO { p } else { rotate(p, angle) };
        p + at
    };
    glyph.iter().map(move |l| MapLine::new(xform(l.a), xform(l.b)))
}
