//! Q16.16 fixed-point arithmetic and the reduced-precision *map units*
//! the automap works in.
//!
//! * World coordinates are `Fixed` (i32, 16 fractional bits) exactly like
//!   the simulation stores them.
//! * Map coordinates drop `FRACTOMAPBITS` of fraction and widen to `i64`,
//!   so even levels spanning the whole `i32` range can be scaled and
//!   rotated without overflow.

mod angle;

pub use angle::{ANG90, ANG180, ANG270, ANGLETOFINESHIFT, Angle, FINEANGLES, FINEMASK};

use glam::{I64Vec2, IVec2};

/// 16.16 fixed-point scalar.
pub type Fixed = i32;

pub const FRACBITS: u32 = 16;
pub const FRACUNIT: Fixed = 1 << FRACBITS;

/// Fraction bits kept in map space.
pub const MAPBITS: u32 = 12;
pub const MAPUNIT: i64 = 1 << MAPBITS;
pub const FRACTOMAPBITS: u32 = FRACBITS - MAPBITS;

/// `FixedMul`: product of two 16.16 numbers.
#[inline]
pub fn fixed_mul(a: Fixed, b: Fixed) -> Fixed {
    ((a as i64 * b as i64) >> FRACBITS) as Fixed
}

/// `FixedDiv`: quotient of two 16.16 numbers.
///
/// Saturates to `i32::MIN`/`i32::MAX` when the result would not fit,
/// which also covers division by zero.
#[inline]
pub fn fixed_div(a: Fixed, b: Fixed) -> Fixed {
    if (a.unsigned_abs() >> 14) >= b.unsigned_abs() {
        if (a ^ b) < 0 { Fixed::MIN } else { Fixed::MAX }
    } else {
        (((a as i64) << FRACBITS) / b as i64) as Fixed
    }
}

/// 64-bit `FixedMul` for map-space values.
#[inline]
pub fn mul64(a: i64, b: i64) -> i64 {
    (a * b) >> FRACBITS
}

/// 64-bit `FixedDiv`; a zero divisor saturates like [`fixed_div`].
#[inline]
pub fn div64(a: i64, b: i64) -> i64 {
    if b == 0 {
        return if a < 0 { i64::MIN >> FRACBITS } else { i64::MAX >> FRACBITS };
    }
    (a << FRACBITS) / b
}

/// Linear blend `from → to` by a 16.16 fraction in `[0, FRACUNIT]`.
#[inline]
pub fn lerp64(from: i64, to: i64, frac: Fixed) -> i64 {
    from + mul64(to - from, frac as i64)
}

/// Component-wise [`lerp64`] on world points.
#[inline]
pub fn lerp_point(from: IVec2, to: IVec2, frac: Fixed) -> IVec2 {
    IVec2::new(
        lerp64(from.x as i64, to.x as i64, frac) as i32,
        lerp64(from.y as i64, to.y as i64, frac) as i32,
    )
}

/// World (16.16) → map units.
#[inline]
pub fn world_to_map(p: IVec2) -> I64Vec2 {
    I64Vec2::new(
        (p.x >> FRACTOMAPBITS) as i64,
        (p.y >> FRACTOMAPBITS) as i64,
    )
}

/// Map units → world (16.16), saturating at the `i32` range.
#[inline]
pub fn map_to_world(p: I64Vec2) -> IVec2 {
    let widen = |v: i64| (v << FRACTOMAPBITS).clamp(i32::MIN as i64, i32::MAX as i64) as i32;
    IVec2::new(widen(p.x), widen(p.y))
}

/// Whole map units → 16.16.
#[inline]
pub const fn from_int(v: i32) -> Fixed {
    v << FRACBITS
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_and_div_are_inverse_for_simple_values() {
        let three = from_int(3);
        let half = FRACUNIT / 2;
        assert_eq!(fixed_mul(three, half), from_int(3) / 2);
        assert_eq!(fixed_div(fixed_mul(three, half), half), three);
    }

    #[test]
    fn div_saturates_instead_of_trapping() {
        assert_eq!(fixed_div(FRACUNIT, 0), Fixed::MAX);
        assert_eq!(fixed_div(-FRACUNIT, 0), Fixed::MIN);
        assert_eq!(fixed_div(from_int(30_000), 1), Fixed::MAX);
    }

    #[test]
    fn map_precision_round_trip() {
        let p = IVec2::new(from_int(1000), from_int(-32_000));
        let m = world_to_map(p);
        assert_eq!(m, I64Vec2::new(1000 * MAPUNIT, -32_000 * MAPUNIT));
        assert_eq!(map_to_world(m), p);
    }

    #[test]
    fn extreme_world_coords_do_not_overflow_in_map_space() {
        let lo = world_to_map(IVec2::splat(i32::MIN));
        let hi = world_to_map(IVec2::splat(i32::MAX));
        // width of the full i32 range still fits comfortably in i64 maths
        let w = hi.x - lo.x;
        assert!(w > 0);
        assert!(mul64(w, from_int(320) as i64) > 0);
    }

    #[test]
    fn lerp_hits_both_ends() {
        assert_eq!(lerp64(10, 50, 0), 10);
        assert_eq!(lerp64(10, 50, FRACUNIT), 50);
        assert_eq!(lerp64(10, 50, FRACUNIT / 2), 30);
        let (a, b) = (IVec2::new(0, from_int(-8)), IVec2::new(from_int(4), 0));
        assert_eq!(lerp_point(a, b, FRACUNIT / 4), IVec2::new(from_int(1), from_int(-6)));
    }
}
