//! Binary angles (BAM) and the fine sine/cosine tables.
//!
//! A full turn is the whole `u32` range.  Trig lookups quantise the angle
//! to `FINEANGLES` steps; the quantisation truncates the *signed* angle
//! toward zero so that `a` and `-a` always land on mirrored table slots
//! and a rotation followed by its negation cancels.

use once_cell::sync::Lazy;
use std::ops::{Add, AddAssign, Neg, Sub};

use super::{FRACUNIT, Fixed, mul64};

pub const FINEANGLES: usize = 8192;
pub const FINEMASK: usize = FINEANGLES - 1;
pub const ANGLETOFINESHIFT: u32 = 19;

pub const ANG90: Angle = Angle(0x4000_0000);
pub const ANG180: Angle = Angle(0x8000_0000);
pub const ANG270: Angle = Angle(0xC000_0000);

/// Sine table with an extra quarter turn so cosine is `SINE[i + FINEANGLES/4]`.
///
/// Built from the first quadrant and mirrored, so `sin(-i) == -sin(i)` and
/// `cos(-i) == cos(i)` hold exactly.
static FINE_SINE: Lazy<Box<[Fixed]>> = Lazy::new(|| {
    let mut table = vec![0 as Fixed; FINEANGLES + FINEANGLES / 4];
    let quarter = FINEANGLES / 4;
    let half = FINEANGLES / 2;
    for i in 0..=quarter {
        let rad = i as f64 * std::f64::consts::TAU / FINEANGLES as f64;
        let v = (rad.sin() * FRACUNIT as f64).round() as Fixed;
        table[i] = v;
        table[half - i] = v;
        table[half + i] = -v;
        table[(FINEANGLES - i) & FINEMASK] = -v;
    }
    for i in FINEANGLES..table.len() {
        table[i] = table[i - FINEANGLES];
    }
    table.into_boxed_slice()
});

/// 32-bit binary angle; `0` = east, counter-clockwise positive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Angle(pub u32);

impl Angle {
    pub const ZERO: Angle = Angle(0);

    /// Whole degrees → BAM (exact for multiples of 45°).
    pub fn from_degrees(deg: i32) -> Self {
        let turns = (deg as i64).rem_euclid(360);
        Angle(((turns << 32) / 360) as u32)
    }

    /// Index into the fine tables.
    #[inline]
    pub fn fine(self) -> usize {
        let step = 1i32 << ANGLETOFINESHIFT;
        ((self.0 as i32) / step).rem_euclid(FINEANGLES as i32) as usize
    }

    #[inline]
    pub fn sin(self) -> Fixed {
        FINE_SINE[self.fine()]
    }

    #[inline]
    pub fn cos(self) -> Fixed {
        FINE_SINE[self.fine() + FINEANGLES / 4]
    }

    /// Shortest-arc blend toward `to` by a 16.16 fraction.
    pub fn lerp(self, to: Angle, frac: Fixed) -> Angle {
        let delta = to.0.wrapping_sub(self.0) as i32 as i64;
        Angle(self.0.wrapping_add(mul64(delta, frac as i64) as i32 as u32))
    }
}

impl Add for Angle {
    type Output = Angle;
    fn add(self, rhs: Angle) -> Angle {
        Angle(self.0.wrapping_add(rhs.0))
    }
}

impl AddAssign for Angle {
    fn add_assign(&mut self, rhs: Angle) {
        *self = *self + rhs;
    }
}

impl Sub for Angle {
    type Output = Angle;
    fn sub(self, rhs: Angle) -> Angle {
        Angle(self.0.wrapping_sub(rhs.0))
    }
}

impl Neg for Angle {
    type Output = Angle;
    fn neg(self) -> Angle {
        Angle(self.0.wrapping_neg())
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardinal_directions() {
        assert_eq!(Angle::ZERO.sin(), 0);
        assert_eq!(Angle::ZERO.cos(), FRACUNIT);
        assert_eq!(ANG90.sin(), FRACUNIT);
        assert_eq!(ANG90.cos(), 0);
        assert_eq!(ANG180.cos(), -FRACUNIT);
        assert_eq!(ANG270.sin(), -FRACUNIT);
    }

    #[test]
    fn degrees_to_bam() {
        assert_eq!(Angle::from_degrees(90), ANG90);
        assert_eq!(Angle::from_degrees(-90), ANG270);
        assert_eq!(Angle::from_degrees(450), ANG90);
    }

    #[test]
    fn tables_are_mirrored() {
        for raw in [1u32, 0x0008_0000, 0x1234_5678, 0x7FFF_FFFF, 0x9000_0001] {
            let a = Angle(raw);
            assert_eq!((-a).sin(), -a.sin(), "sin not odd at {raw:#x}");
            assert_eq!((-a).cos(), a.cos(), "cos not even at {raw:#x}");
        }
    }

    #[test]
    fn lerp_takes_short_way_round() {
        let a = Angle::from_degrees(350);
        let b = Angle::from_degrees(10);
        let mid = a.lerp(b, FRACUNIT / 2);
        assert!(mid.0 < 0x0010_0000 || mid.0 > 0xFFF0_0000);
    }
}
