//! Palette indices used by the map and the two pulsing colours.

pub const REDS: u8 = 176;
pub const REDRANGE: u8 = 16;
pub const BLUES: u8 = 200;
pub const BLUERANGE: u8 = 8;
pub const GREENS: u8 = 112;
pub const GREENRANGE: u8 = 16;
pub const GRAYS: u8 = 96;
pub const GRAYSRANGE: u8 = 16;
pub const BROWNS: u8 = 64;
pub const BROWNRANGE: u8 = 16;
pub const YELLOWS: u8 = 231;
pub const YELLOWRANGE: u8 = 1;
pub const BLACK: u8 = 0;
pub const WHITE: u8 = 209;

pub const BACKGROUND: u8 = BLACK;
pub const WALLCOLORS: u8 = REDS;
pub const WALLRANGE: u8 = REDRANGE;
pub const TSWALLCOLORS: u8 = GRAYS;
pub const FDWALLCOLORS: u8 = BROWNS;
pub const CDWALLCOLORS: u8 = YELLOWS;
pub const TELEPORTER: u8 = WALLCOLORS + WALLRANGE / 2;
/// Unseen lines revealed by the computer map power.
pub const ALLMAP: u8 = GRAYS + 3;
pub const GRIDCOLORS: u8 = GRAYS + GRAYSRANGE / 2;
pub const XHAIRCOLORS: u8 = GRAYS;
pub const MARKCOLORS: u8 = WHITE;

/// Secret door, only told apart from plain walls while cheating.
pub const SECRETDOOR: u8 = 251;
/// Boundary of a secret sector nobody has entered yet.
pub const SECRET_SECTOR: u8 = 252;
/// Boundary of a secret sector already found.
pub const FOUND_SECRET: u8 = GREENS;

pub const THEIR_COLORS: [u8; 4] = [GREENS, GRAYS, BROWNS, REDS];
/// Close to black, for partially invisible players.
pub const INVISIBLE_PLAYER: u8 = 246;
pub const SINGLE_PLAYER: u8 = WHITE;

pub const MONSTER_ACTIVE: u8 = REDS;
pub const PROJECTILE: u8 = YELLOWS;
pub const PICKUP: u8 = BLUES;
pub const CORPSE: u8 = GRAYS;
pub const DECORATION: u8 = GREENS;
pub const LEVEL_NAME: u8 = WHITE;

/// Triangle wave between two palette indices, advanced once per tic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorPulse {
    lo: u8,
    hi: u8,
    value: u8,
    rising: bool,
}

impl ColorPulse {
    pub const fn new(lo: u8, hi: u8) -> Self {
        Self {
            lo,
            hi,
            value: lo,
            rising: true,
        }
    }

    /// Pulse for monsters that have not noticed anyone yet.
    pub const fn inactive_monster() -> Self {
        Self::new(REDS, REDS + 10)
    }

    pub const fn spectator() -> Self {
        Self::new(GRAYS, GRAYS + 15)
    }

    #[inline]
    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn tick(&mut self) {
        if self.lo >= self.hi {
            return;
        }
        if self.rising {
            self.value += 1;
            if self.value >= self.hi {
                self.rising = false;
            }
        } else {
            self.value -= 1;
            if self.value <= self.lo {
                self.rising = true;
            }
        }
    }

    pub fn reset(&mut self) {
        self.value = self.lo;
        self.rising = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vanilla_palette_slots() {
        assert_eq!(REDS, 176);
        assert_eq!(BLUES, 200);
        assert_eq!(YELLOWS, 231);
        assert_eq!(WHITE, 209);
        assert_eq!(GRIDCOLORS, 104);
        assert_eq!(TELEPORTER, 184);
    }

    #[test]
    fn pulse_stays_in_bounds() {
        for mut pulse in [ColorPulse::inactive_monster(), ColorPulse::spectator()] {
            let (lo, hi) = (pulse.lo, pulse.hi);
            let mut seen_hi = false;
            for _ in 0..1000 {
                pulse.tick();
                assert!((lo..=hi).contains(&pulse.value()));
                seen_hi |= pulse.value() == hi;
            }
            assert!(seen_hi);
        }
    }

    #[test]
    fn pulse_turns_around() {
        let mut p = ColorPulse::new(10, 12);
        let vals: Vec<u8> = (0..6)
            .map(|_| {
                p.tick();
                p.value()
            })
            .collect();
        assert_eq!(vals, vec![11, 12, 11, 10, 11, 12]);
    }
}
