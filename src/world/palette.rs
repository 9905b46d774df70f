// Palette used to turn the automap's 8-bit colour indices into pixels.

use std::ops::{Index, IndexMut};

/// 256 entries of 0x00RRGGBB.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette(pub [u32; 256]);

impl Default for Palette {
    /// Grey ramp, good enough to read a map without game data.
    fn default() -> Self {
        let mut p = [0u32; 256];
        for (i, c) in p.iter_mut().enumerate() {
            let v = i as u32;
            *c = (v << 16) | (v << 8) | v;
        }
        Palette(p)
    }
}

impl Palette {
    /// Build from the first 768 bytes of a `PLAYPAL` lump (RGB triplets).
    pub fn from_playpal(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 256 * 3 {
            return None;
        }
        let mut p = [0u32; 256];
        for (c, rgb) in p.iter_mut().zip(bytes.chunks_exact(3)) {
            *c = (rgb[0] as u32) << 16 | (rgb[1] as u32) << 8 | rgb[2] as u32;
        }
        Some(Palette(p))
    }

    /// Expand an index buffer into `dst`.
    pub fn expand(&self, src: &[u8], dst: &mut [u32]) {
        for (d, &s) in dst.iter_mut().zip(src) {
            *d = self.0[s as usize];
        }
    }
}

impl Index<u8> for Palette {
    type Output = u32;
    fn index(&self, idx: u8) -> &u32 {
        &self.0[idx as usize]
    }
}

impl IndexMut<u8> for Palette {
    fn index_mut(&mut self, idx: u8) -> &mut u32 {
        &mut self.0[idx as usize]
    }
}
