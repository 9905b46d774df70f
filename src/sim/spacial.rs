//! Runtime "thing" grid: a very small, cache-friendly spatial hash.
//!
//! * One cell is 128×128 world units, laid out from the blockmap origin.
//! * Each cell keeps a `SmallVec`; maps rarely hold more than a handful of
//!   live things per block, so this stays allocation-free in the common
//!   case.
//!
//! The grid is rebuilt from the ECS once per tic; the automap reads it to
//! find the things inside its window without walking every entity.

use glam::IVec2;
use hecs::Entity;
use smallvec::SmallVec;
use std::collections::HashMap;

use crate::defs::ThingKind;
use crate::fixed::{Angle, FRACBITS, Fixed, lerp_point};
use crate::world::Aabb;

/*──────────────────────── core types ────────────────────────*/

/// Everything the map needs about a thing, copied out of the ECS.
#[derive(Clone, Copy, Debug)]
pub struct ThingSpatial {
    pub ent: Entity,
    pub pos: IVec2,
    pub prev_pos: IVec2,
    pub angle: Angle,
    pub prev_angle: Angle,
    pub radius: Fixed,
    pub kind: ThingKind,
    /// Monster has a target.
    pub active: bool,
}

impl ThingSpatial {
    /// A thing that has not moved since the last tic.
    pub fn still(ent: Entity, pos: IVec2, radius: Fixed, kind: ThingKind) -> Self {
        Self {
            ent,
            pos,
            prev_pos: pos,
            angle: Angle::ZERO,
            prev_angle: Angle::ZERO,
            radius,
            kind,
            active: false,
        }
    }

    pub fn lerped(&self, frac: Fixed) -> (IVec2, Angle) {
        (
            lerp_point(self.prev_pos, self.pos, frac),
            self.prev_angle.lerp(self.angle, frac),
        )
    }
}

/// Row / column index of a 128-unit block.
pub type Bx = i32;
pub type By = i32;

const BLOCKSHIFT: u32 = FRACBITS + 7;

type Cell = SmallVec<[ThingSpatial; 8]>;

/// Hash-map grid (sparse: only allocated where something lives).
pub struct ThingGrid {
    origin: IVec2,
    cells: HashMap<(Bx, By), Cell>,
    len: usize,
}

#[inline]
fn world_to_block(v: Fixed, origin: Fixed) -> i32 {
    ((v as i64 - origin as i64) >> BLOCKSHIFT) as i32
}

/*───────────────────────── API ──────────────────────────────*/

impl ThingGrid {
    pub fn new(origin: IVec2) -> ThingGrid {
        ThingGrid {
            origin,
            cells: HashMap::new(),
            len: 0,
        }
    }

    #[inline]
    fn block_of(&self, p: IVec2) -> (Bx, By) {
        (world_to_block(p.x, self.origin.x), world_to_block(p.y, self.origin.y))
    }

    /// Insert a stub at the block holding its current position.
    #[inline]
    pub fn insert(&mut self, stub: ThingSpatial) {
        let key = self.block_of(stub.pos);
        self.cells.entry(key).or_default().push(stub);
        self.len += 1;
    }

    /// Remove `ent`, which was inserted at `pos`.
    pub fn remove(&mut self, ent: Entity, pos: IVec2) -> Option<ThingSpatial> {
        let key = self.block_of(pos);
        let cell = self.cells.get_mut(&key)?;
        let i = cell.iter().position(|s| s.ent == ent)?;
        let stub = cell.swap_remove(i);
        if cell.is_empty() {
            self.cells.remove(&key);
        }
        self.len -= 1;
        Some(stub)
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.len = 0;
    }

    /// Replace the contents with `stubs`.
    pub fn rebuild(&mut self, stubs: impl IntoIterator<Item = ThingSpatial>) {
        self.clear();
        for s in stubs {
            self.insert(s);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Visit every stub whose **origin** lies in the blocks overlapped by
    /// `bbox`.  Iteration stops early when `f` returns `false`.
    pub fn for_each_in_bbox<F>(&self, bbox: Aabb, mut f: F) -> bool
    where
        F: FnMut(&ThingSpatial) -> bool,
    {
        let (xl, yl) = self.block_of(bbox.min);
        let (xh, yh) = self.block_of(bbox.max);

        // a zoomed-out window covers more blocks than there are live cells
        let span = (xh - xl + 1) as i64 * (yh - yl + 1) as i64;
        if span > self.cells.len() as i64 {
            for (&(bx, by), cell) in &self.cells {
                if bx < xl || bx > xh || by < yl || by > yh {
                    continue;
                }
                for stub in cell {
                    if !f(stub) {
                        return false;
                    }
                }
            }
            return true;
        }

        for bx in xl..=xh {
            for by in yl..=yh {
                if let Some(cell) = self.cells.get(&(bx, by)) {
                    for stub in cell {
                        if !f(stub) {
                            return false;
                        }
                    }
                }
            }
        }
        true
    }
}
