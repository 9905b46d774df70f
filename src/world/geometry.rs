use bitflags::bitflags;
use glam::IVec2;

use crate::defs::SpawnOptions;
use crate::fixed::{Angle, Fixed};

pub type LinedefId = u16;
pub type VertexId = u16;
pub type SidedefId = u16;
pub type SectorId = u16;

/// Sector special marking a secret area.
pub const SECRET_SPECIAL: i16 = 9;
/// Linedef special of a walk-over teleporter.
pub const TELEPORT_SPECIAL: u16 = 39;

/// Runtime snapshot of one map. Geometry is fixed after load; only the
/// per-line `MAPPED` bit and sector specials change while playing.
#[derive(Clone, Debug)]
pub struct Level {
    pub name: String,
    pub things: Vec<Thing>,
    pub linedefs: Vec<Linedef>,
    pub sidedefs: Vec<Sidedef>,
    pub vertices: Vec<Vertex>,
    pub sectors: Vec<Sector>,
    /// Lower-left corner of the 128-unit blockmap grid (16.16).
    pub blockmap_origin: IVec2,
}

/*------------------------- map things -------------------------------*/

/// Spawn spot as placed in the editor.
#[derive(Clone, Debug)]
pub struct Thing {
    pub pos: IVec2,
    pub angle: Angle,
    pub type_id: u16,
    pub options: SpawnOptions,
}

/*--------------------------- linedefs -------------------------------*/

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LinedefFlags: u16 {
        const IMPASSABLE      = 0x0001;
        const BLOCK_MONSTERS  = 0x0002;
        const TWO_SIDED       = 0x0004;
        const UPPER_UNPEGGED  = 0x0008;
        const LOWER_UNPEGGED  = 0x0010;
        /// Drawn as a plain wall on the map (secret doors).
        const SECRET          = 0x0020;
        const BLOCK_SOUND     = 0x0040;
        /// Never shown on the automap unless cheating.
        const NOT_ON_MAP      = 0x0080;
        /// Seen by the player; set at runtime or by the editor.
        const MAPPED          = 0x0100;
    }
}

#[derive(Clone, Debug)]
pub struct Linedef {
    pub v1: VertexId,
    pub v2: VertexId,
    pub flags: LinedefFlags,
    pub special: u16,
    pub tag: u16,
    pub right_sidedef: Option<SidedefId>,
    pub left_sidedef: Option<SidedefId>,
    /// Resolved through the sidedefs at load time.
    pub front_sector: Option<SectorId>,
    pub back_sector: Option<SectorId>,
}

impl Linedef {
    #[inline]
    pub fn is_mapped(&self) -> bool {
        self.flags.contains(LinedefFlags::MAPPED)
    }
}

/*--------------------------- sidedefs -------------------------------*/

#[derive(Clone, Debug)]
pub struct Sidedef {
    pub x_off: Fixed,
    pub y_off: Fixed,
    pub sector: SectorId,
}

/*----------------------- simple primitives --------------------------*/

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Vertex {
    pub pos: IVec2,
}

/// Axis-aligned box in world coordinates (16.16).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Aabb {
    pub min: IVec2,
    pub max: IVec2,
}

impl Aabb {
    pub fn around(center: IVec2, half: IVec2) -> Self {
        Aabb {
            min: center.saturating_sub(half),
            max: center.saturating_add(half),
        }
    }

    #[inline]
    pub fn contains(&self, p: IVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

#[derive(Clone, Debug)]
pub struct Sector {
    pub floor_h: Fixed,
    pub ceil_h: Fixed,
    pub light: i16,
    pub special: i16,
    pub tag: i16,
    /// Sector started the level as a secret; stays set after discovery.
    pub was_secret: bool,
}

impl Sector {
    /// Secret still waiting to be found.
    #[inline]
    pub fn is_hidden_secret(&self) -> bool {
        self.special == SECRET_SPECIAL
    }

    /// Secret the player already entered.
    #[inline]
    pub fn is_found_secret(&self) -> bool {
        self.was_secret && self.special != SECRET_SPECIAL
    }
}

/// Slack between the left/bottom-most vertex and a synthesised blockmap
/// origin, matching what node builders emit.
const BLOCKMAP_MARGIN: Fixed = 8 << 16;

impl Level {
    /// Grid origin for maps that ship without a `BLOCKMAP`.
    pub fn synth_blockmap_origin(vertices: &[Vertex]) -> IVec2 {
        vertices
            .iter()
            .map(|v| v.pos)
            .reduce(IVec2::min)
            .map_or(IVec2::ZERO, |m| m.saturating_sub(IVec2::splat(BLOCKMAP_MARGIN)))
    }

    /// Endpoints of `line` in world coordinates.
    #[inline]
    pub fn line_ends(&self, line: &Linedef) -> (IVec2, IVec2) {
        (
            self.vertices[line.v1 as usize].pos,
            self.vertices[line.v2 as usize].pos,
        )
    }

    pub fn front_sector(&self, line: &Linedef) -> Option<&Sector> {
        line.front_sector.and_then(|s| self.sectors.get(s as usize))
    }

    pub fn back_sector(&self, line: &Linedef) -> Option<&Sector> {
        line.back_sector.and_then(|s| self.sectors.get(s as usize))
    }

    /// Mark every line with an endpoint within `radius` of `pos` as seen.
    ///
    /// Stands in for the renderer's "line was drawn this frame" hook.
    pub fn reveal_around(&mut self, pos: IVec2, radius: Fixed) -> usize {
        let area = Aabb::around(pos, IVec2::splat(radius));
        let mut revealed = 0;
        for i in 0..self.linedefs.len() {
            if self.linedefs[i].is_mapped() {
                continue;
            }
            let (a, b) = self.line_ends(&self.linedefs[i]);
            if area.contains(a) || area.contains(b) {
                self.linedefs[i].flags.insert(LinedefFlags::MAPPED);
                revealed += 1;
            }
        }
        revealed
    }

    /// Sector containing `pos`: the nearest line crossed by a ray toward
    /// +x decides, by which of its sides faces the point.
    pub fn sector_at(&self, pos: IVec2) -> Option<SectorId> {
        let (px, py) = (pos.x as i128, pos.y as i128);
        let mut nearest: Option<(i128, &Linedef)> = None;
        for line in &self.linedefs {
            let (a, b) = self.line_ends(line);
            let (ax, ay, bx, by) = (a.x as i128, a.y as i128, b.x as i128, b.y as i128);
            if (ay > py) == (by > py) {
                continue;
            }
            let x = ax + (py - ay) * (bx - ax) / (by - ay);
            if x < px {
                continue;
            }
            if nearest.is_none_or(|(best, _)| x < best) {
                nearest = Some((x, line));
            }
        }
        let (_, line) = nearest?;
        let (a, b) = self.line_ends(line);
        let cross = (b.x as i128 - a.x as i128) * (py - a.y as i128)
            - (b.y as i128 - a.y as i128) * (px - a.x as i128);
        if cross < 0 { line.front_sector } else { line.back_sector }
    }

    /// Player entered sector `id`: a pending secret becomes a found one.
    pub fn discover_secret(&mut self, id: SectorId) -> bool {
        match self.sectors.get_mut(id as usize) {
            Some(s) if s.is_hidden_secret() => {
                s.special = 0;
                true
            }
            _ => false,
        }
    }
}
