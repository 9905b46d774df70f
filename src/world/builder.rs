//! Programmatic level construction, for maps that do not come from a WAD
//! (test fixtures, generated arenas).

use glam::IVec2;

use super::geometry::{
    Level, Linedef, LinedefFlags, LinedefId, SECRET_SPECIAL, Sector, SectorId, Sidedef, Thing,
    Vertex, VertexId,
};
use crate::defs::SpawnOptions;
use crate::fixed::{Angle, from_int};

/// Builds a [`Level`] from whole map units.
pub struct LevelBuilder {
    level: Level,
}

impl LevelBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            level: Level {
                name: name.into(),
                things: Vec::new(),
                linedefs: Vec::new(),
                sidedefs: Vec::new(),
                vertices: Vec::new(),
                sectors: Vec::new(),
                blockmap_origin: IVec2::ZERO,
            },
        }
    }

    pub fn sector(&mut self, floor: i32, ceil: i32) -> SectorId {
        self.push_sector(floor, ceil, 0)
    }

    /// Sector carrying the secret special (still undiscovered).
    pub fn secret_sector(&mut self, floor: i32, ceil: i32) -> SectorId {
        self.push_sector(floor, ceil, SECRET_SPECIAL)
    }

    fn push_sector(&mut self, floor: i32, ceil: i32, special: i16) -> SectorId {
        self.level.sectors.push(Sector {
            floor_h: from_int(floor),
            ceil_h: from_int(ceil),
            light: 160,
            special,
            tag: 0,
            was_secret: special == SECRET_SPECIAL,
        });
        (self.level.sectors.len() - 1) as SectorId
    }

    pub fn vertex(&mut self, x: i32, y: i32) -> VertexId {
        self.level.vertices.push(Vertex {
            pos: IVec2::new(from_int(x), from_int(y)),
        });
        (self.level.vertices.len() - 1) as VertexId
    }

    fn side(&mut self, sector: SectorId) -> u16 {
        self.level.sidedefs.push(Sidedef {
            x_off: 0,
            y_off: 0,
            sector,
        });
        (self.level.sidedefs.len() - 1) as u16
    }

    /// One-sided wall facing `front`.
    pub fn wall(&mut self, v1: VertexId, v2: VertexId, front: SectorId) -> LinedefId {
        let right = self.side(front);
        self.push_line(Linedef {
            v1,
            v2,
            flags: LinedefFlags::IMPASSABLE,
            special: 0,
            tag: 0,
            right_sidedef: Some(right),
            left_sidedef: None,
            front_sector: Some(front),
            back_sector: None,
        })
    }

    /// Two-sided line between `front` and `back`.
    pub fn portal(
        &mut self,
        v1: VertexId,
        v2: VertexId,
        front: SectorId,
        back: SectorId,
    ) -> LinedefId {
        let right = self.side(front);
        let left = self.side(back);
        self.push_line(Linedef {
            v1,
            v2,
            flags: LinedefFlags::TWO_SIDED,
            special: 0,
            tag: 0,
            right_sidedef: Some(right),
            left_sidedef: Some(left),
            front_sector: Some(front),
            back_sector: Some(back),
        })
    }

    fn push_line(&mut self, line: Linedef) -> LinedefId {
        self.level.linedefs.push(line);
        (self.level.linedefs.len() - 1) as LinedefId
    }

    pub fn line_mut(&mut self, id: LinedefId) -> &mut Linedef {
        &mut self.level.linedefs[id as usize]
    }

    /// Closed box of one-sided walls around `sector`, wound clockwise so
    /// the front sides face in.
    pub fn room(&mut self, min: (i32, i32), max: (i32, i32), sector: SectorId) -> [LinedefId; 4] {
        let a = self.vertex(min.0, min.1);
        let b = self.vertex(max.0, min.1);
        let c = self.vertex(max.0, max.1);
        let d = self.vertex(min.0, max.1);
        [
            self.wall(a, d, sector),
            self.wall(d, c, sector),
            self.wall(c, b, sector),
            self.wall(b, a, sector),
        ]
    }

    pub fn thing(&mut self, x: i32, y: i32, angle_deg: i32, type_id: u16) -> &mut Self {
        self.level.things.push(Thing {
            pos: IVec2::new(from_int(x), from_int(y)),
            angle: Angle::from_degrees(angle_deg),
            type_id,
            options: SpawnOptions::EASY | SpawnOptions::MEDIUM | SpawnOptions::HARD,
        });
        self
    }

    /// Mark every line as seen.
    pub fn all_mapped(&mut self) -> &mut Self {
        for l in &mut self.level.linedefs {
            l.flags.insert(LinedefFlags::MAPPED);
        }
        self
    }

    pub fn build(mut self) -> Level {
        self.level.blockmap_origin = Level::synth_blockmap_origin(&self.level.vertices);
        self.level
    }
}
