// ──────────────────────────────────────────────────────────────────────────
// wad/loader.rs
//
//  *   RawLevel   (wad::level)   ──╮
//  *   PLAYPAL    (from Wad)       │   --->  world::Level  (16.16)
//                                  ╯         world::Palette
// ──────────────────────────────────────────────────────────────────────────

use crate::{
    defs::SpawnOptions,
    fixed::{Angle, from_int},
    wad::level as raw_level,
    wad::raw::{Wad, WadError},
    world::{Level, Palette, geometry as geo},
};
use glam::IVec2;
use thiserror::Error;
use tracing::{debug, info};

/*──────────────────────────── Error type ───────────────────────────*/

#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Wad(#[from] WadError),

    #[error(transparent)]
    Level(#[from] raw_level::LevelError),

    #[error("PLAYPAL lump missing or short - cannot build palette")]
    NoPalette,

    #[error("linedef {line} references vertex {vertex} (only {count} present)")]
    BadVertex {
        line: usize,
        vertex: i16,
        count: usize,
    },

    #[error("sidedef {side} references sector {sector} (only {count} present)")]
    BadSector {
        side: usize,
        sector: i16,
        count: usize,
    },

    #[error("linedef {line} references sidedef {side} (only {count} present)")]
    BadSidedef {
        line: usize,
        side: i16,
        count: usize,
    },
}

/*====================================================================*/
/*                       Public API                                   */
/*====================================================================*/

/// Load the map at `marker` into a `world::Level`.
///
/// Every index is validated here so the automap can index geometry
/// without bounds surprises later on.
pub fn load_level(wad: &Wad, marker: usize) -> Result<Level, LoadError> {
    /*----- 1. Raw lumps --------------------------------------------------*/
    let raw = wad.read_level(marker)?;

    /*----- 2. Convert raw → geo lists ------------------------------------*/
    let vertices: Vec<geo::Vertex> = raw
        .vertices
        .iter()
        .map(raw_to_geo::vertex_from)
        .collect();

    let sectors: Vec<geo::Sector> = raw.sectors.iter().map(raw_to_geo::sector_from).collect();

    let sidedefs: Vec<geo::Sidedef> = raw
        .sidedefs
        .iter()
        .enumerate()
        .map(|(i, s)| {
            if s.sector < 0 || s.sector as usize >= sectors.len() {
                return Err(LoadError::BadSector {
                    side: i,
                    sector: s.sector,
                    count: sectors.len(),
                });
            }
            Ok(raw_to_geo::sidedef_from(s))
        })
        .collect::<Result<_, LoadError>>()?;

    let linedefs: Vec<geo::Linedef> = raw
        .linedefs
        .iter()
        .enumerate()
        .map(|(i, l)| raw_to_geo::linedef_from(i, l, &vertices, &sidedefs))
        .collect::<Result<_, LoadError>>()?;

    let things: Vec<geo::Thing> = raw.things.iter().map(raw_to_geo::thing_from).collect();

    /*----- 3. Blockmap origin (synthesised if the lump is absent) --------*/
    let blockmap_origin = match raw.blockmap_origin {
        Some((x, y)) => IVec2::new(from_int(x as i32), from_int(y as i32)),
        None => {
            debug!(level = %raw.name, "no BLOCKMAP, grid origin taken from vertices");
            Level::synth_blockmap_origin(&vertices)
        }
    };

    info!(
        level = %raw.name,
        vertices = vertices.len(),
        lines = linedefs.len(),
        things = things.len(),
        "level loaded"
    );

    /*----- 4. Assemble world::Level -------------------------------------*/
    Ok(Level {
        name: raw.name,
        things,
        linedefs,
        sidedefs,
        vertices,
        sectors,
        blockmap_origin,
    })
}

/// Decode the first palette of `PLAYPAL`.
pub fn load_palette(wad: &Wad) -> Result<Palette, LoadError> {
    let idx = wad.find("PLAYPAL").ok_or(LoadError::NoPalette)?;
    let bytes = wad.lump(idx)?;
    Palette::from_playpal(bytes).ok_or(LoadError::NoPalette)
}

/*====================================================================*/
/*                  Raw → Geo helpers (local)                         */
/*====================================================================*/
mod raw_to_geo {
    use super::*;

    pub fn thing_from(r: &raw_level::RawThing) -> geo::Thing {
        geo::Thing {
            pos: IVec2::new(from_int(r.x as i32), from_int(r.y as i32)),
            angle: Angle::from_degrees(r.angle as i32),
            type_id: r.doomednum as u16,
            options: SpawnOptions::from_bits_truncate(r.spawn as u16),
        }
    }

    pub fn vertex_from(r: &raw_level::RawVertex) -> geo::Vertex {
        geo::Vertex {
            pos: IVec2::new(from_int(r.x as i32), from_int(r.y as i32)),
        }
    }

    pub fn sector_from(r: &raw_level::RawSector) -> geo::Sector {
        geo::Sector {
            floor_h: from_int(r.floor as i32),
            ceil_h: from_int(r.ceiling as i32),
            light: r.light,
            special: r.special,
            tag: r.tag,
            was_secret: r.special == geo::SECRET_SPECIAL,
        }
    }

    pub fn sidedef_from(r: &raw_level::RawSidedef) -> geo::Sidedef {
        geo::Sidedef {
            x_off: from_int(r.offset[0] as i32),
            y_off: from_int(r.offset[1] as i32),
            sector: r.sector as u16,
        }
    }

    pub fn linedef_from(
        idx: usize,
        r: &raw_level::RawLinedef,
        vertices: &[geo::Vertex],
        sidedefs: &[geo::Sidedef],
    ) -> Result<geo::Linedef, LoadError> {
        for v in [r.start, r.end] {
            if v < 0 || v as usize >= vertices.len() {
                return Err(LoadError::BadVertex {
                    line: idx,
                    vertex: v,
                    count: vertices.len(),
                });
            }
        }

        // -1 (0xFFFF) means "no side"
        let side = |s: i16| -> Result<Option<u16>, LoadError> {
            if s < 0 {
                return Ok(None);
            }
            if s as usize >= sidedefs.len() {
                return Err(LoadError::BadSidedef {
                    line: idx,
                    side: s,
                    count: sidedefs.len(),
                });
            }
            Ok(Some(s as u16))
        };
        let right_sidedef = side(r.sides[0])?;
        let left_sidedef = side(r.sides[1])?;

        Ok(geo::Linedef {
            v1: r.start as u16,
            v2: r.end as u16,
            flags: geo::LinedefFlags::from_bits_truncate(r.flags as u16),
            special: r.special as u16,
            tag: r.tag as u16,
            right_sidedef,
            left_sidedef,
            front_sector: right_sidedef.map(|s| sidedefs[s as usize].sector),
            back_sector: left_sidedef.map(|s| sidedefs[s as usize].sector),
        })
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::FRACUNIT;
    use crate::wad::raw::build_pwad;
    use crate::world::LinedefFlags;

    fn words(vals: &[i16]) -> Vec<u8> {
        vals.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    fn sector_bytes(floor: i16, ceil: i16, special: i16) -> Vec<u8> {
        let mut b = words(&[floor, ceil]);
        b.extend(b"FLOOR4_8");
        b.extend(b"CEIL3_5\0");
        b.extend(words(&[160, special, 0]));
        b
    }

    fn sidedef_bytes(sector: i16) -> Vec<u8> {
        let mut b = words(&[0, 0]);
        b.extend([b'-', 0, 0, 0, 0, 0, 0, 0]);
        b.extend([b'-', 0, 0, 0, 0, 0, 0, 0]);
        b.extend(b"STARTAN3");
        b.extend(words(&[sector]));
        b
    }

    /// Two sectors split by one two-sided line, plus a one-sided wall.
    fn two_room_wad(with_blockmap: bool, linedefs: Vec<u8>) -> Wad {
        let mut sides = sidedef_bytes(0);
        sides.extend(sidedef_bytes(1));
        sides.extend(sidedef_bytes(0));
        let mut sectors = sector_bytes(0, 128, 0);
        sectors.extend(sector_bytes(24, 128, 9));

        let mut lumps = vec![
            ("E1M1", vec![]),
            ("THINGS", words(&[32, 48, 90, 1, 7, 100, 100, 180, 3001, 0x0c])),
            ("LINEDEFS", linedefs),
            ("SIDEDEFS", sides),
            ("VERTEXES", words(&[0, 0, 256, 0, 256, 256, -64, 256])),
            ("SECTORS", sectors),
        ];
        if with_blockmap {
            lumps.push(("BLOCKMAP", words(&[-72, -8, 3, 3])));
        }
        Wad::from_bytes(build_pwad(&lumps)).unwrap()
    }

    fn good_lines() -> Vec<u8> {
        // line 0: two-sided (flags 4|0x20), line 1: one-sided, NOT_ON_MAP
        let mut b = words(&[0, 1, 0x24, 0, 0, 0, 1]);
        b.extend(words(&[1, 2, 0x81, 39, 3, 2, -1]));
        b
    }

    #[test]
    fn converts_to_fixed_point() {
        let wad = two_room_wad(true, good_lines());
        let lvl = load_level(&wad, 0).unwrap();

        assert_eq!(lvl.name, "E1M1");
        assert_eq!(lvl.vertices[1].pos, IVec2::new(256 * FRACUNIT, 0));
        assert_eq!(lvl.vertices[3].pos.x, -64 * FRACUNIT);
        assert_eq!(lvl.sectors[1].floor_h, 24 * FRACUNIT);
        assert_eq!(lvl.blockmap_origin, IVec2::new(-72 * FRACUNIT, -8 * FRACUNIT));

        let t = &lvl.things[1];
        assert_eq!(t.type_id, 3001);
        assert_eq!(t.angle, Angle::from_degrees(180));
        assert!(t.options.contains(SpawnOptions::HARD | SpawnOptions::AMBUSH));
    }

    #[test]
    fn sectors_resolved_through_sidedefs() {
        let wad = two_room_wad(true, good_lines());
        let lvl = load_level(&wad, 0).unwrap();

        let two_sided = &lvl.linedefs[0];
        assert_eq!(two_sided.front_sector, Some(0));
        assert_eq!(two_sided.back_sector, Some(1));
        assert!(two_sided.flags.contains(LinedefFlags::SECRET | LinedefFlags::TWO_SIDED));

        let wall = &lvl.linedefs[1];
        assert_eq!(wall.back_sector, None);
        assert_eq!(wall.special, 39);
        assert!(wall.flags.contains(LinedefFlags::NOT_ON_MAP));
        assert!(!wall.is_mapped());

        assert!(lvl.sectors[1].was_secret);
        assert!(lvl.sectors[1].is_hidden_secret());
    }

    #[test]
    fn blockmap_origin_falls_back_to_vertices() {
        let wad = two_room_wad(false, good_lines());
        let lvl = load_level(&wad, 0).unwrap();
        assert_eq!(lvl.blockmap_origin, IVec2::new(-72 * FRACUNIT, -8 * FRACUNIT));
    }

    #[test]
    fn dangling_vertex_is_an_error() {
        let wad = two_room_wad(true, words(&[0, 9, 1, 0, 0, 0, -1]));
        let err = load_level(&wad, 0).unwrap_err();
        assert!(matches!(err, LoadError::BadVertex { line: 0, vertex: 9, .. }));
    }

    #[test]
    fn dangling_sidedef_is_an_error() {
        let wad = two_room_wad(true, words(&[0, 1, 1, 0, 0, 5, -1]));
        let err = load_level(&wad, 0).unwrap_err();
        assert!(matches!(err, LoadError::BadSidedef { side: 5, .. }));
    }

    #[test]
    fn palette_needs_playpal() {
        let wad = two_room_wad(true, good_lines());
        assert!(matches!(load_palette(&wad), Err(LoadError::NoPalette)));

        let mut pal = vec![0u8; 768 * 14];
        pal[0..3].copy_from_slice(&[255, 0, 0]);
        let wad = Wad::from_bytes(build_pwad(&[("PLAYPAL", pal)])).unwrap();
        assert_eq!(load_palette(&wad).unwrap()[0], 0x00FF_0000);
    }
}
