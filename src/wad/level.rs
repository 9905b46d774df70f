//! Map blocks: finding `E#M#`/`MAP##` markers and decoding the lumps the
//! automap uses.  Nodes, segs and the reject table are never read.

use bincode::Decode;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::wad::{Wad, WadError};

/// Furthest a map lump may sit after its marker (`THINGS` .. `BLOCKMAP`).
const MAP_BLOCK_LEN: usize = 10;

static MAP_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(E[1-4]M[1-9]|MAP[0-3][0-9])$").expect("static map-marker regex")
});

/// Lump names inside a map block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapLump {
    Things,
    Linedefs,
    Sidedefs,
    Vertexes,
    Sectors,
    Blockmap,
}

impl MapLump {
    pub const fn name(self) -> &'static str {
        match self {
            MapLump::Things => "THINGS",
            MapLump::Linedefs => "LINEDEFS",
            MapLump::Sidedefs => "SIDEDEFS",
            MapLump::Vertexes => "VERTEXES",
            MapLump::Sectors => "SECTORS",
            MapLump::Blockmap => "BLOCKMAP",
        }
    }
}

/*──────────────────────── on-disk records ───────────────────────*/

/// 10 bytes.
#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct RawThing {
    pub x: i16,
    pub y: i16,
    /// Degrees, counter-clockwise from east.
    pub angle: i16,
    pub doomednum: i16,
    /// Skill and mode bits.
    pub spawn: i16,
}

/// 14 bytes.
#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct RawLinedef {
    pub start: i16,
    pub end: i16,
    pub flags: i16,
    pub special: i16,
    pub tag: i16,
    /// Front, back; -1 for none.
    pub sides: [i16; 2],
}

/// 30 bytes; the automap only keeps the sector.
#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct RawSidedef {
    pub offset: [i16; 2],
    pub textures: [[u8; 8]; 3],
    pub sector: i16,
}

/// 4 bytes.
#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct RawVertex {
    pub x: i16,
    pub y: i16,
}

/// 26 bytes.
#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct RawSector {
    pub floor: i16,
    pub ceiling: i16,
    pub flats: [[u8; 8]; 2],
    pub light: i16,
    pub special: i16,
    pub tag: i16,
}

/// One map block, still in WAD integers.
#[derive(Debug)]
pub struct RawLevel {
    pub name: String,
    pub things: Vec<RawThing>,
    pub linedefs: Vec<RawLinedef>,
    pub sidedefs: Vec<RawSidedef>,
    pub vertices: Vec<RawVertex>,
    pub sectors: Vec<RawSector>,
    /// First two words of `BLOCKMAP`; `None` when the lump is absent.
    pub blockmap_origin: Option<(i16, i16)>,
}

#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("marker index {0} out of bounds")]
    MarkerOob(usize),

    #[error("lump `{0}` is not a map marker")]
    NotAMarker(String),

    #[error("map has no `{0}` lump")]
    Missing(&'static str),

    #[error(transparent)]
    Wad(#[from] WadError),
}

pub fn is_map_marker(name: &str) -> bool {
    MAP_MARKER.is_match(name)
}

impl Wad {
    /// Directory indices of every map marker, in file order.
    pub fn level_indices(&self) -> Vec<usize> {
        self.lumps()
            .iter()
            .enumerate()
            .filter(|(_, l)| l.size == 0 && is_map_marker(l.name()))
            .map(|(i, _)| i)
            .collect()
    }

    /// Index of `which` inside the block opened by `marker`.  The search
    /// stops at the next marker so a short map never borrows lumps.
    pub fn map_lump(&self, marker: usize, which: MapLump) -> Option<usize> {
        let end = (marker + 1 + MAP_BLOCK_LEN).min(self.lumps().len());
        (marker + 1..end)
            .take_while(|&i| !is_map_marker(self.name_of(i)))
            .find(|&i| self.name_of(i) == which.name())
    }

    fn map_records<T>(&self, marker: usize, which: MapLump) -> Result<Vec<T>, LevelError>
    where
        T: Decode<()>,
    {
        let idx = self
            .map_lump(marker, which)
            .ok_or(LevelError::Missing(which.name()))?;
        Ok(self.records(idx)?)
    }

    /// Read the map whose marker sits at `marker`.
    pub fn read_level(&self, marker: usize) -> Result<RawLevel, LevelError> {
        if marker >= self.lumps().len() {
            return Err(LevelError::MarkerOob(marker));
        }
        let name = self.name_of(marker);
        if !is_map_marker(name) {
            return Err(LevelError::NotAMarker(name.into()));
        }

        // a blockmap too short for its header counts as missing
        let blockmap_origin = self
            .map_lump(marker, MapLump::Blockmap)
            .and_then(|i| self.lump(i).ok())
            .and_then(|b| b.get(..4))
            .map(|h| (i16::from_le_bytes([h[0], h[1]]), i16::from_le_bytes([h[2], h[3]])));

        Ok(RawLevel {
            name: name.into(),
            things: self.map_records(marker, MapLump::Things)?,
            linedefs: self.map_records(marker, MapLump::Linedefs)?,
            sidedefs: self.map_records(marker, MapLump::Sidedefs)?,
            vertices: self.map_records(marker, MapLump::Vertexes)?,
            sectors: self.map_records(marker, MapLump::Sectors)?,
            blockmap_origin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wad::raw::build_pwad;

    fn words(vals: &[i16]) -> Vec<u8> {
        vals.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    fn one_wall_map(extra: &[(&'static str, Vec<u8>)]) -> Wad {
        let mut side = words(&[0, 0]);
        side.extend([0u8; 24]);
        side.extend(words(&[0]));
        let mut sector = words(&[-16, 72]);
        sector.extend([0u8; 16]);
        sector.extend(words(&[192, 9, 0]));

        let mut lumps = vec![
            ("E2M4", vec![]),
            ("THINGS", words(&[64, 64, 90, 1, 7])),
            ("LINEDEFS", words(&[0, 1, 1, 0, 0, 0, -1])),
            ("SIDEDEFS", side),
            ("VERTEXES", words(&[0, 0, 128, 0])),
            ("SEGS", vec![0; 12]),
            ("SECTORS", sector),
        ];
        lumps.extend(extra.iter().cloned());
        Wad::from_bytes(build_pwad(&lumps)).unwrap()
    }

    #[test]
    fn markers_follow_the_naming_rules() {
        for good in ["E1M1", "E4M9", "MAP01", "MAP32"] {
            assert!(is_map_marker(good), "{good}");
        }
        for bad in ["E5M1", "E1M0", "MAP4", "MAP40", "THINGS", "e1m1"] {
            assert!(!is_map_marker(bad), "{bad}");
        }
        let wad = one_wall_map(&[("MAP07", vec![]), ("MAP08", vec![1])]);
        // a marker always has an empty body
        assert_eq!(wad.level_indices(), vec![0, 7]);
    }

    #[test]
    fn reads_a_map_block() {
        let wad = one_wall_map(&[("BLOCKMAP", words(&[-8, 24, 1, 1]))]);
        let lvl = wad.read_level(0).expect("level decode");
        assert_eq!(lvl.name, "E2M4");
        assert_eq!(lvl.things[0].doomednum, 1);
        assert_eq!(lvl.things[0].spawn, 7);
        assert_eq!(lvl.linedefs[0].sides, [0, -1]);
        assert_eq!(lvl.vertices[1].x, 128);
        assert_eq!(lvl.sectors[0].floor, -16);
        assert_eq!(lvl.sectors[0].special, 9);
        assert_eq!(lvl.blockmap_origin, Some((-8, 24)));
    }

    #[test]
    fn short_blockmap_is_ignored() {
        let wad = one_wall_map(&[("BLOCKMAP", vec![1, 0])]);
        assert_eq!(wad.read_level(0).unwrap().blockmap_origin, None);
        let wad = one_wall_map(&[]);
        assert_eq!(wad.read_level(0).unwrap().blockmap_origin, None);
    }

    #[test]
    fn marker_checks() {
        let wad = one_wall_map(&[]);
        let oob = wad.read_level(wad.lumps().len() + 3).unwrap_err();
        assert!(matches!(oob, LevelError::MarkerOob(_)));
        let err = wad.read_level(2).unwrap_err();
        assert!(matches!(err, LevelError::NotAMarker(ref n) if n == "LINEDEFS"));
    }

    #[test]
    fn lumps_are_not_borrowed_from_the_next_map() {
        let wad = one_wall_map(&[("MAP02", vec![]), ("VERTEXES", words(&[0, 0]))]);
        assert_eq!(wad.map_lump(7, MapLump::Vertexes), Some(8));
        let err = wad.read_level(7).unwrap_err();
        assert!(matches!(err, LevelError::Missing("THINGS")));
    }
}
