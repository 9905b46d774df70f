//! WAD container: header, lump directory and typed lump decoding.
//!
//! The file is read into memory once; lumps are handed out as slices of
//! that image and decoded into record vectors with **bincode 2**.

use bincode::{Decode, config, decode_from_slice};
use byteorder::{LittleEndian as LE, ReadBytesExt};
use std::{collections::HashMap, fs, io, mem, ops::Range, path::Path};
use thiserror::Error;
use tracing::debug;

/// `"IWAD"`/`"PWAD"`, lump count, directory offset.
const HEADER_SIZE: usize = 12;
/// Offset, size, 8-byte name.
const DIR_ENTRY_SIZE: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WadKind {
    /// A complete game.
    Iwad,
    /// A patch loaded on top of one.
    Pwad,
}

#[derive(Clone, Debug)]
pub struct LumpInfo {
    pub name: [u8; 8],
    pub offset: u32,
    pub size: u32,
}

impl LumpInfo {
    /// Name up to the first NUL; `"?"` when it is not UTF-8.
    pub fn name(&self) -> &str {
        let end = self.name.iter().position(|&b| b == 0).unwrap_or(8);
        std::str::from_utf8(&self.name[..end]).unwrap_or("?")
    }

    fn range(&self) -> Range<usize> {
        let start = self.offset as usize;
        start..start + self.size as usize
    }
}

#[derive(Error, Debug)]
pub enum WadError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("identification {0:?} is neither IWAD nor PWAD")]
    BadMagic([u8; 4]),

    #[error("file of {0} bytes is too short for its header or directory")]
    Truncated(usize),

    #[error("no lump #{0}")]
    NoLump(usize),

    #[error("lump {name} (#{index}) runs past the end of the file")]
    PastEnd { index: usize, name: String },

    #[error("lump {name} is {len} bytes, not a whole number of {record}-byte records")]
    Ragged {
        name: String,
        len: usize,
        record: usize,
    },

    #[error("lump {name}, record {at}: {source}")]
    Record {
        name: String,
        at: usize,
        source: bincode::error::DecodeError,
    },
}

/// A WAD image and its directory.
#[derive(Debug)]
pub struct Wad {
    kind: WadKind,
    dir: Vec<LumpInfo>,
    image: Vec<u8>,
    /// Upper-cased name to the last lump carrying it.
    names: HashMap<String, usize>,
}

fn read_directory(image: &[u8]) -> Result<(WadKind, Vec<LumpInfo>), WadError> {
    if image.len() < HEADER_SIZE {
        return Err(WadError::Truncated(image.len()));
    }
    let magic: [u8; 4] = [image[0], image[1], image[2], image[3]];
    let kind = match &magic {
        b"IWAD" => WadKind::Iwad,
        b"PWAD" => WadKind::Pwad,
        _ => return Err(WadError::BadMagic(magic)),
    };

    let mut header = &image[4..HEADER_SIZE];
    let count = header.read_u32::<LE>()? as usize;
    let at = header.read_u32::<LE>()? as usize;
    let table = at
        .checked_add(count * DIR_ENTRY_SIZE)
        .and_then(|end| image.get(at..end))
        .ok_or(WadError::Truncated(image.len()))?;

    let dir = table
        .chunks_exact(DIR_ENTRY_SIZE)
        .map(|mut entry| -> Result<LumpInfo, WadError> {
            let offset = entry.read_u32::<LE>()?;
            let size = entry.read_u32::<LE>()?;
            let mut name = [0u8; 8];
            name.copy_from_slice(entry);
            Ok(LumpInfo { name, offset, size })
        })
        .collect::<Result<Vec<_>, WadError>>()?;

    if let Some((index, l)) = dir
        .iter()
        .enumerate()
        .find(|(_, l)| l.range().end > image.len())
    {
        return Err(WadError::PastEnd {
            index,
            name: l.name().into(),
        });
    }
    Ok((kind, dir))
}

impl Wad {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, WadError> {
        let wad = Self::from_bytes(fs::read(&path)?)?;
        debug!(
            path = %path.as_ref().display(),
            kind = ?wad.kind,
            lumps = wad.dir.len(),
            "wad opened"
        );
        Ok(wad)
    }

    /// Parse an in-memory image.
    pub fn from_bytes(image: Vec<u8>) -> Result<Self, WadError> {
        let (kind, dir) = read_directory(&image)?;
        // walking forwards lets later lumps replace earlier ones
        let names = dir
            .iter()
            .enumerate()
            .map(|(i, l)| (l.name().to_ascii_uppercase(), i))
            .collect();
        Ok(Self {
            kind,
            dir,
            image,
            names,
        })
    }

    #[inline]
    pub fn kind(&self) -> WadKind {
        self.kind
    }

    #[inline]
    pub fn lumps(&self) -> &[LumpInfo] {
        &self.dir
    }

    /// Name of lump `idx`, or `"?"` when there is none.
    pub fn name_of(&self, idx: usize) -> &str {
        self.dir.get(idx).map_or("?", LumpInfo::name)
    }

    /// Last lump called `name`, ignoring case.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.names.get(&name.to_ascii_uppercase()).copied()
    }

    pub fn lump(&self, idx: usize) -> Result<&[u8], WadError> {
        let l = self.dir.get(idx).ok_or(WadError::NoLump(idx))?;
        // every range was checked against the image in `read_directory`
        Ok(&self.image[l.range()])
    }

    /// Decode lump `idx` as packed little-endian records of `T`.
    ///
    /// An empty lump gives an empty vector; a trailing partial record is
    /// an error.
    pub fn records<T: Decode<()>>(&self, idx: usize) -> Result<Vec<T>, WadError> {
        let bytes = self.lump(idx)?;
        let record = mem::size_of::<T>();
        if bytes.len() % record != 0 {
            return Err(WadError::Ragged {
                name: self.name_of(idx).into(),
                len: bytes.len(),
                record,
            });
        }

        let cfg = config::standard()
            .with_fixed_int_encoding()
            .with_little_endian();
        let mut out = Vec::with_capacity(bytes.len() / record);
        let mut rest = bytes;
        while !rest.is_empty() {
            let (val, used) =
                decode_from_slice::<T, _>(rest, cfg).map_err(|source| WadError::Record {
                    name: self.name_of(idx).into(),
                    at: out.len(),
                    source,
                })?;
            out.push(val);
            rest = &rest[used..];
        }
        Ok(out)
    }
}

/// PWAD image holding `lumps` in order.  Test fixtures only.
#[cfg(test)]
pub(crate) fn build_pwad(lumps: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let payload: Vec<u8> = lumps.iter().flat_map(|(_, d)| d.iter().copied()).collect();
    let dir_at = (HEADER_SIZE + payload.len()) as u32;

    let mut out = b"PWAD".to_vec();
    out.extend((lumps.len() as u32).to_le_bytes());
    out.extend(dir_at.to_le_bytes());
    out.extend(&payload);

    let mut offset = HEADER_SIZE as u32;
    for (name, data) in lumps {
        let mut raw = [0u8; 8];
        raw[..name.len()].copy_from_slice(name.as_bytes());
        out.extend(offset.to_le_bytes());
        out.extend((data.len() as u32).to_le_bytes());
        out.extend(raw);
        offset += data.len() as u32;
    }
    out
}
