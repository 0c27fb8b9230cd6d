//! The `INFO` list: version and free text metadata about the bank.

use crate::chunk::{display_id, read_chunk, Chunk};
use crate::error::{Error, Result};
use binread::{BinRead, BinReaderExt};
use log::{debug, warn};
use riff::ChunkId;
use std::borrow::Cow;
use std::fmt;
use std::io::Read;

/// Sound engine assumed when the bank does not name one.
pub const DEFAULT_ENGINE: &[u8] = b"EMU8000";

#[derive(BinRead, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[br(little)]
pub struct Version {
    pub major: u16,
    pub minor: u16,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl From<&Version> for [u8; 4] {
    fn from(v: &Version) -> Self {
        let mut b = [0u8; 4];
        b[0..2].copy_from_slice(&v.major.to_le_bytes());
        b[2..4].copy_from_slice(&v.minor.to_le_bytes());
        b
    }
}

/// Bank metadata.
///
/// Text fields hold the chunk payload byte for byte, including any zero
/// terminators. Nothing is decoded; use [`display_text`] to print a field.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Info {
    /// SoundFont specification version the bank complies with (`ifil`).
    pub version: Version,
    /// Target sound engine (`isng`), [`DEFAULT_ENGINE`] when absent.
    pub engine: Vec<u8>,
    /// Bank name (`INAM`).
    pub name: Vec<u8>,
    /// Sound ROM the ROM samples refer to (`irom`).
    pub rom: Vec<u8>,
    /// ROM revision (`iver`).
    pub rom_version: Option<Version>,
    pub creation_date: Vec<u8>,
    pub engineers: Vec<u8>,
    pub product: Vec<u8>,
    pub copyright: Vec<u8>,
    pub comments: Vec<u8>,
    pub software: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InfoTag {
    Ifil,
    Isng,
    Inam,
    Irom,
    Iver,
    Icrd,
    Ieng,
    Iprd,
    Icop,
    Icmt,
    Isft,
}

impl InfoTag {
    const COUNT: usize = 11;

    const ALL: [InfoTag; InfoTag::COUNT] = [
        InfoTag::Ifil,
        InfoTag::Isng,
        InfoTag::Inam,
        InfoTag::Irom,
        InfoTag::Iver,
        InfoTag::Icrd,
        InfoTag::Ieng,
        InfoTag::Iprd,
        InfoTag::Icop,
        InfoTag::Icmt,
        InfoTag::Isft,
    ];

    fn id(self) -> ChunkId {
        let value = match self {
            InfoTag::Ifil => b"ifil",
            InfoTag::Isng => b"isng",
            InfoTag::Inam => b"INAM",
            InfoTag::Irom => b"irom",
            InfoTag::Iver => b"iver",
            InfoTag::Icrd => b"ICRD",
            InfoTag::Ieng => b"IENG",
            InfoTag::Iprd => b"IPRD",
            InfoTag::Icop => b"ICOP",
            InfoTag::Icmt => b"ICMT",
            InfoTag::Isft => b"ISFT",
        };
        ChunkId { value: *value }
    }

    fn from_id(id: &ChunkId) -> Option<InfoTag> {
        InfoTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.id().value == id.value)
    }

    /// Largest payload accepted for a text field.
    fn max_len(self) -> usize {
        match self {
            InfoTag::Icmt => 65536,
            _ => 256,
        }
    }
}

fn read_version(chunk: &Chunk) -> Result<Version> {
    if chunk.len() != 4 {
        return Err(Error::MalformedField {
            id: chunk.id.clone(),
            len: chunk.len(),
        });
    }
    Ok(chunk.reader().read_le::<Version>()?)
}

/// Printable form of an info text field: everything up to the first zero
/// byte, with invalid UTF-8 replaced.
pub fn display_text(raw: &[u8]) -> Cow<'_, str> {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end])
}

fn read_text(chunk: Chunk, tag: InfoTag) -> Result<Vec<u8>> {
    let max = tag.max_len();
    if chunk.len() > max {
        return Err(Error::FieldTooLarge {
            id: chunk.id.clone(),
            len: chunk.len(),
            max,
        });
    }
    Ok(chunk.data)
}

impl Info {
    /// Decodes the body of an `INFO` list, i.e. everything after the list type.
    pub fn read<R: Read>(reader: &mut R) -> Result<Info> {
        let mut info = Info::default();
        let mut seen = [false; InfoTag::COUNT];

        while let Some(chunk) = read_chunk(reader)? {
            let tag = match InfoTag::from_id(&chunk.id) {
                Some(tag) => tag,
                None => {
                    debug!("skipping unknown INFO chunk '{}'", display_id(&chunk.id));
                    continue;
                }
            };
            if seen[tag as usize] {
                return Err(Error::DuplicateField(chunk.id));
            }
            seen[tag as usize] = true;

            match tag {
                InfoTag::Ifil => info.version = read_version(&chunk)?,
                InfoTag::Iver => info.rom_version = Some(read_version(&chunk)?),
                InfoTag::Isng => info.engine = read_text(chunk, tag)?,
                InfoTag::Inam => info.name = read_text(chunk, tag)?,
                InfoTag::Irom => info.rom = read_text(chunk, tag)?,
                InfoTag::Icrd => info.creation_date = read_text(chunk, tag)?,
                InfoTag::Ieng => info.engineers = read_text(chunk, tag)?,
                InfoTag::Iprd => info.product = read_text(chunk, tag)?,
                InfoTag::Icop => info.copyright = read_text(chunk, tag)?,
                InfoTag::Icmt => info.comments = read_text(chunk, tag)?,
                InfoTag::Isft => info.software = read_text(chunk, tag)?,
            }
        }

        if !seen[InfoTag::Ifil as usize] {
            return Err(Error::MissingRequiredField(InfoTag::Ifil.id()));
        }
        if !seen[InfoTag::Isng as usize] {
            info.engine = DEFAULT_ENGINE.to_vec();
        }
        if !seen[InfoTag::Inam as usize] {
            warn!("bank has no name");
        }
        debug!("Version: {}, name: {:?}", info.version, display_text(&info.name));
        Ok(info)
    }
}
