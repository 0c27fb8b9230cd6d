//! The `sdta` list: raw sample words.

use crate::chunk::{read_chunk, Chunk};
use crate::error::{Error, Result};
use log::debug;
use riff::ChunkId;
use std::io::Read;

pub const SMPL: ChunkId = ChunkId { value: *b"smpl" };
pub const SM24: ChunkId = ChunkId { value: *b"sm24" };

/// Sample data points. `higher` holds the 16 bit words from `smpl`;
/// `lower` is either empty or holds one extra low byte per word from `sm24`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SampleData {
    pub higher: Vec<i16>,
    pub lower: Vec<i8>,
}

impl SampleData {
    /// Decodes the body of an `sdta` list, i.e. everything after the list type.
    pub fn read<R: Read>(reader: &mut R) -> Result<SampleData> {
        let smpl = match read_chunk(reader)? {
            Some(chunk) if chunk.id.value == SMPL.value => chunk,
            Some(chunk) => {
                return Err(Error::UnexpectedTag {
                    expected: SMPL,
                    found: chunk.id,
                })
            }
            None => return Err(Error::MissingChunk(SMPL)),
        };
        let higher = read_words(&smpl)?;
        debug!("Samples: {}", higher.len());

        let lower = match read_chunk(reader)? {
            Some(chunk) if chunk.id.value == SM24.value => read_low_bytes(&chunk, higher.len())?,
            Some(chunk) => {
                return Err(Error::UnexpectedTag {
                    expected: SM24,
                    found: chunk.id,
                })
            }
            None => vec![],
        };

        Ok(SampleData { higher, lower })
    }

    pub fn len(&self) -> usize {
        self.higher.len()
    }

    pub fn is_empty(&self) -> bool {
        self.higher.is_empty()
    }

    /// Whether `sm24` low bytes were present.
    pub fn is_24_bit(&self) -> bool {
        !self.lower.is_empty()
    }

    /// Sample `ix` at 24 bit precision. Without low bytes the word is just
    /// shifted up.
    pub fn sample_24(&self, ix: usize) -> Option<i32> {
        let high = i32::from(*self.higher.get(ix)?);
        let low = match self.lower.get(ix) {
            Some(&low) => i32::from(low as u8),
            None => 0,
        };
        Some(high << 8 | low)
    }
}

fn read_words(chunk: &Chunk) -> Result<Vec<i16>> {
    if chunk.len() % 2 != 0 {
        return Err(Error::InvalidChunkSize {
            id: chunk.id.clone(),
            len: chunk.len(),
            reason: "expected an even number of bytes".to_string(),
        });
    }
    Ok(chunk
        .data
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]))
        .collect())
}

fn read_low_bytes(chunk: &Chunk, count: usize) -> Result<Vec<i8>> {
    if chunk.len() != count {
        return Err(Error::InvalidChunkSize {
            id: chunk.id.clone(),
            len: chunk.len(),
            reason: format!("expected {} bytes, one per sample", count),
        });
    }
    Ok(chunk.data.iter().map(|&b| b as i8).collect())
}
