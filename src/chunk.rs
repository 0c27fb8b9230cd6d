//! RIFF chunk framing.
//!
//! A chunk is a 4 byte id, a little endian `u32` length and exactly that many
//! bytes of payload. Only sequential reads are needed, so everything here
//! works on a plain [`Read`].

use crate::error::{Error, Result};
use log::trace;
use riff::ChunkId;
use std::io::{self, Cursor, Read};

pub const RIFF: ChunkId = ChunkId { value: *b"RIFF" };
pub const LIST: ChunkId = ChunkId { value: *b"LIST" };
pub const SFBK: ChunkId = ChunkId { value: *b"sfbk" };
pub const INFO: ChunkId = ChunkId { value: *b"INFO" };
pub const SDTA: ChunkId = ChunkId { value: *b"sdta" };
pub const PDTA: ChunkId = ChunkId { value: *b"pdta" };

/// Printable form of a chunk id. Ids are not guaranteed to be ASCII, so
/// anything unprintable is escaped.
pub fn display_id(id: &ChunkId) -> String {
    id.value.escape_ascii().to_string()
}

#[derive(Debug, Clone)]
pub struct Chunk {
    pub id: ChunkId,
    pub data: Vec<u8>,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// A byte source over this chunk's payload and nothing beyond it.
    pub fn reader(&self) -> Cursor<&[u8]> {
        Cursor::new(&self.data[..])
    }
}

// Reads as much of `buf` as the source has, returning how much was filled.
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

fn read_exact<R: Read>(reader: &mut R, buf: &mut [u8], what: &'static str) -> Result<()> {
    if fill(reader, buf)? == buf.len() {
        Ok(())
    } else {
        Err(Error::TruncatedInput { what })
    }
}

/// Reads the id and length that open a chunk, or `None` if the source is
/// already exhausted. The payload is left unread.
///
/// Running out of bytes anywhere after the first byte of the id is a
/// truncation.
pub fn read_header<R: Read>(reader: &mut R) -> Result<Option<(ChunkId, usize)>> {
    let mut id = [0u8; 4];
    match fill(reader, &mut id)? {
        0 => return Ok(None),
        4 => {}
        _ => return Err(Error::TruncatedInput { what: "chunk id" }),
    }
    let mut len = [0u8; 4];
    read_exact(reader, &mut len, "chunk length")?;
    Ok(Some((
        ChunkId { value: id },
        u32::from_le_bytes(len) as usize,
    )))
}

/// Like [`read_header`], but the source must not be exhausted.
pub fn parse_header<R: Read>(reader: &mut R) -> Result<(ChunkId, usize)> {
    read_header(reader)?.ok_or(Error::TruncatedInput { what: "chunk id" })
}

/// Reads the `len` payload bytes following a header. No pad byte is skipped
/// after an odd length payload.
pub fn read_payload<R: Read>(reader: &mut R, id: ChunkId, len: usize) -> Result<Chunk> {
    // Grow the buffer from what is actually there rather than trusting `len`.
    let mut data = Vec::new();
    reader.by_ref().take(len as u64).read_to_end(&mut data)?;
    if data.len() != len {
        return Err(Error::TruncatedInput {
            what: "chunk payload",
        });
    }

    trace!("chunk '{}', {} bytes", display_id(&id), len);
    Ok(Chunk { id, data })
}

/// Reads the next chunk, or `None` if the source is already exhausted.
pub fn read_chunk<R: Read>(reader: &mut R) -> Result<Option<Chunk>> {
    match read_header(reader)? {
        Some((id, len)) => read_payload(reader, id, len).map(Some),
        None => Ok(None),
    }
}

/// Reads the next chunk; the source must not be exhausted.
pub fn parse_chunk<R: Read>(reader: &mut R) -> Result<Chunk> {
    let (id, len) = parse_header(reader)?;
    read_payload(reader, id, len)
}

/// Reads the next chunk and checks that it carries `id`.
pub fn expect_chunk<R: Read>(reader: &mut R, id: ChunkId) -> Result<Chunk> {
    let (found, len) = parse_header(reader)?;
    if found.value != id.value {
        return Err(Error::UnexpectedTag {
            expected: id,
            found,
        });
    }
    read_payload(reader, found, len)
}

/// Reads the 4 byte form type that leads a `RIFF` or `LIST` payload.
pub fn read_type<R: Read>(reader: &mut R) -> Result<ChunkId> {
    let mut value = [0u8; 4];
    read_exact(reader, &mut value, "list type")?;
    Ok(ChunkId { value })
}

pub fn expect_type<R: Read>(reader: &mut R, id: ChunkId) -> Result<()> {
    let found = read_type(reader)?;
    if found.value != id.value {
        return Err(Error::UnexpectedTag { expected: id, found });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::chunk;

    #[test]
    fn test_parse_chunk() {
        let bytes = chunk(b"abcd", &[1, 2, 3]);
        let mut reader = Cursor::new(bytes);
        let c = parse_chunk(&mut reader).unwrap();
        assert_eq!(c.id.value, *b"abcd");
        assert_eq!(c.data, vec![1, 2, 3]);
        assert!(read_chunk(&mut reader).unwrap().is_none());
    }

    #[test]
    fn test_odd_payload_is_not_padded() {
        let mut bytes = chunk(b"aaaa", &[7]);
        bytes.extend(chunk(b"bbbb", &[8, 9]));
        let mut reader = Cursor::new(bytes);
        assert_eq!(parse_chunk(&mut reader).unwrap().data, vec![7]);
        let c = parse_chunk(&mut reader).unwrap();
        assert_eq!(c.id.value, *b"bbbb");
        assert_eq!(c.data, vec![8, 9]);
    }

    #[test]
    fn test_truncated() {
        let full = chunk(b"abcd", &[1, 2, 3, 4]);
        // Cut inside the id, inside the length and inside the payload.
        for cut in [2, 6, 10].iter() {
            let mut reader = Cursor::new(&full[..*cut]);
            let err = parse_chunk(&mut reader).unwrap_err();
            assert!(matches!(err, Error::TruncatedInput { .. }), "cut at {}", cut);
        }
        let mut empty: &[u8] = &[];
        assert!(matches!(
            parse_chunk(&mut empty),
            Err(Error::TruncatedInput { .. })
        ));
    }

    #[test]
    fn test_huge_declared_length() {
        let mut bytes = b"abcd".to_vec();
        bytes.extend(&u32::MAX.to_le_bytes());
        bytes.extend(&[0; 16]);
        let mut reader = Cursor::new(bytes);
        assert!(matches!(
            parse_chunk(&mut reader),
            Err(Error::TruncatedInput { .. })
        ));
    }

    #[test]
    fn test_expect_chunk() {
        let bytes = chunk(b"abcd", &[]);
        let err = expect_chunk(&mut Cursor::new(&bytes), LIST).unwrap_err();
        match err {
            Error::UnexpectedTag { expected, found } => {
                assert_eq!(expected.value, *b"LIST");
                assert_eq!(found.value, *b"abcd");
            }
            e => panic!("unexpected error {}", e),
        }
        let c = expect_chunk(&mut Cursor::new(&bytes), ChunkId { value: *b"abcd" }).unwrap();
        assert!(c.is_empty());
    }

    #[test]
    fn test_tag_checked_before_payload() {
        let mut bytes = b"JUNK".to_vec();
        bytes.extend(&0x7fff_ffffu32.to_le_bytes());
        bytes.extend(&[0; 8]);
        assert!(matches!(
            expect_chunk(&mut Cursor::new(&bytes), LIST),
            Err(Error::UnexpectedTag { found, .. }) if found.value == *b"JUNK"
        ));

        let mut reader = Cursor::new(&bytes);
        let (id, len) = parse_header(&mut reader).unwrap();
        assert_eq!(id.value, *b"JUNK");
        assert_eq!(len, 0x7fff_ffff);
        assert_eq!(reader.position(), 8);
    }

    #[test]
    fn test_sub_reader_is_scoped() {
        let mut bytes = chunk(b"LIST", &chunk(b"innr", &[5, 5]));
        bytes.extend(chunk(b"next", &[6]));
        let mut reader = Cursor::new(bytes);
        let list = parse_chunk(&mut reader).unwrap();
        let mut sub = list.reader();
        assert_eq!(parse_chunk(&mut sub).unwrap().data, vec![5, 5]);
        assert!(read_chunk(&mut sub).unwrap().is_none());
        assert_eq!(parse_chunk(&mut reader).unwrap().id.value, *b"next");
    }

    #[test]
    fn test_expect_type() {
        let mut reader: &[u8] = b"sfbkrest";
        expect_type(&mut reader, SFBK).unwrap();
        let mut reader: &[u8] = b"sfb";
        assert!(matches!(
            expect_type(&mut reader, SFBK),
            Err(Error::TruncatedInput { .. })
        ));
        let mut reader: &[u8] = b"INFO";
        assert!(matches!(
            expect_type(&mut reader, PDTA),
            Err(Error::UnexpectedTag { .. })
        ));
    }
}
