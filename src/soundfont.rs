use crate::chunk::{
    expect_chunk, expect_type, parse_header, read_payload, read_type, INFO, LIST, PDTA, RIFF,
    SDTA, SFBK,
};
use crate::error::{Error, Result};
use crate::hydra::Hydra;
use crate::info::{display_text, Info};
use crate::samples::SampleData;
use log::{debug, info};
use std::fs;
use std::io::{BufReader, Read};
use std::path::Path;

/// A decoded SoundFont 2 bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundFont {
    pub info: Info,
    pub sample_data: SampleData,
    pub hydra: Hydra,
}

impl SoundFont {
    /// Decodes a whole bank from `reader`, which must be positioned at the
    /// `RIFF` header. Anything after the `pdta` list is ignored.
    pub fn read<R: Read>(reader: &mut R) -> Result<SoundFont> {
        let (id, len) = parse_header(reader)?;
        if id.value != RIFF.value {
            return Err(Error::UnexpectedFormat {
                expected: RIFF,
                found: id,
            });
        }
        let riff = read_payload(reader, id, len)?;
        let mut body = riff.reader();
        let form = read_type(&mut body)?;
        if form.value != SFBK.value {
            return Err(Error::UnexpectedFormat {
                expected: SFBK,
                found: form,
            });
        }

        let list = expect_chunk(&mut body, LIST)?;
        let mut list_body = list.reader();
        expect_type(&mut list_body, INFO)?;
        let info = Info::read(&mut list_body)?;

        let list = expect_chunk(&mut body, LIST)?;
        let mut list_body = list.reader();
        expect_type(&mut list_body, SDTA)?;
        let sample_data = SampleData::read(&mut list_body)?;

        let list = expect_chunk(&mut body, LIST)?;
        let mut list_body = list.reader();
        expect_type(&mut list_body, PDTA)?;
        let hydra = Hydra::read(&mut list_body)?;

        let rest = riff.len() as u64 - body.position();
        if rest > 0 {
            debug!("ignoring {} bytes after pdta", rest);
        }

        Ok(SoundFont {
            info,
            sample_data,
            hydra,
        })
    }

    pub fn open(path: &Path) -> Result<SoundFont> {
        let file = fs::File::open(path)?;
        SoundFont::read(&mut BufReader::new(file))
    }

    /// Logs the bank metadata, array sizes and every preset.
    pub fn dump(&self) {
        let i = &self.info;
        info!("Name: {}", display_text(&i.name));
        info!("Version: {}", i.version);
        info!("Engine: {}", display_text(&i.engine));
        if !i.rom.is_empty() {
            match &i.rom_version {
                Some(v) => info!("ROM: {} {}", display_text(&i.rom), v),
                None => info!("ROM: {}", display_text(&i.rom)),
            }
        }
        for (label, value) in [
            ("Created", &i.creation_date),
            ("Engineers", &i.engineers),
            ("Product", &i.product),
            ("Copyright", &i.copyright),
            ("Comments", &i.comments),
            ("Software", &i.software),
        ]
        .iter()
        {
            if !value.is_empty() {
                info!("{}: {}", label, display_text(value));
            }
        }
        info!(
            "Samples: {} ({} bit)",
            self.sample_data.len(),
            if self.sample_data.is_24_bit() { 24 } else { 16 }
        );
        let h = &self.hydra;
        info!(
            "Presets: {}, instruments: {}, sample headers: {}",
            h.presets.len().saturating_sub(1),
            h.instruments.len().saturating_sub(1),
            h.samples.len().saturating_sub(1)
        );
    }
}
