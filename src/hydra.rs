//! The `pdta` list: preset, instrument and sample headers.
//!
//! Nine arrays of fixed width records. Nothing in them points anywhere;
//! a header owns the bags from its own index up to the next header's index,
//! and a bag owns generators and modulators the same way. Every array ends
//! with a terminal record so the "next" index always exists.

use crate::chunk::{display_id, read_chunk, Chunk};
use crate::error::{Error, Result};
use binread::{BinRead, BinReaderExt};
use log::{debug, info, warn};
use riff::ChunkId;
use std::io::Read;
use std::ops::Range;

fn make_string(s: &[u8; 20]) -> String {
    let first_null = s.iter().position(|&x| x == 0).unwrap_or(20);
    std::str::from_utf8(&s[0..first_null])
        .unwrap_or("<invalid>")
        .trim()
        .to_string()
}

/// A fixed width hydra record.
pub trait Record: BinRead<Args = ()> {
    /// Encoded size in bytes.
    const WIDTH: usize;

    fn write_to(&self, out: &mut Vec<u8>);
}

macro_rules! record {
    ($t:ty, $width:expr) => {
        impl Record for $t {
            const WIDTH: usize = $width;

            fn write_to(&self, out: &mut Vec<u8>) {
                let bytes: [u8; $width] = self.into();
                out.extend_from_slice(&bytes);
            }
        }
    };
}

#[derive(BinRead, Debug, Clone, PartialEq, Eq)]
#[br(little)]
pub struct PresetHeader {
    pub name: [u8; 20],
    pub preset: u16,
    pub bank: u16,
    pub bag_index: u16,
    pub library: u32,
    pub genre: u32,
    pub morphology: u32,
}

impl PresetHeader {
    pub fn name(&self) -> String {
        make_string(&self.name)
    }
}

impl From<&PresetHeader> for [u8; 38] {
    fn from(p: &PresetHeader) -> Self {
        let mut v = [0u8; 38];
        v[0..20].copy_from_slice(&p.name);
        v[20..22].copy_from_slice(&p.preset.to_le_bytes());
        v[22..24].copy_from_slice(&p.bank.to_le_bytes());
        v[24..26].copy_from_slice(&p.bag_index.to_le_bytes());
        v[26..30].copy_from_slice(&p.library.to_le_bytes());
        v[30..34].copy_from_slice(&p.genre.to_le_bytes());
        v[34..38].copy_from_slice(&p.morphology.to_le_bytes());
        v
    }
}

record!(PresetHeader, 38);

/// A zone: where its generators and modulators start.
#[derive(BinRead, Debug, Clone, Copy, PartialEq, Eq)]
#[br(little)]
pub struct Bag {
    pub gen_index: u16,
    pub mod_index: u16,
}

impl From<&Bag> for [u8; 4] {
    fn from(b: &Bag) -> Self {
        let mut v = [0u8; 4];
        v[0..2].copy_from_slice(&b.gen_index.to_le_bytes());
        v[2..4].copy_from_slice(&b.mod_index.to_le_bytes());
        v
    }
}

record!(Bag, 4);

/// A modulator as stored. The operators are raw enumerants.
#[derive(BinRead, Debug, Clone, Copy, PartialEq, Eq)]
#[br(little)]
pub struct Modulator {
    pub src_oper: u16,
    pub dest_oper: u16,
    pub amount: i16,
    pub amt_src_oper: u16,
    pub trans_oper: u16,
}

impl From<&Modulator> for [u8; 10] {
    fn from(m: &Modulator) -> Self {
        let mut v = [0u8; 10];
        v[0..2].copy_from_slice(&m.src_oper.to_le_bytes());
        v[2..4].copy_from_slice(&m.dest_oper.to_le_bytes());
        v[4..6].copy_from_slice(&m.amount.to_le_bytes());
        v[6..8].copy_from_slice(&m.amt_src_oper.to_le_bytes());
        v[8..10].copy_from_slice(&m.trans_oper.to_le_bytes());
        v
    }
}

record!(Modulator, 10);

/// A generator as stored. Range generators pack two bytes into `amount`,
/// see [`Generator::amount_bytes`].
#[derive(BinRead, Debug, Clone, Copy, PartialEq, Eq)]
#[br(little)]
pub struct Generator {
    pub oper: u16,
    pub amount: i16,
}

impl Generator {
    pub fn amount_bytes(&self) -> [u8; 2] {
        self.amount.to_le_bytes()
    }
}

impl From<&Generator> for [u8; 4] {
    fn from(g: &Generator) -> Self {
        let mut v = [0u8; 4];
        v[0..2].copy_from_slice(&g.oper.to_le_bytes());
        v[2..4].copy_from_slice(&g.amount.to_le_bytes());
        v
    }
}

record!(Generator, 4);

#[derive(BinRead, Debug, Clone, PartialEq, Eq)]
#[br(little)]
pub struct Instrument {
    pub name: [u8; 20],
    pub bag_index: u16,
}

impl Instrument {
    pub fn name(&self) -> String {
        make_string(&self.name)
    }
}

impl From<&Instrument> for [u8; 22] {
    fn from(i: &Instrument) -> Self {
        let mut v = [0u8; 22];
        v[0..20].copy_from_slice(&i.name);
        v[20..22].copy_from_slice(&i.bag_index.to_le_bytes());
        v
    }
}

record!(Instrument, 22);

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SampleType {
    Mono,
    Right,
    Left,
    Linked,
    RomMono,
    RomRight,
    RomLeft,
    RomLinked,
    Unknown(u16),
}

impl From<u16> for SampleType {
    fn from(v: u16) -> Self {
        match v {
            0x0001 => SampleType::Mono,
            0x0002 => SampleType::Right,
            0x0004 => SampleType::Left,
            0x0008 => SampleType::Linked,
            0x8001 => SampleType::RomMono,
            0x8002 => SampleType::RomRight,
            0x8004 => SampleType::RomLeft,
            0x8008 => SampleType::RomLinked,
            x => SampleType::Unknown(x),
        }
    }
}

#[derive(BinRead, Debug, Clone, PartialEq, Eq)]
#[br(little)]
pub struct SampleHeader {
    pub name: [u8; 20],
    pub start: u32,
    pub end: u32,
    pub start_loop: u32,
    pub end_loop: u32,
    pub sample_rate: u32,
    pub original_pitch: u8,
    pub pitch_correction: i8,
    pub sample_link: u16,
    pub sample_type: u16,
}

impl SampleHeader {
    pub fn name(&self) -> String {
        make_string(&self.name)
    }

    pub fn kind(&self) -> SampleType {
        self.sample_type.into()
    }
}

impl From<&SampleHeader> for [u8; 46] {
    fn from(s: &SampleHeader) -> Self {
        let mut v = [0u8; 46];
        v[0..20].copy_from_slice(&s.name);
        v[20..24].copy_from_slice(&s.start.to_le_bytes());
        v[24..28].copy_from_slice(&s.end.to_le_bytes());
        v[28..32].copy_from_slice(&s.start_loop.to_le_bytes());
        v[32..36].copy_from_slice(&s.end_loop.to_le_bytes());
        v[36..40].copy_from_slice(&s.sample_rate.to_le_bytes());
        v[40] = s.original_pitch;
        v[41] = s.pitch_correction.to_le_bytes()[0];
        v[42..44].copy_from_slice(&s.sample_link.to_le_bytes());
        v[44..46].copy_from_slice(&s.sample_type.to_le_bytes());
        v
    }
}

record!(SampleHeader, 46);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HydraTag {
    Phdr,
    Pbag,
    Pmod,
    Pgen,
    Inst,
    Ibag,
    Imod,
    Igen,
    Shdr,
}

impl HydraTag {
    const COUNT: usize = 9;

    const ALL: [HydraTag; HydraTag::COUNT] = [
        HydraTag::Phdr,
        HydraTag::Pbag,
        HydraTag::Pmod,
        HydraTag::Pgen,
        HydraTag::Inst,
        HydraTag::Ibag,
        HydraTag::Imod,
        HydraTag::Igen,
        HydraTag::Shdr,
    ];

    fn id(self) -> ChunkId {
        let value = match self {
            HydraTag::Phdr => b"phdr",
            HydraTag::Pbag => b"pbag",
            HydraTag::Pmod => b"pmod",
            HydraTag::Pgen => b"pgen",
            HydraTag::Inst => b"inst",
            HydraTag::Ibag => b"ibag",
            HydraTag::Imod => b"imod",
            HydraTag::Igen => b"igen",
            HydraTag::Shdr => b"shdr",
        };
        ChunkId { value: *value }
    }

    fn from_id(id: &ChunkId) -> Option<HydraTag> {
        HydraTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.id().value == id.value)
    }
}

fn read_records<T: Record>(chunk: &Chunk) -> Result<Vec<T>> {
    let len = chunk.len();
    if len == 0 || len % T::WIDTH != 0 {
        return Err(Error::InvalidChunkSize {
            id: chunk.id.clone(),
            len,
            reason: format!("expected a non-zero multiple of {}", T::WIDTH),
        });
    }
    let mut reader = chunk.reader();
    let mut records = Vec::with_capacity(len / T::WIDTH);
    for _ in 0..len / T::WIDTH {
        records.push(reader.read_le::<T>()?);
    }
    Ok(records)
}

// [items[ix].index, items[ix + 1].index)
fn span<T>(items: &[T], ix: usize, index: impl Fn(&T) -> u16) -> Option<Range<usize>> {
    let start = index(items.get(ix)?) as usize;
    let end = index(items.get(ix.checked_add(1)?)?) as usize;
    if start <= end {
        Some(start..end)
    } else {
        None
    }
}

/// The decoded `pdta` list. Each array still holds its terminal record.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Hydra {
    pub presets: Vec<PresetHeader>,
    pub preset_bags: Vec<Bag>,
    pub preset_modulators: Vec<Modulator>,
    pub preset_generators: Vec<Generator>,
    pub instruments: Vec<Instrument>,
    pub instrument_bags: Vec<Bag>,
    pub instrument_modulators: Vec<Modulator>,
    pub instrument_generators: Vec<Generator>,
    pub samples: Vec<SampleHeader>,
}

impl Hydra {
    /// Decodes the body of a `pdta` list, i.e. everything after the list type.
    pub fn read<R: Read>(reader: &mut R) -> Result<Hydra> {
        let mut hydra = Hydra::default();
        let mut seen = [false; HydraTag::COUNT];

        while let Some(chunk) = read_chunk(reader)? {
            let tag = match HydraTag::from_id(&chunk.id) {
                Some(tag) => tag,
                None => {
                    debug!("skipping unknown pdta chunk '{}'", display_id(&chunk.id));
                    continue;
                }
            };
            if seen[tag as usize] {
                warn!(
                    "chunk '{}' appears more than once, keeping the last one",
                    display_id(&chunk.id)
                );
            }
            seen[tag as usize] = true;

            let count = match tag {
                HydraTag::Phdr => {
                    hydra.presets = read_records(&chunk)?;
                    hydra.presets.len()
                }
                HydraTag::Pbag => {
                    hydra.preset_bags = read_records(&chunk)?;
                    hydra.preset_bags.len()
                }
                HydraTag::Pmod => {
                    hydra.preset_modulators = read_records(&chunk)?;
                    hydra.preset_modulators.len()
                }
                HydraTag::Pgen => {
                    hydra.preset_generators = read_records(&chunk)?;
                    hydra.preset_generators.len()
                }
                HydraTag::Inst => {
                    hydra.instruments = read_records(&chunk)?;
                    hydra.instruments.len()
                }
                HydraTag::Ibag => {
                    hydra.instrument_bags = read_records(&chunk)?;
                    hydra.instrument_bags.len()
                }
                HydraTag::Imod => {
                    hydra.instrument_modulators = read_records(&chunk)?;
                    hydra.instrument_modulators.len()
                }
                HydraTag::Igen => {
                    hydra.instrument_generators = read_records(&chunk)?;
                    hydra.instrument_generators.len()
                }
                HydraTag::Shdr => {
                    hydra.samples = read_records(&chunk)?;
                    hydra.samples.len()
                }
            };
            debug!("{}: {} records", display_id(&chunk.id), count);
        }

        if let Some(tag) = HydraTag::ALL.iter().find(|tag| !seen[**tag as usize]) {
            return Err(Error::MissingChunk(tag.id()));
        }
        Ok(hydra)
    }

    /// Bags belonging to preset `ix`.
    pub fn preset_zones(&self, ix: usize) -> Option<Range<usize>> {
        span(&self.presets, ix, |p| p.bag_index)
    }

    pub fn preset_zone_generators(&self, bag: usize) -> Option<Range<usize>> {
        span(&self.preset_bags, bag, |b| b.gen_index)
    }

    pub fn preset_zone_modulators(&self, bag: usize) -> Option<Range<usize>> {
        span(&self.preset_bags, bag, |b| b.mod_index)
    }

    /// Bags belonging to instrument `ix`.
    pub fn instrument_zones(&self, ix: usize) -> Option<Range<usize>> {
        span(&self.instruments, ix, |i| i.bag_index)
    }

    pub fn instrument_zone_generators(&self, bag: usize) -> Option<Range<usize>> {
        span(&self.instrument_bags, bag, |b| b.gen_index)
    }

    pub fn instrument_zone_modulators(&self, bag: usize) -> Option<Range<usize>> {
        span(&self.instrument_bags, bag, |b| b.mod_index)
    }

    pub fn preset_generators_for(&self, bag: usize) -> Option<&[Generator]> {
        self.preset_generators.get(self.preset_zone_generators(bag)?)
    }

    pub fn preset_modulators_for(&self, bag: usize) -> Option<&[Modulator]> {
        self.preset_modulators.get(self.preset_zone_modulators(bag)?)
    }

    pub fn instrument_generators_for(&self, bag: usize) -> Option<&[Generator]> {
        self.instrument_generators
            .get(self.instrument_zone_generators(bag)?)
    }

    pub fn instrument_modulators_for(&self, bag: usize) -> Option<&[Modulator]> {
        self.instrument_modulators
            .get(self.instrument_zone_modulators(bag)?)
    }

    /// Logs every preset with its zones, down to the samples.
    pub fn dump(&self) {
        info!("Presets:");
        for ix in 0..self.presets.len().saturating_sub(1) {
            self.dump_preset(ix);
        }
    }

    pub fn dump_preset(&self, ix: usize) {
        let preset = match self.presets.get(ix) {
            Some(preset) => preset,
            None => return,
        };
        info!("  Name: {}", preset.name());
        info!("  Pos: {}", preset.preset);
        info!("  Bank: {}", preset.bank);
        for (zone, bag_ix) in self.preset_zones(ix).unwrap_or(0..0).enumerate() {
            info!("  Preset zone {}:", zone);
            info!("    Generators:");
            for gen in self.preset_generators_for(bag_ix).unwrap_or(&[]) {
                // 41 = instrument
                if gen.oper == 41 {
                    self.dump_instrument(gen.amount as u16 as usize);
                } else {
                    info!("      {:?}", gen);
                }
            }
            info!("    Modulators:");
            for m in self.preset_modulators_for(bag_ix).unwrap_or(&[]) {
                info!("      {:?}", m);
            }
        }
        info!("");
    }

    pub fn dump_instrument(&self, ix: usize) {
        let instrument = match self.instruments.get(ix) {
            Some(instrument) => instrument,
            None => {
                warn!("      Instrument {} out of range", ix);
                return;
            }
        };
        info!("      Instrument: {}", instrument.name());
        for (zone, bag_ix) in self.instrument_zones(ix).unwrap_or(0..0).enumerate() {
            info!("        Instrument zone {}:", zone);
            info!("          Generators:");
            for gen in self.instrument_generators_for(bag_ix).unwrap_or(&[]) {
                // 53 = sampleID
                match self.samples.get(gen.amount as u16 as usize) {
                    Some(sample) if gen.oper == 53 => {
                        info!(
                            "            Sample: {} ({:?}, {} Hz)",
                            sample.name(),
                            sample.kind(),
                            sample.sample_rate
                        );
                    }
                    _ => info!("            {:?}", gen),
                }
            }
            info!("          Modulators:");
            for m in self.instrument_modulators_for(bag_ix).unwrap_or(&[]) {
                info!("            {:?}", m);
            }
        }
    }
}
