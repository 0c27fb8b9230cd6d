//! In-memory fixture builders shared by the unit tests.

use crate::hydra::{Bag, Generator, Instrument, Modulator, PresetHeader, Record, SampleHeader};

pub fn chunk(id: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut v = Vec::with_capacity(8 + data.len());
    v.extend_from_slice(id);
    v.extend_from_slice(&(data.len() as u32).to_le_bytes());
    v.extend_from_slice(data);
    v
}

/// A `LIST` (or `RIFF`) chunk with form type `ty` wrapping `children`.
pub fn list(id: &[u8; 4], ty: &[u8; 4], children: &[Vec<u8>]) -> Vec<u8> {
    let mut body = ty.to_vec();
    for c in children {
        body.extend_from_slice(c);
    }
    chunk(id, &body)
}

pub fn name(s: &str) -> [u8; 20] {
    let mut n = [0u8; 20];
    n[..s.len()].copy_from_slice(s.as_bytes());
    n
}

pub fn records<T: Record>(items: &[T]) -> Vec<u8> {
    let mut v = Vec::with_capacity(items.len() * T::WIDTH);
    for item in items {
        item.write_to(&mut v);
    }
    v
}

pub fn bag(gen_index: u16, mod_index: u16) -> Bag {
    Bag {
        gen_index,
        mod_index,
    }
}

/// A minimal `pdta` payload: one preset, one instrument and one sample, each
/// followed by its terminal record.
pub fn hydra_chunks() -> Vec<(&'static [u8; 4], Vec<u8>)> {
    let presets = [
        PresetHeader {
            name: name("Piano"),
            preset: 0,
            bank: 0,
            bag_index: 0,
            library: 0,
            genre: 0,
            morphology: 0,
        },
        PresetHeader {
            name: name("EOP"),
            preset: 0,
            bank: 0,
            bag_index: 1,
            library: 0,
            genre: 0,
            morphology: 0,
        },
    ];
    let modulator = Modulator {
        src_oper: 0x0502,
        dest_oper: 48,
        amount: 960,
        amt_src_oper: 0,
        trans_oper: 0,
    };
    let terminal_modulator = Modulator {
        src_oper: 0,
        dest_oper: 0,
        amount: 0,
        amt_src_oper: 0,
        trans_oper: 0,
    };
    let preset_generators = [
        Generator {
            oper: 41,
            amount: 0,
        },
        Generator { oper: 0, amount: 0 },
    ];
    let instruments = [
        Instrument {
            name: name("Piano"),
            bag_index: 0,
        },
        Instrument {
            name: name("EOI"),
            bag_index: 1,
        },
    ];
    let instrument_generators = [
        Generator {
            oper: 43,
            amount: i16::from_le_bytes([0, 127]),
        },
        Generator {
            oper: 53,
            amount: 0,
        },
        Generator { oper: 0, amount: 0 },
    ];
    let samples = [
        SampleHeader {
            name: name("Piano C4"),
            start: 0,
            end: 4,
            start_loop: 1,
            end_loop: 3,
            sample_rate: 44100,
            original_pitch: 60,
            pitch_correction: -3,
            sample_link: 0,
            sample_type: 1,
        },
        SampleHeader {
            name: name("EOS"),
            start: 0,
            end: 0,
            start_loop: 0,
            end_loop: 0,
            sample_rate: 0,
            original_pitch: 0,
            pitch_correction: 0,
            sample_link: 0,
            sample_type: 0,
        },
    ];

    vec![
        (b"phdr", records(&presets)),
        (b"pbag", records(&[bag(0, 0), bag(1, 1)])),
        (b"pmod", records(&[modulator, terminal_modulator])),
        (b"pgen", records(&preset_generators)),
        (b"inst", records(&instruments)),
        (b"ibag", records(&[bag(0, 0), bag(2, 0)])),
        (b"imod", records(&[terminal_modulator])),
        (b"igen", records(&instrument_generators)),
        (b"shdr", records(&samples)),
    ]
}

pub fn hydra_body(chunks: &[(&[u8; 4], Vec<u8>)]) -> Vec<u8> {
    let mut v = vec![];
    for (id, data) in chunks {
        v.extend(chunk(id, data));
    }
    v
}

pub fn info_list(children: &[Vec<u8>]) -> Vec<u8> {
    list(b"LIST", b"INFO", children)
}

pub fn sdta_list(samples: &[i16], sm24: Option<&[u8]>) -> Vec<u8> {
    let mut smpl = vec![];
    for s in samples {
        smpl.extend_from_slice(&s.to_le_bytes());
    }
    let mut children = vec![chunk(b"smpl", &smpl)];
    if let Some(low) = sm24 {
        children.push(chunk(b"sm24", low));
    }
    list(b"LIST", b"sdta", &children)
}

pub fn pdta_list(chunks: &[(&[u8; 4], Vec<u8>)]) -> Vec<u8> {
    let mut body = b"pdta".to_vec();
    body.extend(hydra_body(chunks));
    chunk(b"LIST", &body)
}

/// The reference bank: version 2.1 named "Test Bank", four samples, one
/// preset/instrument/sample.
pub fn test_bank(info: &[Vec<u8>]) -> Vec<u8> {
    list(
        b"RIFF",
        b"sfbk",
        &[
            info_list(info),
            sdta_list(&[0, 1000, -1000, 32767], None),
            pdta_list(&hydra_chunks()),
        ],
    )
}

pub fn default_info() -> Vec<Vec<u8>> {
    vec![
        chunk(b"ifil", &[2, 0, 1, 0]),
        chunk(b"INAM", b"Test Bank"),
    ]
}
