//! Decoder for SoundFont 2 banks.
//!
//! ```no_run
//! use soundfont_reader::SoundFont;
//! use std::path::Path;
//!
//! let sf = SoundFont::open(Path::new("piano.sf2")).unwrap();
//! for (ix, preset) in sf.hydra.presets.iter().enumerate() {
//!     println!("{}: {:?}", preset.name(), sf.hydra.preset_zones(ix));
//! }
//! ```

pub mod chunk;
pub mod error;
pub mod hydra;
pub mod info;
pub mod samples;
pub mod soundfont;

#[cfg(test)]
mod testutil;

pub use error::{Error, Result};
pub use hydra::{
    Bag, Generator, Hydra, Instrument, Modulator, PresetHeader, SampleHeader, SampleType,
};
pub use info::{display_text, Info, Version};
pub use samples::SampleData;
pub use soundfont::SoundFont;
