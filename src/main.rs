use clap::{App, Arg};
use log::error;
use soundfont_reader::SoundFont;
use std::path::Path;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = App::new("sf2dump")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Decodes a SoundFont 2 bank and prints what is in it")
        .arg(
            Arg::with_name("SOUNDFONT")
                .help("The .sf2 file to read")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("presets")
                .short("p")
                .long("presets")
                .help("Also list every preset with its zones"),
        )
        .get_matches();

    let filename = matches.value_of("SOUNDFONT").unwrap();
    let sf = match SoundFont::open(Path::new(filename)) {
        Ok(sf) => sf,
        Err(e) => {
            error!("{}: {}", filename, e);
            std::process::exit(1);
        }
    };
    sf.dump();
    if matches.is_present("presets") {
        sf.hydra.dump();
    }
}
