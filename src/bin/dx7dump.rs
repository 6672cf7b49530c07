//! dx7dump: lists the voices in a Yamaha DX7 32-voice bulk dump.
//!
//! Usage:
//!   dx7dump path/to/bank.syx
//!   dx7dump -l path/to/bank.syx
//!   dx7dump -p 5 -f path/to/bank.syx

use std::{env, fs, process};

use log::debug;

use dx7dump::dx7::VOICE_COUNT;
use dx7dump::dx7::cartridge::Cartridge;
use dx7dump::dx7::sysex::SystemExclusiveData;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const SEPARATOR: &str = "-------------------------------------------------";

/// What to show, as given on the command line.
#[derive(Debug, Default, PartialEq)]
struct Options {
    long_listing: bool,
    find_duplicates: bool,
    voice: Option<usize>,  // 1-based; all voices if not given
    filename: Option<String>,
}

#[derive(Debug, PartialEq)]
enum Command {
    Dump(Options),
    Version,
    Help,
}

fn voice_number(value: &str) -> Result<usize, String> {
    value.parse::<usize>()
        .ok()
        .filter(|n| (1..=VOICE_COUNT).contains(n))
        .ok_or_else(|| format!("Voice number must be 1...{}, got '{}'.", VOICE_COUNT, value))
}

// Accepts the same forms as getopt: "-p 5", "-p5", "--patch 5",
// "--patch=5" and grouped flags like "-lf".
fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut options = Options::default();
    let mut args = args.iter();

    while let Some(arg) = args.next() {
        if let Some(long) = arg.strip_prefix("--") {
            let (name, inline) = match long.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (long, None),
            };
            match name {
                "long" => options.long_listing = true,
                "find-duplicates" => options.find_duplicates = true,
                "patch" => {
                    let value = match inline {
                        Some(value) => value,
                        None => args.next()
                            .map(String::as_str)
                            .ok_or_else(|| format!("Option {} needs a voice number.", arg))?,
                    };
                    options.long_listing = true;
                    options.voice = Some(voice_number(value)?);
                },
                "version" => return Ok(Command::Version),
                "help" => return Ok(Command::Help),
                _ => return Err(String::from("Unexpected option. Try -h for help.")),
            }
        }
        else if let Some(flags) = arg.strip_prefix('-').filter(|f| !f.is_empty()) {
            for (pos, flag) in flags.char_indices() {
                match flag {
                    'l' => options.long_listing = true,
                    'f' => options.find_duplicates = true,
                    'p' => {
                        let rest = &flags[pos + 1..];
                        let value = if rest.is_empty() {
                            args.next()
                                .map(String::as_str)
                                .ok_or_else(|| String::from("Option -p needs a voice number."))?
                        }
                        else {
                            rest
                        };
                        options.long_listing = true;
                        options.voice = Some(voice_number(value)?);
                        break;
                    },
                    'v' => return Ok(Command::Version),
                    'h' => return Ok(Command::Help),
                    _ => return Err(String::from("Unexpected option. Try -h for help.")),
                }
            }
        }
        else if options.filename.is_none() {
            options.filename = Some(arg.to_string());
        }
    }

    Ok(Command::Dump(options))
}

fn version() -> String {
    [
        format!("dx7dump {}", VERSION),
        String::from("Yamaha DX7 Sysex Dump"),
        String::from("Copyright 2012, Ted Felix (GPLv3+)"),
        String::from("Updated in 2019 by Francois W. Nel"),
    ].join("\n")
}

fn usage() -> String {
    [
        "Usage: dx7dump [OPTIONS] filename",
        "",
        "Options:\t-l\tList all parameters for all 32 voices.",
        "\t\t-p n\tList all parameters for the specified voice.",
        "\t\t-f\tFind voices with identical parameters.",
        "\t\t-v\tDisplay version information.",
        "\t\t-h\tDisplay this help information.",
    ].join("\n")
}

fn render(cartridge: &Cartridge, filename: &str, options: &Options) -> String {
    let mut out = String::new();

    if options.long_listing {
        for (index, voice) in cartridge.voices.iter().enumerate() {
            let number = index + 1;
            if options.voice.is_some_and(|n| n != number) {
                continue;
            }
            out.push_str(&format!(
                "\nFilename: {}\nVoice: {:02}\n{}\n{}\n\n",
                filename, number, voice, SEPARATOR));
        }
    }
    else {
        out.push_str(&cartridge.listing());
    }

    if options.find_duplicates {
        for duplicate in cartridge.find_duplicates() {
            out.push_str(&format!("Found duplicates: {}.\n", duplicate));
        }
    }

    out
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(Command::Dump(options)) => options,
        Ok(Command::Version) => {
            println!("{}", version());
            return;
        },
        Ok(Command::Help) => {
            println!("{}", usage());
            return;
        },
        Err(message) => {
            eprintln!("{}", message);
            process::exit(1);
        }
    };
    debug!("{:?}", options);

    let filename = options.filename.clone().unwrap_or_else(|| {
        eprintln!("Error: Please specify a sysex file.");
        process::exit(1);
    });

    let data = fs::read(&filename).unwrap_or_else(|e| {
        eprintln!("Error: Can't open {}: {}", filename, e);
        process::exit(1);
    });

    let cartridge = Cartridge::from_bytes(&data).unwrap_or_else(|e| {
        eprintln!("Error: {} is not a valid sysex file. {}", filename, e);
        process::exit(1);
    });

    print!("{}", render(&cartridge, &filename, &options));
}
