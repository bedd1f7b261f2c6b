// main.rs      gifrev command
//
#![forbid(unsafe_code)]

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use gifrev::GifFile;
use std::error::Error;
use std::ffi::OsStr;
use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Crate version
const VERSION: &'static str = std::env!("CARGO_PKG_VERSION");

/// Main entry point
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::builder().format_timestamp(None).init();
    let mut out = StandardStream::stdout(ColorChoice::Always);
    match create_app().get_matches().subcommand() {
        ("show", Some(matches)) => show(&mut out, matches)?,
        ("copy", Some(matches)) => copy(matches)?,
        ("reverse", Some(matches)) => reverse(&mut out, matches)?,
        _ => panic!(),
    }
    out.reset()?;
    Ok(())
}

/// Create clap App
fn create_app() -> App<'static, 'static> {
    App::new("gifrev")
        .version(VERSION)
        .setting(AppSettings::GlobalVersion)
        .about("GIF animation reverser")
        .setting(AppSettings::ArgRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("show")
                .about("Show GIF metadata")
                .arg(
                    Arg::with_name("files")
                        .required(true)
                        .min_values(1)
                        .help("input file(s)"),
                ),
        )
        .subcommand(
            SubCommand::with_name("copy")
                .about("Copy a GIF, preserving its structure byte-for-byte")
                .arg(Arg::with_name("input").required(true).help("input file"))
                .arg(
                    Arg::with_name("output")
                        .required(true)
                        .help("output file"),
                ),
        )
        .subcommand(
            SubCommand::with_name("reverse")
                .about("Write a GIF with its frame sequence reversed")
                .arg(Arg::with_name("input").required(true).help("input file"))
                .arg(
                    Arg::with_name("output")
                        .required(true)
                        .help("output file"),
                ),
        )
}

/// Handle show subcommand
fn show(
    out: &mut StandardStream,
    matches: &ArgMatches,
) -> Result<(), Box<dyn Error>> {
    let values = matches.values_of_os("files").unwrap();
    for path in values {
        let file = GifFile::load(path)?;
        show_file(out, path, &file)?;
    }
    Ok(())
}

/// Show metadata for one GIF file
fn show_file(
    out: &mut StandardStream,
    path: &OsStr,
    file: &GifFile,
) -> Result<(), Box<dyn Error>> {
    let mut magenta = ColorSpec::new();
    magenta.set_fg(Some(Color::Magenta));
    let mut bold = ColorSpec::new();
    bold.set_fg(Some(Color::White))
        .set_intense(true)
        .set_bold(true);
    let mut dflt = ColorSpec::new();
    dflt.set_fg(Some(Color::White));
    out.set_color(&magenta)?;
    writeln!(out, "{:?}", path)?;
    out.set_color(&bold)?;
    writeln!(out, "GIF{}", file.version_str())?;
    out.set_color(&dflt)?;
    writeln!(
        out,
        "size: {}x{}",
        file.screen_width(),
        file.screen_height()
    )?;
    writeln!(out, "frames: {}", file.frames().len())?;
    if let Some(delay) = file.delay_time_cs() {
        writeln!(out, "delay: {}/100 s", delay)?;
    }
    Ok(())
}

/// Handle copy subcommand
fn copy(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let input = matches.value_of_os("input").unwrap();
    let output = matches.value_of_os("output").unwrap();
    let file = GifFile::load(input)?;
    file.save(output)?;
    Ok(())
}

/// Handle reverse subcommand
fn reverse(
    out: &mut StandardStream,
    matches: &ArgMatches,
) -> Result<(), Box<dyn Error>> {
    let input = matches.value_of_os("input").unwrap();
    let output = matches.value_of_os("output").unwrap();
    let file = GifFile::load(input)?;
    show_file(out, input, &file)?;
    file.save_reversed(output)?;
    Ok(())
}
