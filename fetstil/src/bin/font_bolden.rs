//! Synthesize a bold variant of a TrueType font.
//!
//! Each simple glyph is overstruck with a copy of itself shifted right by
//! `--offset` units, and its advance width grows by the same amount.

use clap::Parser;
use fetstil::{bolden_file, BoldenOptions, DEFAULT_OFFSET};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The input font file.
    #[arg(short, long)]
    input: std::path::PathBuf,

    /// The output font file.
    #[arg(short, long)]
    output: std::path::PathBuf,

    /// Horizontal shift of the overstruck copy, in font units
    #[arg(long, default_value_t = DEFAULT_OFFSET, value_parser = clap::value_parser!(u16).range(1..))]
    offset: u16,

    /// Also embolden the .notdef glyph
    #[arg(long)]
    notdef: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let options = BoldenOptions {
        offset: args.offset,
        include_notdef: args.notdef,
    };
    if let Err(e) = bolden_file(&args.input, &args.output, &options) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
