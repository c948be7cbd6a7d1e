//! Write a JSON table of advance widths to the code points that use them.

use clap::Parser;
use fetstil::extract_widths_file;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The input font file.
    #[arg(short, long)]
    input: std::path::PathBuf,

    /// Where to write the JSON table.
    #[arg(short, long)]
    output: std::path::PathBuf,

    /// Indent the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = extract_widths_file(&args.input, &args.output, args.pretty) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
