//! Binary-to-text dump utility
//! Reads a binary TS file and writes an editable ASCII rendition

use seasonde_ts::{dump_blocks, parse_file};
use std::env;
use std::fs;
use std::fs::File;
use std::io::BufWriter;
use tracing_subscriber::{fmt::format::FmtSpan, prelude::*, EnvFilter};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();

    let format_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(format_layer)
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut rest = &args[1..];
    let mut header_only = false;
    if rest.first().map(String::as_str) == Some("-h") {
        header_only = true;
        rest = &rest[1..];
    }
    if rest.len() != 2 {
        eprintln!("Usage: {} [-h] <infile> <outfile>", args[0]);
        eprintln!("Processes CODAR SeaSonde TimeSeries data files.");
        eprintln!("Reads a binary infile and writes an ascii text version to outfile.");
        eprintln!("With -h, output stops at the end of the header section.");
        std::process::exit(1);
    }
    let infile = &rest[0];
    let outfile = &rest[1];

    let data = fs::read(infile)?;
    tracing::info!("Read {} bytes from {}", data.len(), infile);

    let blocks = parse_file(&data)?;
    tracing::info!("Parsed {} blocks", blocks.len());

    let mut out = BufWriter::new(File::create(outfile)?);
    dump_blocks(&blocks, &mut out, header_only)?;

    Ok(())
}
