//! Text-to-binary generate utility
//! Reads a text file produced by tsdump and writes a binary TS file

use seasonde_ts::{fixup_sizes, parse_text, write_blocks};
use std::env;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
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
    if args.len() != 3 {
        eprintln!("Usage: {} <infile> <outfile>", args[0]);
        eprintln!("Processes CODAR SeaSonde TimeSeries data files.");
        eprintln!("Reads an ascii text infile and writes a binary version to outfile.");
        std::process::exit(1);
    }
    let infile = &args[1];
    let outfile = &args[2];

    let reader = BufReader::new(File::open(infile)?);
    let mut blocks = parse_text(reader)?;
    tracing::info!("Parsed {} blocks from {}", blocks.len(), infile);

    // Container sizes are only knowable once the whole tree is assembled
    fixup_sizes(&mut blocks)?;

    let mut out = BufWriter::new(File::create(outfile)?);
    write_blocks(&blocks, &mut out)?;
    out.flush()?;

    Ok(())
}
