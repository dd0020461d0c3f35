//! File filtering example.
//!
//! Takes `KEY=VALUE` pairs as arguments and replaces every `${KEY}` in the
//! file, writing the result to stdout.
//!
//! Run with:
//!     cargo run --example sync_file -- /path/to/template NAME=World

use std::env;
use std::fs::File;
use std::io;

use tokenfilter::{FilterConfig, Replacer};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "Cargo.toml".to_string());

    let mapping: Vec<(String, String)> = args
        .filter_map(|arg| {
            let (key, value) = arg.split_once('=')?;
            Some((format!("${{{}}}", key), value.to_string()))
        })
        .collect();

    eprintln!("Filtering file: {} ({} tokens)\n", path, mapping.len());

    let file = File::open(&path)?;

    // Larger reads for files
    let config = FilterConfig::default().with_read_buffer_size(64 * 1024);
    let replacer = Replacer::with_config(mapping, config)?;

    let mut reader = replacer.filter_reader(file)?;
    let written = io::copy(&mut reader, &mut io::stdout().lock())?;

    eprintln!("\nTotal: {} bytes written", written);

    Ok(())
}
