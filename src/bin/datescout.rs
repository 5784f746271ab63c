use std::io::Read;

use anyhow::{Context, Result};
use datescout::{Extractor, ExtractorConfig};
use env_logger::Env;
use log::debug;

/// Extract date/time phrases from the command line or stdin and print a
/// report, one block per phrase.
fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let mut config_path = None;
    let mut words = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                config_path = Some(args.next().context("--config requires a path")?);
            }
            "--help" | "-h" => {
                eprintln!("usage: datescout [--config FILE] [TEXT...]");
                eprintln!("reads TEXT from stdin when none is given");
                return Ok(());
            }
            _ => words.push(arg),
        }
    }

    let config = match config_path {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config file {path}"))?;
            ExtractorConfig::from_toml_str(&raw).with_context(|| format!("parsing {path}"))?
        }
        None => ExtractorConfig::default(),
    };
    let extractor = Extractor::new(config).context("building extractor")?;

    let text = if words.is_empty() {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer).context("reading stdin")?;
        buffer
    } else {
        words.join(" ")
    };
    debug!("extracting from {} byte(s) of input", text.len());

    let results = extractor.extract(&text);
    if results.is_empty() {
        println!("no date/time phrases found");
        return Ok(());
    }
    for group in &results {
        println!(
            "{:?} (line {}, bytes {}..{})",
            group.matched_text, group.line, group.start_offset, group.end_offset
        );
        for value in &group.resolved_values {
            println!("  -> {}", value.to_rfc3339());
        }
    }
    Ok(())
}
