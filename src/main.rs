use std::fs;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_chrome::{ChromeLayerBuilder, FlushGuard};
use tracing_subscriber::prelude::*;

use hex2::assembler::{
    assemble,
    checks::{Constraint, SanityRule},
    rewriter::PaddingPolicy,
    Options,
};

#[derive(Parser)]
#[command(version)]
#[command(about = "Two-pass hex2 to hex0 assembler")]
struct Cli {
    #[clap(help = "Input file in hex2 format")]
    input: PathBuf,
    #[clap(help = "Output file in hex0 format")]
    output: PathBuf,
    #[clap(value_parser = parse_hex_address)]
    #[clap(help = "Base address in hex the loader places the first byte at, e.g. 7C00")]
    base_address: u32,
    #[clap(long, value_enum, default_value_t = PaddingPolicy::Pad)]
    #[clap(help = "How encoded references are fitted into the source columns")]
    padding: PaddingPolicy,
    #[clap(long)]
    #[clap(help = "Fail on references to undefined labels")]
    strict: bool,
    #[clap(long = "aligned", value_name = "LABEL")]
    #[clap(help = "Require LABEL to be 16-byte aligned, if defined (repeatable)")]
    aligned: Vec<String>,
    #[clap(long = "pinned", value_name = "LABEL=ADDR[,ADDR]", value_parser = parse_pinned)]
    #[clap(help = "Require LABEL to sit at one of the given hex addresses (repeatable)")]
    pinned: Vec<SanityRule>,
    #[clap(long)]
    #[clap(help = "Enable chrome tracing")]
    #[clap(long_help = "Enable chrome tracing which on program exit will generate
a json file to be opened with a chrome tracing compatible
viewer.")]
    trace: bool,
}

fn parse_hex_address(arg: &str) -> Result<u32, String> {
    let digits = arg.trim_start_matches("0x");
    u32::from_str_radix(digits, 16).map_err(|err| format!("invalid hex address '{}': {}", arg, err))
}

fn parse_pinned(arg: &str) -> Result<SanityRule, String> {
    let (label, addresses) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected LABEL=ADDR[,ADDR], got '{}'", arg))?;
    let addresses = addresses
        .split(',')
        .map(parse_hex_address)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SanityRule {
        label: label.to_string(),
        constraint: Constraint::OneOf(addresses),
    })
}

pub fn trace() -> FlushGuard {
    let (chrome_layer, guard) = ChromeLayerBuilder::new().build();
    tracing_subscriber::registry().with(chrome_layer).init();

    guard
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _trace_guard = if cli.trace { Some(trace()) } else { None };

    let input = fs::read_to_string(&cli.input)
        .with_context(|| format!("Unable to read {}", cli.input.display()))?;

    let mut rules: Vec<SanityRule> = cli
        .aligned
        .iter()
        .map(|label| SanityRule::aligned(label, 16))
        .collect();
    rules.extend(cli.pinned);

    let options = Options {
        base_address: cli.base_address,
        padding: cli.padding,
        strict: cli.strict,
        rules,
    };

    let file = fs::File::create(&cli.output)
        .with_context(|| format!("Unable to create {}", cli.output.display()))?;
    let mut out = BufWriter::new(file);
    assemble(&input, &mut out, &options)
        .with_context(|| format!("Assembly of {} failed", cli.input.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_hex_address() {
        assert_eq!(parse_hex_address("7C00"), Ok(0x7C00));
        assert_eq!(parse_hex_address("0x7C00"), Ok(0x7C00));
        assert_eq!(parse_hex_address("100000"), Ok(0x100000));
        assert!(parse_hex_address("xyz").is_err());
    }

    #[test]
    fn test_parse_pinned() {
        assert_eq!(
            parse_pinned("start=7C00,100000"),
            Ok(SanityRule {
                label: "start".to_string(),
                constraint: Constraint::OneOf(vec![0x7C00, 0x100000]),
            })
        );
        assert!(parse_pinned("no-equals").is_err());
        assert!(parse_pinned("label=nothex").is_err());
    }
}
