//! Subsets a TrueType font to some text or codepoints.
//!
//! Note that this is more of an experimental CLI used for testing.

use std::path::PathBuf;

use clap::Parser;
use fontcut::text::UsedRunes;
use fontcut::{subset, Profile};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The input font file.
    input: PathBuf,

    /// The output font file.
    #[arg(short, long, default_value = "res.ttf")]
    output: PathBuf,

    /// Text whose characters should be kept.
    #[arg(short, long)]
    text: Option<String>,

    /// Hexadecimal codepoints to keep, e.g. `41-5A,20,U+1F600`.
    #[arg(short, long)]
    codepoints: Option<String>,

    /// Drop the hinting tables.
    #[arg(long)]
    no_hinting: bool,

    /// Also write the ToUnicode CMap to this file.
    #[arg(long)]
    to_unicode: Option<PathBuf>,
}

fn parse_codepoint(s: &str) -> Result<char, String> {
    let hex = s.trim().trim_start_matches("U+").trim_start_matches("u+");
    u32::from_str_radix(hex, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| format!("invalid codepoint: {s}"))
}

fn parse_codepoints(codepoints: &str) -> Result<Vec<char>, String> {
    let mut chars = vec![];

    for el in codepoints.split(',').filter(|s| !s.is_empty()) {
        match el.split_once('-') {
            Some((first, second)) => {
                let first = parse_codepoint(first)?;
                let second = parse_codepoint(second)?;
                chars.extend(first..=second);
            }
            None => chars.push(parse_codepoint(el)?),
        }
    }

    Ok(chars)
}

fn run(args: Args) -> Result<(), String> {
    let mut runes = UsedRunes::new();
    if let Some(text) = &args.text {
        runes.add_text(text);
    }
    if let Some(codepoints) = &args.codepoints {
        parse_codepoints(codepoints)?.into_iter().for_each(|c| runes.add(c));
    }

    let data = std::fs::read(&args.input)
        .map_err(|e| format!("failed to read {}: {e}", args.input.display()))?;

    let profile = Profile { hinting: !args.no_hinting };
    let sub = subset(&data, runes.as_map(), profile).map_err(|e| e.to_string())?;

    log::info!(
        "subset has {} bytes ({} before), last CID is {:#X}",
        sub.data.len(),
        data.len(),
        sub.last_cid
    );

    std::fs::write(&args.output, &sub.data)
        .map_err(|e| format!("failed to write {}: {e}", args.output.display()))?;

    if let Some(path) = &args.to_unicode {
        std::fs::write(path, &sub.to_unicode)
            .map_err(|e| format!("failed to write {}: {e}", path.display()))?;
    }

    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codepoint_lists() {
        assert_eq!(parse_codepoints("41-43,20"), Ok(vec!['A', 'B', 'C', ' ']));
        assert_eq!(parse_codepoints("U+1F600"), Ok(vec!['😀']));
        assert_eq!(parse_codepoints(""), Ok(vec![]));
        assert!(parse_codepoints("D800").is_err());
        assert!(parse_codepoints("xyz").is_err());
    }
}
