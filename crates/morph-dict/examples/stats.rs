use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use morph_dict::{Language, LoadMode, MorphologyDictionary};

const USAGE: &str =
    "usage: cargo run -p morph-dict --example stats -- <compiled-resource> [english|russian]";

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let path = args.next().map(PathBuf::from).context(USAGE)?;
    let name = args.next().unwrap_or_else(|| "english".to_string());
    let language =
        Language::by_name(&name).with_context(|| format!("unknown language {name:?}"))?;

    let dict = MorphologyDictionary::load_with_mode(&path, LoadMode::Mmap, language)
        .with_context(|| format!("loading dictionary from {}", path.display()))?;

    println!("Dictionary: {}", path.display());
    println!("Language   : {}", dict.language().name());
    println!("Codec      : {}", dict.language().codec());
    println!("Records    : {}", dict.len());

    // Spot-check a few words.
    let samples: &[&str] = match dict.language().name() {
        "russian" => &["вина", "мне", "года"],
        _ => &["are", "tests", "should"],
    };
    for word in samples {
        println!("'{}' -> {:?}", word, dict.normal_forms(word));
    }

    Ok(())
}
