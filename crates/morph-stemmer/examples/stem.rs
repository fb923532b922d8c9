use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use morph_compiler::{DictionaryWriter, compile_word_list, standard_chain};
use morph_dict::Language;
use morph_stemmer::Stemmer;

const USAGE: &str =
    "usage: cargo run -p morph-stemmer --example stem -- <word-list> <english|russian> [--demo | <word>]";

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let list = args.next().map(PathBuf::from).context(USAGE)?;
    let language = args.next().context(USAGE)?;
    let language = Language::by_name(&language)
        .with_context(|| format!("unknown language {language:?}"))?;
    let next = args.next();
    if args.next().is_some() {
        bail!("too many arguments");
    }

    let words: Vec<String> = match next.as_deref() {
        Some("--demo") => ["tests", "are", "saw", "left", "lives"]
            .map(String::from)
            .to_vec(),
        Some(word) => vec![word.to_string()],
        None => bail!(USAGE),
    };

    let file = File::open(&list).with_context(|| format!("opening {}", list.display()))?;
    let mut writer = DictionaryWriter::new(language.clone());
    let mut chain = standard_chain(&language, &mut writer);
    compile_word_list(BufReader::new(file), &mut chain)
        .with_context(|| format!("compiling {}", list.display()))?;
    let stemmer = Stemmer::new(writer.into_dictionary());

    println!("Word list: {} ({})", list.display(), language.name());
    for word in words {
        let forms = stemmer.morphology().normal_forms(&word);
        println!(
            "  {:<12} -> {:<12} {:?}",
            word,
            stemmer.stemmed_word(&word),
            forms
        );
    }

    Ok(())
}
