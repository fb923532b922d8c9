use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use morph_compiler::{DictionaryWriter, compile_word_list, standard_chain};
use morph_dict::{Language, MorphologyDictionary};

/// Compile a fixture word list through the standard chain.
pub fn dictionary(fixture: &str, language: Language) -> MorphologyDictionary {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(fixture);
    let reader = BufReader::new(File::open(&path).expect("open fixture"));
    let mut writer = DictionaryWriter::new(language.clone());
    let mut chain = standard_chain(&language, &mut writer);
    compile_word_list(reader, &mut chain).expect("compile fixture");
    writer.into_dictionary()
}
