use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use morph_compiler::{
    CompileError, CompileStats, DictionaryWriter, SplitByTag, Stage, compile_word_list,
    standard_chain,
};
use morph_dict::{Language, MorphologyDictionary};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn compiles_fixture_through_the_standard_chain() {
    let language = Language::english();
    let reader = BufReader::new(File::open(fixture("animals.txt")).unwrap());
    let mut writer = DictionaryWriter::new(language.clone());
    let mut chain = standard_chain(&language, &mut writer);
    let stats = compile_word_list(reader, &mut chain).unwrap();
    assert_eq!(
        stats,
        CompileStats {
            lines: 6,
            cards: 5,
            forms: 10
        }
    );

    let dict = writer.into_dictionary();
    assert_eq!(dict.normal_forms("cats"), ["cat"]);
    assert_eq!(dict.normal_forms("mice"), ["mouse"]);
    assert_eq!(dict.normal_forms("oxen"), ["ox"]);
    assert!(dict.is_known("dogs"));
    assert!(!dict.is_known("dog's"));
    assert!(!dict.is_known("naive"));
}

#[test]
fn written_resource_loads_from_disk() {
    let language = Language::english();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("animals.morph");

    let reader = BufReader::new(File::open(fixture("animals.txt")).unwrap());
    let mut chain = standard_chain(&language, DictionaryWriter::new(language.clone()));
    compile_word_list(reader, &mut chain).unwrap();
    let writer = chain.into_inner().into_inner().into_inner();
    writer
        .finish(BufWriter::new(File::create(&path).unwrap()))
        .unwrap();

    let dict = MorphologyDictionary::load(&path, language).unwrap();
    assert_eq!(dict.analyses("mice")[0].tag, "NNS");
    assert_eq!(dict.tags("dog"), ["NN"]);
}

#[test]
fn split_forms_become_their_own_normal_forms() {
    let language = Language::russian();
    let list = "читать|чит|ать:ИНФИНИТИВ;ает:Г;ая:ДЕЕПРИЧАСТИЕ\n";
    let mut writer = DictionaryWriter::new(language.clone());
    let mut chain = Stage::new(SplitByTag::new(["ДЕЕПРИЧАСТИЕ"]), &mut writer);
    compile_word_list(list.as_bytes(), &mut chain).unwrap();

    let dict = writer.into_dictionary();
    assert_eq!(dict.normal_forms("читает"), ["читать"]);
    assert_eq!(dict.normal_forms("читая"), ["читая"]);
}

#[test]
fn unencodable_lemma_without_a_filter_names_the_line() {
    let list = "cat|cat|:NN\ndog|dog|:NN;'s:POS\n";
    let mut writer = DictionaryWriter::new(Language::english());
    let err = compile_word_list(list.as_bytes(), &mut writer).unwrap_err();
    assert!(matches!(err, CompileError::Dictionary { line: 2, .. }));
    assert!(err.to_string().starts_with("line 2: "));
}
