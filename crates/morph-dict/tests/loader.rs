use std::path::PathBuf;

use morph_dict::{DictionaryBuilder, DictionaryError, Language, LoadMode, MorphologyDictionary};

fn write_resource(dir: &tempfile::TempDir) -> PathBuf {
    let mut builder = DictionaryBuilder::new(Language::english());
    for (surface, lemma, tag) in [
        ("there", "there", "EX"),
        ("are", "are", "NN"),
        ("are", "be", "VBP"),
        ("be", "be", "VB"),
        ("tests", "test", "NNS"),
    ] {
        builder.insert(surface, lemma, tag).unwrap();
    }
    let path = dir.path().join("english.morph");
    let file = std::fs::File::create(&path).unwrap();
    builder.write_to(std::io::BufWriter::new(file)).unwrap();
    path
}

#[test]
fn loads_with_either_mode() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_resource(&dir);

    for mode in [LoadMode::Mmap, LoadMode::Owned] {
        let dict = MorphologyDictionary::load_with_mode(&path, mode, Language::english())
            .expect("load compiled dictionary");
        assert_eq!(dict.len(), 4);
        assert_eq!(dict.normal_forms("are"), ["are", "be"]);
        assert_eq!(dict.normal_forms("tests"), ["test"]);
        assert!(dict.is_known("there"));
        assert!(!dict.is_known("here"));
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = MorphologyDictionary::load(dir.path().join("absent.morph"), Language::english())
        .err()
        .expect("missing resource must fail");
    assert!(matches!(err, DictionaryError::Io { .. }));
    assert!(err.to_string().contains("absent.morph"));
}

#[test]
fn truncated_file_fails_without_a_partial_dictionary() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_resource(&dir);
    let bytes = std::fs::read(&path).unwrap();
    std::fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();

    let result = MorphologyDictionary::load(&path, Language::english());
    assert!(matches!(result, Err(DictionaryError::Archive(_))));

    std::fs::write(&path, &bytes[..10]).unwrap();
    let result = MorphologyDictionary::load(&path, Language::english());
    assert!(matches!(result, Err(DictionaryError::Truncated(_))));
}
