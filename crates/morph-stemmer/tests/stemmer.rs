mod common;

use morph_dict::Language;
use morph_stemmer::Stemmer;

#[test]
fn stems_english_words() {
    let stemmer = Stemmer::new(common::dictionary("english.txt", Language::english()));

    assert_eq!(stemmer.stemmed_word("tests"), "test");
    assert_eq!(stemmer.stemmed_word("stemmed"), "stem");
    assert_eq!(stemmer.stemmed_word("were"), "be");
    // Two normal forms, one of them the word itself.
    assert_eq!(stemmer.stemmed_word("are"), "be");
    assert_eq!(stemmer.stemmed_word("saw"), "see");
    assert_eq!(stemmer.stemmed_word("left"), "leave");
    // Still ambiguous after removing the word.
    assert_eq!(stemmer.stemmed_word("lives"), "lives");
}

#[test]
fn unknown_words_pass_through() {
    let stemmer = Stemmer::new(common::dictionary("english.txt", Language::english()));
    for word in ["zebras", "shouldn't", "Tests", "тест", "1234567890123", ""] {
        assert_eq!(stemmer.stemmed_word(word), word);
    }
}

#[test]
fn membership_needs_the_stored_stem() {
    let dict = common::dictionary("english.txt", Language::english());
    assert!(dict.is_known("being"));
    // Valid under the alphabet, same suffixes as stored words, never compiled.
    assert!(!dict.is_known("tested-"));
    assert!(!dict.is_known("sees-"));
    assert!(!dict.is_known("bests"));
    assert!(!dict.is_known("shouldn"));
}

#[test]
fn stems_russian_words() {
    let stemmer = Stemmer::new(common::dictionary("russian.txt", Language::russian()));
    assert_eq!(stemmer.stemmed_word("мне"), "я");
    assert_eq!(stemmer.stemmed_word("года"), "год");
    // вина: feminine noun, or genitive of вино.
    assert_eq!(stemmer.stemmed_word("вина"), "вино");
    assert_eq!(stemmer.stemmed_word("вину"), "вину");
    assert_eq!(stemmer.stemmed_word("ежа"), "еж");
    assert_eq!(stemmer.stemmed_word("ёжа"), "еж");
    // всё is its own normal form and a form of весь; stored folded as все.
    assert_eq!(stemmer.stemmed_word("всё"), "весь");
    assert_eq!(stemmer.stemmed_word("все"), "весь");
    assert_eq!(stemmer.stemmed_word("всего"), "весь");
}
