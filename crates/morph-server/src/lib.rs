pub mod handlers;
pub mod source;

pub use handlers::{AppState, MAX_TEXT_LEN, MAX_WORD_LEN, router};
pub use source::{DictionarySource, SourceError, load_dictionary};
