use serde::{Deserialize, Serialize};

use crate::DictionaryEntry;

/// A dictionary entry as served to the quiz: the date is dropped.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct WordRecord {
    pub word: String,
    #[serde(rename = "type")]
    pub word_type: String,
    pub meaning: String,
}

impl From<&DictionaryEntry> for WordRecord {
    fn from(entry: &DictionaryEntry) -> Self {
        WordRecord {
            word: entry.word.clone(),
            word_type: entry.word_type.clone(),
            meaning: entry.meaning.clone(),
        }
    }
}

/// Body of a `/get_words` response. Logical failures travel in `error`.
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum WordsReply {
    Words { words: Vec<WordRecord> },
    Error { error: String },
}
