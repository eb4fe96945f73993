use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::io::Read;
use tracing::{debug, warn};

mod date;
mod reply;

pub use date::{parse_date, DateRange};
pub use reply::{WordRecord, WordsReply};

const REQUIRED_COLUMNS: [&str; 4] = ["word", "type", "meaning", "dateadded"];

#[derive(Debug)]
pub enum DictionaryError {
    CsvReadingError(csv::Error),
    MissingColumn(&'static str),
    MalformedDate { line: u64, value: String },
    InvalidDateFormat(String),
    NoWordsInRange,
}

impl fmt::Display for DictionaryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            DictionaryError::CsvReadingError(ref err) => write!(f, "CSV reading error: {}", err),
            DictionaryError::MissingColumn(column) => write!(f, "CSV has no `{}` column", column),
            DictionaryError::MalformedDate { line, ref value } => {
                write!(f, "cannot parse dateadded `{}` on line {}", value, line)
            }
            DictionaryError::InvalidDateFormat(ref value) => {
                write!(f, "cannot parse date `{}`", value)
            }
            DictionaryError::NoWordsInRange => write!(f, "no words in the requested range"),
        }
    }
}

impl Error for DictionaryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            DictionaryError::CsvReadingError(ref err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DictionaryEntry {
    pub word: String,
    pub word_type: String,
    pub meaning: String,
    pub dateadded: NaiveDate,
}

// One spreadsheet row before the date cell is parsed.
#[derive(Deserialize)]
struct CsvRow {
    word: String,
    #[serde(rename = "type")]
    word_type: String,
    meaning: String,
    dateadded: String,
}

#[derive(Clone, Debug, Default)]
pub struct Dictionary {
    pub entries: Vec<DictionaryEntry>,
}

impl Dictionary {
    /// Parses a spreadsheet CSV export with a header row.
    ///
    /// Columns are matched by name and extra columns are ignored. A row with a
    /// blank `dateadded` cell is skipped; any other unparsable date fails the
    /// whole load.
    pub fn from_reader<R: Read>(reader: R) -> Result<Dictionary, DictionaryError> {
        let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
        let headers: StringRecord = rdr
            .headers()
            .map_err(DictionaryError::CsvReadingError)?
            .clone();

        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(DictionaryError::MissingColumn(column));
            }
        }

        let mut entries = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(DictionaryError::CsvReadingError)?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            let row: CsvRow = record
                .deserialize(Some(&headers))
                .map_err(DictionaryError::CsvReadingError)?;

            if row.dateadded.is_empty() {
                warn!(line, word = %row.word, "row has no dateadded, skipping");
                continue;
            }
            let dateadded = parse_date(&row.dateadded).ok_or_else(|| {
                DictionaryError::MalformedDate {
                    line,
                    value: row.dateadded.clone(),
                }
            })?;

            entries.push(DictionaryEntry {
                word: row.word,
                word_type: row.word_type,
                meaning: row.meaning,
                dateadded,
            });
        }

        debug!("parsed {} dictionary entries", entries.len());
        Ok(Dictionary { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Words added inside `range`, both ends inclusive, in dictionary order.
    pub fn filter_by_date(&self, range: &DateRange) -> Result<Vec<WordRecord>, DictionaryError> {
        let words: Vec<WordRecord> = self
            .entries
            .iter()
            .filter(|entry| range.contains(entry.dateadded))
            .map(WordRecord::from)
            .collect();

        debug!(
            start = %range.start,
            end = %range.end,
            "filtered {} of {} words",
            words.len(),
            self.entries.len()
        );

        if words.is_empty() {
            return Err(DictionaryError::NoWordsInRange);
        }
        Ok(words)
    }
}
