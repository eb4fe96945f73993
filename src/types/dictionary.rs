use serde::{Deserialize, Serialize};

/// Query string of `/get_words`. Both fields are optional so a missing
/// parameter reaches the handler and is reported as a bad date.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct DateQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}
