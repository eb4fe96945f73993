use crate::store::{dictionary_error, Store};
use crate::types::dictionary::DateQuery;
use dictionary_rs::{DateRange, WordsReply};
use tracing::{debug, info, instrument};

#[instrument(skip(store))]
pub async fn get_words(
    query: DateQuery,
    store: Store,
) -> Result<impl warp::Reply, warp::Rejection> {
    info!("Received request for /get_words");
    let range = DateRange::parse(query.start_date.as_deref(), query.end_date.as_deref())
        .map_err(|e| warp::reject::custom(dictionary_error(e)))?;
    debug!(start = %range.start, end = %range.end, "parsed date range");

    let dic = store
        .fetch_dictionary()
        .await
        .map_err(warp::reject::custom)?;
    let words = dic
        .filter_by_date(&range)
        .map_err(|e| warp::reject::custom(dictionary_error(e)))?;

    info!("Returning {} words", words.len());
    Ok(warp::reply::json(&WordsReply::Words { words }))
}
