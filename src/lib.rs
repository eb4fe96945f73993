pub mod routes;
pub mod store;
pub mod types;

use crate::store::Store;
use crate::types::dictionary::DateQuery;
use handle_errors::return_error;
use warp::{http::Method, Filter};

/// All endpoints of the practice site, with tracing, CORS and error
/// rendering applied.
pub fn build_routes(
    store: Store,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let store_filter = warp::any().map(move || store.clone());

    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["Content-Type"])
        .allow_methods(&[Method::GET]);

    let index = warp::get()
        .and(warp::path::end())
        .and_then(routes::page::index);

    let get_words = warp::get()
        .and(warp::path("get_words"))
        .and(warp::path::end())
        .and(warp::query::<DateQuery>())
        .and(store_filter.clone())
        .and_then(routes::dictionary::get_words)
        .with(warp::trace(|info| {
            tracing::info_span!(
                "get_words request",
                method = %info.method(),
                path = %info.path(),
                id = %uuid::Uuid::new_v4(),
            )
        }));

    index
        .or(get_words)
        .with(warp::trace::request())
        .with(cors)
        .recover(return_error)
}
