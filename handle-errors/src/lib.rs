use config::ConfigError;
use reqwest::Error as ReqwestError;
use serde::Serialize;
use tracing::{event, instrument, Level};
use warp::{
    filters::cors::CorsForbidden,
    http::StatusCode,
    reject::{InvalidQuery, Reject},
    Rejection, Reply,
};

pub const LOAD_FAILED: &str = "Failed to load dictionary data.";
pub const INVALID_DATE: &str = "Invalid date format. Please use YYYY-MM-DD.";
pub const NO_WORDS: &str = "No words found in the specified date range.";

#[derive(Debug)]
pub enum Error {
    FetchFailure(ReqwestError),
    UnsupportedFormat(String),
    MalformedData(String),
    InvalidDateFormat(String),
    NoWordsInRange,
    ConfigError(ConfigError),
}

impl Error {
    /// Text shown to the person practising. Details stay in the logs.
    pub fn user_message(&self) -> &'static str {
        match *self {
            Error::FetchFailure(_) | Error::UnsupportedFormat(_) | Error::MalformedData(_) => {
                LOAD_FAILED
            }
            Error::InvalidDateFormat(_) => INVALID_DATE,
            Error::NoWordsInRange => NO_WORDS,
            Error::ConfigError(_) => "Server misconfigured.",
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::FetchFailure(ref err) => write!(f, "cannot fetch dictionary: {}", err),
            Error::UnsupportedFormat(ref content_type) => {
                write!(f, "downloaded content is not CSV (content-type `{}`)", content_type)
            }
            Error::MalformedData(ref detail) => write!(f, "malformed dictionary data: {}", detail),
            Error::InvalidDateFormat(ref value) => write!(f, "invalid date parameter `{}`", value),
            Error::NoWordsInRange => write!(f, "no words found in the specified date range"),
            Error::ConfigError(ref err) => write!(f, "cannot load configuration: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::FetchFailure(ref err) => Some(err),
            Error::ConfigError(ref err) => Some(err),
            _ => None,
        }
    }
}

impl Reject for Error {}

#[derive(Serialize)]
pub struct ErrorReply {
    pub error: String,
}

fn error_reply(message: &str, status: StatusCode) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(
        warp::reply::json(&ErrorReply {
            error: message.to_string(),
        }),
        status,
    )
}

/// Turns rejections into `{"error": ...}` bodies.
///
/// Domain errors answer with 200 so the page can show the message; only
/// transport problems get a failing status.
#[instrument]
pub async fn return_error(r: Rejection) -> Result<impl Reply, Rejection> {
    if let Some(error) = r.find::<Error>() {
        match error {
            Error::NoWordsInRange => event!(Level::WARN, "{}", error),
            _ => event!(Level::ERROR, "{}", error),
        }
        Ok(error_reply(error.user_message(), StatusCode::OK))
    } else if let Some(error) = r.find::<InvalidQuery>() {
        event!(Level::ERROR, "{}", error);
        Ok(error_reply(INVALID_DATE, StatusCode::OK))
    } else if let Some(error) = r.find::<CorsForbidden>() {
        event!(Level::ERROR, "{}", error);
        Ok(error_reply(&error.to_string(), StatusCode::FORBIDDEN))
    } else {
        Ok(error_reply("Route not found", StatusCode::NOT_FOUND))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warp::Filter;

    async fn body_for(error: Error) -> (StatusCode, serde_json::Value) {
        let error = std::sync::Arc::new(std::sync::Mutex::new(Some(error)));
        let filter = warp::path("boom")
            .and_then(move || {
                let error = error.lock().unwrap().take().unwrap();
                async move { Err::<String, _>(warp::reject::custom(error)) }
            })
            .recover(return_error);

        let res = warp::test::request().path("/boom").reply(&filter).await;
        let body = serde_json::from_slice(res.body()).unwrap();
        (res.status(), body)
    }

    #[tokio::test]
    async fn domain_errors_are_ok_with_message() {
        let (status, body) = body_for(Error::InvalidDateFormat("x".to_string())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "error": INVALID_DATE }));

        let (status, body) = body_for(Error::NoWordsInRange).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "error": NO_WORDS }));
    }

    #[tokio::test]
    async fn load_failures_share_one_message() {
        let (_, body) = body_for(Error::UnsupportedFormat("text/html".to_string())).await;
        assert_eq!(body, serde_json::json!({ "error": LOAD_FAILED }));

        let (_, body) = body_for(Error::MalformedData("line 3".to_string())).await;
        assert_eq!(body, serde_json::json!({ "error": LOAD_FAILED }));
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let filter = warp::path("known")
            .map(|| "ok")
            .recover(return_error);
        let res = warp::test::request().path("/unknown").reply(&filter).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn display_keeps_the_detail() {
        let err = Error::UnsupportedFormat("text/html; charset=utf-8".to_string());
        assert!(err.to_string().contains("text/html"));
    }
}
