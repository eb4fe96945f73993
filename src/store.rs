use dictionary_rs::{Dictionary, DictionaryError};
use handle_errors::Error;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;
use tracing::{debug, event, info, instrument, Level};

// Cookie prefix and URL marker the spreadsheet host uses for its
// "file too large to scan" confirmation page.
const INTERSTITIAL_MARKER: &str = "download_warning";
const CSV_CONTENT_TYPES: [&str; 2] = ["text/csv", "application/csv"];

/// Where the dictionary comes from.
///
/// Every fetch builds a fresh client with its own cookie jar, so nothing
/// carries over between requests.
#[derive(Clone, Debug)]
pub struct Store {
    pub dictionary_url: String,
    pub document_id: String,
    pub timeout: Duration,
}

impl Store {
    pub fn new(dictionary_url: &str, document_id: &str, timeout: Duration) -> Self {
        Store {
            dictionary_url: dictionary_url.to_string(),
            document_id: document_id.to_string(),
            timeout,
        }
    }

    /// Downloads and parses the whole dictionary.
    ///
    /// The download is a two-step exchange: request the export, and if the
    /// host answers with its confirmation interstitial, repeat the request
    /// with the confirmation token taken from the cookies.
    #[instrument(skip(self), fields(url = %self.dictionary_url))]
    pub async fn fetch_dictionary(&self) -> Result<Dictionary, Error> {
        info!("downloading dictionary");
        let client = Client::builder()
            .cookie_store(true)
            .timeout(self.timeout)
            .build()
            .map_err(Error::FetchFailure)?;

        let response = self.send(client.get(&self.dictionary_url)).await?;
        let response = match confirmation_token(&response) {
            Some(token) => {
                debug!("found confirmation token: {}", token);
                self.confirm(&client, &token).await?
            }
            None => response,
        };

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_lowercase();
        debug!("content-type: {}", content_type);
        if !CSV_CONTENT_TYPES.iter().any(|csv| content_type.contains(csv)) {
            event!(
                Level::ERROR,
                url = %response.url(),
                status = %response.status(),
                "downloaded content is not a CSV file"
            );
            return Err(Error::UnsupportedFormat(content_type));
        }

        let body = response.bytes().await.map_err(|e| {
            event!(Level::ERROR, url = %self.dictionary_url, "cannot read body: {}", e);
            Error::FetchFailure(e)
        })?;

        let dictionary = Dictionary::from_reader(body.as_ref()).map_err(|e| {
            event!(Level::ERROR, url = %self.dictionary_url, "{}", e);
            dictionary_error(e)
        })?;
        info!("loaded {} rows from CSV", dictionary.len());
        Ok(dictionary)
    }

    async fn confirm(&self, client: &Client, token: &str) -> Result<Response, Error> {
        let request = client.get(&self.dictionary_url).query(&[
            ("id", self.document_id.as_str()),
            ("confirm", token),
        ]);
        self.send(request).await
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, Error> {
        let response = request.send().await.map_err(|e| {
            event!(Level::ERROR, url = %self.dictionary_url, "request failed: {}", e);
            Error::FetchFailure(e)
        })?;

        let status = response.status();
        debug!(%status, url = %response.url(), "dictionary response");
        response.error_for_status().map_err(|e| {
            event!(
                Level::ERROR,
                url = %self.dictionary_url,
                %status,
                "upstream refused the download"
            );
            Error::FetchFailure(e)
        })
    }
}

fn is_interstitial(response: &Response) -> bool {
    response.url().as_str().contains(INTERSTITIAL_MARKER)
        || !response.headers().contains_key(CONTENT_TYPE)
}

fn confirmation_token(response: &Response) -> Option<String> {
    if !is_interstitial(response) {
        return None;
    }
    response
        .cookies()
        .find(|cookie| cookie.name().starts_with(INTERSTITIAL_MARKER))
        .map(|cookie| cookie.value().to_string())
}

/// Maps dictionary failures onto the service's error taxonomy.
pub fn dictionary_error(err: DictionaryError) -> Error {
    match err {
        DictionaryError::InvalidDateFormat(value) => Error::InvalidDateFormat(value),
        DictionaryError::NoWordsInRange => Error::NoWordsInRange,
        other => Error::MalformedData(other.to_string()),
    }
}
