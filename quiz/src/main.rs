use anyhow::{bail, Context, Result};
use dictionary_rs::{WordRecord, WordsReply};
use quiz::{Outcome, QuizSession, PRACTICE_SIZE};
use std::io::{self, BufRead, Write};
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const DEFAULT_SERVER: &str = "http://127.0.0.1:5000";
const REVEAL_DELAY: Duration = Duration::from_secs(1);

fn ask(lines: &mut impl Iterator<Item = io::Result<String>>, label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(line?.trim().to_string()),
        None => bail!("input closed"),
    }
}

async fn fetch_words(server: &str, start: &str, end: &str) -> Result<Vec<WordRecord>> {
    let url = format!("{}/get_words", server.trim_end_matches('/'));
    debug!(%url, start, end, "requesting words");
    let reply = reqwest::Client::new()
        .get(&url)
        .query(&[("start_date", start), ("end_date", end)])
        .send()
        .await
        .with_context(|| format!("cannot reach {}", url))?
        .json::<WordsReply>()
        .await
        .context("unexpected reply from server")?;

    match reply {
        WordsReply::Words { words } => Ok(words),
        WordsReply::Error { error } => bail!(error),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let server = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_SERVER.to_string());
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("Enter the date range for practice (format: YYYY-MM-DD)");
    let start = ask(&mut lines, "Start date: ")?;
    let end = ask(&mut lines, "End date: ")?;
    if start.is_empty() || end.is_empty() {
        bail!("Please enter both start and end dates.");
    }

    let words = fetch_words(&server, &start, &end).await?;
    let mut session = QuizSession::new();
    session.start(words, &mut rand::thread_rng())?;
    println!(
        "Starting vocabulary practice. You will practice {} words.",
        PRACTICE_SIZE
    );

    while let Some(prompt) = session.current() {
        println!();
        println!("Meaning: {}", prompt.meaning);
        println!("({})", prompt.word_type);
        let answer = ask(&mut lines, "Enter the word: ")?;

        match session.submit(&answer)? {
            Outcome::Correct => println!("Correct!"),
            Outcome::Wrong { correct_word } => {
                println!("Wrong. The correct word is: {}", correct_word)
            }
        }
        let score = session.score();
        println!("Current score: {}/{}", score.score, score.total);
        tokio::time::sleep(REVEAL_DELAY).await;
    }

    println!();
    println!("Practice session ended. Final score: {}", session.score());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn returns_words_from_reply() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/get_words"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "words": [
                    {"word": "run", "type": "verb", "meaning": "move quickly"},
                    {"word": "blue", "type": "adjective", "meaning": "the colour of the sky"},
                ]
            })))
            .mount(&server)
            .await;

        let words = fetch_words(&server.uri(), "2024-01-02", "2024-01-04")
            .await
            .unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].word, "run");
        assert_eq!(words[1].word_type, "adjective");
    }

    #[tokio::test]
    async fn error_reply_becomes_the_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/get_words"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": "No words found in the specified date range."
            })))
            .mount(&server)
            .await;

        let err = fetch_words(&server.uri(), "2023-01-01", "2023-01-02")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "No words found in the specified date range.");
    }

    #[tokio::test]
    async fn sends_both_dates_as_query_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/get_words"))
            .and(query_param("start_date", "2024-01-02"))
            .and(query_param("end_date", "2024-01-04"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "words": [{"word": "run", "type": "verb", "meaning": "move quickly"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let server_url = format!("{}/", server.uri());
        let words = fetch_words(&server_url, "2024-01-02", "2024-01-04")
            .await
            .unwrap();
        assert_eq!(words.len(), 1);
    }
}
