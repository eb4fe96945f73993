use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::fmt::format::FmtSpan;
use vocab_web::build_routes;
use vocab_web::store::Store;

const DICTIONARY_URL: &str = "https://docs.google.com/spreadsheets/d/1ZQWtB1Gk6e1M3QKBsSaNWDqPOcAMocqqs5CDpa8y0o4/export?format=csv";
const DOCUMENT_ID: &str = "1ZQWtB1Gk6e1M3QKBsSaNWDqPOcAMocqqs5CDpa8y0o4";

#[derive(Debug, Deserialize, PartialEq)]
pub struct Args {
    log_level: String,
    host: IpAddr,
    port: u16,
    dictionary_url: String,
    document_id: String,
    request_timeout_secs: u64,
}

fn config_builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("log_level", "info")?
        .set_default("host", "0.0.0.0")?
        .set_default("port", 5000_i64)?
        .set_default("dictionary_url", DICTIONARY_URL)?
        .set_default("document_id", DOCUMENT_ID)?
        .set_default("request_timeout_secs", 30_i64)
}

fn load_config(builder: ConfigBuilder<DefaultState>) -> Result<Args, ConfigError> {
    builder.build()?.try_deserialize::<Args>()
}

#[tokio::main]
async fn main() -> Result<(), handle_errors::Error> {
    let config = config_builder()
        .map(|builder| builder.add_source(config::File::with_name("setup").required(false)))
        .and_then(load_config)
        .map_err(handle_errors::Error::ConfigError)?;

    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        format!(
            "handle_errors={},vocab_web={},dictionary_rs={},warp={}",
            config.log_level, config.log_level, config.log_level, config.log_level
        )
    });

    tracing_subscriber::fmt()
        .with_env_filter(log_filter)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    let store = Store::new(
        &config.dictionary_url,
        &config.document_id,
        Duration::from_secs(config.request_timeout_secs),
    );

    info!("Starting server on {}:{}", config.host, config.port);
    warp::serve(build_routes(store))
        .run((config.host, config.port))
        .await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    #[test]
    fn defaults_apply_without_setup_file() {
        let args = load_config(config_builder().unwrap()).unwrap();
        assert_eq!(args.port, 5000);
        assert_eq!(args.host, IpAddr::from([0, 0, 0, 0]));
        assert_eq!(args.log_level, "info");
        assert_eq!(args.dictionary_url, DICTIONARY_URL);
        assert_eq!(args.document_id, DOCUMENT_ID);
        assert_eq!(args.request_timeout_secs, 30);
    }

    #[test]
    fn setup_file_overrides_defaults() {
        let builder = config_builder().unwrap().add_source(File::from_str(
            "port = 8080\nhost = \"127.0.0.1\"\nlog_level = \"debug\"",
            FileFormat::Toml,
        ));
        let args = load_config(builder).unwrap();
        assert_eq!(args.port, 8080);
        assert_eq!(args.host, IpAddr::from([127, 0, 0, 1]));
        assert_eq!(args.log_level, "debug");
        assert_eq!(args.request_timeout_secs, 30);
    }

    #[test]
    fn bad_port_is_a_config_error() {
        let builder = config_builder()
            .unwrap()
            .add_source(File::from_str("port = \"eighty\"", FileFormat::Toml));
        assert!(load_config(builder).is_err());
    }
}
