use std::time::Duration;

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, HeaderMap, HeaderValue};
use thiserror::Error;

pub mod cache;
pub mod links;

pub use cache::DocumentCache;
pub use links::{fetch_report_links, report_links_from_html};

/// Page listing the daily report PDFs.
pub const DEFAULT_INDEX_URL: &str = "https://www.argentina.gob.ar/coronavirus/informe-diario";

/// Default directory for downloaded reports, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = "cache";

/// The report site rejects requests without a browser-like user agent.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_0) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/80.0.3987.149 Safari/537.36";

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("invalid URL '{0}'")]
    InvalidUrl(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the HTTP client used for the index page and report downloads.
pub fn build_client(user_agent: Option<&str>, timeout: Duration) -> Result<reqwest::Client, FetchError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,application/pdf,*/*;q=0.8",
        ),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("es-AR,es;q=0.9,en-US;q=0.8,en;q=0.7"),
    );
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));

    let client = reqwest::Client::builder()
        .user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT))
        .default_headers(headers)
        .timeout(timeout)
        .pool_max_idle_per_host(2)
        .pool_idle_timeout(Duration::from_secs(30))
        .build()?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_client_defaults() {
        assert!(build_client(None, Duration::from_secs(10)).is_ok());
    }

    #[test]
    fn test_build_client_custom_agent() {
        assert!(build_client(Some("casetally-test/0.1"), Duration::from_secs(1)).is_ok());
    }
}
