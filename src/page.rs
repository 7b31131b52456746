use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::settings::Settings;

const BASE_BACKOFF_MS: u64 = 2000;
const MAX_BACKOFF_MS: u64 = 60_000;
const REQUEST_TIMEOUT_SECS: u64 = 30;

pub fn client(settings: &Settings) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(settings.user_agent.as_str())
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .context("Failed to build HTTP client")
}

pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Invalid content selector {:?}: {:?}", css, e))
}

/// Fetch one committee page, backing off on rate limits and server errors.
pub async fn fetch_page(
    client: &reqwest::Client,
    url: &str,
    max_retries: u32,
) -> Result<String, FetchError> {
    let mut attempt = 0;
    loop {
        match fetch_once(client, url).await {
            Ok(body) => return Ok(body),
            Err(e) if e.is_retryable() && attempt < max_retries => {
                let delay = backoff(attempt);
                warn!(
                    "{} (attempt {}/{}), backing off {:.1}s",
                    e,
                    attempt + 1,
                    max_retries,
                    delay.as_secs_f64()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Doubles per attempt, capped at a minute.
fn backoff(attempt: u32) -> Duration {
    let ms = 2u64
        .checked_pow(attempt)
        .map_or(MAX_BACKOFF_MS, |factor| BASE_BACKOFF_MS.saturating_mul(factor));
    Duration::from_millis(ms.min(MAX_BACKOFF_MS))
}

async fn fetch_once(client: &reqwest::Client, url: &str) -> Result<String, FetchError> {
    let transport = |source| FetchError::Transport {
        url: url.to_string(),
        source,
    };

    let response = client.get(url).send().await.map_err(transport)?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    let body = response.text().await.map_err(transport)?;
    debug!("Fetched {} ({} bytes)", url, body.len());
    Ok(body)
}

/// Text of the first element matching `selector`, or `None` when the page
/// has no such element or it holds only whitespace.
pub fn content_block(html: &str, selector: &Selector) -> Option<String> {
    let document = Html::parse_document(html);
    let text: String = document.select(selector).next()?.text().collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Keep the block ASCII: non-breaking spaces become spaces, other
/// non-ASCII characters are dropped.
pub fn normalize_text(block: &str) -> String {
    block
        .chars()
        .filter_map(|c| match c {
            '\u{a0}' => Some(' '),
            c if c.is_ascii() => Some(c),
            _ => None,
        })
        .collect()
}

// ── Tests ──
