use anyhow::{Context, Result};
use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use std::time::Duration;
use tracing::info;

const AGENT_NAME: &str = "CLIAgent/1.0";
const SEARCH_ENDPOINT: &str = "https://html.duckduckgo.com/html/";
const SEARCH_RESULT_CHARS: usize = 5000;
const RENDER_WIDTH: usize = 100;

/// Fetches pages and runs web searches, returning readable text.
#[derive(Debug, Clone)]
pub struct WebClient {
    client: Client,
}

impl WebClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }

    /// Body of `url`; HTML is rendered to plain text.
    pub fn fetch(&self, url: &str) -> Result<String> {
        let url = Url::parse(url).with_context(|| format!("Invalid URL: {}", url))?;
        self.get_text(url)
    }

    /// DuckDuckGo results for `query`, rendered and truncated.
    pub fn search(&self, query: &str) -> Result<String> {
        let url = Url::parse_with_params(SEARCH_ENDPOINT, &[("q", query)])
            .context("Failed to build search URL")?;
        let text = self.get_text(url)?;
        info!("Search results fetched for: {}", query);
        Ok(text.chars().take(SEARCH_RESULT_CHARS).collect())
    }

    fn get_text(&self, url: Url) -> Result<String> {
        let response = self
            .client
            .get(url.clone())
            .header(USER_AGENT, AGENT_NAME)
            .send()
            .with_context(|| format!("Failed to fetch {}", url))?
            .error_for_status()
            .with_context(|| format!("Failed to fetch {}", url))?;

        let is_html = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("html"))
            .unwrap_or(false);

        let body = response
            .text()
            .with_context(|| format!("Failed to read body of {}", url))?;

        if is_html { render_html(&body) } else { Ok(body) }
    }
}

/// Plain-text rendering of an HTML document.
pub fn render_html(html: &str) -> Result<String> {
    html2text::from_read(html.as_bytes(), RENDER_WIDTH)
        .map_err(|e| anyhow::anyhow!("Failed to render HTML: {}", e))
}
