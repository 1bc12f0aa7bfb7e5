use crate::error::{Result, ScanError};
use crate::extractor::{Extractor, Tier};
use crate::parser::PageParser;
use crate::record::JobRecord;
use crate::result::FetchedPage;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const BROWSER_HEADERS: &[(&str, &str)] = &[
    (
        "Accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7",
    ),
    ("Accept-Language", "en-US,en;q=0.9"),
    ("Upgrade-Insecure-Requests", "1"),
    ("Sec-Fetch-Dest", "document"),
    ("Sec-Fetch-Mode", "navigate"),
    ("Sec-Fetch-Site", "none"),
    ("Sec-Fetch-User", "?1"),
    ("Cache-Control", "max-age=0"),
    (
        "sec-ch-ua",
        "\"Not_A Brand\";v=\"8\", \"Chromium\";v=\"120\", \"Google Chrome\";v=\"120\"",
    ),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", "\"Windows\""),
];

/// Browser profile and politeness settings for the local crawl
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub user_agent: String,
    pub headers: Vec<(String, String)>,
    /// Pause before each request
    pub request_delay: Duration,
    pub timeout: Duration,
    pub cookies: bool,
    /// Where raw page bodies are written for troubleshooting, if anywhere
    pub capture_dir: Option<PathBuf>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: BROWSER_HEADERS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            request_delay: Duration::from_secs(5),
            timeout: Duration::from_secs(60),
            cookies: true,
            capture_dir: None,
        }
    }
}

impl CrawlConfig {
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_capture_dir(mut self, dir: PathBuf) -> Self {
        self.capture_dir = Some(dir);
        self
    }
}

/// Single-page, single-depth crawl with a browser-like profile.
///
/// robots.txt is never consulted and every status code reaches the parser, so
/// a 403 challenge page is still inspected for listings.
pub struct LocalCrawlStrategy {
    client: Client,
    config: CrawlConfig,
}

impl LocalCrawlStrategy {
    pub fn new(config: CrawlConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(Self::header_map(&config.headers))
            .cookie_store(config.cookies)
            .timeout(config.timeout)
            .connect_timeout(config.timeout / 2)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client, config })
    }

    fn header_map(headers: &[(String, String)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    map.insert(name, value);
                }
                _ => warn!(header = %name, "Skipping invalid header in crawl profile"),
            }
        }
        map
    }

    /// Fetch and parse one page
    pub async fn crawl(&self, url: &Url, keyword: Option<&str>) -> Result<Vec<JobRecord>> {
        let page = self.fetch_page(url).await?;

        if page.is_soft_blocked() {
            info!(url = %page.url, status = page.status_code, "Inspecting soft-blocked page anyway");
        }

        if let Some(dir) = &self.config.capture_dir {
            Self::capture(dir, &page).await;
        }

        let origin = Url::parse(&page.url).unwrap_or_else(|_| url.clone());
        let records = PageParser::new()
            .with_keyword(keyword.map(String::from))
            .parse(&page.body, page.content_type.as_deref(), &origin);

        info!(url = %origin, records = records.len(), "Local crawl complete");
        Ok(records)
    }

    pub async fn fetch_page(&self, url: &Url) -> Result<FetchedPage> {
        if !self.config.request_delay.is_zero() {
            debug!(delay = ?self.config.request_delay, "Waiting before request");
            tokio::time::sleep(self.config.request_delay).await;
        }

        debug!("Fetching {}", url);
        let start = Instant::now();
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                ScanError::Timeout(self.config.timeout)
            } else {
                ScanError::HttpError(e)
            }
        })?;
        let response_time = start.elapsed();

        let mut page = FetchedPage::new(response.url().to_string());
        page.status_code = response.status().as_u16();
        page.content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        page.body = response.text().await?;
        page.response_time = response_time;

        Ok(page)
    }

    /// Write the body under a request-unique name; failures only log
    async fn capture(dir: &Path, page: &FetchedPage) {
        let path = dir.join(format!("{}.html", Uuid::new_v4()));
        let written = async {
            tokio::fs::create_dir_all(dir).await?;
            tokio::fs::write(&path, page.body.as_bytes()).await
        }
        .await;

        match written {
            Ok(()) => debug!(path = %path.display(), "Captured page body"),
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to capture page body"),
        }
    }
}

#[async_trait]
impl Extractor for LocalCrawlStrategy {
    fn tier(&self) -> Tier {
        Tier::Local
    }

    async fn extract(&self, url: &Url, keyword: Option<&str>) -> Vec<JobRecord> {
        match self.crawl(url, keyword).await {
            Ok(records) => records,
            Err(e) => {
                warn!(url = %url, error = %e, transport = e.is_transport(), "Local crawl failed");
                Vec::new()
            }
        }
    }
}
