use crate::boards::{board_for_url, source_tag};
use crate::error::{Result, ScanError};
use crate::extractor::{Extractor, Tier};
use crate::parser::PageParser;
use crate::record::JobRecord;
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_RENDER_ENDPOINT: &str = "https://api.zenrows.com/v1/";

/// Settings for the rendering / anti-bot fetch service
#[derive(Debug, Clone)]
pub struct RemoteRenderConfig {
    pub endpoint: String,
    pub api_key: String,
    pub js_render: bool,
    pub premium_proxy: bool,
    /// Ask the service for its own structured extraction instead of raw HTML
    pub autoparse: bool,
    pub timeout: Duration,
}

impl RemoteRenderConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_RENDER_ENDPOINT.to_string(),
            api_key: api_key.into(),
            js_render: true,
            premium_proxy: true,
            autoparse: false,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_autoparse(mut self, autoparse: bool) -> Self {
        self.autoparse = autoparse;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Fetches pages through a remote renderer and parses whatever comes back
pub struct RemoteRenderStrategy {
    client: Client,
    config: RemoteRenderConfig,
}

impl RemoteRenderStrategy {
    pub fn new(config: RemoteRenderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self { client, config })
    }

    /// Fetch `url` through the service. Transport failures are returned as
    /// errors here; the `Extractor` impl is what turns them into an empty result.
    pub async fn fetch_and_extract(&self, url: &Url, keyword: Option<&str>) -> Result<Vec<JobRecord>> {
        let endpoint = Url::parse(&self.config.endpoint)
            .map_err(|e| ScanError::InvalidUrl(format!("render endpoint: {}", e)))?;

        let mut query = vec![
            ("apikey", self.config.api_key.clone()),
            ("url", url.to_string()),
        ];
        if self.config.js_render {
            query.push(("js_render", "true".to_string()));
        }
        if self.config.premium_proxy {
            query.push(("premium_proxy", "true".to_string()));
        }
        if self.config.autoparse {
            query.push(("autoparse", "true".to_string()));
        }

        info!(url = %url, "Fetching through render service");
        let start = Instant::now();
        let response = self.client.get(endpoint).query(&query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ScanError::RemoteService {
                status: status.as_u16(),
                message,
            });
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let body = response.text().await?;
        debug!(
            url = %url,
            bytes = body.len(),
            elapsed = ?start.elapsed(),
            "Render service responded"
        );

        let parser = PageParser::new().with_keyword(keyword.map(String::from));
        let looks_json = content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("json"))
            || (self.config.autoparse && body.trim_start().starts_with(['[', '{']));

        if looks_json {
            let mut records = parser.parse_json_payload(&body, url)?;
            let source = source_tag(board_for_url(url), "rendered");
            for record in &mut records {
                record.source = source.clone();
            }
            return Ok(records);
        }

        Ok(parser.parse(&body, content_type.as_deref(), url))
    }
}

#[async_trait]
impl Extractor for RemoteRenderStrategy {
    fn tier(&self) -> Tier {
        Tier::Remote
    }

    async fn extract(&self, url: &Url, keyword: Option<&str>) -> Vec<JobRecord> {
        match self.fetch_and_extract(url, keyword).await {
            Ok(records) => records,
            Err(e) => {
                warn!(url = %url, error = %e, transport = e.is_transport(), "Render service failed");
                Vec::new()
            }
        }
    }
}
