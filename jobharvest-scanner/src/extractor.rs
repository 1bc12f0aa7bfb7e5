use crate::record::JobRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Position in the fallback cascade, most trusted first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Remote,
    Local,
    Synthetic,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::Remote => "remote",
            Tier::Local => "local",
            Tier::Synthetic => "synthetic",
        };
        f.write_str(name)
    }
}

/// A real-data strategy the orchestrator can try.
///
/// Implementations swallow their own failures: an unreachable service and a
/// page with no listings both come back as an empty vector.
#[async_trait]
pub trait Extractor: Send + Sync {
    fn tier(&self) -> Tier;

    async fn extract(&self, url: &Url, keyword: Option<&str>) -> Vec<JobRecord>;
}
