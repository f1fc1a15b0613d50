/// Read-only boundary to an external selector-success store.
///
/// The scanner queries past click successes per domain to enrich freshly
/// detected elements. The store itself (persistence, write path, scoring)
/// lives outside this crate.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::PageSightResult;

/// One proven selector for a (domain, action kind) pair, ranked by the
/// store before it reaches us.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorStat {
    pub selector: String,
    pub success_count: u32,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<String>,
}

#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Best-ranked selectors for `domain` and `action_kind` (e.g. "click"),
    /// at most `limit` entries.
    async fn get_best_selectors(
        &self,
        domain: &str,
        action_kind: &str,
        limit: usize,
    ) -> PageSightResult<Vec<SelectorStat>>;
}

/// Registrable-domain extraction used to scope memory lookups:
/// host component of the URL with a leading `www.` stripped.
pub fn extract_domain(url: &str) -> String {
    let host = if let Some((_, rest)) = url.split_once("://") {
        rest.split('/').next().unwrap_or("")
    } else {
        url.split('/').next().unwrap_or("")
    };
    host.strip_prefix("www.").unwrap_or(host).to_string()
}
