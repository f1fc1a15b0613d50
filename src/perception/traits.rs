use async_trait::async_trait;
use serde_json::Value;

use crate::errors::PageSightResult;

/// Boundary to a live, already-navigated page.
///
/// The concrete driver (CDP client, Playwright sidecar, WebDriver, ...) is
/// supplied by the caller; this crate only needs script evaluation and
/// viewport capture. Calls are blocking round-trips from the crate's point
/// of view; timeout and cancellation policy belong to the driver.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Evaluate a JS function expression in the page and return its result
    /// as structured data.
    async fn evaluate(&self, script: &str) -> PageSightResult<Value>;

    /// Evaluate a JS function expression, passing `arg` as its single
    /// argument.
    async fn evaluate_with_arg(&self, script: &str, arg: Value) -> PageSightResult<Value>;

    /// Capture the current viewport (not the full page) as PNG bytes.
    async fn screenshot(&self) -> PageSightResult<Vec<u8>>;

    /// Current page URL. Used only to scope memory lookups.
    fn url(&self) -> String;
}
