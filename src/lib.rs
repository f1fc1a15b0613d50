//! pagesight — best-effort web page perception for LLM-driven browser
//! agents.
//!
//! Given a [`perception::traits::PageDriver`] handle to a live page, the
//! crate enumerates visible interactive elements with dense sequential
//! ids, highlights them live in the page, and produces a numbered,
//! color-coded labeled screenshot plus a base64 encoding for a
//! vision-capable model.
//!
//! Every perception entry point degrades instead of failing: a scan that
//! cannot run returns the `Degraded` sentinel, a capture that cannot
//! complete returns `Unavailable`, and overlay faults report zero. The
//! decision loop above stays live even when perception does not.

pub mod config;
pub mod errors;
pub mod memory;
pub mod perception;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::VisionConfig;
pub use errors::{PageSightError, PageSightResult};
pub use memory::{MemoryStore, SelectorStat};
pub use perception::pipeline::Vision;
pub use perception::traits::PageDriver;
pub use perception::types::{CaptureOutcome, ElementDescriptor, LabeledScreenshot, ScanOutcome};

/// Install the global tracing subscriber, honoring `RUST_LOG` and
/// defaulting to `info`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
