/// Perception orchestrator: scan, live-highlight, enrich, capture.
///
/// Holds the last scan and last artifact so a caller can request a labeled
/// screenshot without re-scanning. One `Vision` per page handle; calls
/// against the same page must be serialized by the caller.
use std::sync::Arc;

use crate::config::VisionConfig;
use crate::memory::MemoryStore;
use crate::perception::traits::PageDriver;
use crate::perception::types::{
    CaptureOutcome, ElementDescriptor, LabeledScreenshot, ScanOutcome,
};
use crate::perception::{overlay, scanner, screenshot};

pub struct Vision {
    memory: Option<Arc<dyn MemoryStore>>,
    config: VisionConfig,
    last_elements: Vec<ElementDescriptor>,
    last_screenshot: Option<LabeledScreenshot>,
}

impl Vision {
    pub fn new(config: VisionConfig) -> Self {
        Self {
            memory: None,
            config,
            last_elements: Vec::new(),
            last_screenshot: None,
        }
    }

    pub fn with_memory(config: VisionConfig, memory: Arc<dyn MemoryStore>) -> Self {
        Self {
            memory: Some(memory),
            ..Self::new(config)
        }
    }

    /// Scan the page, inject the live overlay for the visible group (when
    /// configured), and merge memory enrichment. The result is cached for
    /// later screenshot calls; a degraded scan leaves the cache untouched
    /// so the caller can still label the previous generation.
    pub async fn detect_all_elements(&mut self, driver: &dyn PageDriver) -> ScanOutcome {
        let outcome = scanner::scan(driver).await;
        let mut elements = match outcome {
            ScanOutcome::Complete(elements) => elements,
            ScanOutcome::Degraded => return ScanOutcome::Degraded,
        };

        // Runs even when the scan came back empty: the injection script's
        // remove pass releases the previous overlay generation.
        if self.config.inject_highlights {
            overlay::highlight(driver, &elements, &self.config).await;
        }

        if let Some(memory) = &self.memory {
            scanner::enrich(&mut elements, memory.as_ref(), &driver.url()).await;
        }

        self.last_elements = elements.clone();
        tracing::debug!(
            total = elements.len(),
            visible = elements.iter().filter(|e| e.visible).count(),
            "perception updated"
        );
        ScanOutcome::Complete(elements)
    }

    /// Labeled viewport screenshot for `elements`, or for the last scan
    /// when `None`. Caches the artifact on success.
    pub async fn create_labeled_screenshot(
        &mut self,
        driver: &dyn PageDriver,
        elements: Option<&[ElementDescriptor]>,
    ) -> CaptureOutcome {
        let elements = elements.unwrap_or(&self.last_elements);
        let outcome = screenshot::label_screenshot(driver, elements, &self.config).await;
        if let CaptureOutcome::Labeled(shot) = &outcome {
            self.last_screenshot = Some(shot.clone());
        }
        outcome
    }

    /// Remove any overlay this instance's scans injected.
    pub async fn clear_highlights(&self, driver: &dyn PageDriver) -> usize {
        overlay::clear(driver).await
    }

    pub fn last_elements(&self) -> &[ElementDescriptor] {
        &self.last_elements
    }

    pub fn last_screenshot(&self) -> Option<&LabeledScreenshot> {
        self.last_screenshot.as_ref()
    }
}
