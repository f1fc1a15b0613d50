use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One detected interactive element, viewport-relative geometry in integer
/// pixels. `id` is dense 1..N in document-traversal order and valid only
/// for the scan that produced it; a re-scan reassigns from 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDescriptor {
    pub id: u32,
    pub tag: String,
    #[serde(rename = "type")]
    pub input_type: String,
    pub role: String,
    /// First non-empty of rendered text, value, placeholder, aria-label,
    /// title, alt. Truncated to 200 chars in the page script.
    pub text: String,
    #[serde(default)]
    pub href: String,
    #[serde(default)]
    pub class_name: String,
    /// The element's own `id` attribute (distinct from our sequential id).
    #[serde(default)]
    pub dom_id: String,
    /// Center point.
    pub x: i32,
    pub y: i32,
    pub top: i32,
    pub left: i32,
    pub width: i32,
    pub height: i32,
    /// True when the bounding box intersects the expanded viewport window
    /// (300px vertical, 100px horizontal margin). Elements failing the base
    /// visibility test never make it into the list at all.
    pub visible: bool,
    #[serde(default)]
    pub z_index: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Enrichment from the memory collaborator; absent when no store is
    /// wired in or the lookup found nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learned_success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_count: Option<u32>,
}

impl ElementDescriptor {
    /// Memory-lookup key: tag, plus the first class token when present
    /// (e.g. `button.btn`). Deliberately fuzzy — elements sharing a styling
    /// class share a signature.
    pub fn signature(&self) -> String {
        match self.class_name.split_whitespace().next() {
            Some(first) if !first.is_empty() => format!("{}.{}", self.tag, first),
            _ => self.tag.clone(),
        }
    }

    pub fn is_range(&self) -> bool {
        self.input_type == "range"
    }
}

/// Visible elements first, then ascending `top` within each group. Stable,
/// so document order breaks ties.
pub fn sort_elements(elements: &mut [ElementDescriptor]) {
    elements.sort_by(|a, b| b.visible.cmp(&a.visible).then(a.top.cmp(&b.top)));
}

/// Scan result: either a (possibly empty) element list, or the degraded
/// sentinel meaning the page could not be scanned at all. Callers treat
/// both as actionable, never as errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    Complete(Vec<ElementDescriptor>),
    Degraded,
}

impl ScanOutcome {
    pub fn elements(&self) -> &[ElementDescriptor] {
        match self {
            ScanOutcome::Complete(elements) => elements,
            ScanOutcome::Degraded => &[],
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, ScanOutcome::Degraded)
    }

    pub fn visible_count(&self) -> usize {
        self.elements().iter().filter(|e| e.visible).count()
    }
}

/// Labeled-screenshot artifact. Ephemeral; the only persistence is the
/// timestamped file write recorded in `path`.
#[derive(Debug, Clone)]
pub struct LabeledScreenshot {
    pub png_bytes: Vec<u8>,
    pub base64: String,
    /// Boxes actually drawn (after the visibility/size filters and cap).
    pub labeled_count: u32,
    pub path: Option<PathBuf>,
}

/// Capture result. A screenshot with zero drawn labels is `Labeled`;
/// `Unavailable` means the capture or encode itself failed.
#[derive(Debug, Clone)]
pub enum CaptureOutcome {
    Labeled(LabeledScreenshot),
    Unavailable,
}

impl CaptureOutcome {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, CaptureOutcome::Unavailable)
    }

    pub fn screenshot(&self) -> Option<&LabeledScreenshot> {
        match self {
            CaptureOutcome::Labeled(shot) => Some(shot),
            CaptureOutcome::Unavailable => None,
        }
    }
}
