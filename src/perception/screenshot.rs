/// Viewport capture, labeling, and persistence.
use std::path::PathBuf;

use base64::Engine as _;

use crate::config::VisionConfig;
use crate::errors::{PageSightError, PageSightResult};
use crate::perception::annotator;
use crate::perception::traits::PageDriver;
use crate::perception::types::{CaptureOutcome, ElementDescriptor, LabeledScreenshot};

/// Capture the viewport, draw element labels, persist the PNG to
/// `<screenshots_dir>/screenshot_<HHMMSS>.png`, and return the artifact
/// with a base64 encoding for inline transmission.
///
/// Never raises past this boundary: any capture, draw, or write fault is
/// logged and reported as `Unavailable`. A valid screenshot with zero
/// labels is a `Labeled` outcome, not a fault. Two captures within the
/// same second overwrite the same file; callers needing uniqueness must
/// add their own discriminator.
pub async fn label_screenshot(
    driver: &dyn PageDriver,
    elements: &[ElementDescriptor],
    config: &VisionConfig,
) -> CaptureOutcome {
    match capture_and_label(driver, elements, config).await {
        Ok(shot) => {
            tracing::debug!(
                labeled = shot.labeled_count,
                path = ?shot.path,
                "labeled screenshot created"
            );
            CaptureOutcome::Labeled(shot)
        }
        Err(e) => {
            tracing::warn!(error = %e, "labeled screenshot unavailable");
            CaptureOutcome::Unavailable
        }
    }
}

async fn capture_and_label(
    driver: &dyn PageDriver,
    elements: &[ElementDescriptor],
    config: &VisionConfig,
) -> PageSightResult<LabeledScreenshot> {
    let raw = driver.screenshot().await?;
    let (png_bytes, labeled_count) = annotator::draw_labels(&raw, elements, config.max_labels)
        .map_err(|e| PageSightError::Capture(format!("label drawing: {e}")))?;

    let path = persist(&png_bytes, config)
        .map_err(|e| PageSightError::Capture(format!("persist: {e}")))?;
    let base64 = base64::engine::general_purpose::STANDARD.encode(&png_bytes);

    Ok(LabeledScreenshot {
        png_bytes,
        base64,
        labeled_count,
        path: Some(path),
    })
}

fn persist(png_bytes: &[u8], config: &VisionConfig) -> PageSightResult<PathBuf> {
    std::fs::create_dir_all(&config.screenshots_dir)?;
    let filename = format!("screenshot_{}.png", chrono::Local::now().format("%H%M%S"));
    let path = config.screenshots_dir.join(filename);
    std::fs::write(&path, png_bytes)?;
    Ok(path)
}
