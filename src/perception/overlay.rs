/// Live highlight overlay injected into the page.
///
/// Overlay nodes are a scoped resource: every inject begins by releasing
/// the previous generation, so at most one generation exists at any time.
/// Everything here is cosmetic and degrades to a zero count on any fault.
use crate::config::VisionConfig;
use crate::errors::{PageSightError, PageSightResult};
use crate::perception::traits::PageDriver;
use crate::perception::types::ElementDescriptor;

/// Clears the previous overlay generation, installs the stylesheet once,
/// then adds one box and one numbered label per visible entry. The label
/// sits 25px above the box, clamped to the page top.
const HIGHLIGHT_JS: &str = r#"
(items) => {
    document.querySelectorAll('.pagesight-highlight, .pagesight-label')
        .forEach((el) => el.remove());

    if (!document.getElementById('pagesight-style')) {
        const style = document.createElement('style');
        style.id = 'pagesight-style';
        style.textContent = `
            .pagesight-highlight {
                position: absolute !important;
                border: 3px solid #00ff00 !important;
                background: rgba(0, 255, 0, 0.15) !important;
                pointer-events: none !important;
                z-index: 2147483647 !important;
                box-sizing: border-box !important;
            }
            .pagesight-label {
                position: absolute !important;
                background: #00ff00 !important;
                color: #000 !important;
                padding: 4px 8px !important;
                font-size: 14px !important;
                font-weight: bold !important;
                font-family: monospace !important;
                pointer-events: none !important;
                z-index: 2147483647 !important;
                border-radius: 3px !important;
                box-shadow: 0 2px 4px rgba(0,0,0,0.3) !important;
            }
        `;
        document.head.appendChild(style);
    }

    let count = 0;
    items.forEach((item) => {
        if (!item.visible) return;

        const box = document.createElement('div');
        box.className = 'pagesight-highlight';
        box.style.left = item.left + 'px';
        box.style.top = item.top + 'px';
        box.style.width = item.width + 'px';
        box.style.height = item.height + 'px';

        const label = document.createElement('div');
        label.className = 'pagesight-label';
        label.textContent = '[' + item.id + ']';
        label.style.left = item.left + 'px';
        label.style.top = Math.max(0, item.top - 25) + 'px';

        document.body.appendChild(box);
        document.body.appendChild(label);
        count++;
    });

    return count;
}
"#;

const CLEAR_JS: &str = r#"
() => {
    const nodes = document.querySelectorAll('.pagesight-highlight, .pagesight-label');
    nodes.forEach((el) => el.remove());
    return Math.floor(nodes.length / 2);
}
"#;

/// Inject highlight boxes for up to `config.max_labels` elements, visible
/// group only. The round-trip always runs, even with nothing to draw: the
/// script's remove pass is what releases the previous generation. Returns
/// the number actually highlighted; a driver fault is logged and reported
/// as 0.
pub async fn highlight(
    driver: &dyn PageDriver,
    elements: &[ElementDescriptor],
    config: &VisionConfig,
) -> usize {
    let subset: Vec<&ElementDescriptor> = elements
        .iter()
        .filter(|e| e.visible)
        .take(config.max_labels)
        .collect();

    match inject(driver, &subset).await {
        Ok(count) => {
            tracing::debug!(count, "highlight overlay injected");
            count
        }
        Err(e) => {
            tracing::warn!(error = %e, "highlight overlay failed, page left unannotated");
            0
        }
    }
}

async fn inject(
    driver: &dyn PageDriver,
    subset: &[&ElementDescriptor],
) -> PageSightResult<usize> {
    let arg = serde_json::to_value(subset)?;
    let value = driver.evaluate_with_arg(HIGHLIGHT_JS, arg).await?;
    value
        .as_u64()
        .map(|n| n as usize)
        .ok_or_else(|| PageSightError::Overlay(format!("unexpected highlight result: {value}")))
}

/// Remove every overlay node this crate ever injected. Returns the number
/// of element overlays removed; faults degrade to 0.
pub async fn clear(driver: &dyn PageDriver) -> usize {
    match driver.evaluate(CLEAR_JS).await {
        Ok(value) => value.as_u64().unwrap_or(0) as usize,
        Err(e) => {
            tracing::warn!(error = %e, "overlay clear failed");
            0
        }
    }
}
