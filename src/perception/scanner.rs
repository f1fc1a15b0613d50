/// Interactive-element scan.
///
/// One script round-trip enumerates candidates, filters out anything that
/// fails the base visibility test, and assigns dense sequential ids in
/// document order. Sorting and enrichment happen on this side.
use crate::errors::{PageSightError, PageSightResult};
use crate::memory::{extract_domain, MemoryStore};
use crate::perception::traits::PageDriver;
use crate::perception::types::{sort_elements, ElementDescriptor, ScanOutcome};

/// Candidate selection and per-element extraction, run inside the page.
///
/// The selector set is intentionally over-inclusive: false positives are
/// tolerated, missed elements are the failure mode to avoid. Elements
/// failing the display/visibility/opacity/size test are dropped outright;
/// the expanded-viewport test only sets the `visible` flag.
const DETECT_JS: &str = r#"
() => {
    const out = [];
    let nextId = 1;

    const selectors = [
        'a[href]', 'button', 'input', 'textarea', 'select',
        '[role="button"]', '[role="link"]', '[role="tab"]',
        '[role="menuitem"]', '[role="slider"]', '[role="searchbox"]',
        '[role="textbox"]', '[onclick]', '[data-testid]', 'label',
        '[type="submit"]', '[type="checkbox"]', '[type="radio"]',
        '[class*="btn"]', '[class*="link"]', '[class*="click"]',
        '[class*="search"]'
    ].join(',');

    document.querySelectorAll(selectors).forEach((el) => {
        try {
            const rect = el.getBoundingClientRect();
            const style = window.getComputedStyle(el);

            const renderable = (
                rect.width > 0 &&
                rect.height > 0 &&
                style.display !== 'none' &&
                style.visibility !== 'hidden' &&
                parseFloat(style.opacity) > 0.1
            );
            if (!renderable) return;

            const inViewport = (
                rect.top < window.innerHeight + 300 &&
                rect.bottom > -300 &&
                rect.left < window.innerWidth + 100 &&
                rect.right > -100
            );

            const text = (
                el.innerText || el.textContent || el.value ||
                el.placeholder || el.getAttribute('aria-label') ||
                el.getAttribute('title') || el.getAttribute('alt') || ''
            ).trim();

            const entry = {
                id: nextId++,
                tag: el.tagName.toLowerCase(),
                type: (el.type || '').toLowerCase(),
                role: (el.getAttribute('role') || '').toLowerCase(),
                text: text.substring(0, 200),
                href: el.href || '',
                class_name: typeof el.className === 'string' ? el.className : '',
                dom_id: el.id || '',
                x: Math.round(rect.left + rect.width / 2),
                y: Math.round(rect.top + rect.height / 2),
                top: Math.round(rect.top),
                left: Math.round(rect.left),
                width: Math.round(rect.width),
                height: Math.round(rect.height),
                visible: inViewport,
                z_index: parseInt(style.zIndex, 10) || 0
            };

            if (entry.type === 'range') {
                entry.min = el.min || '0';
                entry.max = el.max || '100';
                entry.value = el.value || '0';
            }

            out.push(entry);
        } catch (err) {
            console.error('pagesight: element extraction failed', err);
        }
    });

    return out;
}
"#;

/// Scan the page for interactive elements.
///
/// Never fails past this boundary: a driver fault or a malformed script
/// result degrades to `ScanOutcome::Degraded` with a logged diagnostic.
/// An empty `Complete` list is a legitimate result (blank page).
pub async fn scan(driver: &dyn PageDriver) -> ScanOutcome {
    match run_scan(driver).await {
        Ok(mut elements) => {
            sort_elements(&mut elements);
            tracing::debug!(
                total = elements.len(),
                visible = elements.iter().filter(|e| e.visible).count(),
                "page scan complete"
            );
            ScanOutcome::Complete(elements)
        }
        Err(e) => {
            tracing::warn!(error = %e, "page scan degraded to empty result");
            ScanOutcome::Degraded
        }
    }
}

async fn run_scan(driver: &dyn PageDriver) -> PageSightResult<Vec<ElementDescriptor>> {
    let value = driver.evaluate(DETECT_JS).await?;
    let elements: Vec<ElementDescriptor> = serde_json::from_value(value)
        .map_err(|e| PageSightError::Scan(format!("malformed element payload: {e}")))?;
    Ok(elements)
}

/// Merge prior-success metadata into scanned elements.
///
/// One ranked lookup per scan, scoped to the page's registrable domain;
/// an element whose signature matches a returned selector gets
/// `learned_success` and the stat's `success_count`. Lookup failure or an
/// absent store leaves every element untouched.
pub async fn enrich(
    elements: &mut [ElementDescriptor],
    memory: &dyn MemoryStore,
    page_url: &str,
) {
    let domain = extract_domain(page_url);
    if domain.is_empty() {
        return;
    }

    let stats = match memory.get_best_selectors(&domain, "click", 5).await {
        Ok(stats) => stats,
        Err(e) => {
            tracing::debug!(error = %e, domain = %domain, "memory lookup failed, skipping enrichment");
            return;
        }
    };
    if stats.is_empty() {
        return;
    }

    let mut enriched = 0usize;
    for element in elements.iter_mut() {
        let signature = element.signature();
        if let Some(stat) = stats.iter().find(|s| s.selector == signature) {
            element.learned_success = Some(true);
            element.success_count = Some(stat.success_count);
            enriched += 1;
        }
    }
    tracing::debug!(domain = %domain, enriched, "memory enrichment applied");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PageSightError;
    use crate::test_support::{raw_element, FakeMemory, FakePageDriver};
    use serde_json::json;

    #[tokio::test]
    async fn scan_parses_and_sorts() {
        let driver = FakePageDriver::new().with_eval_ok(json!([
            raw_element(1, "a", 300, true),
            raw_element(2, "button", 80, true),
            raw_element(3, "input", 10, false),
        ]));

        let outcome = scan(&driver).await;
        let elements = outcome.elements();
        assert_eq!(elements.len(), 3);
        // Visible group first, ascending top within it.
        assert_eq!(elements[0].id, 2);
        assert_eq!(elements[1].id, 1);
        assert_eq!(elements[2].id, 3);
    }

    #[tokio::test]
    async fn scan_ids_are_dense_in_document_order() {
        // Hidden elements never reach the list, so ids stay 1..N.
        let driver = FakePageDriver::new().with_eval_ok(json!([
            raw_element(1, "a", 10, true),
            raw_element(2, "button", 20, true),
            raw_element(3, "input", 30, true),
        ]));

        let outcome = scan(&driver).await;
        let mut ids: Vec<u32> = outcome.elements().iter().map(|e| e.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn scan_repeat_is_content_stable() {
        let payload = json!([
            raw_element(1, "a", 100, true),
            raw_element(2, "button", 40, true),
        ]);
        let driver = FakePageDriver::new()
            .with_eval_ok(payload.clone())
            .with_eval_ok(payload);

        let first = scan(&driver).await;
        let second = scan(&driver).await;
        assert_eq!(first.elements(), second.elements());
    }

    #[tokio::test]
    async fn driver_fault_degrades() {
        let driver = FakePageDriver::new()
            .with_eval_err(PageSightError::Driver("evaluate timed out".into()));

        let outcome = scan(&driver).await;
        assert!(outcome.is_degraded());
        assert!(outcome.elements().is_empty());
    }

    #[tokio::test]
    async fn malformed_result_degrades() {
        let driver = FakePageDriver::new().with_eval_ok(json!({"not": "a list"}));
        assert!(scan(&driver).await.is_degraded());
    }

    #[tokio::test]
    async fn range_fields_parse_when_present() {
        let mut raw = raw_element(1, "input", 10, true);
        raw["type"] = json!("range");
        raw["min"] = json!("0");
        raw["max"] = json!("100");
        raw["value"] = json!("30");
        let driver = FakePageDriver::new().with_eval_ok(json!([raw]));

        let outcome = scan(&driver).await;
        let element = &outcome.elements()[0];
        assert!(element.is_range());
        assert_eq!(element.min.as_deref(), Some("0"));
        assert_eq!(element.value.as_deref(), Some("30"));
    }

    #[tokio::test]
    async fn enrich_marks_matching_signatures_only() {
        let driver = FakePageDriver::new().with_eval_ok(json!([
            {
                "id": 1, "tag": "button", "type": "", "role": "", "text": "Buy",
                "class_name": "btn primary", "x": 10, "y": 10, "top": 5, "left": 5,
                "width": 40, "height": 20, "visible": true
            },
            raw_element(2, "a", 50, true),
        ]));
        let memory = FakeMemory::with_stat("button.btn", 7);

        let mut elements = match scan(&driver).await {
            ScanOutcome::Complete(e) => e,
            ScanOutcome::Degraded => panic!("scan degraded"),
        };
        enrich(&mut elements, &memory, "https://www.example.com/shop").await;

        let button = elements.iter().find(|e| e.tag == "button").unwrap();
        assert_eq!(button.learned_success, Some(true));
        assert_eq!(button.success_count, Some(7));

        let anchor = elements.iter().find(|e| e.tag == "a").unwrap();
        assert_eq!(anchor.learned_success, None);
        assert_eq!(anchor.success_count, None);

        assert_eq!(
            memory.queries(),
            vec![("example.com".to_string(), "click".to_string(), 5)]
        );
    }

    #[tokio::test]
    async fn enrich_failure_is_silent() {
        let memory = FakeMemory::failing();
        let mut elements = vec![crate::test_support::descriptor(1, "button", 0, true)];
        enrich(&mut elements, &memory, "https://example.com").await;
        assert_eq!(elements[0].learned_success, None);
    }
}
