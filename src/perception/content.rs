/// Structured page-content extraction beyond the element scan: product
/// cards, form inventories, and a coarse page-type classification the
/// decision loop uses to pick its next move.
use serde::{Deserialize, Serialize};

use crate::perception::traits::PageDriver;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageContent {
    pub products: Vec<Product>,
    pub forms: Vec<FormInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub title: String,
    pub url: String,
    pub price: Option<f64>,
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormInfo {
    pub id: String,
    pub fields: Vec<FormField>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormField {
    #[serde(rename = "type", default)]
    pub input_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub placeholder: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    Captcha,
    ProductListing,
    Search,
    Content,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageStructure {
    pub page_type: PageType,
    pub has_captcha: bool,
    pub has_search: bool,
    pub needs_scroll: bool,
}

impl PageStructure {
    pub fn unknown() -> Self {
        Self {
            page_type: PageType::Unknown,
            has_captcha: false,
            has_search: false,
            needs_scroll: false,
        }
    }
}

const CONTENT_JS: &str = r#"
() => {
    const data = { products: [], forms: [] };

    const productSelectors = [
        '[data-testid*="product"]',
        '.product-card',
        'article',
        '[class*="ProductCard"]'
    ].join(',');

    document.querySelectorAll(productSelectors).forEach((card, i) => {
        if (i > 30) return;

        const text = card.innerText || '';
        const link = card.querySelector('a[href]');

        const priceMatch = text.match(/\$?([\d,]+(?:\.\d{2})?)/);
        const ratingMatch = text.match(/([\d.]+)\s*(?:stars?|★)/i);

        if (link) {
            const title = (card.querySelector('h1,h2,h3,h4')?.innerText ||
                          link.innerText).trim();

            data.products.push({
                title: title.substring(0, 200),
                url: link.href,
                price: priceMatch ? parseFloat(priceMatch[1].replace(',', '')) : null,
                rating: ratingMatch ? parseFloat(ratingMatch[1]) : null
            });
        }
    });

    document.querySelectorAll('form').forEach((form, i) => {
        const fields = Array.from(form.querySelectorAll('input, select, textarea')).map((f) => ({
            type: f.type || '',
            name: f.name || '',
            placeholder: f.placeholder || ''
        }));

        if (fields.length > 0) {
            data.forms.push({ id: form.id || ('form-' + i), fields });
        }
    });

    return data;
}
"#;

const STRUCTURE_JS: &str = r#"
() => {
    const text = document.body.innerText.toLowerCase();
    return {
        page_type: text.includes('captcha') ? 'captcha' :
                   document.querySelectorAll('[class*="product"]').length > 3 ? 'product_listing' :
                   document.querySelector('input[type="search"]') ? 'search' : 'content',
        has_captcha: text.includes('captcha') || text.includes('verify'),
        has_search: !!document.querySelector('input[type="search"]'),
        needs_scroll: document.body.scrollHeight > window.innerHeight * 1.5
    };
}
"#;

/// Extract product cards and form inventories. Degrades to an empty
/// `PageContent` on any fault.
pub async fn extract_page_content(driver: &dyn PageDriver) -> PageContent {
    let value = match driver.evaluate(CONTENT_JS).await {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "content extraction degraded to empty");
            return PageContent::default();
        }
    };
    match serde_json::from_value(value) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(error = %e, "content extraction returned malformed data");
            PageContent::default()
        }
    }
}

/// Classify the page's overall shape. Degrades to `unknown()` on any fault.
pub async fn analyze_page_structure(driver: &dyn PageDriver) -> PageStructure {
    let value = match driver.evaluate(STRUCTURE_JS).await {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "structure analysis degraded to unknown");
            return PageStructure::unknown();
        }
    };
    match serde_json::from_value(value) {
        Ok(structure) => structure,
        Err(e) => {
            tracing::warn!(error = %e, "structure analysis returned malformed data");
            PageStructure::unknown()
        }
    }
}
