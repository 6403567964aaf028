//! Link extraction from HTML markup

use scraper::{Html, Selector};
use url::Url;

/// Elements whose href/src reference page assets
const ASSET_SELECTOR: &str = "a, link, img, script, source";

/// Collect the absolute URLs referenced by anchor, stylesheet-link, image,
/// script and media-source elements, in document order.
///
/// `href` wins over `src` when an element carries both. Relative references
/// are resolved against `base`; values that do not parse as a URL reference,
/// or that resolve to a non-HTTP scheme such as `mailto`, are skipped
/// without affecting the remaining links.
pub fn extract_links(html: &str, base: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(ASSET_SELECTOR).expect("static selector is valid");

    let mut links = Vec::new();
    for element in document.select(&selector) {
        let value = element
            .value()
            .attr("href")
            .or_else(|| element.value().attr("src"));
        let Some(value) = value else { continue };

        if let Some(resolved) = resolve_reference(base, value) {
            links.push(resolved);
        }
    }
    links
}

/// Resolve one attribute value to an absolute HTTP(S) URL.
fn resolve_reference(base: &Url, value: &str) -> Option<Url> {
    let resolved = match Url::parse(value) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => base.join(value).ok()?,
        Err(_) => return None,
    };

    match resolved.scheme() {
        "http" | "https" => Some(resolved),
        _ => None,
    }
}
