//! Shortlink / canonical link extraction.

use scraper::Html;
use url::Url;

use crate::mapping::MappingRecord;

const REL_SHORTLINK: &str = "shortlink";
const REL_CANONICAL: &str = "canonical";
const ATTR_ALT_HREF: &str = "data-alt-href";

/// Base used to pull the path out of relative shortlinks.
const RELATIVE_BASE: &str = "http://shortlink.invalid/";

/// Scan an HTML document for `rel="shortlink"` and `rel="canonical"` links.
///
/// Every `link` and `a` element is visited in document order. The first
/// canonical href is the destination. Each shortlink element contributes its
/// href plus every token of its `data-alt-href` attribute. One record is
/// returned per shortlink whose path is longer than `/`; nothing is returned
/// unless both a shortlink and a canonical link exist.
pub fn scan_document(html: &str) -> Vec<MappingRecord> {
    let document = Html::parse_document(html);

    let mut canonical: Option<String> = None;
    let mut shortlinks: Vec<String> = Vec::new();

    for node in document.tree.root().descendants() {
        let Some(element) = node.value().as_element() else {
            continue;
        };
        if !matches!(element.name(), "link" | "a") {
            continue;
        }

        let href = element.attr("href").unwrap_or_default();
        let rel = element.attr("rel").unwrap_or_default();
        if href.is_empty() || rel.is_empty() {
            continue;
        }

        for token in rel.split_whitespace() {
            match token {
                REL_SHORTLINK => {
                    shortlinks.push(href.to_string());
                    if let Some(alt) = element.attr(ATTR_ALT_HREF) {
                        shortlinks.extend(alt.split_whitespace().map(str::to_string));
                    }
                }
                REL_CANONICAL if canonical.is_none() => {
                    canonical = Some(href.to_string());
                }
                _ => {}
            }
        }
    }

    let Some(canonical) = canonical else {
        return Vec::new();
    };

    shortlinks
        .iter()
        .filter_map(|link| match shortlink_path(link) {
            Ok(path) if path.len() > 1 => Some(MappingRecord::new(path, canonical.clone())),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(shortlink = %link, error = %e, "Skipping malformed shortlink");
                None
            }
        })
        .collect()
}

/// Path component of a shortlink, which may be absolute or relative.
fn shortlink_path(link: &str) -> Result<String, url::ParseError> {
    match Url::parse(link) {
        Ok(url) => Ok(url.path().to_string()),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = Url::parse(RELATIVE_BASE)?;
            Ok(base.join(link)?.path().to_string())
        }
        Err(e) => Err(e),
    }
}
