//! Narrowing of a lookup page to its `<body>` element.

use std::sync::LazyLock;

use regex::Regex;

static BODY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<body\b[^>]*>.*</body\s*>").expect("valid regex"));

/// Returns the outer markup of the page's `<body>` element.
///
/// Documents without a closed `<body>` element (fragments, truncated pages)
/// are returned whole. Surrounding whitespace is trimmed either way.
#[must_use]
pub fn extract_body(html: &str) -> &str {
    BODY_RE
        .find(html)
        .map_or(html, |m| m.as_str())
        .trim()
}
