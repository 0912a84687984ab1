// ABOUTME: Normalization of hovered text tokens into candidate link URLs.
// ABOUTME: Strips trailing prose punctuation and accepts only absolute http(s) URLs.

use url::Url;

/// Strips one trailing comma or period from a token.
///
/// Prose often captures the punctuation that follows a link
/// (`see https://example.com.`), so exactly one such character is dropped.
pub fn clean_url(raw: &str) -> &str {
    raw.strip_suffix(['.', ',']).unwrap_or(raw)
}

/// Returns true if `raw` parses as an absolute URL with an `http` or `https` scheme.
pub fn is_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Cleans a token and returns it only when it is a usable link.
pub fn normalize(raw: &str) -> Option<&str> {
    let cleaned = clean_url(raw.trim());
    is_url(cleaned).then_some(cleaned)
}
