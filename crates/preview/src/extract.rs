// ABOUTME: Scans parsed HTML for Open Graph, Twitter Card, and plain meta tags.
// ABOUTME: Buckets meta content by provider and falls back to <title> for the default title.

//! HTML metadata extraction.
//!
//! Every `<meta>` element is visited once, in document order, and tested
//! against the provider descriptors in priority order and then against the
//! attributes in `image, title, description` order. The first matching
//! (provider, attribute) pair receives the element's `content` and the scan
//! moves on to the next element. A later element matching the same pair
//! overwrites the earlier value.
//!
//! Parsing uses html5ever through `scraper`, which recovers from any input,
//! so malformed markup simply yields whatever meta elements survive
//! recovery (often none).

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, trace};

use crate::merge::merge;
use crate::metadata::{
    Metadata, MetadataAttribute, MetadataByProvider, MetadataProviderDescriptor, PROVIDERS,
};

/// Extracts metadata for every provider from an HTML document.
pub fn extract(html: &str) -> MetadataByProvider {
    let document = Html::parse_document(html);
    if !document.errors.is_empty() {
        trace!(errors = document.errors.len(), "html parsed with recoverable errors");
    }
    extract_from_document(&document)
}

/// Resolves a page's final preview metadata: `merge(extract(html))`.
pub fn extract_metadata(html: &str) -> Metadata {
    merge(&extract(html))
}

/// Extracts metadata from an already parsed document.
pub fn extract_from_document(document: &Html) -> MetadataByProvider {
    let mut by_provider = MetadataByProvider::default();

    let Ok(meta_selector) = Selector::parse("meta") else {
        return by_provider;
    };

    let mut matched = 0usize;
    for element in document.select(&meta_selector) {
        if let Some((descriptor, attribute)) = match_element(&element) {
            let content = element.value().attr("content").unwrap_or_default();
            trace!(
                provider = %descriptor.kind,
                attribute = %attribute,
                "matched meta element"
            );
            by_provider
                .get_mut(descriptor.kind)
                .set(attribute, content);
            matched += 1;
        }
    }

    if by_provider.default.title.is_empty() {
        if let Some(title) = document_title(document) {
            by_provider.default.title = title;
        }
    }

    debug!(matched, "extracted page metadata");
    by_provider
}

/// Finds the first (provider, attribute) pair a meta element belongs to.
fn match_element(
    element: &ElementRef<'_>,
) -> Option<(&'static MetadataProviderDescriptor, MetadataAttribute)> {
    for descriptor in &PROVIDERS {
        let Some(selector_value) = element.value().attr(descriptor.selector.as_str()) else {
            continue;
        };
        for attribute in MetadataAttribute::ALL {
            if descriptor.matches(selector_value, attribute) {
                return Some((descriptor, attribute));
            }
        }
    }
    None
}

/// Text of the first `<title>` element, trimmed.
fn document_title(document: &Html) -> Option<String> {
    let sel = Selector::parse("title").ok()?;
    document
        .select(&sel)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::ProviderKind;
    use pretty_assertions::assert_eq;

    /// Page carrying every provider/attribute combination, mirroring the
    /// way real pages duplicate values across standards.
    fn full_page() -> String {
        let by_provider = [
            (
                ProviderKind::OpenGraph,
                Metadata::new("https://mock.com/image.png", "Title", "Description"),
            ),
            (
                ProviderKind::Twitter,
                Metadata::new("https://mock.com/image.png", "Title", "Description"),
            ),
            (
                ProviderKind::Default,
                Metadata::new("", "", "Description from description meta tag"),
            ),
        ];

        let mut tags = Vec::new();
        for (kind, meta) in &by_provider {
            let descriptor = kind.descriptor();
            for attribute in MetadataAttribute::ALL {
                tags.push(format!(
                    r#"<meta {}="{}{}" content="{}">"#,
                    descriptor.selector.as_str(),
                    descriptor.prefix,
                    attribute,
                    meta.get(attribute)
                ));
            }
        }
        format!(
            "<html><head>\n{}</head><body></body></html>",
            tags.join("\n")
        )
    }

    #[test]
    fn buckets_values_by_provider() {
        let by_provider = extract(&full_page());

        assert_eq!(
            by_provider.open_graph,
            Metadata::new("https://mock.com/image.png", "Title", "Description")
        );
        assert_eq!(
            by_provider.twitter,
            Metadata::new("https://mock.com/image.png", "Title", "Description")
        );
        assert_eq!(
            by_provider.default,
            Metadata::new("", "", "Description from description meta tag")
        );
    }

    #[test]
    fn end_to_end_resolution_prefers_open_graph() {
        assert_eq!(
            extract_metadata(&full_page()),
            Metadata::new("https://mock.com/image.png", "Title", "Description")
        );
    }

    #[test]
    fn no_meta_tags_yields_empty_metadata() {
        let by_provider = extract("<html><head></head><body><p>Hi</p></body></html>");
        assert_eq!(by_provider, MetadataByProvider::default());
        assert_eq!(merge(&by_provider), Metadata::default());
    }

    #[test]
    fn empty_and_malformed_input_degrade_to_empty() {
        assert_eq!(extract(""), MetadataByProvider::default());
        assert_eq!(extract("<<<>>> not html </p></div>"), MetadataByProvider::default());
        assert_eq!(extract("\u{0}\u{1}binary"), MetadataByProvider::default());
    }

    #[test]
    fn last_matching_element_wins() {
        let html = r#"<html><head>
            <meta property="og:title" content="First">
            <meta property="og:title" content="Second">
        </head></html>"#;
        assert_eq!(extract(html).open_graph.title, "Second");
    }

    #[test]
    fn missing_content_is_empty_string() {
        let html = r#"<meta name="twitter:image">"#;
        let by_provider = extract(html);
        assert_eq!(by_provider.twitter.image, "");
        assert_eq!(by_provider, MetadataByProvider::default());
    }

    #[test]
    fn selector_attribute_must_match_descriptor() {
        // og: uses `property`, twitter: and the default provider use `name`.
        let html = r#"<html><head>
            <meta name="og:title" content="og via name">
            <meta property="twitter:title" content="twitter via property">
            <meta property="description" content="description via property">
        </head></html>"#;
        assert_eq!(extract(html), MetadataByProvider::default());
    }

    #[test]
    fn unrecognized_meta_tags_are_ignored() {
        let html = r#"<html><head>
            <meta charset="utf-8">
            <meta name="viewport" content="width=device-width">
            <meta property="og:image:alt" content="Alt text">
            <meta property="og:site_name" content="Site">
            <meta name="keywords" content="a,b">
        </head></html>"#;
        assert_eq!(extract(html), MetadataByProvider::default());
    }

    #[test]
    fn matching_is_case_sensitive() {
        let html = r#"<meta property="OG:TITLE" content="Loud">"#;
        assert_eq!(extract(html).open_graph.title, "");
    }

    #[test]
    fn element_matches_only_one_provider() {
        // Carries both selector attributes; og: wins and the name is not tested.
        let html = r#"<meta property="og:title" name="title" content="Shared">"#;
        let by_provider = extract(html);
        assert_eq!(by_provider.open_graph.title, "Shared");
        assert_eq!(by_provider.default.title, "");
    }

    #[test]
    fn title_element_fills_default_title_only() {
        let html = r#"<html><head>
            <title>  Page Title  </title>
            <meta property="og:description" content="OG Description">
        </head></html>"#;
        let by_provider = extract(html);
        assert_eq!(by_provider.default.title, "Page Title");
        assert_eq!(by_provider.open_graph.title, "");
        assert_eq!(by_provider.twitter.title, "");
    }

    #[test]
    fn title_element_does_not_override_title_meta() {
        let html = r#"<html><head>
            <title>Page Title</title>
            <meta name="title" content="Meta Title">
        </head></html>"#;
        assert_eq!(extract(html).default.title, "Meta Title");
    }

    #[test]
    fn values_keep_decoded_entities() {
        let html = r#"<meta name="description" content="Tom &amp; Jerry">"#;
        assert_eq!(extract(html).default.description, "Tom & Jerry");
    }

    #[test]
    fn meta_tags_in_body_are_scanned() {
        let html = r#"<html><head></head><body>
            <meta name="twitter:description" content="Body meta">
        </body></html>"#;
        assert_eq!(extract(html).twitter.description, "Body meta");
    }
}
