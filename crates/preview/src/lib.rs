// ABOUTME: Main library entry point for the linkcard preview core.
// ABOUTME: Re-exports the public API: extraction, provider merge, URL normalization, and the metadata cache.

//! linkcard-preview - social preview metadata for hovered links.
//!
//! The crate resolves the image, title and description a page advertises
//! through Open Graph, Twitter Card and plain HTML meta tags, and caches
//! results per URL so repeated lookups stay cheap even when fetches fail.
//! Fetching pages is left to the caller.
//!
//! # Example
//!
//! ```
//! use linkcard_preview::{extract, merge, CacheLookup, MetadataCache};
//!
//! let html = r#"<html><head>
//!     <title>Fallback</title>
//!     <meta property="og:title" content="Open Graph Title">
//! </head></html>"#;
//!
//! let metadata = merge(&extract(html));
//! assert_eq!(metadata.title, "Open Graph Title");
//!
//! let mut cache = MetadataCache::builder().max_size(16).build().unwrap();
//! cache.set("https://example.com", metadata.clone());
//! assert_eq!(cache.get("https://example.com"), CacheLookup::Hit(metadata));
//! ```

pub mod cache;
pub mod error;
pub mod extract;
pub mod link;
pub mod merge;
pub mod metadata;
pub mod options;
pub mod preview;

pub use crate::cache::{CacheLookup, MetadataCache};
pub use crate::error::ConfigError;
pub use crate::extract::{extract, extract_from_document, extract_metadata};
pub use crate::link::{clean_url, is_url, normalize};
pub use crate::merge::merge;
pub use crate::metadata::{
    Metadata, MetadataAttribute, MetadataByProvider, MetadataProviderDescriptor, ProviderKind,
    SelectorAttribute, PROVIDERS,
};
pub use crate::options::{CacheBuilder, CacheOptions};
pub use crate::preview::{LinkPreviewer, Lookup, Preview};
