// ABOUTME: Lookup orchestration tying URL normalization, the cache, and extraction together.
// ABOUTME: Callers supply the page fetch; LinkPreviewer decides when to fetch and records outcomes.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::cache::{CacheLookup, MetadataCache};
use crate::extract::extract_metadata;
use crate::link::normalize;
use crate::metadata::Metadata;

/// A preview ready to hand to a renderer.
///
/// `metadata: None` is the link-only preview shown before metadata arrives
/// or when fetching has been given up on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview {
    pub url: String,
    pub metadata: Option<Metadata>,
}

impl Preview {
    pub fn link_only(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            metadata: None,
        }
    }

    pub fn resolved(url: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            url: url.into(),
            metadata: Some(metadata),
        }
    }
}

/// What the caller should do for a hovered token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// The token is not an http(s) link.
    NotALink,
    /// Cached metadata is available.
    Ready(Preview),
    /// Retries are suppressed; render the link alone.
    LinkOnly(String),
    /// Nothing cached; fetch the page, then call `complete` or `fail`.
    Fetch(String),
    /// A fetch for this URL is already outstanding.
    InFlight(String),
}

/// Drives lookups against a `MetadataCache`.
///
/// Tracks which URLs have a fetch outstanding so that a second lookup for the
/// same page does not start another request.
#[derive(Debug)]
pub struct LinkPreviewer {
    cache: MetadataCache,
    in_flight: HashSet<String>,
}

impl LinkPreviewer {
    pub fn new(cache: MetadataCache) -> Self {
        Self {
            cache,
            in_flight: HashSet::new(),
        }
    }

    pub fn cache(&self) -> &MetadataCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut MetadataCache {
        &mut self.cache
    }

    /// Returns true if a fetch for `url` has been handed out and not resolved.
    pub fn is_in_flight(&self, url: &str) -> bool {
        self.in_flight.contains(url)
    }

    /// Normalizes a raw token and decides how to preview it.
    pub fn lookup(&mut self, raw: &str) -> Lookup {
        let Some(url) = normalize(raw) else {
            return Lookup::NotALink;
        };

        if self.in_flight.contains(url) {
            debug!(url, "fetch already in flight");
            return Lookup::InFlight(url.to_string());
        }

        match self.cache.get(url) {
            CacheLookup::Hit(metadata) => Lookup::Ready(Preview::resolved(url, metadata)),
            CacheLookup::Suppressed => Lookup::LinkOnly(url.to_string()),
            CacheLookup::Miss => {
                self.in_flight.insert(url.to_string());
                Lookup::Fetch(url.to_string())
            }
        }
    }

    /// Records fetched page HTML for `url` and returns the resolved preview.
    pub fn complete(&mut self, url: &str, html: &str) -> Preview {
        self.in_flight.remove(url);
        let metadata = extract_metadata(html);
        self.cache.set(url, metadata.clone());
        Preview::resolved(url, metadata)
    }

    /// Records a failed fetch for `url`.
    pub fn fail(&mut self, url: &str) {
        self.in_flight.remove(url);
        self.cache.report_failure(url);
    }

    /// Forgets an outstanding fetch without touching the cache.
    pub fn abandon(&mut self, url: &str) {
        if self.in_flight.remove(url) {
            debug!(url, "lookup abandoned");
        }
    }

    /// Runs a full lookup, calling `fetch` when the page is not cached.
    ///
    /// `fetch` returns the page HTML or an error; errors are reported to the
    /// cache and produce a link-only preview. Returns `None` when the token is
    /// not a link.
    pub fn preview_with<F, E>(&mut self, raw: &str, mut fetch: F) -> Option<Preview>
    where
        F: FnMut(&str) -> Result<String, E>,
        E: fmt::Display,
    {
        match self.lookup(raw) {
            Lookup::NotALink => None,
            Lookup::Ready(preview) => Some(preview),
            Lookup::LinkOnly(url) | Lookup::InFlight(url) => Some(Preview::link_only(url)),
            Lookup::Fetch(url) => match fetch(&url) {
                Ok(html) => Some(self.complete(&url, &html)),
                Err(err) => {
                    debug!(url = %url, error = %err, "fetch failed");
                    self.fail(&url);
                    Some(Preview::link_only(url))
                }
            },
        }
    }
}
