// ABOUTME: Data model for social preview metadata and the provider descriptor table.
// ABOUTME: Defines Metadata, MetadataAttribute, ProviderKind, and MetadataByProvider.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The preview attributes a page can advertise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataAttribute {
    Image,
    Title,
    Description,
}

impl MetadataAttribute {
    /// Attributes in the order elements are tested against them.
    pub const ALL: [MetadataAttribute; 3] = [
        MetadataAttribute::Image,
        MetadataAttribute::Title,
        MetadataAttribute::Description,
    ];

    /// Name used as the suffix of a meta selector (`og:` + `title`).
    pub fn as_str(self) -> &'static str {
        match self {
            MetadataAttribute::Image => "image",
            MetadataAttribute::Title => "title",
            MetadataAttribute::Description => "description",
        }
    }
}

impl fmt::Display for MetadataAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Preview metadata for a single page.
///
/// Every attribute is always present; a missing value is the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub image: String,
    pub title: String,
    pub description: String,
}

impl Metadata {
    pub fn new(
        image: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            image: image.into(),
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn get(&self, attribute: MetadataAttribute) -> &str {
        match attribute {
            MetadataAttribute::Image => &self.image,
            MetadataAttribute::Title => &self.title,
            MetadataAttribute::Description => &self.description,
        }
    }

    pub fn set(&mut self, attribute: MetadataAttribute, value: impl Into<String>) {
        let slot = match attribute {
            MetadataAttribute::Image => &mut self.image,
            MetadataAttribute::Title => &mut self.title,
            MetadataAttribute::Description => &mut self.description,
        };
        *slot = value.into();
    }

    /// Returns true when no attribute carries a value.
    pub fn is_empty(&self) -> bool {
        MetadataAttribute::ALL
            .iter()
            .all(|attribute| self.get(*attribute).is_empty())
    }
}

/// A metadata standard a page may use to describe itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProviderKind {
    OpenGraph,
    Twitter,
    Default,
}

impl ProviderKind {
    /// Providers from highest to lowest priority.
    pub const ALL: [ProviderKind; 3] = [
        ProviderKind::OpenGraph,
        ProviderKind::Twitter,
        ProviderKind::Default,
    ];

    /// The static descriptor describing how this provider is matched.
    pub fn descriptor(self) -> &'static MetadataProviderDescriptor {
        match self {
            ProviderKind::OpenGraph => &PROVIDERS[0],
            ProviderKind::Twitter => &PROVIDERS[1],
            ProviderKind::Default => &PROVIDERS[2],
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProviderKind::OpenGraph => "openGraph",
            ProviderKind::Twitter => "twitter",
            ProviderKind::Default => "default",
        };
        f.write_str(s)
    }
}

/// Which attribute of a `<meta>` element names the property it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorAttribute {
    Property,
    Name,
}

impl SelectorAttribute {
    pub fn as_str(self) -> &'static str {
        match self {
            SelectorAttribute::Property => "property",
            SelectorAttribute::Name => "name",
        }
    }
}

/// How `<meta>` elements are matched to a provider.
///
/// An element belongs to `kind` for attribute `a` when its `selector`
/// attribute equals `prefix` followed by the attribute name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataProviderDescriptor {
    pub kind: ProviderKind,
    pub selector: SelectorAttribute,
    pub prefix: &'static str,
}

impl MetadataProviderDescriptor {
    /// Returns true if a selector value names `attribute` for this provider.
    pub fn matches(&self, selector_value: &str, attribute: MetadataAttribute) -> bool {
        selector_value
            .strip_prefix(self.prefix)
            .is_some_and(|rest| rest == attribute.as_str())
    }
}

/// Descriptor table in provider priority order.
pub static PROVIDERS: [MetadataProviderDescriptor; 3] = [
    MetadataProviderDescriptor {
        kind: ProviderKind::OpenGraph,
        selector: SelectorAttribute::Property,
        prefix: "og:",
    },
    MetadataProviderDescriptor {
        kind: ProviderKind::Twitter,
        selector: SelectorAttribute::Name,
        prefix: "twitter:",
    },
    MetadataProviderDescriptor {
        kind: ProviderKind::Default,
        selector: SelectorAttribute::Name,
        prefix: "",
    },
];

/// Metadata gathered separately for each provider.
///
/// Every provider always has an entry, so consumers never have to handle a
/// missing provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataByProvider {
    pub open_graph: Metadata,
    pub twitter: Metadata,
    pub default: Metadata,
}

impl MetadataByProvider {
    pub fn get(&self, kind: ProviderKind) -> &Metadata {
        match kind {
            ProviderKind::OpenGraph => &self.open_graph,
            ProviderKind::Twitter => &self.twitter,
            ProviderKind::Default => &self.default,
        }
    }

    pub fn get_mut(&mut self, kind: ProviderKind) -> &mut Metadata {
        match kind {
            ProviderKind::OpenGraph => &mut self.open_graph,
            ProviderKind::Twitter => &mut self.twitter,
            ProviderKind::Default => &mut self.default,
        }
    }

    /// Iterates providers in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (ProviderKind, &Metadata)> {
        ProviderKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }
}
