// ABOUTME: Provider cascade that reconciles per-provider metadata into one record.
// ABOUTME: For each attribute the first non-empty value in openGraph > twitter > default order wins.

use crate::metadata::{Metadata, MetadataAttribute, MetadataByProvider};

/// Picks one value per attribute, walking providers in priority order.
///
/// An attribute no provider supplies stays empty.
pub fn merge(by_provider: &MetadataByProvider) -> Metadata {
    let mut merged = Metadata::default();
    for attribute in MetadataAttribute::ALL {
        let winner = by_provider
            .iter()
            .map(|(_, meta)| meta.get(attribute))
            .find(|value| !value.is_empty());
        if let Some(value) = winner {
            merged.set(attribute, value);
        }
    }
    merged
}
