//! The included-resource index.

use std::collections::HashMap;

use super::relationship::RelationshipSlot;
use super::resource::{Identifier, Resource};

/// Lookup table over a document's `included` array, keyed by `(type, id)`.
///
/// Built once per parsed document, before any relationship is hydrated.
/// Lookups are O(1). When the server repeats a `(type, id)` pair the last
/// occurrence wins for lookups, while [`IncludedIndex::iter`] still yields
/// every resource in wire order.
///
/// # Example
///
/// ```rust
/// use hauler::{IncludedIndex, Resource};
///
/// let index = IncludedIndex::build(vec![Resource::new("brokers", "5")]);
/// assert!(index.lookup("brokers", "5").is_some());
/// assert!(index.lookup("brokers", "6").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncludedIndex {
    resources: Vec<Resource>,
    positions: HashMap<String, HashMap<String, usize>>,
}

impl IncludedIndex {
    /// Builds the index from the `included` array in wire order.
    pub fn build(resources: Vec<Resource>) -> Self {
        let mut positions: HashMap<String, HashMap<String, usize>> = HashMap::new();
        for (position, resource) in resources.iter().enumerate() {
            positions
                .entry(resource.resource_type().to_owned())
                .or_default()
                .insert(resource.id().to_owned(), position);
        }
        Self {
            resources,
            positions,
        }
    }

    /// Looks up an included resource by type and id.
    pub fn lookup(&self, resource_type: &str, id: &str) -> Option<&Resource> {
        let position = *self.positions.get(resource_type)?.get(id)?;
        self.resources.get(position)
    }

    /// Looks up an included resource by identifier.
    pub fn get(&self, identifier: Identifier<'_>) -> Option<&Resource> {
        self.lookup(identifier.resource_type(), identifier.id())
    }

    /// Hydrates a to-one relationship.
    ///
    /// Returns `None` for empty and to-many relationships and when the related
    /// resource was not included.
    pub fn hydrate(&self, slot: &RelationshipSlot<'_>) -> Option<&Resource> {
        slot.identifier().and_then(|identifier| self.get(identifier))
    }

    /// Hydrates every identifier of a relationship, keeping the identifier next
    /// to its resolution so callers can fall back to the bare id.
    pub fn hydrate_all<'s, 'a>(
        &'s self,
        slot: &RelationshipSlot<'a>,
    ) -> Vec<(Identifier<'a>, Option<&'s Resource>)> {
        slot.identifiers()
            .iter()
            .map(|identifier| (*identifier, self.get(*identifier)))
            .collect()
    }

    /// Returns every included resource in wire order, duplicates included.
    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter()
    }

    /// Returns the included resources in wire order.
    pub fn as_slice(&self) -> &[Resource] {
        &self.resources
    }

    /// Returns the number of included resources, duplicates included.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Returns `true` if nothing was included.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::document::value::Attributes;

    fn broker(id: &str, name: &str) -> Resource {
        Resource::new("brokers", id).with_attributes(Attributes::new().with("company-name", name))
    }

    #[test]
    fn test_lookup_hit_and_miss() {
        let index = IncludedIndex::build(vec![broker("5", "Acme"), Resource::new("users", "5")]);
        assert_eq!(
            index.lookup("brokers", "5").map(|r| r.attributes().string("company-name")),
            Some("Acme".to_owned())
        );
        assert_eq!(index.lookup("users", "5").map(Resource::resource_type), Some("users"));
        assert!(index.lookup("truckers", "5").is_none());
        assert!(index.lookup("brokers", "6").is_none());
    }

    #[test]
    fn test_duplicates_last_wins_but_all_kept() {
        let index = IncludedIndex::build(vec![broker("5", "First"), broker("5", "Second")]);
        assert_eq!(
            index.lookup("brokers", "5").map(|r| r.attributes().string("company-name")),
            Some("Second".to_owned())
        );
        assert_eq!(index.len(), 2);
        assert_eq!(index.iter().count(), 2);
    }

    #[test]
    fn test_empty_index() {
        let index = IncludedIndex::default();
        assert!(index.is_empty());
        assert!(index.lookup("brokers", "5").is_none());
    }

    #[test]
    fn test_hydrate_to_one() {
        let index = IncludedIndex::build(vec![broker("5", "Acme")]);
        let raw = json!({"type": "brokers", "id": "5"});
        let slot = RelationshipSlot::decode(&raw);
        assert_eq!(index.hydrate(&slot).map(Resource::id), Some("5"));

        let raw = json!({"type": "brokers", "id": "9"});
        assert!(index.hydrate(&RelationshipSlot::decode(&raw)).is_none());
        assert!(index.hydrate(&RelationshipSlot::None).is_none());
    }

    #[test]
    fn test_hydrate_to_many_is_not_to_one() {
        let index = IncludedIndex::build(vec![broker("5", "Acme")]);
        let raw = json!([{"type": "brokers", "id": "5"}]);
        assert!(index.hydrate(&RelationshipSlot::decode(&raw)).is_none());
    }

    #[test]
    fn test_hydrate_all_keeps_misses() {
        let index = IncludedIndex::build(vec![broker("5", "Acme")]);
        let raw = json!([{"type": "brokers", "id": "5"}, {"type": "brokers", "id": "6"}]);
        let slot = RelationshipSlot::decode(&raw);
        let hydrated = index.hydrate_all(&slot);
        assert_eq!(hydrated.len(), 2);
        assert_eq!(hydrated[0].0.id(), "5");
        assert!(hydrated[0].1.is_some());
        assert_eq!(hydrated[1].0.id(), "6");
        assert!(hydrated[1].1.is_none());
    }

    proptest! {
        #[test]
        fn test_lookup_defined_exactly_for_included(
            included in proptest::collection::vec(("[a-c]", "[0-9]{1,2}"), 0..20),
            probe in ("[a-d]", "[0-9]{1,3}"),
        ) {
            let resources: Vec<Resource> = included
                .iter()
                .map(|(t, id)| Resource::new(t.as_str(), id.as_str()))
                .collect();
            let index = IncludedIndex::build(resources);

            for (t, id) in &included {
                let found = index.lookup(t, id);
                prop_assert!(found.is_some());
                prop_assert_eq!(found.map(Resource::id), Some(id.as_str()));
            }

            let expected = included.iter().any(|(t, id)| *t == probe.0 && *id == probe.1);
            prop_assert_eq!(index.lookup(&probe.0, &probe.1).is_some(), expected);
        }
    }
}
