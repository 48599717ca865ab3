use std::collections::{BTreeMap, HashMap};

use crate::model::{AreaId, AreaKind, AreaNode, PollingStation};

/// Lookup table from (kind, name) to area node. Entries are only ever added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AreaRegistry {
    areas: HashMap<AreaKind, BTreeMap<String, AreaNode>>,
}

impl AreaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the node for this area, creating an empty one on first use.
    pub fn get_or_create(&mut self, kind: AreaKind, name: &str) -> &mut AreaNode {
        self.areas
            .entry(kind)
            .or_default()
            .entry(name.to_string())
            .or_insert_with(|| {
                debug!("Registered {kind} {name}");
                AreaNode::new(kind, name)
            })
    }

    pub fn get(&self, kind: AreaKind, name: &str) -> Option<&AreaNode> {
        self.areas.get(&kind)?.get(name)
    }

    pub fn get_mut(&mut self, kind: AreaKind, name: &str) -> Option<&mut AreaNode> {
        self.areas.get_mut(&kind)?.get_mut(name)
    }

    pub fn get_by_id(&self, id: &AreaId) -> Option<&AreaNode> {
        self.get(id.kind, &id.name)
    }

    pub fn exists(&self, kind: AreaKind, name: &str) -> bool {
        self.get(kind, name).is_some()
    }

    /// All known names of a kind, in sorted order.
    pub fn instance_names(&self, kind: AreaKind) -> Vec<&str> {
        self.areas
            .get(&kind)
            .map(|areas| areas.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn polling_station(&self, name: &str) -> Option<&PollingStation> {
        self.get(AreaKind::PollingStation, name)?
            .as_polling_station()
    }

    pub fn polling_station_mut(&mut self, name: &str) -> Option<&mut PollingStation> {
        self.get_mut(AreaKind::PollingStation, name)?
            .as_polling_station_mut()
    }

    /// Total number of registered areas across all kinds.
    pub fn len(&self) -> usize {
        self.areas.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_or_create_is_per_kind() {
        let mut registry = AreaRegistry::new();
        registry.get_or_create(AreaKind::Country, "C");
        registry.get_or_create(AreaKind::Constituency, "C");
        registry.get_or_create(AreaKind::Country, "C");

        assert_eq!(registry.len(), 2);
        assert!(registry.exists(AreaKind::Country, "C"));
        assert!(registry.exists(AreaKind::Constituency, "C"));
        assert!(!registry.exists(AreaKind::Administrative, "C"));
        assert_eq!(
            registry.get(AreaKind::Constituency, "C").map(AreaNode::kind),
            Some(AreaKind::Constituency)
        );
    }

    #[test]
    fn instance_names_sorted() {
        let mut registry = AreaRegistry::new();
        for name in ["AA2", "AA0", "AA1"] {
            registry.get_or_create(AreaKind::Administrative, name);
        }
        assert_eq!(
            registry.instance_names(AreaKind::Administrative),
            vec!["AA0", "AA1", "AA2"]
        );
        assert!(registry.instance_names(AreaKind::Country).is_empty());
    }

    #[test]
    fn polling_station_lookup_ignores_other_kinds() {
        let mut registry = AreaRegistry::new();
        registry.get_or_create(AreaKind::LocalGovernment, "PS1");
        assert!(registry.polling_station("PS1").is_none());

        registry.get_or_create(AreaKind::PollingStation, "PS1");
        assert_eq!(registry.polling_station("PS1").map(PollingStation::name), Some("PS1"));
    }
}
