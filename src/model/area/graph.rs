use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::model::{
    AreaId, AreaKind, AreaRegistry, CandidateRegistry, ElectionLevel, LevelCandidates,
};

/// Parent relations between areas, held as an edge table keyed by the child and the
/// kind of parent slot. A local government area has two independent slots
/// (administrative area and constituency); every other kind has at most one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AreaGraph {
    parents: HashMap<(AreaId, AreaKind), String>,
}

impl AreaGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `child` beneath `parent`, registering both in `areas` if needed.
    ///
    /// Re-parenting is never allowed: if the child's slot for this parent kind is
    /// already filled, [`Error::Conflict`] is returned and the original relation is kept.
    pub fn add_child(
        &mut self,
        areas: &mut AreaRegistry,
        parent: &AreaId,
        child: &AreaId,
    ) -> Result<()> {
        if !parent.kind.accepts_child(child.kind) {
            return Err(Error::InvalidRelation {
                parent: parent.kind,
                child: child.kind,
            });
        }

        let slot = (child.clone(), parent.kind);
        if let Some(existing) = self.parents.get(&slot) {
            let existing = AreaId::new(parent.kind, existing.clone());
            warn!("{child} already has a parent: {existing}");
            return Err(Error::Conflict {
                child: child.clone(),
                existing,
            });
        }

        if let Some(children) = areas.get_or_create(parent.kind, &parent.name).children_mut() {
            children.insert(child.name.clone());
        }
        areas.get_or_create(child.kind, &child.name);
        self.parents.insert(slot, parent.name.clone());
        info!("{child} has been successfully added to {parent}");
        Ok(())
    }

    /// Name of the parent filling `child`'s slot for `parent_kind`, if attached.
    pub fn parent(&self, child: &AreaId, parent_kind: AreaKind) -> Option<&str> {
        self.parents
            .get(&(child.clone(), parent_kind))
            .map(String::as_str)
    }

    fn parent_id(&self, child: &AreaId, parent_kind: AreaKind) -> Option<AreaId> {
        self.parent(child, parent_kind)
            .map(|name| AreaId::new(parent_kind, name))
    }

    /// The area contested at `level` that a polling station's voters belong to,
    /// following the fixed path up from its local government area.
    pub fn ancestor_for(&self, polling_station: &str, level: ElectionLevel) -> Option<AreaId> {
        let lga = self.parent_id(
            &AreaId::polling_station(polling_station),
            AreaKind::LocalGovernment,
        )?;
        match level {
            ElectionLevel::Mayor => Some(lga),
            ElectionLevel::Governor => self.parent_id(&lga, AreaKind::Administrative),
            ElectionLevel::President => {
                let administrative = self.parent_id(&lga, AreaKind::Administrative)?;
                self.parent_id(&administrative, AreaKind::Country)
            }
            ElectionLevel::Mp => self.parent_id(&lga, AreaKind::Constituency),
        }
    }

    /// Candidates visible from an area.
    ///
    /// A hierarchical area sees only the candidates registered for itself, under the
    /// level its kind is contested at. A polling station sees one set per level,
    /// gathered along its ancestor path; a missing link leaves that level empty.
    pub fn candidates(&self, registry: &CandidateRegistry, area: &AreaId) -> LevelCandidates {
        let mut view = LevelCandidates::default();
        match area.kind {
            AreaKind::PollingStation => {
                for level in ElectionLevel::ALL {
                    if let Some(ancestor) = self.ancestor_for(&area.name, level) {
                        *view.for_level_mut(level) = registry.candidates_for_area(&ancestor);
                    }
                }
            }
            kind => {
                if let Some(level) = ElectionLevel::ALL
                    .into_iter()
                    .find(|level| level.area_kind() == kind)
                {
                    *view.for_level_mut(level) = registry.candidates_for_area(area);
                }
            }
        }
        view
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::model::Candidate;

    fn linked() -> (AreaGraph, AreaRegistry) {
        let mut graph = AreaGraph::new();
        let mut areas = AreaRegistry::new();
        graph
            .add_child(&mut areas, &AreaId::country("C"), &AreaId::administrative("AA1"))
            .unwrap();
        graph
            .add_child(&mut areas, &AreaId::administrative("AA1"), &AreaId::local_government("L1"))
            .unwrap();
        graph
            .add_child(&mut areas, &AreaId::local_government("L1"), &AreaId::polling_station("PS1"))
            .unwrap();
        (graph, areas)
    }

    #[test]
    fn attach_registers_both_sides() {
        let (graph, areas) = linked();
        assert!(areas.exists(AreaKind::Country, "C"));
        assert!(areas.polling_station("PS1").is_some());
        assert_eq!(
            graph.parent(&AreaId::polling_station("PS1"), AreaKind::LocalGovernment),
            Some("L1")
        );
        let children = areas
            .get(AreaKind::Administrative, "AA1")
            .and_then(|node| node.children())
            .unwrap();
        assert!(children.contains("L1"));
    }

    #[test]
    fn reattach_is_a_conflict_and_keeps_original() {
        let (mut graph, mut areas) = linked();
        let (graph_before, areas_before) = (graph.clone(), areas.clone());

        let err = graph
            .add_child(&mut areas, &AreaId::country("C"), &AreaId::administrative("AA1"))
            .unwrap_err();
        assert!(matches!(err, Error::Conflict { ref existing, .. } if existing.name == "C"));

        let err = graph
            .add_child(&mut areas, &AreaId::country("Other"), &AreaId::administrative("AA1"))
            .unwrap_err();
        assert!(matches!(err, Error::Conflict { ref existing, .. } if existing.name == "C"));
        assert_eq!(
            graph.parent(&AreaId::administrative("AA1"), AreaKind::Country),
            Some("C")
        );
        assert!(!areas.exists(AreaKind::Country, "Other"));
        assert_eq!(graph, graph_before);
        assert_eq!(areas, areas_before);
        assert_eq!(
            areas.get(AreaKind::Country, "C").and_then(|node| node.children()),
            areas_before.get(AreaKind::Country, "C").and_then(|node| node.children())
        );
    }

    #[test]
    fn local_government_has_two_independent_parents() {
        let (mut graph, mut areas) = linked();
        graph
            .add_child(&mut areas, &AreaId::constituency("CS1"), &AreaId::local_government("L1"))
            .unwrap();
        let lga = AreaId::local_government("L1");
        assert_eq!(graph.parent(&lga, AreaKind::Administrative), Some("AA1"));
        assert_eq!(graph.parent(&lga, AreaKind::Constituency), Some("CS1"));
    }

    #[test]
    fn invalid_relation_rejected() {
        let mut graph = AreaGraph::new();
        let mut areas = AreaRegistry::new();
        let err = graph
            .add_child(&mut areas, &AreaId::country("C"), &AreaId::polling_station("PS1"))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidRelation {
                parent: AreaKind::Country,
                child: AreaKind::PollingStation
            }
        ));
        assert!(areas.is_empty());
    }

    #[test]
    fn ancestor_path_with_missing_links() {
        let (graph, _) = linked();
        assert_eq!(
            graph.ancestor_for("PS1", ElectionLevel::President),
            Some(AreaId::country("C"))
        );
        assert_eq!(
            graph.ancestor_for("PS1", ElectionLevel::Governor),
            Some(AreaId::administrative("AA1"))
        );
        assert_eq!(
            graph.ancestor_for("PS1", ElectionLevel::Mayor),
            Some(AreaId::local_government("L1"))
        );
        assert_eq!(graph.ancestor_for("PS1", ElectionLevel::Mp), None);
        assert_eq!(graph.ancestor_for("PS-unattached", ElectionLevel::Mayor), None);
    }

    #[test]
    fn station_view_spans_levels() {
        let (graph, mut areas) = linked();
        let mut registry = CandidateRegistry::new();
        registry
            .register(
                "PP1",
                Candidate::new(ElectionLevel::President, "C", "Alice"),
                &areas,
            )
            .unwrap();
        registry
            .register(
                "PP1",
                Candidate::new(ElectionLevel::Mayor, "L1", "Mo"),
                &areas,
            )
            .unwrap();
        areas.get_or_create(AreaKind::Constituency, "CS9");
        registry
            .register("PP2", Candidate::new(ElectionLevel::Mp, "CS9", "Pat"), &areas)
            .unwrap();

        let view = graph.candidates(&registry, &AreaId::polling_station("PS1"));
        assert_eq!(view.for_level(ElectionLevel::President).len(), 1);
        assert!(view.for_level(ElectionLevel::Governor).is_empty());
        assert_eq!(view.for_level(ElectionLevel::Mayor)["PP1"].name, "Mo");
        // PS1's LGA has no constituency, so CS9's candidate is not on its ballot.
        assert!(view.for_level(ElectionLevel::Mp).is_empty());

        let country_view = graph.candidates(&registry, &AreaId::country("C"));
        assert_eq!(country_view.for_level(ElectionLevel::President)["PP1"].name, "Alice");
        assert!(country_view.for_level(ElectionLevel::Mayor).is_empty());
    }

    proptest! {
        /// Any sequence of attachments leaves each child slot with its first parent,
        /// and repeating the whole sequence changes nothing.
        #[test]
        fn first_attachment_wins(
            links in prop::collection::vec((0usize..3, 0usize..4), 1..20),
        ) {
            let mut graph = AreaGraph::new();
            let mut areas = AreaRegistry::new();
            let mut first = HashMap::new();

            for &(parent, child) in &links {
                let parent_id = AreaId::local_government(format!("L{parent}"));
                let child_id = AreaId::polling_station(format!("PS{child}"));
                let attached = graph.add_child(&mut areas, &parent_id, &child_id);
                if first.contains_key(&child) {
                    let conflict = matches!(attached, Err(Error::Conflict { .. }));
                    prop_assert!(conflict);
                } else {
                    prop_assert!(attached.is_ok());
                    first.insert(child, parent);
                }
            }

            let (graph_before, areas_before) = (graph.clone(), areas.clone());
            for &(parent, child) in &links {
                let parent_id = AreaId::local_government(format!("L{parent}"));
                let child_id = AreaId::polling_station(format!("PS{child}"));
                prop_assert!(graph.add_child(&mut areas, &parent_id, &child_id).is_err());
            }
            prop_assert_eq!(&graph, &graph_before);
            prop_assert_eq!(&areas, &areas_before);

            for (child, parent) in first {
                let expected = format!("L{parent}");
                let child_id = AreaId::polling_station(format!("PS{child}"));
                let actual = graph.parent(&child_id, AreaKind::LocalGovernment);
                prop_assert_eq!(actual, Some(expected.as_str()));
            }
        }
    }
}
