use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::model::{AreaId, AreaRegistry, Candidate, PartyCandidates};

/// Candidates indexed by party, then by the area they contest.
/// Entries are never removed or replaced once set.
#[derive(Debug, Clone, Default)]
pub struct CandidateRegistry {
    parties: BTreeMap<String, BTreeMap<AreaId, Candidate>>,
}

impl CandidateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The candidate map for a party, created empty on first use.
    pub fn get_or_create(&mut self, party: &str) -> &mut BTreeMap<AreaId, Candidate> {
        self.parties.entry(party.to_string()).or_default()
    }

    /// Register `candidate` for `party`.
    ///
    /// Fails if the party already fields a candidate in that area, if the area does not
    /// exist in `areas`, or if the candidate already belongs to a party. The registry is
    /// unchanged on failure.
    pub fn register(
        &mut self,
        party: &str,
        mut candidate: Candidate,
        areas: &AreaRegistry,
    ) -> Result<()> {
        if let Some(existing) = candidate.party() {
            return Err(Error::AlreadyRegistered {
                candidate: candidate.name.clone(),
                party: existing.to_string(),
            });
        }

        let area = candidate.area_id();
        if self.candidate(party, &area).is_some() {
            warn!("Cannot register {}: {party} already has a candidate for {area}", candidate.name);
            return Err(Error::DuplicateRegistration {
                party: party.to_string(),
                area,
            });
        }
        if !areas.exists(area.kind, &area.name) {
            warn!("Cannot register {}: no {area}", candidate.name);
            return Err(Error::unknown_area(area.kind, area.name));
        }

        candidate.party = Some(party.to_string());
        info!(
            "Registered {} for {party} as {} candidate in {area}",
            candidate.name, candidate.level
        );
        self.get_or_create(party).insert(area, candidate);
        Ok(())
    }

    /// Every party's candidate for this area, keyed by party name.
    pub fn candidates_for_area(&self, area: &AreaId) -> PartyCandidates {
        self.parties
            .iter()
            .filter_map(|(party, candidates)| {
                candidates
                    .get(area)
                    .map(|candidate| (party.clone(), candidate.clone()))
            })
            .collect()
    }

    pub fn candidate(&self, party: &str, area: &AreaId) -> Option<&Candidate> {
        self.parties.get(party)?.get(area)
    }

    pub(crate) fn candidate_mut(&mut self, party: &str, area: &AreaId) -> Option<&mut Candidate> {
        self.parties.get_mut(party)?.get_mut(area)
    }

    pub fn parties(&self) -> impl Iterator<Item = &str> {
        self.parties.keys().map(String::as_str)
    }

    /// Total number of registered candidates.
    pub fn len(&self) -> usize {
        self.parties.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
