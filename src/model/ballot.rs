use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{Candidate, ElectionLevel, ElectionSession, Voter};

/// Candidates for one area, keyed by party name.
pub type PartyCandidates = BTreeMap<String, Candidate>;

/// Candidates grouped by election level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LevelCandidates {
    pub president: PartyCandidates,
    pub governor: PartyCandidates,
    pub mayor: PartyCandidates,
    pub mp: PartyCandidates,
}

impl LevelCandidates {
    pub fn for_level(&self, level: ElectionLevel) -> &PartyCandidates {
        match level {
            ElectionLevel::President => &self.president,
            ElectionLevel::Governor => &self.governor,
            ElectionLevel::Mayor => &self.mayor,
            ElectionLevel::Mp => &self.mp,
        }
    }

    pub fn for_level_mut(&mut self, level: ElectionLevel) -> &mut PartyCandidates {
        match level {
            ElectionLevel::President => &mut self.president,
            ElectionLevel::Governor => &mut self.governor,
            ElectionLevel::Mayor => &mut self.mayor,
            ElectionLevel::Mp => &mut self.mp,
        }
    }
}

/// What a caller needs to find a polling station, and so rebuild its ballot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Metadata {
    /// Local government area the station belongs to.
    pub lga: String,
    pub polling_station: String,
}

impl Metadata {
    pub fn new(lga: impl Into<String>, polling_station: impl Into<String>) -> Self {
        Self {
            lga: lga.into(),
            polling_station: polling_station.into(),
        }
    }
}

/// Snapshot of every candidate a polling station's voters may choose among.
///
/// Only the metadata is serialised; a ballot is rebuilt from it with
/// [`Ballot::from_metadata`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ballot {
    #[serde(flatten)]
    metadata: Metadata,
    #[serde(skip)]
    candidates: LevelCandidates,
}

impl Ballot {
    pub(crate) fn new(metadata: Metadata, candidates: LevelCandidates) -> Self {
        Self {
            metadata,
            candidates,
        }
    }

    /// Resolve the polling station named by `metadata` and build a fresh ballot for it.
    pub fn from_metadata(session: &ElectionSession, metadata: &Metadata) -> Result<Self> {
        session.ballot_from_metadata(metadata)
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn candidates(&self) -> &LevelCandidates {
        &self.candidates
    }

    /// Check that every chosen party is on this ballot at the chosen level.
    pub fn validate(&self, votes: &BTreeMap<ElectionLevel, String>) -> bool {
        for (&level, party) in votes {
            let available = self.candidates.for_level(level);
            if !available.contains_key(party) {
                warn!(
                    "{party} not on the {level} ballot at {}; available parties are: {:?}",
                    self.metadata.polling_station,
                    available.keys().collect::<Vec<_>>()
                );
                return false;
            }
        }
        true
    }

    /// Validate the voter's choices and, if they are all on the ballot, vote at the
    /// originating polling station.
    ///
    /// Returns `Ok(false)` without touching any state if validation fails; errors from
    /// the polling station are propagated.
    pub fn cast_votes(&self, session: &mut ElectionSession, voter: &Voter) -> Result<bool> {
        if !self.validate(voter.votes()) {
            return Ok(false);
        }
        session.vote_at(&self.metadata, voter, &self.candidates)?;
        Ok(true)
    }

    /// Render the printable ballot paper.
    pub fn voting_card(&self) -> String {
        const SECTIONS: [(ElectionLevel, &str); 4] = [
            (ElectionLevel::President, "Presidential Candidates"),
            (ElectionLevel::Governor, "Governorship Candidates"),
            (ElectionLevel::Mayor, "Mayorship Candidates"),
            (ElectionLevel::Mp, "Parliamentary Candidates"),
        ];

        let mut lines = vec!["Ballot Paper".to_string()];
        for (i, (level, title)) in SECTIONS.into_iter().enumerate() {
            if i > 0 {
                lines.push(String::new());
            }
            lines.push(format!("  {title}"));
            for (index, (party, candidate)) in self.candidates.for_level(level).iter().enumerate() {
                lines.push(format!("    {index}: {party}, {}", candidate.name));
            }
        }
        lines.push("end".to_string());
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AreaId, ElectionSession, Voter};
    use crate::Error;

    #[session_test(seeded)]
    fn ballot_lists_ancestor_candidates(session: ElectionSession) {
        let ballot = session.ballot("PS1").unwrap();
        assert_eq!(ballot.metadata(), &Metadata::new("LGA1", "PS1"));
        let president = ballot.candidates().for_level(ElectionLevel::President);
        assert_eq!(president.keys().collect::<Vec<_>>(), vec!["PP1", "PP2"]);
        // PS1 is in CS1, but James B stands in CS2.
        assert!(ballot.candidates().for_level(ElectionLevel::Mp).is_empty());

        let ballot = session.ballot("PS5").unwrap();
        assert_eq!(ballot.candidates().for_level(ElectionLevel::Mp)["PP1"].name, "James B");
    }

    #[session_test(seeded)]
    fn validation_rejects_parties_off_the_ballot(mut session: ElectionSession) {
        let ballot = session.ballot("PS1").unwrap();
        let mut voter = Voter::example("v1", "PS1");
        voter.vote_for(ElectionLevel::President, "PP3");
        assert!(!ballot.validate(voter.votes()));
        assert!(!ballot.cast_votes(&mut session, &voter).unwrap());

        // Nothing was recorded.
        let station = session.areas().polling_station("PS1").unwrap();
        assert!(!station.has_voted(voter.id(), ElectionLevel::President));
        let candidate = session
            .candidates()
            .candidate("PP1", &AreaId::country("Gwugwuru"))
            .unwrap();
        assert_eq!(candidate.votes(), 0);

        // A level with no candidates at all rejects any choice.
        let mut voter = Voter::example("v2", "PS1");
        voter.vote_for(ElectionLevel::Mp, "PP1");
        assert!(!ballot.cast_votes(&mut session, &voter).unwrap());
    }

    #[session_test(seeded)]
    fn serialises_as_metadata_only(session: ElectionSession) {
        let ballot = session.ballot("PS2").unwrap();
        let json = serde_json::to_value(&ballot).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"lga": "LGA1", "polling_station": "PS2"})
        );

        let metadata: Metadata = serde_json::from_value(json).unwrap();
        let rebuilt = Ballot::from_metadata(&session, &metadata).unwrap();
        assert_eq!(rebuilt, ballot);
    }

    #[session_test(seeded)]
    fn from_metadata_requires_matching_lga(session: ElectionSession) {
        let err = Ballot::from_metadata(&session, &Metadata::new("LGA5", "PS1")).unwrap_err();
        assert!(matches!(err, Error::UnknownStation { .. }));
        let err = Ballot::from_metadata(&session, &Metadata::new("LGA1", "PS99")).unwrap_err();
        assert!(matches!(err, Error::UnknownStation { .. }));
    }

    #[session_test(seeded)]
    fn voting_card_layout(session: ElectionSession) {
        let card = session.ballot("PS5").unwrap().voting_card();
        let expected = "\
Ballot Paper
  Presidential Candidates
    0: PP1, John Doe
    1: PP2, Tim D

  Governorship Candidates

  Mayorship Candidates

  Parliamentary Candidates
    0: PP1, James B
end";
        assert_eq!(card, expected);
    }
}
