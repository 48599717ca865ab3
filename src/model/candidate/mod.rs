use serde::{Deserialize, Serialize};

use crate::model::{AreaId, ElectionLevel};

pub use party::PoliticalParty;
pub use registry::CandidateRegistry;

mod party;
mod registry;

/// A person standing for election at one level in one area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// The office contested.
    pub level: ElectionLevel,
    /// Name of the area contested; its kind follows from `level`.
    pub area: String,
    /// Candidate name.
    pub name: String,
    /// The fielding party, set once on registration.
    #[serde(skip_deserializing)]
    party: Option<String>,
    /// Votes received so far. Only ever changed by casting votes.
    #[serde(skip_deserializing)]
    votes: u64,
}

impl Candidate {
    /// Create an unregistered candidate with no votes.
    pub fn new(level: ElectionLevel, area: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            level,
            area: area.into(),
            name: name.into(),
            party: None,
            votes: 0,
        }
    }

    pub fn party(&self) -> Option<&str> {
        self.party.as_deref()
    }

    pub fn votes(&self) -> u64 {
        self.votes
    }

    pub fn area_id(&self) -> AreaId {
        AreaId::new(self.level.area_kind(), self.area.clone())
    }

    pub(crate) fn add_vote(&mut self) {
        self.votes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AreaKind, ElectionSession};
    use crate::Config;

    #[test]
    fn deserialised_candidates_start_unregistered_with_no_votes() {
        let candidate: Candidate = serde_json::from_str(
            r#"{"level": "president", "area": "C", "name": "X", "party": "PP9", "votes": 41}"#,
        )
        .unwrap();
        assert_eq!(candidate.votes(), 0);
        assert_eq!(candidate.party(), None);

        let mut session = ElectionSession::new(Config::default());
        session.add_area(AreaKind::Country, "C");
        session.register_candidate("PP1", candidate).unwrap();
        let registered = session
            .candidates()
            .candidate("PP1", &AreaId::country("C"))
            .unwrap();
        assert_eq!(registered.votes(), 0);
        assert_eq!(registered.party(), Some("PP1"));
    }
}
