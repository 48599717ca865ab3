use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{AreaId, Candidate, ElectionSession};

/// A political party fielding candidates. Holds no candidates itself; they live in
/// the session's [`CandidateRegistry`](crate::model::CandidateRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoliticalParty {
    pub name: String,
}

impl PoliticalParty {
    /// Create a party, making sure it has an entry in the session's registry.
    pub fn new(session: &mut ElectionSession, name: impl Into<String>) -> Self {
        let name = name.into();
        session.candidates.get_or_create(&name);
        Self { name }
    }

    /// Field `candidate` for this party.
    pub fn register(&self, session: &mut ElectionSession, candidate: Candidate) -> Result<()> {
        session.register_candidate(&self.name, candidate)
    }

    /// This party's candidate in an area, if it fields one.
    pub fn candidate<'s>(
        &self,
        session: &'s ElectionSession,
        area: &AreaId,
    ) -> Option<&'s Candidate> {
        session.candidates().candidate(&self.name, area)
    }
}
