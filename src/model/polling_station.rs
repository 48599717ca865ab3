use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};
use crate::model::{
    AreaId, Ballot, CandidateRegistry, ElectionLevel, ElectionSession, LevelCandidates, Voter,
    VoterId,
};
use crate::VoteCommit;

/// The terminal node of the hierarchy, where votes are cast and counted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollingStation {
    name: String,
    /// Voters who have voted here, per level. Only ever grows.
    already_voted: HashMap<ElectionLevel, HashSet<VoterId>>,
}

impl PollingStation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            already_voted: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Build the ballot for the station named `name`. See [`ElectionSession::ballot`].
    pub fn ballot(session: &ElectionSession, name: &str) -> Result<Ballot> {
        session.ballot(name)
    }

    pub fn has_voted(&self, voter: &VoterId, level: ElectionLevel) -> bool {
        self.already_voted
            .get(&level)
            .map_or(false, |voters| voters.contains(voter))
    }

    /// Number of voters recorded at `level`.
    pub fn turnout(&self, level: ElectionLevel) -> usize {
        self.already_voted.get(&level).map_or(0, HashSet::len)
    }

    /// Cast `voter`'s choices, counting them against the candidates on `ballot`.
    ///
    /// The voter must authenticate and be registered at this station. Each level may
    /// be voted on at most once per voter. Under [`VoteCommit::PerLevel`] levels are
    /// applied in order and a rejection leaves earlier levels counted; under
    /// [`VoteCommit::Atomic`] nothing is applied unless every level passes.
    pub fn vote(
        &mut self,
        voter: &Voter,
        ballot: &LevelCandidates,
        candidates: &mut CandidateRegistry,
        commit: VoteCommit,
    ) -> Result<()> {
        if !voter.authenticate() {
            warn!("Rejected voter {} at {}: authentication failed", voter.id(), self.name);
            return Err(Error::Authentication);
        }
        if voter.polling_station_name() != self.name {
            warn!(
                "Rejected voter {} at {}: registered at {}",
                voter.id(),
                self.name,
                voter.polling_station_name()
            );
            return Err(Error::WrongStation {
                expected: voter.polling_station_name().to_string(),
            });
        }

        let mut pending = Vec::with_capacity(voter.votes().len());
        for (&level, party) in voter.votes() {
            let area = self.check(voter.id(), level, party, ballot, candidates)?;
            match commit {
                VoteCommit::PerLevel => self.record(voter.id(), level, party, &area, candidates)?,
                VoteCommit::Atomic => pending.push((level, party, area)),
            }
        }
        for (level, party, area) in pending {
            self.record(voter.id(), level, party, &area, candidates)?;
        }
        Ok(())
    }

    /// Ensure the voter may vote for `party` at `level`, returning the contested area.
    fn check(
        &self,
        voter: &VoterId,
        level: ElectionLevel,
        party: &str,
        ballot: &LevelCandidates,
        candidates: &CandidateRegistry,
    ) -> Result<AreaId> {
        if self.has_voted(voter, level) {
            warn!("Voter {voter} has already voted in the {level} election at {}", self.name);
            return Err(Error::AlreadyVoted { level });
        }
        ballot
            .for_level(level)
            .get(party)
            .map(|snapshot| snapshot.area_id())
            .filter(|area| candidates.candidate(party, area).is_some())
            .ok_or_else(|| Error::NotOnBallot {
                level,
                party: party.to_string(),
            })
    }

    fn record(
        &mut self,
        voter: &VoterId,
        level: ElectionLevel,
        party: &str,
        area: &AreaId,
        candidates: &mut CandidateRegistry,
    ) -> Result<()> {
        let candidate = candidates
            .candidate_mut(party, area)
            .ok_or_else(|| Error::NotOnBallot {
                level,
                party: party.to_string(),
            })?;
        candidate.add_vote();
        self.already_voted
            .entry(level)
            .or_default()
            .insert(voter.clone());
        info!("Counted {level} vote for {party} in {area} at {}", self.name);
        Ok(())
    }
}
