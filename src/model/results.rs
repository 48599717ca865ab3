use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{AreaId, AreaRegistry, CandidateRegistry, ElectionLevel, PartyCandidates};

pub const NO_RESULT: &str = "NO_RESULT";
pub const HUNG_RESULT: &str = "HUNG_RESULT";

/// The result of one area's election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum Outcome {
    /// No votes have been recorded.
    NoResult,
    /// A single party holds the most votes.
    Winner(String),
    /// Two or more parties tie on the most votes. Ties are never broken.
    Hung(Vec<String>),
}

impl Outcome {
    /// Decide the outcome from each party's vote count.
    pub fn from_totals(totals: &BTreeMap<String, u64>) -> Self {
        let max = totals.values().copied().max().unwrap_or(0);
        if max == 0 {
            return Self::NoResult;
        }
        let mut leaders = totals
            .iter()
            .filter(|(_, votes)| **votes == max)
            .map(|(party, _)| party.clone())
            .collect::<Vec<_>>();
        if leaders.len() == 1 {
            Self::Winner(leaders.remove(0))
        } else {
            Self::Hung(leaders)
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoResult => f.write_str(NO_RESULT),
            Self::Winner(party) => f.write_str(party),
            Self::Hung(_) => f.write_str(HUNG_RESULT),
        }
    }
}

impl From<Outcome> for String {
    fn from(outcome: Outcome) -> Self {
        outcome.to_string()
    }
}

impl PartialEq<&str> for Outcome {
    fn eq(&self, other: &&str) -> bool {
        match self {
            Self::NoResult => *other == NO_RESULT,
            Self::Winner(party) => party == other,
            Self::Hung(_) => *other == HUNG_RESULT,
        }
    }
}

/// One area's outcome and the votes behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AreaTally {
    pub outcome: Outcome,
    /// Votes per party.
    pub totals: BTreeMap<String, u64>,
}

impl AreaTally {
    pub fn from_candidates(candidates: &PartyCandidates) -> Self {
        let totals = candidates
            .iter()
            .map(|(party, candidate)| (party.clone(), candidate.votes()))
            .collect();
        Self {
            outcome: Outcome::from_totals(&totals),
            totals,
        }
    }
}

/// Results at one level for every area of the matching kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElectionResults {
    pub level: ElectionLevel,
    pub tallied_at: DateTime<Utc>,
    pub areas: BTreeMap<String, AreaTally>,
}

impl ElectionResults {
    pub fn outcome(&self, area: &str) -> Option<&Outcome> {
        self.areas.get(area).map(|tally| &tally.outcome)
    }

    /// Area name to result string, e.g. `{"AA1": "PP1", "AA3": "HUNG_RESULT"}`.
    pub fn summary(&self) -> BTreeMap<&str, String> {
        self.areas
            .iter()
            .map(|(area, tally)| (area.as_str(), tally.outcome.to_string()))
            .collect()
    }
}

/// Read-only view over the registries that counts results.
#[derive(Debug, Clone, Copy)]
pub struct ResultsTally<'a> {
    areas: &'a AreaRegistry,
    candidates: &'a CandidateRegistry,
}

impl<'a> ResultsTally<'a> {
    pub fn new(areas: &'a AreaRegistry, candidates: &'a CandidateRegistry) -> Self {
        Self { areas, candidates }
    }

    /// Results for every area contested at `level`.
    pub fn results(&self, level: ElectionLevel) -> ElectionResults {
        let kind = level.area_kind();
        let areas = self
            .areas
            .instance_names(kind)
            .into_iter()
            .map(|name| {
                let candidates = self
                    .candidates
                    .candidates_for_area(&AreaId::new(kind, name));
                let tally = AreaTally::from_candidates(&candidates);
                if let Outcome::Hung(parties) = &tally.outcome {
                    info!("Hung {level} vote in {name} between: {}", parties.join(", "));
                }
                (name.to_string(), tally)
            })
            .collect();

        ElectionResults {
            level,
            tallied_at: Utc::now(),
            areas,
        }
    }
}
