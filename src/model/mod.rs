pub mod area;
pub mod auth;
pub mod ballot;
pub mod candidate;
pub mod level;
pub mod polling_station;
pub mod results;
pub mod session;
pub mod voter;

pub use area::{AreaGraph, AreaId, AreaKind, AreaNode, AreaRegistry};
pub use ballot::{Ballot, LevelCandidates, Metadata, PartyCandidates};
pub use candidate::{Candidate, CandidateRegistry, PoliticalParty};
pub use level::ElectionLevel;
pub use polling_station::PollingStation;
pub use results::{AreaTally, ElectionResults, Outcome, ResultsTally};
pub use session::ElectionSession;
pub use voter::{Voter, VoterId};
