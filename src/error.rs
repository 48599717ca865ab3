use thiserror::Error;

use crate::model::{AreaId, AreaKind, ElectionLevel};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Authentication failed, please authenticate with a valid method")]
    Authentication,
    #[error("Voter not registered at this polling station, please use polling station {expected}")]
    WrongStation { expected: String },
    #[error("Voter has already voted in the {level} election")]
    AlreadyVoted { level: ElectionLevel },
    #[error("Party {party} is not on the {level} ballot")]
    NotOnBallot { level: ElectionLevel, party: String },
    #[error("Party {party} already has a candidate registered for {area}")]
    DuplicateRegistration { party: String, area: AreaId },
    #[error("Candidate {candidate} is already registered to party {party}")]
    AlreadyRegistered { candidate: String, party: String },
    #[error("No {kind} named {name}")]
    UnknownArea { kind: AreaKind, name: String },
    #[error("{child} is already attached to {existing}")]
    Conflict { child: AreaId, existing: AreaId },
    #[error("A {child} cannot be attached under a {parent}")]
    InvalidRelation { parent: AreaKind, child: AreaKind },
    #[error("No polling station {polling_station} in local government area {lga}")]
    UnknownStation { lga: String, polling_station: String },
    #[error("Polling station {0} is not attached to a local government area")]
    Detached(String),
    #[error("Bad submission: {0}")]
    BadSubmission(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] figment::Error),
}

impl Error {
    pub fn bad_submission(msg: impl Into<String>) -> Self {
        Self::BadSubmission(msg.into())
    }

    pub fn unknown_area(kind: AreaKind, name: impl Into<String>) -> Self {
        Self::UnknownArea {
            kind,
            name: name.into(),
        }
    }
}
