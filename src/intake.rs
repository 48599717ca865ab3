//! Vote submissions arriving from outside the core, in either of the two shapes the
//! counting centre accepts: a JSON record or a comma-delimited `key=value` string.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    auth::NationalInsuranceNumber, Ballot, ElectionLevel, ElectionSession, Metadata, Voter,
};

/// A submission in the JSON record shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub voter_name: String,
    /// National insurance number.
    #[serde(rename = "ID")]
    pub voter_id: String,
    /// Polling station.
    #[serde(rename = "PC")]
    pub polling_station: String,
    #[serde(rename = "LGA")]
    pub lga: String,
    /// Level name (e.g. `"president"`) to party.
    #[serde(default)]
    pub votes: BTreeMap<String, String>,
}

/// A raw submission, before it is turned into a voter and their ballot metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Record(VoteRecord),
    /// e.g. `voter_name=John P, voter_id=123456789, pc=PS1, lga=LGA1, president_vote=PP1`
    Delimited(String),
}

impl FromStr for Submission {
    type Err = Error;

    /// Anything starting with `{` is read as a JSON record.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.starts_with('{') {
            Ok(Self::Record(serde_json::from_str(s)?))
        } else {
            Ok(Self::Delimited(s.to_string()))
        }
    }
}

/// A parsed submission, ready to vote.
#[derive(Debug)]
pub struct VoteRequest {
    pub metadata: Metadata,
    pub voter: Voter,
}

impl VoteRequest {
    /// Rebuild the ballot the voter filled in and cast it.
    /// See [`Ballot::cast_votes`] for the meaning of the returned flag.
    pub fn cast(&self, session: &mut ElectionSession) -> Result<bool> {
        let ballot = Ballot::from_metadata(session, &self.metadata)?;
        ballot.cast_votes(session, &self.voter)
    }
}

impl Submission {
    /// Interpret the submission as a voter at a polling station.
    pub fn into_request(self, session: &ElectionSession) -> Result<VoteRequest> {
        let record = match self {
            Self::Record(record) => record,
            Self::Delimited(line) => parse_delimited(&line)?,
        };

        let votes = record
            .votes
            .iter()
            .map(|(level, party)| Ok((level.parse::<ElectionLevel>()?, party.clone())))
            .collect::<Result<BTreeMap<_, _>>>()?;

        let mut voter = Voter::with_derived_id(
            session.config(),
            record.voter_name,
            record.polling_station.clone(),
            NationalInsuranceNumber::new(record.voter_id),
        );
        voter.set_votes(votes);

        Ok(VoteRequest {
            metadata: Metadata::new(record.lga, record.polling_station),
            voter,
        })
    }
}

/// Parse and cast a single submission line.
pub fn submit(session: &mut ElectionSession, line: &str) -> Result<bool> {
    let request = line.parse::<Submission>()?.into_request(session)?;
    debug!(
        "Received submission from {} at {}",
        request.voter.name(),
        request.metadata.polling_station
    );
    request.cast(session)
}

fn parse_delimited(line: &str) -> Result<VoteRecord> {
    let mut fields = HashMap::new();
    let mut votes = BTreeMap::new();
    for pair in line.split(',').filter(|pair| !pair.trim().is_empty()) {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| Error::bad_submission(format!("expected key=value, got '{}'", pair.trim())))?;
        let (key, value) = (key.trim(), value.trim().to_string());
        if key.ends_with("vote") {
            let level = key.split('_').next().unwrap_or(key);
            votes.insert(level.to_string(), value);
        } else {
            fields.insert(key, value);
        }
    }

    let mut take = |key: &str| {
        fields
            .remove(key)
            .ok_or_else(|| Error::bad_submission(format!("missing field '{key}'")))
    };
    Ok(VoteRecord {
        voter_name: take("voter_name")?,
        voter_id: take("voter_id")?,
        polling_station: take("pc")?,
        lga: take("lga")?,
        votes,
    })
}
