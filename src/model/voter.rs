use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use data_encoding::HEXLOWER;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::model::{auth::Authenticator, ElectionLevel};
use crate::Config;

pub type HmacSha256 = Hmac<Sha256>;

/// Stable voter identity, recorded by polling stations once a vote is counted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoterId(String);

impl VoterId {
    /// Use a caller-supplied ID as is.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive an ID as the hex HMAC of the voter's name and credential,
    /// so the same person presenting the same credential always gets the same ID.
    pub fn from_credentials(config: &Config, name: &str, credential: &str) -> Self {
        let mut hmac = HmacSha256::new_from_slice(config.voter_id_secret())
            .expect("HMAC can take key of any size");
        hmac.update(name.as_bytes());
        hmac.update(&[0]);
        hmac.update(credential.as_bytes());
        Self(HEXLOWER.encode(&hmac.finalize().into_bytes()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for VoterId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A voter presenting themselves at a polling station, with their choices.
#[derive(Debug)]
pub struct Voter {
    id: VoterId,
    name: String,
    polling_station_name: String,
    authenticator: Box<dyn Authenticator>,
    votes: BTreeMap<ElectionLevel, String>,
}

impl Voter {
    pub fn new(
        id: VoterId,
        name: impl Into<String>,
        polling_station_name: impl Into<String>,
        authenticator: impl Authenticator + 'static,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            polling_station_name: polling_station_name.into(),
            authenticator: Box::new(authenticator),
            votes: BTreeMap::new(),
        }
    }

    /// Create a voter whose ID is derived from their name and credential.
    pub fn with_derived_id(
        config: &Config,
        name: impl Into<String>,
        polling_station_name: impl Into<String>,
        authenticator: impl Authenticator + 'static,
    ) -> Self {
        let name = name.into();
        let id = VoterId::from_credentials(config, &name, authenticator.credential());
        Self::new(id, name, polling_station_name, authenticator)
    }

    /// Choose `party` at `level`, replacing any earlier choice at that level.
    pub fn vote_for(&mut self, level: ElectionLevel, party: impl Into<String>) -> &mut Self {
        self.votes.insert(level, party.into());
        self
    }

    pub fn set_votes(&mut self, votes: BTreeMap<ElectionLevel, String>) {
        self.votes = votes;
    }

    pub fn authenticate(&self) -> bool {
        self.authenticator.authenticate()
    }

    pub fn id(&self) -> &VoterId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn polling_station_name(&self) -> &str {
        &self.polling_station_name
    }

    /// Chosen party per level, in level order.
    pub fn votes(&self) -> &BTreeMap<ElectionLevel, String> {
        &self.votes
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::auth::NationalInsuranceNumber;

    #[test]
    fn derived_ids_are_stable_and_distinct() {
        let config = Config::default();
        let a = VoterId::from_credentials(&config, "John Doe", "123456789");
        let b = VoterId::from_credentials(&config, "John Doe", "123456789");
        let c = VoterId::from_credentials(&config, "John B", "123456789");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_str().len(), 64);

        let other_secret = Config::default().with_voter_id_secret("another");
        assert_ne!(a, VoterId::from_credentials(&other_secret, "John Doe", "123456789"));
    }

    #[test]
    fn later_choice_replaces_earlier() {
        let mut voter = Voter::with_derived_id(
            &Config::default(),
            "John Doe",
            "PS1",
            NationalInsuranceNumber::example(),
        );
        voter
            .vote_for(ElectionLevel::President, "PP1")
            .vote_for(ElectionLevel::President, "PP2")
            .vote_for(ElectionLevel::Mp, "PP1");
        assert_eq!(voter.votes().len(), 2);
        assert_eq!(voter.votes()[&ElectionLevel::President], "PP2");
        assert!(voter.authenticate());
    }
}
