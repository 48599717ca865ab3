#[macro_use]
extern crate log;

#[cfg(test)]
#[macro_use]
extern crate session_test;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::fmt::Display;

use serde::{de, Deserialize, Deserializer, Serialize};

pub mod error;
pub mod intake;
pub mod model;
pub mod seed;

pub use error::{Error, Result};

/// Default location of the configuration file; override with `REGISTER_CONFIG`.
pub const CONFIG_FILE: &str = "Register.toml";

/// Prefix for environment variables overriding configuration fields.
pub const ENV_PREFIX: &str = "REGISTER_";

/// How a single voter's multi-level ballot is committed at a polling station.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteCommit {
    /// Each level is checked and applied in turn. A rejection on a later level
    /// leaves the earlier levels counted.
    #[default]
    PerLevel,
    /// Every level is checked before any vote is applied.
    Atomic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(deserialize_with = "scalar_string")]
    session_name: String,
    vote_commit: VoteCommit,
    #[serde(deserialize_with = "scalar_string")]
    voter_id_secret: String,
}

/// Accept any scalar as a string. Environment values such as `2024` are parsed as
/// numbers before they reach us.
fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct ScalarString;

    impl ScalarString {
        fn display<E: de::Error>(value: impl Display) -> std::result::Result<String, E> {
            Ok(value.to_string())
        }
    }

    impl<'de> de::Visitor<'de> for ScalarString {
        type Value = String;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            f.write_str("a string, number or boolean")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<String, E> {
            Self::display(v)
        }

        fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<String, E> {
            Ok(v)
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<String, E> {
            Self::display(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<String, E> {
            Self::display(v)
        }

        fn visit_i128<E: de::Error>(self, v: i128) -> std::result::Result<String, E> {
            Self::display(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<String, E> {
            Self::display(v)
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> std::result::Result<String, E> {
            Self::display(v)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<String, E> {
            Self::display(v)
        }

        fn visit_char<E: de::Error>(self, v: char) -> std::result::Result<String, E> {
            Self::display(v)
        }
    }

    deserializer.deserialize_any(ScalarString)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session_name: "General Election".to_string(),
            vote_commit: VoteCommit::default(),
            voter_id_secret: "electoral-register".to_string(),
        }
    }
}

impl Config {
    /// The layered configuration sources: built-in defaults, then the TOML file,
    /// then `REGISTER_*` environment variables.
    pub fn figment() -> Figment {
        let path = Env::var_or("REGISTER_CONFIG", CONFIG_FILE);
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Extract the configuration from [`Config::figment`].
    pub fn load() -> Result<Self> {
        Ok(Self::figment().extract()?)
    }

    /// Human-readable name of the election run.
    /// Configured via `SESSION_NAME`.
    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    /// Whether multi-level votes commit per level or all at once.
    /// Configured via `VOTE_COMMIT`.
    pub fn vote_commit(&self) -> VoteCommit {
        self.vote_commit
    }

    /// Key used to derive voter IDs from credentials.
    /// Configured via `VOTER_ID_SECRET`.
    pub fn voter_id_secret(&self) -> &[u8] {
        self.voter_id_secret.as_bytes()
    }

    pub fn with_vote_commit(mut self, vote_commit: VoteCommit) -> Self {
        self.vote_commit = vote_commit;
        self
    }

    pub fn with_voter_id_secret(mut self, secret: impl Into<String>) -> Self {
        self.voter_id_secret = secret.into();
        self
    }

    pub fn with_session_name(mut self, name: impl Into<String>) -> Self {
        self.session_name = name.into();
        self
    }
}
