//! Voter authentication strategies. The register only ever sees the boolean outcome.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

/// Digits on a voter ID card.
pub const VOTER_ID_CARD_LENGTH: usize = 13;

/// Characters in a national insurance number.
pub const NI_NUMBER_LENGTH: usize = 9;

/// A way for a voter to prove who they are.
pub trait Authenticator: Debug {
    /// Does the presented credential pass?
    fn authenticate(&self) -> bool;

    /// The raw credential, used to derive a stable voter ID.
    fn credential(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterIdCard {
    number: String,
}

impl VoterIdCard {
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
        }
    }
}

impl Authenticator for VoterIdCard {
    fn authenticate(&self) -> bool {
        let valid = self.number.len() == VOTER_ID_CARD_LENGTH
            && self.number.bytes().all(|b| b.is_ascii_digit());
        if valid {
            debug!("Voter ID card authentication succeeded");
        } else {
            warn!("Voter ID card authentication failed");
        }
        valid
    }

    fn credential(&self) -> &str {
        &self.number
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NationalInsuranceNumber {
    number: String,
}

impl NationalInsuranceNumber {
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
        }
    }
}

impl Authenticator for NationalInsuranceNumber {
    fn authenticate(&self) -> bool {
        // Counted in characters, not bytes.
        let valid = self.number.chars().count() == NI_NUMBER_LENGTH;
        if valid {
            debug!("National insurance number authentication succeeded");
        } else {
            warn!("National insurance number authentication failed");
        }
        valid
    }

    fn credential(&self) -> &str {
        &self.number
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voter_id_card_needs_thirteen_digits() {
        assert!(VoterIdCard::example().authenticate());
        assert!(!VoterIdCard::new("123456789012").authenticate());
        assert!(!VoterIdCard::new("12345678901234").authenticate());
        assert!(!VoterIdCard::new("12345678901a3").authenticate());
    }

    #[test]
    fn ni_number_needs_nine_characters() {
        assert!(NationalInsuranceNumber::example().authenticate());
        assert!(NationalInsuranceNumber::new("QQ123456C").authenticate());
        assert!(!NationalInsuranceNumber::new("1234567910000").authenticate());
        assert!(!NationalInsuranceNumber::new("").authenticate());
    }
}
