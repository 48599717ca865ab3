use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::AreaKind;

/// The offices contested in an election. Each level is decided per area of exactly one kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElectionLevel {
    President,
    Governor,
    Mayor,
    Mp,
}

impl ElectionLevel {
    pub const ALL: [ElectionLevel; 4] = [Self::President, Self::Governor, Self::Mayor, Self::Mp];

    /// The kind of area a candidate at this level contests.
    pub fn area_kind(self) -> AreaKind {
        match self {
            Self::President => AreaKind::Country,
            Self::Governor => AreaKind::Administrative,
            Self::Mayor => AreaKind::LocalGovernment,
            Self::Mp => AreaKind::Constituency,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::President => "PRESIDENT",
            Self::Governor => "GOVERNOR",
            Self::Mayor => "MAYOR",
            Self::Mp => "MP",
        }
    }
}

impl Display for ElectionLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElectionLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "president" => Ok(Self::President),
            "governor" => Ok(Self::Governor),
            "mayor" => Ok(Self::Mayor),
            "mp" => Ok(Self::Mp),
            other => Err(Error::bad_submission(format!(
                "unknown election level '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_map_to_distinct_kinds() {
        let kinds = ElectionLevel::ALL.map(ElectionLevel::area_kind);
        assert_eq!(
            kinds,
            [
                AreaKind::Country,
                AreaKind::Administrative,
                AreaKind::LocalGovernment,
                AreaKind::Constituency
            ]
        );
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("President".parse::<ElectionLevel>().unwrap(), ElectionLevel::President);
        assert_eq!(" mp ".parse::<ElectionLevel>().unwrap(), ElectionLevel::Mp);
        assert!(matches!(
            "senator".parse::<ElectionLevel>(),
            Err(Error::BadSubmission(_))
        ));
    }
}
