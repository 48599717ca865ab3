use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::model::PollingStation;

pub use graph::AreaGraph;
pub use registry::AreaRegistry;

mod graph;
mod registry;

/// The kinds of geographic entity in the register.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AreaKind {
    /// Root of the hierarchy; contested at [`ElectionLevel::President`](crate::model::ElectionLevel).
    Country,
    Administrative,
    /// A root independent of the country, cutting across administrative areas.
    Constituency,
    LocalGovernment,
    /// Terminal node where votes are cast.
    PollingStation,
}

impl AreaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Country => "CountryArea",
            Self::Administrative => "AdministrativeArea",
            Self::Constituency => "Constituency",
            Self::LocalGovernment => "LocalGovernmentArea",
            Self::PollingStation => "PollingStation",
        }
    }

    /// Whether a node of kind `child` may be attached under a node of kind `self`.
    pub fn accepts_child(self, child: AreaKind) -> bool {
        matches!(
            (self, child),
            (Self::Country, Self::Administrative)
                | (Self::Administrative, Self::LocalGovernment)
                | (Self::Constituency, Self::LocalGovernment)
                | (Self::LocalGovernment, Self::PollingStation)
        )
    }
}

impl Display for AreaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identifier of an area. Names are only unique within a kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AreaId {
    pub kind: AreaKind,
    pub name: String,
}

impl AreaId {
    pub fn new(kind: AreaKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    pub fn country(name: impl Into<String>) -> Self {
        Self::new(AreaKind::Country, name)
    }

    pub fn administrative(name: impl Into<String>) -> Self {
        Self::new(AreaKind::Administrative, name)
    }

    pub fn constituency(name: impl Into<String>) -> Self {
        Self::new(AreaKind::Constituency, name)
    }

    pub fn local_government(name: impl Into<String>) -> Self {
        Self::new(AreaKind::LocalGovernment, name)
    }

    pub fn polling_station(name: impl Into<String>) -> Self {
        Self::new(AreaKind::PollingStation, name)
    }
}

impl Display for AreaId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind, self.name)
    }
}

/// A non-terminal area and the names of the children attached beneath it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchicalArea {
    pub name: String,
    pub children: BTreeSet<String>,
}

impl HierarchicalArea {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: BTreeSet::new(),
        }
    }
}

/// A node of the area hierarchy. Parent links are held by the [`AreaGraph`], not the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AreaNode {
    Country(HierarchicalArea),
    Administrative(HierarchicalArea),
    Constituency(HierarchicalArea),
    LocalGovernment(HierarchicalArea),
    PollingStation(PollingStation),
}

impl AreaNode {
    /// Create an empty node of the given kind.
    pub fn new(kind: AreaKind, name: impl Into<String>) -> Self {
        match kind {
            AreaKind::Country => Self::Country(HierarchicalArea::new(name)),
            AreaKind::Administrative => Self::Administrative(HierarchicalArea::new(name)),
            AreaKind::Constituency => Self::Constituency(HierarchicalArea::new(name)),
            AreaKind::LocalGovernment => Self::LocalGovernment(HierarchicalArea::new(name)),
            AreaKind::PollingStation => Self::PollingStation(PollingStation::new(name)),
        }
    }

    pub fn kind(&self) -> AreaKind {
        match self {
            Self::Country(_) => AreaKind::Country,
            Self::Administrative(_) => AreaKind::Administrative,
            Self::Constituency(_) => AreaKind::Constituency,
            Self::LocalGovernment(_) => AreaKind::LocalGovernment,
            Self::PollingStation(_) => AreaKind::PollingStation,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Country(area)
            | Self::Administrative(area)
            | Self::Constituency(area)
            | Self::LocalGovernment(area) => &area.name,
            Self::PollingStation(station) => station.name(),
        }
    }

    pub fn id(&self) -> AreaId {
        AreaId::new(self.kind(), self.name())
    }

    /// Names of attached children; `None` for polling stations.
    pub fn children(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::Country(area)
            | Self::Administrative(area)
            | Self::Constituency(area)
            | Self::LocalGovernment(area) => Some(&area.children),
            Self::PollingStation(_) => None,
        }
    }

    fn children_mut(&mut self) -> Option<&mut BTreeSet<String>> {
        match self {
            Self::Country(area)
            | Self::Administrative(area)
            | Self::Constituency(area)
            | Self::LocalGovernment(area) => Some(&mut area.children),
            Self::PollingStation(_) => None,
        }
    }

    pub fn as_polling_station(&self) -> Option<&PollingStation> {
        match self {
            Self::PollingStation(station) => Some(station),
            _ => None,
        }
    }

    pub fn as_polling_station_mut(&mut self) -> Option<&mut PollingStation> {
        match self {
            Self::PollingStation(station) => Some(station),
            _ => None,
        }
    }
}
