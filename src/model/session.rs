use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::model::{
    AreaGraph, AreaId, AreaKind, AreaNode, AreaRegistry, Ballot, Candidate, CandidateRegistry,
    ElectionLevel, ElectionResults, LevelCandidates, Metadata, ResultsTally, Voter,
};
use crate::Config;

/// One election run: the area hierarchy, the candidates and the votes cast.
///
/// Everything is owned here and passed explicitly; there is no global state, so
/// independent sessions can coexist (e.g. in parallel tests). Mutation requires
/// `&mut self`, which serialises every vote.
#[derive(Debug, Clone)]
pub struct ElectionSession {
    config: Config,
    opened_at: DateTime<Utc>,
    pub(crate) areas: AreaRegistry,
    pub(crate) graph: AreaGraph,
    pub(crate) candidates: CandidateRegistry,
}

impl ElectionSession {
    pub fn new(config: Config) -> Self {
        info!("Opened election session '{}'", config.session_name());
        Self {
            config,
            opened_at: Utc::now(),
            areas: AreaRegistry::new(),
            graph: AreaGraph::new(),
            candidates: CandidateRegistry::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn name(&self) -> &str {
        self.config.session_name()
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    pub fn areas(&self) -> &AreaRegistry {
        &self.areas
    }

    pub fn graph(&self) -> &AreaGraph {
        &self.graph
    }

    pub fn candidates(&self) -> &CandidateRegistry {
        &self.candidates
    }

    /// Create an area, or return the existing one of that kind and name.
    pub fn add_area(&mut self, kind: AreaKind, name: &str) -> &AreaNode {
        self.areas.get_or_create(kind, name)
    }

    /// Attach `child` beneath `parent`. See [`AreaGraph::add_child`].
    pub fn add_child(&mut self, parent: &AreaId, child: &AreaId) -> Result<()> {
        self.graph.add_child(&mut self.areas, parent, child)
    }

    /// Register `candidate` for `party`. See [`CandidateRegistry::register`].
    pub fn register_candidate(&mut self, party: &str, candidate: Candidate) -> Result<()> {
        self.candidates.register(party, candidate, &self.areas)
    }

    /// Candidates visible from an area. See [`AreaGraph::candidates`].
    pub fn area_candidates(&self, area: &AreaId) -> LevelCandidates {
        self.graph.candidates(&self.candidates, area)
    }

    /// Build the ballot for a polling station from the current registrations.
    pub fn ballot(&self, polling_station: &str) -> Result<Ballot> {
        let station = AreaId::polling_station(polling_station);
        if self.areas.get_by_id(&station).is_none() {
            return Err(Error::unknown_area(AreaKind::PollingStation, polling_station));
        }
        let lga = self
            .graph
            .parent(&station, AreaKind::LocalGovernment)
            .ok_or_else(|| {
                warn!("Polling station {polling_station} is not registered to a local government area");
                Error::Detached(polling_station.to_string())
            })?;

        debug!("Built ballot for polling station {polling_station} in {lga}");
        Ok(Ballot::new(
            Metadata::new(lga, polling_station),
            self.area_candidates(&station),
        ))
    }

    /// Rebuild a ballot from its metadata. The station must be listed under the LGA.
    pub fn ballot_from_metadata(&self, metadata: &Metadata) -> Result<Ballot> {
        self.resolve_station(metadata)?;
        self.ballot(&metadata.polling_station)
    }

    /// Results for every area contested at `level`.
    pub fn results(&self, level: ElectionLevel) -> ElectionResults {
        ResultsTally::new(&self.areas, &self.candidates).results(level)
    }

    fn resolve_station(&self, metadata: &Metadata) -> Result<()> {
        let listed = self
            .areas
            .get(AreaKind::LocalGovernment, &metadata.lga)
            .and_then(AreaNode::children)
            .map_or(false, |children| children.contains(&metadata.polling_station));
        if listed {
            Ok(())
        } else {
            Err(Error::UnknownStation {
                lga: metadata.lga.clone(),
                polling_station: metadata.polling_station.clone(),
            })
        }
    }

    /// Vote at the station named by `metadata`, against the candidates snapshotted on a ballot.
    pub(crate) fn vote_at(
        &mut self,
        metadata: &Metadata,
        voter: &Voter,
        ballot: &LevelCandidates,
    ) -> Result<()> {
        self.resolve_station(metadata)?;
        let commit = self.config.vote_commit();
        let station = self
            .areas
            .polling_station_mut(&metadata.polling_station)
            .ok_or_else(|| Error::UnknownStation {
                lga: metadata.lga.clone(),
                polling_station: metadata.polling_station.clone(),
            })?;
        station.vote(voter, ballot, &mut self.candidates, commit)
    }
}
