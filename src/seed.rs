//! The demonstration register for the Republic of Gwugwuru.

use crate::error::Result;
use crate::model::{AreaId, Candidate, ElectionLevel, ElectionSession, PoliticalParty};

pub const COUNTRY: &str = "Gwugwuru";

/// Build the Gwugwuru area hierarchy, returning the names of its polling stations.
pub fn gwugwuru(session: &mut ElectionSession) -> Result<Vec<String>> {
    let country = AreaId::country(COUNTRY);
    for i in 0..5 {
        session.add_child(&country, &AreaId::administrative(format!("AA{i}")))?;
    }

    for (administrative, constituency, lgas) in [("AA1", "CS1", 0..5), ("AA2", "CS2", 5..10)] {
        let administrative = AreaId::administrative(administrative);
        let constituency = AreaId::constituency(constituency);
        for i in lgas {
            let lga = AreaId::local_government(format!("LGA{i}"));
            session.add_child(&administrative, &lga)?;
            session.add_child(&constituency, &lga)?;
        }
    }

    let mut stations = Vec::new();
    for (lga, range) in [("LGA1", 0..5), ("LGA5", 5..10)] {
        let lga = AreaId::local_government(lga);
        for i in range {
            let name = format!("PS{i}");
            session.add_child(&lga, &AreaId::polling_station(name.clone()))?;
            stations.push(name);
        }
    }

    info!("Seeded {COUNTRY} with {} polling stations", stations.len());
    Ok(stations)
}

/// Register the demonstration candidates of parties PP1 and PP2.
pub fn candidates(session: &mut ElectionSession) -> Result<()> {
    let pp1 = PoliticalParty::new(session, "PP1");
    pp1.register(session, Candidate::new(ElectionLevel::President, COUNTRY, "John Doe"))?;
    pp1.register(session, Candidate::new(ElectionLevel::Mp, "CS2", "James B"))?;

    let pp2 = PoliticalParty::new(session, "PP2");
    pp2.register(session, Candidate::new(ElectionLevel::President, COUNTRY, "Tim D"))?;
    Ok(())
}
