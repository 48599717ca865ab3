//! A command-line driver for the demonstration register of Gwugwuru.
//! Votes are either read from a file of submissions or simulated, and the results
//! for every level are printed at the end.

use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufRead, BufReader};

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::{error, info, LevelFilter};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use electoral_register::{
    intake,
    model::{auth::NationalInsuranceNumber, ElectionLevel, ElectionResults, ElectionSession, Voter},
    seed, Config,
};

const PROGRAM_NAME: &str = "register-cli";

const ABOUT_TEXT: &str = "Run an election over the demonstration register of Gwugwuru.

EXIT CODES:
     0: Ran successfully.
     1: Error.";

const QUIET: &str = "QUIET";
const JSON: &str = "JSON";
const PATH: &str = "PATH";
const VOTERS: &str = "VOTERS";
const SEED: &str = "SEED";

const CAST: &str = "cast";
const SIMULATE: &str = "simulate";

const PATH_HELP: &str = "A file of submissions, one per line, each either a JSON record\n\
or a delimited string such as `voter_name=John P, voter_id=123456789, pc=PS1, lga=LGA1, president_vote=PP1`";

/// Construct the CLI configuration.
fn cli() -> Command {
    // Make the build dirty when the toml changes.
    include_str!("../Cargo.toml");

    clap::command!(PROGRAM_NAME)
        .about(ABOUT_TEXT)
        .subcommand_required(true)
        .arg(
            Arg::new(QUIET)
                .long("quiet")
                .short('q')
                .help("Silence log output from the register")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new(JSON)
                .long("json")
                .help("Print the results as JSON")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new(CAST)
                .about("Cast every submission in a file")
                .arg(
                    Arg::new(PATH)
                        .help(PATH_HELP)
                        .action(ArgAction::Set)
                        .required(true),
                ),
        )
        .subcommand(
            Command::new(SIMULATE)
                .about("Cast votes from randomly generated voters")
                .arg(
                    Arg::new(VOTERS)
                        .long("voters")
                        .short('n')
                        .help("Number of voters to generate")
                        .value_parser(value_parser!(u32))
                        .default_value("100"),
                )
                .arg(
                    Arg::new(SEED)
                        .long("seed")
                        .help("Seed for the random number generator")
                        .value_parser(value_parser!(u64)),
                ),
        )
}

/// Errors that this program may produce.
#[derive(Debug)]
enum Error {
    /// IO error described by the inner message.
    IO(String),
    /// Failed to set up or seed the register.
    Register(electoral_register::Error),
}

impl From<electoral_register::Error> for Error {
    fn from(err: electoral_register::Error) -> Self {
        Self::Register(err)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IO(msg) => write!(f, "IO error: {msg}"),
            Self::Register(err) => write!(f, "{err}"),
        }
    }
}

/// Counts of submissions accepted and rejected.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
struct Turnout {
    pub accepted: u32,
    pub rejected: u32,
}

impl Turnout {
    fn record(&mut self, outcome: electoral_register::Result<bool>) {
        match outcome {
            Ok(true) => self.accepted += 1,
            Ok(false) => self.rejected += 1,
            Err(err) => {
                info!("Submission rejected: {err}");
                self.rejected += 1;
            }
        }
    }
}

impl Display for Turnout {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} submission{} accepted, {} rejected",
            self.accepted,
            if self.accepted != 1 { "s" } else { "" },
            self.rejected
        )
    }
}

/// Create a session over the demonstration register.
fn open_session(config: Config) -> Result<(ElectionSession, Vec<String>), Error> {
    let mut session = ElectionSession::new(config);
    let stations = seed::gwugwuru(&mut session)?;
    seed::candidates(&mut session)?;
    Ok((session, stations))
}

/// Cast every non-blank line of the file at `path`.
fn cast_file(session: &mut ElectionSession, path: &str) -> Result<Turnout, Error> {
    let file = File::open(path).map_err(|err| Error::IO(err.to_string()))?;
    let mut turnout = Turnout::default();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|err| Error::IO(err.to_string()))?;
        if line.trim().is_empty() {
            continue;
        }
        turnout.record(intake::submit(session, &line));
    }
    Ok(turnout)
}

/// Generate `voters` authenticated voters at random stations, each choosing a random
/// party at every level their ballot offers.
fn simulate(
    session: &mut ElectionSession,
    stations: &[String],
    voters: u32,
    rng: &mut impl Rng,
) -> Result<Turnout, Error> {
    let mut turnout = Turnout::default();
    for i in 0..voters {
        let Some(station) = stations.choose(rng) else {
            break;
        };
        let ballot = session.ballot(station)?;

        let mut voter = Voter::with_derived_id(
            session.config(),
            format!("Voter {i}"),
            station.clone(),
            NationalInsuranceNumber::new(format!("{i:09}")),
        );
        for level in ElectionLevel::ALL {
            let parties = ballot.candidates().for_level(level).keys().collect::<Vec<_>>();
            if let Some(party) = parties.choose(rng) {
                voter.vote_for(level, party.as_str());
            }
        }
        turnout.record(ballot.cast_votes(session, &voter));
    }
    Ok(turnout)
}

fn print_results(results: &[ElectionResults], json: bool) -> Result<(), Error> {
    if json {
        let out = serde_json::to_string_pretty(results).map_err(|err| Error::IO(err.to_string()))?;
        println!("{out}");
        return Ok(());
    }
    for level_results in results {
        println!("{} results:", level_results.level);
        for (area, outcome) in level_results.summary() {
            println!("  {area}: {outcome}");
        }
    }
    Ok(())
}

/// Run the chosen subcommand and print the results.
fn execute(args: &ArgMatches) -> Result<Turnout, Error> {
    let config = Config::load()?;
    let (mut session, stations) = open_session(config)?;

    let turnout = match args.subcommand() {
        Some((CAST, sub_args)) => {
            let path: &String = sub_args.get_one(PATH).unwrap(); // Required argument is guaranteed to be present.
            cast_file(&mut session, path)?
        }
        Some((SIMULATE, sub_args)) => {
            let voters = *sub_args.get_one::<u32>(VOTERS).unwrap(); // Has a default.
            let mut rng = match sub_args.get_one::<u64>(SEED) {
                Some(&seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            simulate(&mut session, &stations, voters, &mut rng)?
        }
        _ => unreachable!("subcommand is required"),
    };

    let results = ElectionLevel::ALL.map(|level| session.results(level));
    print_results(&results, args.get_flag(JSON))?;
    Ok(turnout)
}

/// Run the program, report the outcome, and return the exit code.
fn run(args: &ArgMatches) -> u8 {
    if args.get_flag(QUIET) {
        log4rs_dynamic_filters::DynamicLevelFilter::set("electoral_register", LevelFilter::Off);
    }
    match execute(args) {
        Ok(turnout) => {
            println!("{turnout}.");
            0
        }
        Err(err) => {
            error!("{err}");
            println!("{err}");
            1
        }
    }
}

fn main() {
    if let Err(err) =
        log4rs::init_file("log4rs.yaml", log4rs_dynamic_filters::default_deserializers())
    {
        eprintln!("Failed to initialise logging: {err}");
    }

    let args = cli().get_matches();
    let exit_code = run(&args);
    std::process::exit(exit_code.into())
}

#[cfg(test)]
mod tests {
    use electoral_register::model::{AreaId, Outcome};

    use super::*;

    fn init_logging() {
        // These tests enter library code, so enable logging.
        log4rs_test_utils::test_logging::init_logging_once_for(
            ["electoral_register", "register_cli"],
            None,
            None,
        );
    }

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn cast_demo_submissions() {
        init_logging();
        let (mut session, _) = open_session(Config::default()).unwrap();
        let turnout = cast_file(&mut session, "demos/submissions.txt").unwrap();
        assert_eq!(
            turnout,
            Turnout {
                accepted: 4,
                rejected: 2
            }
        );

        let president = session.results(ElectionLevel::President);
        assert_eq!(president.outcome(seed::COUNTRY), Some(&Outcome::Winner("PP1".into())));
        let mp = session.results(ElectionLevel::Mp);
        assert_eq!(mp.outcome("CS2").unwrap(), &"PP1");
        assert_eq!(mp.outcome("CS1").unwrap(), &"NO_RESULT");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let (mut session, _) = open_session(Config::default()).unwrap();
        assert!(matches!(
            cast_file(&mut session, "demos/does-not-exist.txt"),
            Err(Error::IO(_))
        ));
    }

    #[test]
    fn simulation_is_reproducible() {
        init_logging();
        let run_once = || {
            let (mut session, stations) = open_session(Config::default()).unwrap();
            let mut rng = StdRng::seed_from_u64(7);
            let turnout = simulate(&mut session, &stations, 50, &mut rng).unwrap();
            let votes = ["PP1", "PP2"].map(|party| {
                session
                    .candidates()
                    .candidate(party, &AreaId::country(seed::COUNTRY))
                    .map_or(0, |c| c.votes())
            });
            (turnout, votes)
        };

        let (turnout, votes) = run_once();
        // Every generated voter is distinct, authenticated and at their own station.
        assert_eq!(
            turnout,
            Turnout {
                accepted: 50,
                rejected: 0
            }
        );
        assert_eq!(votes[0] + votes[1], 50);
        assert_eq!(run_once(), (turnout, votes));
    }
}
