//! Batch driver: build a tournament, import roster and known results, propagate, print standings.
//! Run with: cargo run --bin simulate -- [config.json] roster.csv [results.csv]
//! Paths fall back to env: TOURNAMENT_CONFIG, TOURNAMENT_ROSTER, TOURNAMENT_RESULTS.
//! Without a config the default four-stage major layout is used.
//! Set TOURNAMENT_JSON=1 to print the resolved snapshot as JSON instead.

use std::path::PathBuf;
use swiss_playoff_engine::config::env_path;
use swiss_playoff_engine::import::{load_results, load_roster};
use swiss_playoff_engine::{
    propagate, standings, ResultsByStage, Stage, TournamentConfig, TournamentError,
};

struct Paths {
    config: Option<PathBuf>,
    roster: PathBuf,
    results: Option<PathBuf>,
}

fn resolve_paths(args: &[String]) -> Result<Paths, TournamentError> {
    let mut args = args.iter().map(PathBuf::from);
    let (config, roster, results) = match args.len() {
        0 => (None, None, None),
        1 => (None, args.next(), None),
        2 => {
            let first = args.next();
            let second = args.next();
            // config.json roster.csv  or  roster.csv results.csv
            if first.as_ref().is_some_and(|p| p.extension().is_some_and(|e| e == "json")) {
                (first, second, None)
            } else {
                (None, first, second)
            }
        }
        _ => (args.next(), args.next(), args.next()),
    };
    let roster = roster
        .or_else(|| env_path("TOURNAMENT_ROSTER"))
        .ok_or_else(|| {
            TournamentError::InvalidConfig(
                "no roster given (argument or TOURNAMENT_ROSTER)".to_string(),
            )
        })?;
    Ok(Paths {
        config: config.or_else(|| env_path("TOURNAMENT_CONFIG")),
        roster,
        results: results.or_else(|| env_path("TOURNAMENT_RESULTS")),
    })
}

fn print_stage(stage: &Stage) {
    println!("== {} ({:?}) ==", stage.name, stage.progress());
    for (rank, s) in standings(stage).iter().enumerate() {
        println!(
            "{:>3}. {:<24} #{:<3} {:>5}  buchholz {:>3}  {:?}",
            rank + 1,
            s.name,
            s.seed,
            s.record.to_string(),
            s.buchholz,
            s.status
        );
    }
    for w in &stage.warnings {
        println!("  warning: {:?}", w);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args: Vec<String> = std::env::args().skip(1).collect();
    let paths = resolve_paths(&args)?;

    let config = match &paths.config {
        Some(path) => TournamentConfig::load(path)?,
        None => TournamentConfig::major("Major"),
    };
    let mut tournament = config.build()?;
    load_roster(&paths.roster, &mut tournament)?;
    let results = match &paths.results {
        Some(path) => load_results(path)?,
        None => ResultsByStage::new(),
    };
    log::info!(
        "Loaded {} stage(s), {} known result(s)",
        tournament.stages.len(),
        results.values().map(|r| r.len()).sum::<usize>()
    );

    let report = propagate(&mut tournament, &results)?;

    if env_path("TOURNAMENT_JSON").is_some() {
        println!("{}", serde_json::to_string_pretty(&tournament)?);
        return Ok(());
    }
    for stage in &tournament.stages {
        print_stage(stage);
        println!();
    }
    match tournament.champion() {
        Some(c) => println!("Champion: {}", c.name),
        None => println!("Champion: TBD"),
    }
    log::info!("{} stage(s) resolved", report.stages.len());
    Ok(())
}
