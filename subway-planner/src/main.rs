use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use subway_planner::cache::{CacheConfig, GraphCache};
use subway_planner::domain::StationId;
use subway_planner::fare::FarePolicy;
use subway_planner::graph::WeightMetric;
use subway_planner::planner::PathService;
use subway_planner::topology::load_topology;

const USAGE: &str = "usage: subway-planner <source-id> <target-id> [DISTANCE|DURATION] [age]";

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (source, target) = match (parse_station(args.first()), parse_station(args.get(1))) {
        (Some(source), Some(target)) => (source, target),
        _ => {
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    let metric = match args.get(2).map(|s| s.parse::<WeightMetric>()) {
        None => WeightMetric::Distance,
        Some(Ok(metric)) => metric,
        Some(Err(e)) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };

    let age = match args.get(3).map(|s| s.parse::<u32>()) {
        None => None,
        Some(Ok(age)) => Some(age),
        Some(Err(e)) => {
            eprintln!("invalid age: {e}");
            return ExitCode::from(2);
        }
    };

    // Load topology (fail fast if unavailable)
    let topology_path =
        std::env::var("SUBWAY_TOPOLOGY").unwrap_or_else(|_| "data/topology.json".to_string());
    let store = load_topology(&topology_path).expect("Failed to load topology");

    let fares = match std::env::var("SUBWAY_FARE_POLICY") {
        Ok(path) => {
            let json = std::fs::read_to_string(&path).expect("Failed to read fare policy");
            FarePolicy::from_json(&json).expect("Failed to parse fare policy")
        }
        Err(_) => FarePolicy::default(),
    };

    let cache = GraphCache::new(&CacheConfig::default());
    store.subscribe(Arc::new(cache.clone()));
    let service = PathService::new(store, fares).with_cache(cache);

    match service.find_path(source, target, metric, age) {
        Ok(result) => {
            let json = serde_json::to_string_pretty(&result).expect("PathResult serializes");
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            if e.is_client_error() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn parse_station(arg: Option<&String>) -> Option<StationId> {
    arg.and_then(|s| s.parse::<u64>().ok()).map(StationId::new)
}
