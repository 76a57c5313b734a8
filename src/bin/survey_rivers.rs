/// Survey every river in the registry
///
/// Scores all rivers in rivers.toml in parallel (one job per river, each with
/// its own weather lookup and random source) and prints a table sorted by
/// DRI, riskiest first. With --record, each reading is stored in the
/// debris.dri_readings table.
///
/// Usage:
///   cargo run --bin survey_rivers
///   cargo run --bin survey_rivers -- --record
///   cargo run --bin survey_rivers -- --registry other.toml --workers 8

use debris_service::config::{load_registry, ServiceConfig};
use debris_service::db;
use debris_service::ingest::weather::lookup_weather;
use debris_service::logging;
use debris_service::model::{RiverProfile, ScoreReport};
use debris_service::scoring::{score, RandomFactors};
use std::env;
use std::error::Error;
use std::sync::mpsc;
use threadpool::ThreadPool;

const DEFAULT_WORKERS: usize = 4;

struct Options {
    record: bool,
    registry: Option<String>,
    workers: usize,
}

fn parse_args() -> Result<Options, String> {
    let args: Vec<String> = env::args().collect();
    let mut options = Options { record: false, registry: None, workers: DEFAULT_WORKERS };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--record" => {
                options.record = true;
                i += 1;
            }
            "--registry" => {
                options.registry = Some(args.get(i + 1).ok_or("--registry requires a path")?.clone());
                i += 2;
            }
            "--workers" => {
                options.workers = args.get(i + 1)
                    .and_then(|v| v.parse().ok())
                    .filter(|n: &usize| *n > 0)
                    .ok_or("--workers requires a positive number")?;
                i += 2;
            }
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }

    Ok(options)
}

/// Scores every river on a thread pool. Results come back in completion order.
fn survey(rivers: Vec<RiverProfile>, config: &ServiceConfig, workers: usize) -> Vec<ScoreReport> {
    let pool = ThreadPool::new(workers);
    let (tx, rx) = mpsc::channel();
    let http = reqwest::blocking::Client::new();
    let count = rivers.len();

    for river in rivers {
        let tx = tx.clone();
        let http = http.clone();
        let config = config.clone();
        pool.execute(move || {
            let weather = lookup_weather(&http, &config, &river);
            let report = score(&river, weather.as_ref(), &mut RandomFactors::thread_local());
            // Receiver outlives the pool; a send error only means main gave up.
            let _ = tx.send(report);
        });
    }
    drop(tx);

    let reports: Vec<ScoreReport> = rx.iter().take(count).collect();
    pool.join();
    reports
}

fn print_table(reports: &[ScoreReport]) {
    println!("{:<4} {:<24} {:<12} {:>7}  {:<10} {:>12}", "ID", "River", "Land use", "DRI", "Risk", "Debris (kg)");
    println!("{}", "-".repeat(74));
    for r in reports {
        println!(
            "{:<4} {:<24} {:<12} {:>7.2}  {:<10} {:>12.2}",
            r.river_id,
            r.river_name,
            r.land_use,
            r.dri_score,
            r.risk_level.label(),
            r.debris_estimate_kg
        );
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let options = parse_args()?;
    let mut config = ServiceConfig::from_env()?;
    if let Some(path) = options.registry {
        config.registry_path = path;
    }

    println!("🌊 River Debris Survey");
    println!("======================\n");

    let registry = load_registry(&config.registry_path)?;
    let rivers: Vec<RiverProfile> = registry.iter().map(RiverProfile::from).collect();
    println!("📋 {} rivers from {}", rivers.len(), config.registry_path);
    println!("   Weather: {}", if config.weather_api_key.is_some() { "live" } else { "synthetic" });
    println!("   Workers: {}\n", options.workers);

    let mut reports = survey(rivers, &config, options.workers);
    reports.sort_by(|a, b| b.dri_score.total_cmp(&a.dri_score).then(a.river_id.cmp(&b.river_id)));
    print_table(&reports);

    if options.record {
        let url = config.database_url.as_deref().ok_or(db::DbConfigError::MissingDatabaseUrl)?;
        let mut client = db::connect_and_verify(url, db::REQUIRED_SCHEMAS)?;

        println!("\n💾 Recording {} readings...", reports.len());
        let mut stored = 0;
        for report in &reports {
            match db::record_reading(&mut client, report) {
                Ok(_) => stored += 1,
                Err(e) => eprintln!("   ✗ {} - {}", report.river_name, e),
            }
        }
        println!("   ✓ Stored {} readings", stored);
    }

    Ok(())
}

fn main() {
    logging::init();

    if let Err(e) = run() {
        eprintln!("\n❌ Survey failed: {}\n", e);
        std::process::exit(1);
    }
}
