//! River Debris Risk Service - Main Server
//!
//! Scores monitored rivers with the Debris Risk Index (DRI) on demand:
//! 1. Loads the river registry (rivers.toml) and optional PostgreSQL history store
//! 2. Fetches live rainfall and wind from WeatherAPI.com when a key is set
//! 3. Serves scores, history and CSV exports over HTTP
//! 4. Raises watchlist alerts for High and Critical scores
//!
//! Usage:
//!   cargo run --release                     # HTTP endpoint on port 5000
//!   cargo run --release -- --endpoint 8080  # HTTP endpoint on port 8080
//!   cargo run --release -- --score 1        # Score river 1 once, print JSON
//!
//! Environment:
//!   DATABASE_URL     - PostgreSQL connection string (optional)
//!   WEATHER_API_KEY  - WeatherAPI.com key (optional)
//!   RIVER_REGISTRY   - path to rivers.toml
//!   RUST_LOG, LOG_FORMAT=json - logging

use debris_service::config::{ServiceConfig, DEFAULT_ENDPOINT_PORT};
use debris_service::endpoint;
use debris_service::logging;
use debris_service::service::DriService;
use std::env;

enum Mode {
    Serve(u16),
    Score(i32),
}

fn parse_args(args: &[String]) -> Result<Mode, String> {
    let mut mode = Mode::Serve(DEFAULT_ENDPOINT_PORT);

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--endpoint" => {
                let port = args.get(i + 1)
                    .and_then(|v| v.parse().ok())
                    .ok_or("--endpoint requires a port number")?;
                mode = Mode::Serve(port);
                i += 2;
            }
            "--score" => {
                let id = args.get(i + 1)
                    .and_then(|v| v.parse().ok())
                    .ok_or("--score requires a river id")?;
                mode = Mode::Score(id);
                i += 2;
            }
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }

    Ok(mode)
}

fn main() {
    logging::init();

    let args: Vec<String> = env::args().collect();
    let mode = match parse_args(&args) {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Usage: {} [--endpoint PORT | --score RIVER_ID]", args[0]);
            std::process::exit(1);
        }
    };

    let config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("\n❌ Configuration error: {}\n", e);
            std::process::exit(1);
        }
    };

    let mut service = DriService::new(config);

    match mode {
        Mode::Score(river_id) => {
            if let Err(e) = service.initialize() {
                eprintln!("\n❌ Initialization failed: {}\n", e);
                std::process::exit(1);
            }
            match service.assess(river_id) {
                Ok(report) => match serde_json::to_string_pretty(&report) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("❌ Failed to render report: {}", e);
                        std::process::exit(1);
                    }
                },
                Err(e) => {
                    eprintln!("❌ {}", e);
                    std::process::exit(1);
                }
            }
        }
        Mode::Serve(port) => {
            println!("🌊 River Debris Risk Service");
            println!("============================\n");

            println!("📊 Initializing service...");
            if let Err(e) = service.initialize() {
                eprintln!("\n❌ Initialization failed: {}\n", e);
                std::process::exit(1);
            }
            println!("✓ Service initialized");
            println!("   Database: {}", if service.has_database() { "connected" } else { "not configured (no history)" });
            println!("   Weather:  {}\n", if service.config().weather_api_key.is_some() { "live" } else { "synthetic" });

            println!("🚀 Starting HTTP endpoint server...");
            if let Err(e) = endpoint::start_endpoint_server(port, service) {
                eprintln!("❌ Endpoint server error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
