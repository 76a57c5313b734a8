/// Tracing subscriber setup shared by the binaries.
///
/// `RUST_LOG` sets the filter (default `info`). `LOG_FORMAT=json` emits one
/// JSON object per line for log shippers; anything else is human-readable.

use tracing_subscriber::EnvFilter;

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").map(|v| v.eq_ignore_ascii_case("json")).unwrap_or(false);

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    // A second init (tests, embedding) keeps the first subscriber.
    if let Err(e) = result {
        eprintln!("logging already initialised: {}", e);
    }
}
