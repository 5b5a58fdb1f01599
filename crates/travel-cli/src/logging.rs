use tracing::Level;
use tracing_subscriber::FmtSubscriber;

pub const LOG_LEVEL_ENV: &str = "TRAVEL_LOG";

pub fn parse_level(raw: Option<&str>) -> Level {
    raw.map(str::trim)
        .and_then(|value| value.parse().ok())
        .unwrap_or(Level::WARN)
}

/// Installs a stderr subscriber so stdout stays reserved for command output.
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    let level = parse_level(std::env::var(LOG_LEVEL_ENV).ok().as_deref());
    let _ = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}
