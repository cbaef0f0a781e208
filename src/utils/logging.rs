use tracing_subscriber::filter::LevelFilter;

/// Installs a stdout subscriber that also receives `log` records.
/// Does nothing when a global subscriber already exists.
pub fn install_logger() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::INFO)
        .with_target(false)
        .try_init();
}
