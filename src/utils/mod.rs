pub mod app_paths;
pub mod config;
pub mod logging;
pub mod metrics;
