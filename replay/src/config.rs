use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TICK_MS: u64 = 600;

/// Scenario file to replay. Required.
pub fn scenario_path() -> Option<PathBuf> {
    path_var("CLANSORT_SCENARIO")
}

/// Where sort settings persist between runs. Unset keeps them in memory.
pub fn settings_path() -> Option<PathBuf> {
    path_var("CLANSORT_SETTINGS")
}

pub fn tick_interval() -> Duration {
    std::env::var("CLANSORT_TICK_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .map(Duration::from_millis)
        .unwrap_or_else(|| Duration::from_millis(DEFAULT_TICK_MS))
}

/// Hard stop for the replay. Unset runs until the script has settled.
pub fn max_ticks() -> Option<u64> {
    std::env::var("CLANSORT_MAX_TICKS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
}

fn path_var(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
