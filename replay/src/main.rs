mod config;
mod driver;
mod scenario;

use clansort_plugin::{JsonFileConfigStore, MemoryConfigStore};
use clansort_shared::remove_tags;
use tracing_subscriber::EnvFilter;

use crate::driver::{ReplayOptions, ReplayReport};
use crate::scenario::Scenario;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let Some(scenario_path) = config::scenario_path() else {
        tracing::error!("CLANSORT_SCENARIO is required to run clansort-replay");
        return;
    };
    let scenario = match Scenario::load(&scenario_path) {
        Ok(scenario) => scenario,
        Err(e) => {
            tracing::error!(error = %e, "failed to load scenario");
            return;
        }
    };

    let options = ReplayOptions {
        tick: config::tick_interval(),
        max_ticks: config::max_ticks(),
    };

    let report = match config::settings_path() {
        Some(path) => {
            tracing::info!(path = %path.display(), "persisting sort settings");
            driver::run(&scenario, JsonFileConfigStore::new(path), options).await
        }
        None => driver::run(&scenario, MemoryConfigStore::new(scenario.settings), options).await,
    };

    tracing::info!(
        ticks = report.ticks,
        rescans = report.rescans,
        "replay finished"
    );
    print_order(&report);
}

fn print_order(report: &ReplayReport) {
    for (idx, name) in report.order.iter().enumerate() {
        println!("{:>3}. {}", idx + 1, remove_tags(name));
    }
}
