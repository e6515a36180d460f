mod app;
mod color;
mod config;
mod data;
mod report;
mod state;
mod ui;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;

use app::LaunchDashApp;
use config::Cli;
use report::Report;
use state::AppState;

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    let dataset = data::loader::load_file(&cli.data)
        .with_context(|| format!("loading launch records from {}", cli.data.display()))?;

    let site = cli.initial_site();
    let range = cli.initial_range(&dataset)?;

    if cli.report {
        let report = Report::compute(&dataset, &cli.data, &site, range);
        return report::write_json(&report, std::io::stdout().lock());
    }

    let mut state = AppState::new(dataset, cli.data.clone(), cli.step);
    state.select_site(site);
    state.set_range(range.low(), range.high())?;
    run_dashboard(state)
}

fn run_dashboard(state: AppState) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "SpaceX Launch Records Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(LaunchDashApp::new(state)))),
    )
    .map_err(|e| anyhow!("dashboard window failed: {e}"))
}
