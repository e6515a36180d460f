use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{
    LaunchRecord, COL_BOOSTER_CATEGORY, COL_BOOSTER_VERSION, COL_FLIGHT_NUMBER, COL_LAUNCH_SITE,
    COL_PAYLOAD_MASS,
};
use crate::state::AppState;

const HEADERS: [&str; 6] = [
    COL_FLIGHT_NUMBER,
    COL_LAUNCH_SITE,
    COL_PAYLOAD_MASS,
    "Outcome",
    COL_BOOSTER_VERSION,
    COL_BOOSTER_CATEGORY,
];

// ---------------------------------------------------------------------------
// Record table (bottom panel)
// ---------------------------------------------------------------------------

/// List the launches that pass the current filters.
pub fn record_table(ui: &mut Ui, state: &AppState) {
    let records: Vec<&LaunchRecord> = state.visible_records().collect();
    if records.is_empty() {
        ui.label("No launches match the current filters.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(90.0), HEADERS.len() - 1)
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for title in HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, records.len(), |mut row| {
                let rec = records[row.index()];
                row.col(|ui| {
                    match rec.flight_number {
                        Some(n) => ui.label(n.to_string()),
                        None => ui.label("-"),
                    };
                });
                row.col(|ui| {
                    ui.label(rec.launch_site.as_str());
                });
                row.col(|ui| {
                    ui.label(format!("{:.1}", rec.payload_mass));
                });
                row.col(|ui| {
                    let color = state.outcome_colors.color_for(rec.outcome.label());
                    ui.label(RichText::new(rec.outcome.label()).color(color));
                });
                row.col(|ui| {
                    ui.label(rec.booster_version.as_deref().unwrap_or("-"));
                });
                row.col(|ui| {
                    let color = state.booster_colors.color_for(&rec.booster_category);
                    ui.label(RichText::new(&rec.booster_category).color(color));
                });
            });
        });
}
