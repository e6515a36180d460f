use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::filter::{SiteSelection, ALL_SITES};
use crate::report;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel: site dropdown and payload range.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    // Clone what we need so we can mutate state inside the closures.
    let sites = state.dataset.sites().to_vec();
    let (min, max) = (state.dataset.min_payload(), state.dataset.max_payload());

    // ---- Launch site dropdown ----
    ui.strong("Launch Site");
    let mut selected = state.selection.clone();
    let selected_text = match &selected {
        SiteSelection::All => "All Sites".to_string(),
        SiteSelection::Site(site) => site.clone(),
    };
    egui::ComboBox::from_id_salt("site_dropdown")
        .selected_text(selected_text)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(&mut selected, SiteSelection::All, "All Sites");
            for site in &sites {
                ui.selectable_value(&mut selected, SiteSelection::parse(site), site.as_str());
            }
        });
    state.select_site(selected);

    ui.add_space(8.0);
    ui.separator();

    // ---- Payload range ----
    ui.strong("Payload range (kg)");
    let mut low = state.range.low();
    let mut high = state.range.high();

    let low_changed = ui
        .add(
            egui::Slider::new(&mut low, min..=max)
                .step_by(state.slider_step)
                .text("min"),
        )
        .changed();
    let high_changed = ui
        .add(
            egui::Slider::new(&mut high, min..=max)
                .step_by(state.slider_step)
                .text("max"),
        )
        .changed();

    // Dragging one handle past the other pushes it along.
    if low_changed && low > high {
        high = low;
    }
    if high_changed && high < low {
        low = high;
    }

    ui.horizontal(|ui: &mut Ui| {
        ui.small(format!("{min:.0}"));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
            ui.small(format!("{max:.0}"));
        });
    });

    if ui.small_button("Full range").clicked() {
        low = min;
        high = max;
    }

    if let Err(e) = state.set_range(low, high) {
        log::warn!("{e}");
        state.status_message = Some(e.to_string());
    }

    ui.add_space(8.0);
    ui.separator();

    // ---- Booster colour legend ----
    ui.strong("Booster Version Category");
    for category in state.dataset.booster_categories() {
        let color = state.booster_colors.color_for(category);
        ui.label(RichText::new(format!("● {category}")).color(color));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Export report…").clicked() {
                export_report_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} launches loaded, {} visible",
            state.dataset.len(),
            state.visible_indices.len()
        ));

        if state.selection.as_str() != ALL_SITES {
            ui.separator();
            ui.label(format!("site: {}", state.selection));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open launch records")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => state.set_dataset(dataset, &path),
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

pub fn export_report_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export report")
        .add_filter("JSON", &["json"])
        .set_file_name("launch_report.json")
        .save_file();

    if let Some(path) = file {
        match write_report(state, &path) {
            Ok(()) => {
                log::info!("Exported report to {}", path.display());
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to export report: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

fn write_report(state: &AppState, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    report::write_json(&state.report(), &mut out)?;
    out.flush().with_context(|| format!("writing {}", path.display()))
}
