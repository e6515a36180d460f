use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Legend, MarkerShape, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

use crate::data::aggregate::PieResult;
use crate::report::{pie_title, scatter_title};
use crate::state::AppState;

/// Arc resolution of a full circle.
const PIE_SEGMENTS: usize = 96;

// ---------------------------------------------------------------------------
// Pie geometry
// ---------------------------------------------------------------------------

/// Angular extent of one slice in radians, measured clockwise from 12 o'clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wedge {
    pub start: f64,
    pub end: f64,
}

impl Wedge {
    pub fn sweep(&self) -> f64 {
        self.end - self.start
    }

    pub fn mid(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    /// Closed outline of the slice on the unit circle: centre, then the arc.
    pub fn outline(&self) -> Vec<[f64; 2]> {
        let steps = ((self.sweep() / TAU) * PIE_SEGMENTS as f64).ceil().max(1.0) as usize;
        let mut points = Vec::with_capacity(steps + 2);
        points.push([0.0, 0.0]);
        for i in 0..=steps {
            let angle = self.start + self.sweep() * i as f64 / steps as f64;
            points.push(polar(angle, 1.0));
        }
        points
    }
}

/// Position at `angle` (clockwise from 12 o'clock) and distance `radius`.
fn polar(angle: f64, radius: f64) -> [f64; 2] {
    let theta = FRAC_PI_2 - angle;
    [radius * theta.cos(), radius * theta.sin()]
}

/// Split the circle proportionally to `counts`. Zero total gives no wedges.
pub fn pie_wedges(counts: &[usize]) -> Vec<Wedge> {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return Vec::new();
    }
    let mut start = 0.0;
    counts
        .iter()
        .map(|&n| {
            let end = start + TAU * n as f64 / total as f64;
            let wedge = Wedge { start, end };
            start = end;
            wedge
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Pie chart
// ---------------------------------------------------------------------------

pub fn pie_chart(ui: &mut Ui, state: &AppState, height: f32) {
    ui.heading(pie_title(&state.selection));

    if state.pie.is_empty() {
        ui.label("No launches match the current filters.");
        return;
    }

    let colors = match state.pie {
        PieResult::SuccessesBySite(_) => &state.site_colors,
        PieResult::OutcomesAtSite(_) => &state.outcome_colors,
    };
    let slices = state.pie.slices();
    let counts: Vec<usize> = slices.iter().map(|(_, n)| *n).collect();
    let total = state.pie.total() as f64;

    Plot::new("success_pie_chart")
        .height(height)
        .legend(Legend::default())
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            for ((label, count), wedge) in slices.iter().zip(pie_wedges(&counts)) {
                let color = colors.color_for(label);
                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(wedge.outline()))
                        .name(label)
                        .fill_color(color)
                        .stroke(Stroke::new(1.0, Color32::WHITE)),
                );

                let [x, y] = polar(wedge.mid(), 0.65);
                let percent = 100.0 * *count as f64 / total;
                plot_ui.text(Text::new(
                    PlotPoint::new(x, y),
                    RichText::new(format!("{percent:.1}%")).color(Color32::BLACK),
                ));
            }
        });
}

// ---------------------------------------------------------------------------
// Scatter chart
// ---------------------------------------------------------------------------

pub fn scatter_chart(ui: &mut Ui, state: &AppState, height: f32) {
    ui.heading(scatter_title(&state.selection));

    Plot::new("success_payload_scatter_chart")
        .height(height)
        .legend(Legend::default())
        .x_axis_label("Payload Mass (kg)")
        .y_axis_label("Launch Outcome (0 = Failure, 1 = Success)")
        .include_x(state.range.low())
        .include_x(state.range.high())
        .include_y(-0.25)
        .include_y(1.25)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            // One series per booster category so the legend lists them.
            for category in state.dataset.booster_categories() {
                let points: Vec<[f64; 2]> = state
                    .scatter
                    .iter()
                    .filter(|p| &p.booster_category == category)
                    .map(|p| [p.payload_mass, f64::from(p.outcome.class())])
                    .collect();
                if points.is_empty() {
                    continue;
                }
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .name(category)
                        .color(state.booster_colors.color_for(category))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(4.0),
                );
            }
        });
}
