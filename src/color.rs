use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Outcome;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Hue of the first palette entry; later entries step by the golden angle.
const FIRST_HUE: f32 = 210.0;
const GOLDEN_ANGLE: f32 = 137.507_77;

/// Generates `n` visually distinct colours.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (FIRST_HUE + i as f32 * GOLDEN_ANGLE) % 360.0;
            let rgb: Srgb = Hsl::new(hue, 0.7, 0.5).into_color();
            let rgb: Srgb<u8> = rgb.into_format();
            Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category label → Color32
// ---------------------------------------------------------------------------

/// Maps category labels (sites, booster categories, outcomes) to distinct
/// colours. Built once per dataset so colours stay put while filtering.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    /// Assign palette colours to labels in the order given; duplicates keep
    /// their first colour.
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let mut unique: Vec<&str> = Vec::new();
        for label in labels {
            if !unique.contains(&label) {
                unique.push(label);
            }
        }
        let palette = generate_palette(unique.len());
        let mapping = unique
            .into_iter()
            .zip(palette)
            .map(|(label, c)| (label.to_string(), c))
            .collect();

        ColorMap { mapping }
    }

    /// Fixed red/green for the two outcome labels.
    pub fn outcomes() -> Self {
        let mapping = [
            (Outcome::Failure, Color32::from_rgb(214, 69, 65)),
            (Outcome::Success, Color32::from_rgb(46, 160, 67)),
        ]
        .into_iter()
        .map(|(outcome, c)| (outcome.label().to_string(), c))
        .collect();
        ColorMap { mapping }
    }

    /// Look up the colour for a label; unknown labels are grey.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping.get(label).copied().unwrap_or(Color32::GRAY)
    }
}
