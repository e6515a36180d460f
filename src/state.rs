use std::path::{Path, PathBuf};

use crate::color::ColorMap;
use crate::data::aggregate::{aggregate_for_pie, aggregate_for_scatter, PieResult, ScatterPoint};
use crate::data::filter::{filtered_indices, InvalidRangeError, PayloadRange, SiteSelection};
use crate::data::model::{LaunchDataset, LaunchRecord};
use crate::report::Report;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset; replaced wholesale when another file is opened.
    pub dataset: LaunchDataset,

    /// File the dataset was read from.
    pub source: PathBuf,

    pub selection: SiteSelection,
    pub range: PayloadRange,

    /// Slider increment in kg.
    pub slider_step: f64,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    pub pie: PieResult,
    pub scatter: Vec<ScatterPoint>,

    pub site_colors: ColorMap,
    pub booster_colors: ColorMap,
    pub outcome_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Start with every site selected and the full payload extent.
    pub fn new(dataset: LaunchDataset, source: PathBuf, slider_step: f64) -> Self {
        let mut state = Self {
            range: PayloadRange::full(&dataset),
            site_colors: site_colors(&dataset),
            booster_colors: booster_colors(&dataset),
            outcome_colors: ColorMap::outcomes(),
            dataset,
            source,
            selection: SiteSelection::All,
            slider_step,
            visible_indices: Vec::new(),
            pie: PieResult::SuccessesBySite(Default::default()),
            scatter: Vec::new(),
            status_message: None,
        };
        state.recompute();
        state
    }

    /// Ingest a newly loaded dataset and reset the filters to their defaults.
    pub fn set_dataset(&mut self, dataset: LaunchDataset, source: &Path) {
        self.range = PayloadRange::full(&dataset);
        self.selection = SiteSelection::All;
        self.site_colors = site_colors(&dataset);
        self.booster_colors = booster_colors(&dataset);
        self.dataset = dataset;
        self.source = source.to_path_buf();
        self.status_message = None;
        self.recompute();
    }

    pub fn select_site(&mut self, selection: SiteSelection) {
        if self.selection != selection {
            self.selection = selection;
            self.recompute();
        }
    }

    /// Apply a new payload range, clamped to the dataset extent. Slider
    /// step rounding can land a handle past either end.
    /// On error the previous range stays active.
    pub fn set_range(&mut self, low: f64, high: f64) -> Result<(), InvalidRangeError> {
        let (min, max) = (self.dataset.min_payload(), self.dataset.max_payload());
        let range = PayloadRange::new(low.clamp(min, max), high.clamp(min, max))?;
        if range != self.range {
            self.range = range;
            self.recompute();
        }
        Ok(())
    }

    /// Re-run filter and aggregation for the current selection and range.
    pub fn recompute(&mut self) {
        let records = self.dataset.records();
        self.visible_indices = filtered_indices(records, &self.selection, self.range);

        let subset: Vec<&LaunchRecord> = self.visible_indices.iter().map(|&i| &records[i]).collect();
        self.pie = aggregate_for_pie(&subset, &self.selection);
        self.scatter = aggregate_for_scatter(&subset);

        log::debug!(
            "site={} range=[{}, {}]: {} of {} launches, {} pie slices",
            self.selection,
            self.range.low(),
            self.range.high(),
            self.visible_indices.len(),
            self.dataset.len(),
            self.pie.slices().len()
        );
    }

    /// Records passing the current filters, in file order.
    pub fn visible_records(&self) -> impl Iterator<Item = &LaunchRecord> + '_ {
        let records = self.dataset.records();
        self.visible_indices.iter().map(move |&i| &records[i])
    }

    /// Snapshot of the current filters and chart data for export.
    pub fn report(&self) -> Report {
        Report::compute(&self.dataset, &self.source, &self.selection, self.range)
    }
}

fn site_colors(dataset: &LaunchDataset) -> ColorMap {
    ColorMap::new(dataset.sites().iter().map(String::as_str))
}

fn booster_colors(dataset: &LaunchDataset) -> ColorMap {
    ColorMap::new(dataset.booster_categories().iter().map(String::as_str))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::data::model::tests::{record, three_launches};
    use crate::data::model::Outcome;

    fn state() -> AppState {
        AppState::new(three_launches(), PathBuf::from("launches.csv"), 1000.0)
    }

    #[test]
    fn starts_with_everything_visible() {
        let state = state();
        assert_eq!(state.selection, SiteSelection::All);
        assert_eq!(state.range.low(), 100.0);
        assert_eq!(state.range.high(), 300.0);
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
        assert_eq!(state.scatter.len(), 3);
        assert_eq!(state.pie.total(), 2);
    }

    #[test]
    fn selecting_a_site_switches_pie_mode() {
        let mut state = state();
        state.select_site(SiteSelection::parse("A"));
        let expected = BTreeMap::from([(Outcome::Failure, 1), (Outcome::Success, 1)]);
        assert_eq!(state.pie, PieResult::OutcomesAtSite(expected));
        assert_eq!(state.visible_records().count(), 2);
    }

    #[test]
    fn narrowing_range_recomputes_both_charts() {
        let mut state = state();
        state.set_range(150.0, 300.0).unwrap();
        assert_eq!(state.scatter.len(), 2);
        let expected = BTreeMap::from([("B".to_string(), 1)]);
        assert_eq!(state.pie, PieResult::SuccessesBySite(expected));
    }

    #[test]
    fn inverted_range_keeps_previous_range() {
        let mut state = state();
        state.set_range(150.0, 300.0).unwrap();
        assert!(state.set_range(250.0, 200.0).is_err());
        assert_eq!(state.range.low(), 150.0);
        assert_eq!(state.scatter.len(), 2);
    }

    #[test]
    fn stepped_handles_stay_within_extent() {
        let dataset = LaunchDataset::from_records(vec![
            record("A", 0.0, Outcome::Success, "FT"),
            record("B", 9600.0, Outcome::Failure, "B5"),
        ])
        .unwrap();
        let mut state = AppState::new(dataset, PathBuf::from("launches.csv"), 1000.0);
        state.set_range(0.0, 9000.0).unwrap();

        // One step right from 9000 rounds to 10000 on a 1000 kg grid.
        state.set_range(0.0, 10_000.0).unwrap();
        assert_eq!(state.range.high(), 9600.0);
        assert_eq!(state.visible_indices, vec![0, 1]);

        state.set_range(-1000.0, 10_000.0).unwrap();
        assert_eq!(state.range, PayloadRange::full(&state.dataset));

        // Both handles pushed past the top collapse onto the maximum.
        state.set_range(10_000.0, 10_000.0).unwrap();
        assert_eq!(state.range.low(), 9600.0);
        assert_eq!(state.visible_indices, vec![1]);
    }

    #[test]
    fn nan_bound_is_still_rejected() {
        let mut state = state();
        assert!(state.set_range(f64::NAN, 300.0).is_err());
        assert_eq!(state.range, PayloadRange::full(&state.dataset));
    }

    #[test]
    fn replacing_dataset_resets_filters() {
        let mut state = state();
        state.select_site(SiteSelection::parse("B"));
        state.set_range(250.0, 300.0).unwrap();
        state.status_message = Some("old error".into());

        state.set_dataset(three_launches(), Path::new("other.csv"));
        assert_eq!(state.selection, SiteSelection::All);
        assert_eq!(state.range, PayloadRange::full(&state.dataset));
        assert_eq!(state.visible_indices.len(), 3);
        assert!(state.status_message.is_none());
        assert_eq!(state.source, PathBuf::from("other.csv"));
    }

    #[test]
    fn report_mirrors_current_charts() {
        let mut state = state();
        state.select_site(SiteSelection::parse("Z"));
        let report = state.report();
        assert_eq!(report.pie, state.pie);
        assert_eq!(report.scatter, state.scatter);
        assert_eq!(report.matched_records, 0);
        assert!(report.pie.is_empty());
        assert!(report.scatter.is_empty());
        assert_eq!(report.pie_title, "Success vs Failure for site Z");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["selected_site"], "Z");
        assert_eq!(json["source"], "launches.csv");
    }
}
