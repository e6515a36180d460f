use std::collections::BTreeMap;

use serde::Serialize;

use super::filter::SiteSelection;
use super::model::{LaunchRecord, Outcome};

// ---------------------------------------------------------------------------
// Pie chart data
// ---------------------------------------------------------------------------

/// Counts backing the pie chart.
///
/// Groups with no members are absent rather than zero-valued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "counts", rename_all = "snake_case")]
pub enum PieResult {
    /// All sites selected: successful launches per site.
    SuccessesBySite(BTreeMap<String, usize>),
    /// One site selected: launches per outcome at that site.
    OutcomesAtSite(BTreeMap<Outcome, usize>),
}

impl PieResult {
    /// Sum of all slice counts.
    pub fn total(&self) -> usize {
        match self {
            PieResult::SuccessesBySite(counts) => counts.values().sum(),
            PieResult::OutcomesAtSite(counts) => counts.values().sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            PieResult::SuccessesBySite(counts) => counts.is_empty(),
            PieResult::OutcomesAtSite(counts) => counts.is_empty(),
        }
    }

    /// `(label, count)` pairs in slice order.
    pub fn slices(&self) -> Vec<(String, usize)> {
        match self {
            PieResult::SuccessesBySite(counts) => {
                counts.iter().map(|(site, &n)| (site.clone(), n)).collect()
            }
            PieResult::OutcomesAtSite(counts) => counts
                .iter()
                .map(|(outcome, &n)| (outcome.label().to_string(), n))
                .collect(),
        }
    }
}

/// Aggregate a filtered subset for the pie chart.
///
/// With every site selected only successes count, grouped by site. With one
/// site selected every record counts, grouped by outcome.
pub fn aggregate_for_pie(subset: &[&LaunchRecord], site: &SiteSelection) -> PieResult {
    match site {
        SiteSelection::All => {
            let mut counts: BTreeMap<String, usize> = BTreeMap::new();
            for rec in subset.iter().filter(|r| r.outcome.is_success()) {
                *counts.entry(rec.launch_site.clone()).or_default() += 1;
            }
            PieResult::SuccessesBySite(counts)
        }
        SiteSelection::Site(_) => {
            let mut counts: BTreeMap<Outcome, usize> = BTreeMap::new();
            for rec in subset {
                *counts.entry(rec.outcome).or_default() += 1;
            }
            PieResult::OutcomesAtSite(counts)
        }
    }
}

// ---------------------------------------------------------------------------
// Scatter chart data
// ---------------------------------------------------------------------------

/// One plotted launch: payload on x, outcome on y, coloured by booster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub payload_mass: f64,
    pub outcome: Outcome,
    pub booster_category: String,
}

pub fn aggregate_for_scatter(subset: &[&LaunchRecord]) -> Vec<ScatterPoint> {
    subset
        .iter()
        .map(|rec| ScatterPoint {
            payload_mass: rec.payload_mass,
            outcome: rec.outcome,
            booster_category: rec.booster_category.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::data::filter::{filter, PayloadRange};
    use crate::data::model::tests::{record, three_launches};
    use crate::data::model::LaunchDataset;

    fn pie_for(ds: &LaunchDataset, site: &str, low: f64, high: f64) -> PieResult {
        let site = SiteSelection::parse(site);
        let subset = filter(ds.records(), &site, PayloadRange::new(low, high).unwrap());
        aggregate_for_pie(&subset, &site)
    }

    #[test]
    fn all_sites_counts_successes_per_site() {
        let ds = three_launches();
        let pie = pie_for(&ds, "ALL", 0.0, 300.0);
        let expected = BTreeMap::from([("A".to_string(), 1), ("B".to_string(), 1)]);
        assert_eq!(pie, PieResult::SuccessesBySite(expected));
    }

    #[test]
    fn single_site_counts_each_outcome() {
        let ds = three_launches();
        let pie = pie_for(&ds, "A", 0.0, 300.0);
        let expected = BTreeMap::from([(Outcome::Failure, 1), (Outcome::Success, 1)]);
        assert_eq!(pie, PieResult::OutcomesAtSite(expected));
    }

    #[test]
    fn narrowed_range_drops_sites_without_successes() {
        let ds = three_launches();
        let site = SiteSelection::All;
        let subset = filter(ds.records(), &site, PayloadRange::new(150.0, 300.0).unwrap());

        let scatter = aggregate_for_scatter(&subset);
        let payloads: Vec<f64> = scatter.iter().map(|p| p.payload_mass).collect();
        assert_eq!(payloads, vec![200.0, 300.0]);

        let pie = aggregate_for_pie(&subset, &site);
        let expected = BTreeMap::from([("B".to_string(), 1)]);
        assert_eq!(pie, PieResult::SuccessesBySite(expected));
    }

    #[test]
    fn unknown_site_aggregates_to_nothing() {
        let ds = three_launches();
        let site = SiteSelection::parse("Z");
        let subset = filter(ds.records(), &site, PayloadRange::full(&ds));
        let pie = aggregate_for_pie(&subset, &site);
        assert!(pie.is_empty());
        assert_eq!(pie.total(), 0);
        assert!(aggregate_for_scatter(&subset).is_empty());
    }

    #[test]
    fn single_site_with_only_failures_has_no_success_slice() {
        let ds = LaunchDataset::from_records(vec![
            record("A", 1.0, Outcome::Failure, "FT"),
            record("A", 2.0, Outcome::Failure, "FT"),
        ])
        .unwrap();
        let pie = pie_for(&ds, "A", 0.0, 10.0);
        assert_eq!(pie.slices(), vec![("Failure".to_string(), 2)]);
    }

    #[test]
    fn scatter_keeps_duplicates_and_booster_category() {
        let a = record("A", 500.0, Outcome::Success, "B5");
        let b = record("A", 500.0, Outcome::Success, "B5");
        let scatter = aggregate_for_scatter(&[&a, &b]);
        assert_eq!(scatter.len(), 2);
        assert_eq!(scatter[0], scatter[1]);
        assert_eq!(scatter[0].booster_category, "B5");
    }

    #[test]
    fn pie_serialises_with_mode_tag() {
        let ds = three_launches();
        let json = serde_json::to_value(pie_for(&ds, "A", 0.0, 300.0)).unwrap();
        assert_eq!(json["mode"], "outcomes_at_site");
        assert_eq!(json["counts"]["0"], 1);
        assert_eq!(json["counts"]["1"], 1);
    }

    proptest! {
        #[test]
        fn pie_totals_match_subset(
            rows in prop::collection::vec((0usize..3, 0.0f64..1_000.0, any::<bool>()), 1..30),
            site in prop_oneof![Just("ALL".to_string()), (0usize..4).prop_map(|i| format!("S{i}"))],
        ) {
            let records: Vec<LaunchRecord> = rows
                .into_iter()
                .map(|(s, p, ok)| {
                    let outcome = if ok { Outcome::Success } else { Outcome::Failure };
                    record(&format!("S{s}"), p, outcome, "FT")
                })
                .collect();
            let ds = LaunchDataset::from_records(records).unwrap();
            let selection = SiteSelection::parse(&site);
            let subset = filter(ds.records(), &selection, PayloadRange::full(&ds));
            let pie = aggregate_for_pie(&subset, &selection);

            let expected = match selection {
                SiteSelection::All => subset.iter().filter(|r| r.outcome.is_success()).count(),
                SiteSelection::Site(_) => subset.len(),
            };
            prop_assert_eq!(pie.total(), expected);
        }

        #[test]
        fn filter_then_scatter_is_idempotent(
            rows in prop::collection::vec((0usize..3, 0.0f64..1_000.0, any::<bool>()), 1..30),
            low in 0.0f64..500.0,
            span in 0.0f64..500.0,
        ) {
            let records: Vec<LaunchRecord> = rows
                .into_iter()
                .map(|(s, p, ok)| {
                    let outcome = if ok { Outcome::Success } else { Outcome::Failure };
                    record(&format!("S{s}"), p, outcome, "FT")
                })
                .collect();
            let range = PayloadRange::new(low, low + span).unwrap();
            let first = aggregate_for_scatter(&filter(&records, &SiteSelection::All, range));
            let second = aggregate_for_scatter(&filter(&records, &SiteSelection::All, range));
            prop_assert_eq!(first, second);
        }
    }
}
