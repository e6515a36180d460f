use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::data::aggregate::{aggregate_for_pie, aggregate_for_scatter, PieResult, ScatterPoint};
use crate::data::filter::{filter, PayloadRange, SiteSelection};
use crate::data::model::LaunchDataset;

// ---------------------------------------------------------------------------
// Chart titles
// ---------------------------------------------------------------------------

pub fn pie_title(site: &SiteSelection) -> String {
    match site {
        SiteSelection::All => "Total Successful Launches by Site".to_string(),
        SiteSelection::Site(name) => format!("Success vs Failure for site {name}"),
    }
}

pub fn scatter_title(site: &SiteSelection) -> String {
    match site {
        SiteSelection::All => "Correlation between Payload and Success".to_string(),
        SiteSelection::Site(name) => format!("Correlation between Payload and Success for {name}"),
    }
}

// ---------------------------------------------------------------------------
// Report – snapshot of one filter + aggregate computation
// ---------------------------------------------------------------------------

/// Everything both charts show for one set of filter parameters.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub source: String,
    pub selected_site: SiteSelection,
    pub payload_range: PayloadRange,
    pub matched_records: usize,
    pub pie_title: String,
    pub pie: PieResult,
    pub scatter_title: String,
    pub scatter: Vec<ScatterPoint>,
}

impl Report {
    /// Run filter and both aggregations for one set of parameters.
    pub fn compute(
        dataset: &LaunchDataset,
        source: &Path,
        site: &SiteSelection,
        range: PayloadRange,
    ) -> Self {
        let subset = filter(dataset.records(), site, range);
        Report {
            source: source.display().to_string(),
            selected_site: site.clone(),
            payload_range: range,
            matched_records: subset.len(),
            pie_title: pie_title(site),
            pie: aggregate_for_pie(&subset, site),
            scatter_title: scatter_title(site),
            scatter: aggregate_for_scatter(&subset),
        }
    }
}

/// Write the report as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write>(report: &Report, mut out: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, report).context("serialising report")?;
    writeln!(out).context("writing report")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::three_launches;

    #[test]
    fn compute_runs_filter_and_both_aggregations() {
        let ds = three_launches();
        let range = PayloadRange::new(150.0, 300.0).unwrap();
        let report = Report::compute(&ds, Path::new("launches.csv"), &SiteSelection::All, range);

        assert_eq!(report.matched_records, 2);
        assert_eq!(report.scatter.len(), 2);
        assert_eq!(report.pie.slices(), vec![("B".to_string(), 1)]);
        assert_eq!(report.pie_title, "Total Successful Launches by Site");
    }

    #[test]
    fn json_output_is_tagged_and_newline_terminated() {
        let ds = three_launches();
        let report = Report::compute(
            &ds,
            Path::new("launches.csv"),
            &SiteSelection::parse("A"),
            PayloadRange::full(&ds),
        );
        let mut out = Vec::new();
        write_json(&report, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("}\n"));
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["selected_site"], "A");
        assert_eq!(json["payload_range"]["low"], 100.0);
        assert_eq!(json["pie"]["mode"], "outcomes_at_site");
        assert_eq!(json["scatter"][0]["outcome"], 1);
        assert_eq!(json["scatter"][0]["booster_category"], "v1.0");
    }

    #[test]
    fn titles_follow_selection() {
        assert_eq!(pie_title(&SiteSelection::All), "Total Successful Launches by Site");
        let site = SiteSelection::parse("KSC LC-39A");
        assert_eq!(pie_title(&site), "Success vs Failure for site KSC LC-39A");
        assert_eq!(
            scatter_title(&site),
            "Correlation between Payload and Success for KSC LC-39A"
        );
    }
}
