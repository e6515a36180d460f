use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DataLoadError;

// ---------------------------------------------------------------------------
// Column names of the source file
// ---------------------------------------------------------------------------

pub const COL_FLIGHT_NUMBER: &str = "Flight Number";
pub const COL_LAUNCH_SITE: &str = "Launch Site";
pub const COL_PAYLOAD_MASS: &str = "Payload Mass (kg)";
pub const COL_CLASS: &str = "class";
pub const COL_BOOSTER_VERSION: &str = "Booster Version";
pub const COL_BOOSTER_CATEGORY: &str = "Booster Version Category";

/// Columns that every input file must carry.
pub const REQUIRED_COLUMNS: [&str; 4] = [
    COL_LAUNCH_SITE,
    COL_PAYLOAD_MASS,
    COL_CLASS,
    COL_BOOSTER_CATEGORY,
];

// ---------------------------------------------------------------------------
// Outcome – the binary `class` label
// ---------------------------------------------------------------------------

/// Launch outcome as stored in the `class` column (0 = failure, 1 = success).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub enum Outcome {
    Failure,
    Success,
}

impl Outcome {
    pub fn class(self) -> u8 {
        match self {
            Outcome::Failure => 0,
            Outcome::Success => 1,
        }
    }

    pub fn is_success(self) -> bool {
        self == Outcome::Success
    }

    /// Human readable label used on chart legends.
    pub fn label(self) -> &'static str {
        match self {
            Outcome::Failure => "Failure",
            Outcome::Success => "Success",
        }
    }
}

impl TryFrom<i64> for Outcome {
    type Error = String;

    fn try_from(class: i64) -> Result<Self, Self::Error> {
        match class {
            0 => Ok(Outcome::Failure),
            1 => Ok(Outcome::Success),
            other => Err(format!("class must be 0 or 1, got {other}")),
        }
    }
}

impl From<Outcome> for u8 {
    fn from(outcome: Outcome) -> Self {
        outcome.class()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single launch (one row of the source table).
///
/// Field names follow the column headers of the exported SpaceX dataset so
/// CSV and JSON rows deserialise straight into this type. Columns not listed
/// here (such as the unnamed pandas index) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchRecord {
    #[serde(rename = "Flight Number", default)]
    pub flight_number: Option<u32>,
    #[serde(rename = "Launch Site")]
    pub launch_site: String,
    #[serde(rename = "Payload Mass (kg)")]
    pub payload_mass: f64,
    #[serde(rename = "class")]
    pub outcome: Outcome,
    #[serde(rename = "Booster Version", default)]
    pub booster_version: Option<String>,
    #[serde(rename = "Booster Version Category")]
    pub booster_category: String,
}

// ---------------------------------------------------------------------------
// LaunchDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with the payload extent and site list computed
/// once at construction. Never mutated afterwards.
#[derive(Debug, Clone)]
pub struct LaunchDataset {
    records: Vec<LaunchRecord>,
    /// Distinct launch sites in order of first appearance.
    sites: Vec<String>,
    booster_categories: BTreeSet<String>,
    min_payload: f64,
    max_payload: f64,
}

impl LaunchDataset {
    /// Validate the rows and build the derived indices.
    ///
    /// Rejects an empty table and non-finite payload masses, since the
    /// payload extent seeds the range slider.
    pub fn from_records(records: Vec<LaunchRecord>) -> Result<Self, DataLoadError> {
        if records.is_empty() {
            return Err(DataLoadError::Empty);
        }

        let mut sites: Vec<String> = Vec::new();
        let mut seen_sites: BTreeSet<&str> = BTreeSet::new();
        let mut booster_categories = BTreeSet::new();
        let mut min_payload = f64::INFINITY;
        let mut max_payload = f64::NEG_INFINITY;

        for (row, rec) in records.iter().enumerate() {
            if !rec.payload_mass.is_finite() {
                return Err(DataLoadError::InvalidValue {
                    row,
                    column: COL_PAYLOAD_MASS.to_string(),
                    message: format!("payload mass must be finite, got {}", rec.payload_mass),
                });
            }
            min_payload = min_payload.min(rec.payload_mass);
            max_payload = max_payload.max(rec.payload_mass);

            if seen_sites.insert(rec.launch_site.as_str()) {
                sites.push(rec.launch_site.clone());
            }
            booster_categories.insert(rec.booster_category.clone());
        }

        Ok(LaunchDataset {
            records,
            sites,
            booster_categories,
            min_payload,
            max_payload,
        })
    }

    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    pub fn sites(&self) -> &[String] {
        &self.sites
    }

    pub fn booster_categories(&self) -> &BTreeSet<String> {
        &self.booster_categories
    }

    /// Smallest payload mass over the unfiltered dataset.
    pub fn min_payload(&self) -> f64 {
        self.min_payload
    }

    /// Largest payload mass over the unfiltered dataset.
    pub fn max_payload(&self) -> f64 {
        self.max_payload
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false for a dataset built by `from_records`.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(site: &str, payload: f64, outcome: Outcome, category: &str) -> LaunchRecord {
        LaunchRecord {
            flight_number: None,
            launch_site: site.to_string(),
            payload_mass: payload,
            outcome,
            booster_version: None,
            booster_category: category.to_string(),
        }
    }

    /// Sites {A, A, B}, outcomes {1, 0, 1}, payloads {100, 200, 300}.
    pub(crate) fn three_launches() -> LaunchDataset {
        LaunchDataset::from_records(vec![
            record("A", 100.0, Outcome::Success, "v1.0"),
            record("A", 200.0, Outcome::Failure, "FT"),
            record("B", 300.0, Outcome::Success, "FT"),
        ])
        .expect("valid dataset")
    }

    #[test]
    fn extent_and_sites_are_computed_once() {
        let ds = three_launches();
        assert_eq!(ds.len(), 3);
        assert!(!ds.is_empty());
        assert_eq!(ds.min_payload(), 100.0);
        assert_eq!(ds.max_payload(), 300.0);
        assert_eq!(ds.sites(), ["A".to_string(), "B".to_string()]);
        assert_eq!(ds.booster_categories().len(), 2);
    }

    #[test]
    fn sites_keep_first_appearance_order() {
        let ds = LaunchDataset::from_records(vec![
            record("VAFB SLC-4E", 1.0, Outcome::Success, "FT"),
            record("CCAFS LC-40", 2.0, Outcome::Success, "FT"),
            record("VAFB SLC-4E", 3.0, Outcome::Failure, "FT"),
        ])
        .unwrap();
        assert_eq!(ds.sites(), ["VAFB SLC-4E".to_string(), "CCAFS LC-40".to_string()]);
    }

    #[test]
    fn empty_dataset_is_rejected() {
        assert!(matches!(
            LaunchDataset::from_records(Vec::new()),
            Err(DataLoadError::Empty)
        ));
    }

    #[test]
    fn nan_payload_is_rejected() {
        let err = LaunchDataset::from_records(vec![
            record("A", 1.0, Outcome::Success, "FT"),
            record("A", f64::NAN, Outcome::Success, "FT"),
        ])
        .unwrap_err();
        match err {
            DataLoadError::InvalidValue { row, column, .. } => {
                assert_eq!(row, 1);
                assert_eq!(column, COL_PAYLOAD_MASS);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn outcome_class_conversion() {
        assert_eq!(Outcome::try_from(0_i64), Ok(Outcome::Failure));
        assert_eq!(Outcome::try_from(1_i64), Ok(Outcome::Success));
        assert!(Outcome::try_from(2_i64).is_err());
        assert_eq!(u8::from(Outcome::Success), 1);
        assert_eq!(Outcome::Failure.to_string(), "Failure");
    }
}
