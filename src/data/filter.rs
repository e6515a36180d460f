use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::model::{LaunchDataset, LaunchRecord};

/// Wildcard value of the site dropdown.
pub const ALL_SITES: &str = "ALL";

// ---------------------------------------------------------------------------
// Site selection
// ---------------------------------------------------------------------------

/// Either every launch site or one exact site name.
///
/// A site name that does not occur in the dataset is still a valid
/// selection; it simply matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(into = "String")]
pub enum SiteSelection {
    #[default]
    All,
    Site(String),
}

impl SiteSelection {
    /// Parse a dropdown value, treating [`ALL_SITES`] as the wildcard.
    pub fn parse(value: &str) -> Self {
        if value == ALL_SITES {
            SiteSelection::All
        } else {
            SiteSelection::Site(value.to_string())
        }
    }

    pub fn matches(&self, launch_site: &str) -> bool {
        match self {
            SiteSelection::All => true,
            SiteSelection::Site(site) => site == launch_site,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SiteSelection::All => ALL_SITES,
            SiteSelection::Site(site) => site,
        }
    }
}

impl From<SiteSelection> for String {
    fn from(selection: SiteSelection) -> Self {
        match selection {
            SiteSelection::All => ALL_SITES.to_string(),
            SiteSelection::Site(site) => site,
        }
    }
}

impl fmt::Display for SiteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Payload range
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("invalid payload range [{low}, {high}]: low bound must not exceed high bound")]
pub struct InvalidRangeError {
    pub low: f64,
    pub high: f64,
}

/// Closed payload interval `[low, high]` in kilograms.
///
/// Validated once on construction, so filtering never has to re-check it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PayloadRange {
    low: f64,
    high: f64,
}

impl PayloadRange {
    /// Fails when `low > high` or either bound is NaN.
    pub fn new(low: f64, high: f64) -> Result<Self, InvalidRangeError> {
        if low.is_nan() || high.is_nan() || low > high {
            return Err(InvalidRangeError { low, high });
        }
        Ok(PayloadRange { low, high })
    }

    /// The full payload extent of a dataset (the slider's default value).
    pub fn full(dataset: &LaunchDataset) -> Self {
        PayloadRange {
            low: dataset.min_payload(),
            high: dataset.max_payload(),
        }
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    /// Inclusive on both ends.
    pub fn contains(&self, payload_mass: f64) -> bool {
        self.low <= payload_mass && payload_mass <= self.high
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return indices of records matching both the site selection and the
/// payload range.
pub fn filtered_indices(
    records: &[LaunchRecord],
    site: &SiteSelection,
    range: PayloadRange,
) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, rec)| range.contains(rec.payload_mass) && site.matches(&rec.launch_site))
        .map(|(i, _)| i)
        .collect()
}

/// Return the records matching both the site selection and the payload range.
pub fn filter<'a>(
    records: &'a [LaunchRecord],
    site: &SiteSelection,
    range: PayloadRange,
) -> Vec<&'a LaunchRecord> {
    filtered_indices(records, site, range)
        .into_iter()
        .map(|i| &records[i])
        .collect()
}
