use std::collections::{BTreeSet, HashSet};
use std::fmt;

use anyhow::{bail, Result};

// ---------------------------------------------------------------------------
// Outcome – the binary `class` column
// ---------------------------------------------------------------------------

/// Launch outcome as recorded in the `class` column (1 = success, 0 = failure).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    /// Both outcomes, in the order charts list them.
    pub const ALL: [Outcome; 2] = [Outcome::Success, Outcome::Failure];

    /// Interpret a numeric class value. Only exact `0` and `1` are accepted.
    pub fn from_class(class: f64) -> Result<Self> {
        if class == 1.0 {
            Ok(Outcome::Success)
        } else if class == 0.0 {
            Ok(Outcome::Failure)
        } else {
            bail!("class must be 0 or 1, got {class}")
        }
    }

    /// Numeric class, used as the y coordinate of the scatter chart.
    pub fn as_class(self) -> f64 {
        match self {
            Outcome::Success => 1.0,
            Outcome::Failure => 0.0,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "Success"),
            Outcome::Failure => write!(f, "Failed"),
        }
    }
}

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single launch (one row of the source table).
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRecord {
    pub site: String,
    /// Always finite and non-negative; enforced by [`LaunchRecord::new`].
    pub payload_mass_kg: f64,
    pub outcome: Outcome,
    pub booster_category: String,
}

impl LaunchRecord {
    /// Build a record, rejecting payloads that are negative or not finite.
    pub fn new(
        site: impl Into<String>,
        payload_mass_kg: f64,
        outcome: Outcome,
        booster_category: impl Into<String>,
    ) -> Result<Self> {
        if !payload_mass_kg.is_finite() || payload_mass_kg < 0.0 {
            bail!("payload mass must be a non-negative number, got {payload_mass_kg}");
        }
        Ok(LaunchRecord {
            site: site.into(),
            payload_mass_kg,
            outcome,
            booster_category: booster_category.into(),
        })
    }
}

// ---------------------------------------------------------------------------
// LaunchDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed indices. Never mutated after
/// construction; a new file produces a new dataset.
#[derive(Debug, Clone, Default)]
pub struct LaunchDataset {
    records: Vec<LaunchRecord>,
    /// Distinct sites in order of first appearance.
    sites: Vec<String>,
    /// Distinct booster categories, sorted.
    booster_categories: Vec<String>,
    /// `(min, max)` payload mass, `None` when the dataset is empty.
    payload_bounds: Option<(f64, f64)>,
}

impl LaunchDataset {
    /// Build indices from the loaded records.
    pub fn from_records(records: Vec<LaunchRecord>) -> Self {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut sites = Vec::new();
        let mut boosters: BTreeSet<&str> = BTreeSet::new();
        let mut payload_bounds: Option<(f64, f64)> = None;

        for rec in &records {
            if seen.insert(rec.site.as_str()) {
                sites.push(rec.site.clone());
            }
            boosters.insert(rec.booster_category.as_str());
            let p = rec.payload_mass_kg;
            payload_bounds = Some(match payload_bounds {
                Some((lo, hi)) => (lo.min(p), hi.max(p)),
                None => (p, p),
            });
        }
        let booster_categories = boosters.into_iter().map(str::to_string).collect();

        LaunchDataset {
            records,
            sites,
            booster_categories,
            payload_bounds,
        }
    }

    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    pub fn sites(&self) -> &[String] {
        &self.sites
    }

    pub fn booster_categories(&self) -> &[String] {
        &self.booster_categories
    }

    pub fn payload_bounds(&self) -> Option<(f64, f64)> {
        self.payload_bounds
    }

    pub fn has_site(&self, site: &str) -> bool {
        self.sites.iter().any(|s| s == site)
    }

    /// Number of launches.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(site: &str, payload: f64, outcome: Outcome, booster: &str) -> LaunchRecord {
        LaunchRecord::new(site, payload, outcome, booster).unwrap()
    }

    #[test]
    fn test_outcome_from_class() {
        assert_eq!(Outcome::from_class(1.0).unwrap(), Outcome::Success);
        assert_eq!(Outcome::from_class(0.0).unwrap(), Outcome::Failure);
        assert!(Outcome::from_class(2.0).is_err());
        assert!(Outcome::from_class(0.5).is_err());
        assert!(Outcome::from_class(f64::NAN).is_err());
    }

    #[test]
    fn test_outcome_display_matches_chart_labels() {
        assert_eq!(Outcome::Success.to_string(), "Success");
        assert_eq!(Outcome::Failure.to_string(), "Failed");
    }

    #[test]
    fn test_record_rejects_bad_payload() {
        assert!(LaunchRecord::new("A", -1.0, Outcome::Success, "v1.0").is_err());
        assert!(LaunchRecord::new("A", f64::NAN, Outcome::Success, "v1.0").is_err());
        assert!(LaunchRecord::new("A", f64::INFINITY, Outcome::Success, "v1.0").is_err());
        assert!(LaunchRecord::new("A", 0.0, Outcome::Success, "v1.0").is_ok());
    }

    #[test]
    fn test_sites_keep_first_appearance_order() {
        let ds = LaunchDataset::from_records(vec![
            rec("CCAFS LC-40", 0.0, Outcome::Failure, "v1.0"),
            rec("VAFB SLC-4E", 500.0, Outcome::Success, "v1.1"),
            rec("CCAFS LC-40", 700.0, Outcome::Success, "FT"),
            rec("KSC LC-39A", 2000.0, Outcome::Success, "FT"),
        ]);
        assert_eq!(ds.sites(), ["CCAFS LC-40", "VAFB SLC-4E", "KSC LC-39A"]);
        assert_eq!(ds.booster_categories(), ["FT", "v1.0", "v1.1"]);
        assert!(ds.has_site("KSC LC-39A"));
        assert!(!ds.has_site("Z"));
    }

    #[test]
    fn test_payload_bounds() {
        let ds = LaunchDataset::from_records(vec![
            rec("A", 500.0, Outcome::Success, "FT"),
            rec("A", 1500.0, Outcome::Failure, "FT"),
            rec("B", 800.0, Outcome::Success, "B4"),
        ]);
        assert_eq!(ds.payload_bounds(), Some((500.0, 1500.0)));
        assert_eq!(ds.len(), 3);
    }

    #[test]
    fn test_empty_dataset() {
        let ds = LaunchDataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert_eq!(ds.payload_bounds(), None);
        assert!(ds.sites().is_empty());
    }
}
