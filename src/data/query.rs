use std::fmt;

use thiserror::Error;

use super::model::{LaunchDataset, LaunchRecord, Outcome};

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum QueryError {
    #[error("invalid payload range [{low}, {high}]: bounds must be finite and low <= high")]
    InvalidRange { low: f64, high: f64 },
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Which launch site(s) a query covers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SiteSelection {
    #[default]
    All,
    Site(String),
}

impl SiteSelection {
    pub fn matches(&self, record: &LaunchRecord) -> bool {
        match self {
            SiteSelection::All => true,
            SiteSelection::Site(site) => record.site == *site,
        }
    }

    pub fn pie_title(&self) -> String {
        match self {
            SiteSelection::All => "Total Launch Success Counts for All Sites".to_string(),
            SiteSelection::Site(site) => format!("Launch Success Counts for {site}"),
        }
    }

    pub fn scatter_title(&self) -> String {
        format!("Payload vs. Launch Success for {self}")
    }
}

impl fmt::Display for SiteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteSelection::All => write!(f, "All Sites"),
            SiteSelection::Site(site) => write!(f, "{site}"),
        }
    }
}

/// Closed payload interval `[low, high]` in kilograms.
///
/// Only constructible through [`PayloadRange::new`], so `low <= high` holds
/// for every value in circulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayloadRange {
    low: f64,
    high: f64,
}

impl PayloadRange {
    pub fn new(low: f64, high: f64) -> Result<Self, QueryError> {
        if !low.is_finite() || !high.is_finite() || low > high {
            return Err(QueryError::InvalidRange { low, high });
        }
        Ok(PayloadRange { low, high })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    /// Inclusive on both ends.
    pub fn contains(&self, payload_mass_kg: f64) -> bool {
        self.low <= payload_mass_kg && payload_mass_kg <= self.high
    }

    /// Restrict this range to `bounds`. A range lying entirely outside
    /// collapses onto the nearest edge of `bounds`.
    pub fn clamp_to(&self, bounds: PayloadRange) -> PayloadRange {
        let low = self.low.clamp(bounds.low, bounds.high);
        let high = self.high.clamp(bounds.low, bounds.high);
        PayloadRange { low, high }
    }

    /// Smallest range covering both `self` and `other`.
    pub fn span(&self, other: PayloadRange) -> PayloadRange {
        PayloadRange {
            low: self.low.min(other.low),
            high: self.high.max(other.high),
        }
    }
}

// ---------------------------------------------------------------------------
// Query results
// ---------------------------------------------------------------------------

/// Success / failure tally. Both outcomes are always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutcomeCounts {
    pub success: usize,
    pub failure: usize,
}

impl OutcomeCounts {
    pub fn get(&self, outcome: Outcome) -> usize {
        match outcome {
            Outcome::Success => self.success,
            Outcome::Failure => self.failure,
        }
    }

    pub fn total(&self) -> usize {
        self.success + self.failure
    }

    /// Share of successes, `None` when nothing was counted.
    pub fn success_rate(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            n => Some(self.success as f64 / n as f64),
        }
    }

    /// `(outcome, count)` pairs, successes first.
    pub fn iter(&self) -> impl Iterator<Item = (Outcome, usize)> + '_ {
        Outcome::ALL.into_iter().map(move |o| (o, self.get(o)))
    }

    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Success => self.success += 1,
            Outcome::Failure => self.failure += 1,
        }
    }
}

/// One point of the payload-vs-outcome chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub payload_mass_kg: f64,
    pub outcome: Outcome,
    pub booster_category: String,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Count successes and failures among the launches matching `site`.
///
/// An unknown site matches nothing and yields zero counts.
pub fn compute_outcome_counts(dataset: &LaunchDataset, site: &SiteSelection) -> OutcomeCounts {
    dataset
        .records()
        .iter()
        .filter(|rec| site.matches(rec))
        .fold(OutcomeCounts::default(), |mut counts, rec| {
            counts.record(rec.outcome);
            counts
        })
}

/// Launches matching `site` whose payload lies inside `range`, in source order.
pub fn compute_scatter_points(
    dataset: &LaunchDataset,
    site: &SiteSelection,
    range: PayloadRange,
) -> Vec<ScatterPoint> {
    dataset
        .records()
        .iter()
        .filter(|rec| site.matches(rec) && range.contains(rec.payload_mass_kg))
        .map(|rec| ScatterPoint {
            payload_mass_kg: rec.payload_mass_kg,
            outcome: rec.outcome,
            booster_category: rec.booster_category.clone(),
        })
        .collect()
}
