use crate::color::ColorMap;
use crate::config::{DashConfig, MAX_SLIDER_TICKS};
use crate::data::model::LaunchDataset;
use crate::data::query::{
    compute_outcome_counts, compute_scatter_points, OutcomeCounts, PayloadRange, QueryError,
    ScatterPoint, SiteSelection,
};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset; replaced wholesale on File → Open…
    pub dataset: LaunchDataset,

    /// Current dropdown selection.
    pub site: SiteSelection,

    /// Current slider range.
    pub payload_range: PayloadRange,

    /// Range the slider can move in: the configured bounds, widened to the
    /// dataset's payload span when that reaches further.
    pub slider_bounds: PayloadRange,
    configured_bounds: PayloadRange,
    pub slider_step: f64,
    pub slider_marks: Vec<f64>,

    /// Query results for the current parameters (cached).
    pub outcome_counts: OutcomeCounts,
    pub scatter_points: Vec<ScatterPoint>,

    /// Booster category colours for the scatter chart.
    pub color_map: ColorMap,

    /// Text typed into the site dropdown's search box.
    pub site_filter: String,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: LaunchDataset, config: &DashConfig) -> Result<Self, QueryError> {
        let configured_bounds = PayloadRange::new(config.slider_min, config.slider_max)?;
        let bounds = slider_bounds(&dataset, configured_bounds);
        let mut state = Self {
            payload_range: initial_range(&dataset, configured_bounds),
            slider_bounds: bounds,
            slider_marks: slider_marks(bounds, config.slider_step),
            configured_bounds,
            color_map: ColorMap::new(dataset.booster_categories()),
            dataset,
            site: SiteSelection::All,
            slider_step: config.slider_step,
            outcome_counts: OutcomeCounts::default(),
            scatter_points: Vec::new(),
            site_filter: String::new(),
            status_message: None,
        };
        state.refresh();
        Ok(state)
    }

    /// Ingest a newly loaded dataset, reset selection, range and colours.
    pub fn set_dataset(&mut self, dataset: LaunchDataset) {
        self.payload_range = initial_range(&dataset, self.configured_bounds);
        self.slider_bounds = slider_bounds(&dataset, self.configured_bounds);
        self.slider_marks = slider_marks(self.slider_bounds, self.slider_step);
        self.site_filter.clear();
        self.color_map = ColorMap::new(dataset.booster_categories());
        self.site = SiteSelection::All;
        self.dataset = dataset;
        self.status_message = None;
        self.refresh();
    }

    /// Re-run both queries for the current parameters.
    pub fn refresh(&mut self) {
        self.outcome_counts = compute_outcome_counts(&self.dataset, &self.site);
        self.scatter_points = compute_scatter_points(&self.dataset, &self.site, self.payload_range);
        log::debug!(
            "query site={} range=[{}, {}]: {} successes, {} failures, {} points",
            self.site,
            self.payload_range.low(),
            self.payload_range.high(),
            self.outcome_counts.success,
            self.outcome_counts.failure,
            self.scatter_points.len()
        );
    }

    pub fn select_site(&mut self, site: SiteSelection) {
        if self.site != site {
            if let SiteSelection::Site(name) = &site {
                if !self.dataset.has_site(name) {
                    log::debug!("site {name:?} is not in the dataset; nothing will match");
                }
            }
            self.site = site;
            self.refresh();
        }
    }

    /// Apply a new slider range, clamped to the slider bounds. An invalid
    /// range is rejected and the previous range stays in effect.
    pub fn set_payload_range(&mut self, low: f64, high: f64) {
        match PayloadRange::new(low, high) {
            Ok(range) => {
                let range = range.clamp_to(self.slider_bounds);
                self.status_message = None;
                if range != self.payload_range {
                    self.payload_range = range;
                    self.refresh();
                }
            }
            Err(e) => {
                log::warn!("rejected payload range: {e}");
                self.status_message = Some(e.to_string());
            }
        }
    }
}

fn dataset_span(dataset: &LaunchDataset) -> Option<PayloadRange> {
    dataset
        .payload_bounds()
        .and_then(|(lo, hi)| PayloadRange::new(lo, hi).ok())
}

/// The dataset's own payload span, or the configured bounds when it has none.
fn initial_range(dataset: &LaunchDataset, configured: PayloadRange) -> PayloadRange {
    dataset_span(dataset).unwrap_or(configured)
}

fn slider_bounds(dataset: &LaunchDataset, configured: PayloadRange) -> PayloadRange {
    match dataset_span(dataset) {
        Some(span) => configured.span(span),
        None => configured,
    }
}

/// Tick positions across `bounds`, one per `step`. The stride is widened to
/// a multiple of `step` when the bounds would need more than
/// [`MAX_SLIDER_TICKS`] ticks.
fn slider_marks(bounds: PayloadRange, step: f64) -> Vec<f64> {
    let span = bounds.high() - bounds.low();
    let stride = step * (span / step / MAX_SLIDER_TICKS as f64).ceil().max(1.0);
    let n = (span / stride).floor() as usize;
    (0..=n).map(|i| bounds.low() + i as f64 * stride).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{LaunchRecord, Outcome};

    fn dataset() -> LaunchDataset {
        LaunchDataset::from_records(vec![
            LaunchRecord::new("A", 500.0, Outcome::Success, "FT").unwrap(),
            LaunchRecord::new("A", 1500.0, Outcome::Failure, "v1.1").unwrap(),
            LaunchRecord::new("B", 800.0, Outcome::Success, "B4").unwrap(),
        ])
    }

    fn state() -> AppState {
        AppState::new(dataset(), &DashConfig::default()).unwrap()
    }

    #[test]
    fn test_initial_state_covers_everything() {
        let s = state();
        assert_eq!(s.site, SiteSelection::All);
        assert_eq!(s.payload_range, PayloadRange::new(500.0, 1500.0).unwrap());
        assert_eq!(s.outcome_counts, OutcomeCounts { success: 2, failure: 1 });
        assert_eq!(s.scatter_points.len(), 3);
    }

    #[test]
    fn test_select_site_refreshes_both_views() {
        let mut s = state();
        s.select_site(SiteSelection::Site("A".into()));
        assert_eq!(s.outcome_counts, OutcomeCounts { success: 1, failure: 1 });
        assert_eq!(s.scatter_points.len(), 2);
        s.select_site(SiteSelection::Site("Z".into()));
        assert_eq!(s.outcome_counts.total(), 0);
        assert!(s.scatter_points.is_empty());
    }

    #[test]
    fn test_range_change_leaves_counts_alone() {
        let mut s = state();
        s.set_payload_range(0.0, 1000.0);
        assert_eq!(s.scatter_points.len(), 2);
        assert_eq!(s.outcome_counts.total(), 3);
    }

    #[test]
    fn test_inverted_range_keeps_previous() {
        let mut s = state();
        s.set_payload_range(0.0, 1000.0);
        s.set_payload_range(2000.0, 1000.0);
        assert_eq!(s.payload_range, PayloadRange::new(0.0, 1000.0).unwrap());
        assert!(s.status_message.is_some());
        s.set_payload_range(0.0, 2000.0);
        assert!(s.status_message.is_none());
        assert_eq!(s.scatter_points.len(), 3);
    }

    #[test]
    fn test_range_clamped_to_slider_bounds() {
        let mut s = state();
        s.set_payload_range(-500.0, 20_000.0);
        assert_eq!(s.payload_range, PayloadRange::new(0.0, 10_000.0).unwrap());
    }

    #[test]
    fn test_slider_widens_for_heavy_payloads() {
        let ds = LaunchDataset::from_records(vec![
            LaunchRecord::new("A", 2000.0, Outcome::Success, "B5").unwrap(),
            LaunchRecord::new("A", 15_600.0, Outcome::Success, "B5").unwrap(),
        ]);
        let s = AppState::new(ds, &DashConfig::default()).unwrap();
        assert_eq!(s.slider_bounds, PayloadRange::new(0.0, 15_600.0).unwrap());
        assert_eq!(s.scatter_points.len(), 2);
        assert_eq!(s.slider_marks.len(), 16);
        assert_eq!(s.slider_marks.last(), Some(&15_000.0));
    }

    #[test]
    fn test_marks_follow_new_dataset() {
        let mut s = state();
        assert_eq!(s.slider_marks.len(), 11);
        assert_eq!(s.slider_marks.first(), Some(&0.0));
        assert_eq!(s.slider_marks.last(), Some(&10_000.0));
        s.set_dataset(LaunchDataset::from_records(vec![LaunchRecord::new(
            "A",
            15_600.0,
            Outcome::Success,
            "B5",
        )
        .unwrap()]));
        assert_eq!(s.slider_marks.last(), Some(&15_000.0));
    }

    #[test]
    fn test_marks_coarsen_for_huge_span() {
        let bounds = PayloadRange::new(0.0, 5_000_000.0).unwrap();
        let marks = slider_marks(bounds, 1000.0);
        assert!(marks.len() <= MAX_SLIDER_TICKS + 1);
        assert_eq!(marks[1], 5000.0);
        assert_eq!(marks.last(), Some(&5_000_000.0));
    }

    #[test]
    fn test_set_dataset_resets_selection() {
        let mut s = state();
        s.select_site(SiteSelection::Site("A".into()));
        s.set_payload_range(0.0, 600.0);
        s.set_dataset(LaunchDataset::from_records(vec![LaunchRecord::new(
            "C",
            4000.0,
            Outcome::Failure,
            "B5",
        )
        .unwrap()]));
        assert_eq!(s.site, SiteSelection::All);
        assert_eq!(s.payload_range, PayloadRange::new(4000.0, 4000.0).unwrap());
        assert_eq!(s.outcome_counts, OutcomeCounts { success: 0, failure: 1 });
        assert_eq!(s.scatter_points.len(), 1);
    }

    #[test]
    fn test_empty_dataset_falls_back_to_slider_bounds() {
        let s = AppState::new(LaunchDataset::default(), &DashConfig::default()).unwrap();
        assert_eq!(s.payload_range, PayloadRange::new(0.0, 10_000.0).unwrap());
        assert_eq!(s.outcome_counts.total(), 0);
    }
}
