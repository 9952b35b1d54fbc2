use std::collections::BTreeMap;

use eframe::egui::Ui;
use egui_plot::{Legend, MarkerShape, Plot, PlotPoints, Points};

use crate::data::query::ScatterPoint;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Payload vs. outcome scatter (central panel, below the pie)
// ---------------------------------------------------------------------------

/// Split points into one `[payload, class]` series per booster category,
/// categories sorted, points in source order.
pub fn series_by_category(points: &[ScatterPoint]) -> BTreeMap<&str, Vec<[f64; 2]>> {
    let mut series: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for p in points {
        series
            .entry(p.booster_category.as_str())
            .or_default()
            .push([p.payload_mass_kg, p.outcome.as_class()]);
    }
    series
}

/// Render the scatter chart for the current selection and payload range.
pub fn payload_scatter(ui: &mut Ui, state: &AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.strong(state.site.scatter_title());
    });

    let range = state.payload_range;

    Plot::new("payload_scatter")
        .legend(Legend::default())
        .x_axis_label("Payload Mass (kg)")
        .y_axis_label("Launch Outcome (0 = Failed, 1 = Success)")
        .include_x(range.low())
        .include_x(range.high())
        .include_y(-0.25)
        .include_y(1.25)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (category, series) in series_by_category(&state.scatter_points) {
                let points: PlotPoints = series.into_iter().collect();
                plot_ui.points(
                    Points::new(points)
                        .name(category)
                        .color(state.color_map.color_for(category))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(5.0),
                );
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Outcome;

    fn point(payload: f64, outcome: Outcome, booster: &str) -> ScatterPoint {
        ScatterPoint {
            payload_mass_kg: payload,
            outcome,
            booster_category: booster.to_string(),
        }
    }

    #[test]
    fn test_series_grouped_by_category() {
        let points = vec![
            point(500.0, Outcome::Success, "FT"),
            point(1500.0, Outcome::Failure, "v1.1"),
            point(800.0, Outcome::Success, "FT"),
        ];
        let series = series_by_category(&points);
        assert_eq!(series.keys().copied().collect::<Vec<_>>(), vec!["FT", "v1.1"]);
        assert_eq!(series["FT"], vec![[500.0, 1.0], [800.0, 1.0]]);
        assert_eq!(series["v1.1"], vec![[1500.0, 0.0]]);
    }

    #[test]
    fn test_no_points_no_series() {
        assert!(series_by_category(&[]).is_empty());
    }
}
