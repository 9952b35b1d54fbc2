use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::epaint::Mesh;
use eframe::egui::{self, Color32, Pos2, Sense, Shape, Ui, Vec2};

use crate::color::outcome_color;
use crate::data::model::Outcome;
use crate::data::query::OutcomeCounts;
use crate::state::AppState;

const PIE_SIZE: f32 = 260.0;
/// Triangles in a full circle; a slice gets its share.
const FULL_CIRCLE_SEGMENTS: f32 = 128.0;

// ---------------------------------------------------------------------------
// Slice geometry
// ---------------------------------------------------------------------------

/// One wedge of the pie. Angles are in radians, screen orientation
/// (clockwise, starting at twelve o'clock).
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub outcome: Outcome,
    pub count: usize,
    pub fraction: f64,
    pub start_angle: f32,
    pub end_angle: f32,
}

/// Lay out one slice per non-zero outcome. Empty counts give no slices.
pub fn pie_slices(counts: &OutcomeCounts) -> Vec<PieSlice> {
    let total = counts.total();
    if total == 0 {
        return Vec::new();
    }
    let mut angle = -FRAC_PI_2;
    counts
        .iter()
        .filter(|&(_, count)| count > 0)
        .map(|(outcome, count)| {
            let fraction = count as f64 / total as f64;
            let start_angle = angle;
            angle += fraction as f32 * TAU;
            PieSlice {
                outcome,
                count,
                fraction,
                start_angle,
                end_angle: angle,
            }
        })
        .collect()
}

fn slice_mesh(center: Pos2, radius: f32, slice: &PieSlice, color: Color32) -> Mesh {
    let sweep = slice.end_angle - slice.start_angle;
    let segments = ((sweep / TAU) * FULL_CIRCLE_SEGMENTS).ceil().max(1.0) as u32;

    let mut mesh = Mesh::default();
    mesh.colored_vertex(center, color);
    for i in 0..=segments {
        let a = slice.start_angle + sweep * i as f32 / segments as f32;
        mesh.colored_vertex(center + radius * Vec2::angled(a), color);
    }
    for i in 1..=segments {
        mesh.add_triangle(0, i, i + 1);
    }
    mesh
}

// ---------------------------------------------------------------------------
// Pie chart widget
// ---------------------------------------------------------------------------

/// Success / failure pie for the selected site, with a legend beside it.
pub fn outcome_pie(ui: &mut Ui, state: &AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.strong(state.site.pie_title());
    });

    let slices = pie_slices(&state.outcome_counts);
    if slices.is_empty() {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.label("No launches for this selection");
        });
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        let (rect, _) = ui.allocate_exact_size(Vec2::splat(PIE_SIZE), Sense::hover());
        let painter = ui.painter_at(rect);
        let radius = PIE_SIZE * 0.45;
        for slice in &slices {
            let mesh = slice_mesh(rect.center(), radius, slice, outcome_color(slice.outcome));
            painter.add(Shape::mesh(mesh));
        }

        ui.vertical(|ui: &mut Ui| {
            for slice in &slices {
                ui.colored_label(
                    outcome_color(slice.outcome),
                    format!(
                        "■ {}: {} ({:.1}%)",
                        slice.outcome,
                        slice.count,
                        slice.fraction * 100.0
                    ),
                );
            }
            ui.add_space(4.0);
            ui.label(egui::RichText::new(format!("{} launches", state.outcome_counts.total())).weak());
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_slices_for_empty_counts() {
        assert!(pie_slices(&OutcomeCounts::default()).is_empty());
    }

    #[test]
    fn test_slices_cover_full_circle() {
        let slices = pie_slices(&OutcomeCounts { success: 3, failure: 1 });
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].outcome, Outcome::Success);
        assert_eq!(slices[0].fraction, 0.75);
        assert_eq!(slices[0].start_angle, -FRAC_PI_2);
        assert_eq!(slices[0].end_angle, slices[1].start_angle);
        assert!((slices[1].end_angle - (TAU - FRAC_PI_2)).abs() < 1e-5);
    }

    #[test]
    fn test_zero_count_outcome_skipped() {
        let slices = pie_slices(&OutcomeCounts { success: 0, failure: 4 });
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].outcome, Outcome::Failure);
        assert_eq!(slices[0].fraction, 1.0);
    }

    #[test]
    fn test_mesh_is_a_triangle_fan() {
        let slice = &pie_slices(&OutcomeCounts { success: 1, failure: 1 })[0];
        let mesh = slice_mesh(Pos2::ZERO, 10.0, slice, Color32::WHITE);
        let segments = (FULL_CIRCLE_SEGMENTS / 2.0) as usize;
        assert_eq!(mesh.vertices.len(), segments + 2);
        assert_eq!(mesh.indices.len(), segments * 3);
    }
}
