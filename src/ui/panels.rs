use eframe::egui::{self, Color32, RichText, Slider, Ui};

use crate::data::query::SiteSelection;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – site dropdown and payload slider
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    // ---- Site dropdown ----
    ui.strong("Launch Site");
    let mut selected = state.site.clone();
    egui::ComboBox::from_id_salt("site_dropdown")
        .selected_text(selected.to_string())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            ui.add(
                egui::TextEdit::singleline(&mut state.site_filter)
                    .hint_text("Select a Launch Site here")
                    .desired_width(f32::INFINITY),
            );
            ui.separator();
            ui.selectable_value(&mut selected, SiteSelection::All, "All Sites");
            for site in matching_sites(state.dataset.sites(), &state.site_filter) {
                ui.selectable_value(&mut selected, SiteSelection::Site(site.to_owned()), site);
            }
        });
    state.select_site(selected);

    ui.add_space(8.0);
    ui.separator();

    // ---- Payload range slider ----
    ui.strong("Payload range (Kg):");
    let bounds = state.slider_bounds.low()..=state.slider_bounds.high();
    let mut low = state.payload_range.low();
    let mut high = state.payload_range.high();

    let low_moved = ui
        .add(
            Slider::new(&mut low, bounds.clone())
                .step_by(state.slider_step)
                .text("from"),
        )
        .changed();
    let high_moved = ui
        .add(Slider::new(&mut high, bounds).step_by(state.slider_step).text("to"))
        .changed();

    if low_moved || high_moved {
        let (low, high) = linked_handles(low, high, low_moved);
        state.set_payload_range(low, high);
    }

    let marks = state
        .slider_marks
        .iter()
        .map(|m| format!("{m}"))
        .collect::<Vec<_>>()
        .join(" · ");
    ui.label(RichText::new(marks).small().weak());
}

/// Sites whose name contains `query`, ignoring case, in dataset order.
/// A blank query keeps every site.
pub fn matching_sites<'a>(sites: &'a [String], query: &str) -> Vec<&'a str> {
    let query = query.trim().to_lowercase();
    sites
        .iter()
        .map(String::as_str)
        .filter(|site| site.to_lowercase().contains(&query))
        .collect()
}

/// Keep the two slider handles ordered: the handle that moved pushes the
/// other one along instead of crossing it.
pub fn linked_handles(low: f64, high: f64, low_moved: bool) -> (f64, f64) {
    if low <= high {
        (low, high)
    } else if low_moved {
        (low, low)
    } else {
        (high, high)
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} launches loaded, {} in view",
            state.dataset.len(),
            state.scatter_points.len()
        ));

        if let Some(rate) = state.outcome_counts.success_rate() {
            ui.separator();
            ui.label(format!("{}: {:.1}% success", state.site, rate * 100.0));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open launch records")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => state.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sites() -> Vec<String> {
        ["CCAFS LC-40", "VAFB SLC-4E", "KSC LC-39A", "CCAFS SLC-40"]
            .map(String::from)
            .to_vec()
    }

    #[test]
    fn test_blank_search_lists_every_site() {
        let sites = sites();
        assert_eq!(matching_sites(&sites, ""), sites);
        assert_eq!(matching_sites(&sites, "   "), sites);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let sites = sites();
        assert_eq!(matching_sites(&sites, "ccafs"), ["CCAFS LC-40", "CCAFS SLC-40"]);
        assert_eq!(matching_sites(&sites, " slc "), ["VAFB SLC-4E", "CCAFS SLC-40"]);
        assert_eq!(matching_sites(&sites, "39a"), ["KSC LC-39A"]);
        assert!(matching_sites(&sites, "Boca Chica").is_empty());
    }

    #[test]
    fn test_handles_in_order_untouched() {
        assert_eq!(linked_handles(1000.0, 5000.0, true), (1000.0, 5000.0));
        assert_eq!(linked_handles(3000.0, 3000.0, false), (3000.0, 3000.0));
    }

    #[test]
    fn test_moving_low_past_high_pushes_high() {
        assert_eq!(linked_handles(6000.0, 5000.0, true), (6000.0, 6000.0));
    }

    #[test]
    fn test_moving_high_below_low_pushes_low() {
        assert_eq!(linked_handles(6000.0, 5000.0, false), (5000.0, 5000.0));
    }
}
