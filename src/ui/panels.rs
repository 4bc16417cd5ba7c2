use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::{HORSEPOWER, YEAR};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – selection and filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Vehicle");
    ui.separator();

    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Brand / model (from the unfiltered dataset) ----
            ui.strong("Brand");
            let current_brand = state.filter.brand.clone();
            egui::ComboBox::from_id_salt("brand")
                .selected_text(&current_brand)
                .width(ui.available_width())
                .show_ui(ui, |ui: &mut Ui| {
                    for brand in dataset.brands() {
                        if ui.selectable_label(current_brand == brand, brand).clicked() {
                            state.select_brand(brand);
                        }
                    }
                });

            ui.strong("Model");
            let current_model = state.filter.model.clone();
            egui::ComboBox::from_id_salt("model")
                .selected_text(&current_model)
                .width(ui.available_width())
                .show_ui(ui, |ui: &mut Ui| {
                    for model in dataset.models_for(&state.filter.brand) {
                        if ui.selectable_label(current_model == model, model).clicked() {
                            state.select_model(model);
                        }
                    }
                });

            ui.add_space(8.0);
            ui.heading("Advanced filters");
            ui.separator();

            // ---- Year range ----
            if let (Some((lo, hi)), Some(range)) = (dataset.numeric_bounds(YEAR), state.filter.year) {
                let (mut min, mut max) = (range.min.round() as i64, range.max.round() as i64);
                let bounds = lo.floor() as i64..=hi.ceil() as i64;
                ui.strong("Year");
                let changed = ui.add(egui::Slider::new(&mut min, bounds.clone()).text("from")).changed()
                    | ui.add(egui::Slider::new(&mut max, bounds).text("to")).changed();
                if changed {
                    state.set_year_range(min as f64, max as f64);
                }
            }

            // ---- Horsepower range ----
            if let (Some((lo, hi)), Some(range)) =
                (dataset.numeric_bounds(HORSEPOWER), state.filter.horsepower)
            {
                let (mut min, mut max) = (range.min, range.max);
                ui.strong("Horsepower (HP)");
                let changed = ui.add(egui::Slider::new(&mut min, lo..=hi).text("min")).changed()
                    | ui.add(egui::Slider::new(&mut max, lo..=hi).text("max")).changed();
                if changed {
                    state.set_horsepower_range(min, max);
                }
            }

            // ---- Fuel types ----
            if let Some(fuels) = dataset.fuel_types() {
                let n_selected = state.filter.fuel_types.as_ref().map_or(0, |s| s.len());
                let header_text = format!("Fuel type  ({n_selected}/{})", fuels.len());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt("fuel_type")
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all_fuel_types();
                            }
                            if ui.small_button("None").clicked() {
                                state.select_no_fuel_types();
                            }
                        });

                        for fuel in fuels {
                            let mut checked = state
                                .filter
                                .fuel_types
                                .as_ref()
                                .is_some_and(|s| s.contains(fuel));
                            let mut text = RichText::new(fuel);
                            if let Some(cm) = &state.fuel_colors {
                                text = text.color(cm.color_for(Some(fuel)));
                            }
                            if ui.checkbox(&mut checked, text).changed() {
                                state.toggle_fuel_type(fuel);
                            }
                        }
                    });
            }
        });
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

        if let (Some(ds), Some(source)) = (&state.dataset, &state.source) {
            ui.label(format!(
                "{}: {} vehicles loaded, {} match filters",
                source.display(),
                ds.len(),
                state.view.working.len()
            ));
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
        .set_title("Open vehicle data")
        .add_filter("Delimited text", &["csv", "tsv", "tab", "txt"])
        .add_filter("CSV", &["csv"])
        .add_filter("TSV", &["tsv", "tab"])
        .pick_file();

    if let Some(path) = file {
        // The error is already shown through `status_message`.
        if let Err(e) = state.open(&path) {
            log::debug!("Keeping previous dataset after failed open: {e}");
        }
    }
}
