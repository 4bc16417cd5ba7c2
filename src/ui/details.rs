use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Selected vehicle: table + image
// ---------------------------------------------------------------------------

/// Render the rows matching the selected brand/model, or a notice when
/// nothing matches.
pub fn selected_vehicle(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };
    let view = &state.view;

    ui.heading(format!("Vehicle details: {} {}", state.filter.brand, state.filter.model));

    if view.has_no_selection() {
        ui.label(
            RichText::new("No data matches the selected filters.")
                .color(Color32::from_rgb(230, 160, 40))
                .strong(),
        );
        return;
    }

    egui::ScrollArea::horizontal()
        .id_salt("details_table")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .max_scroll_height(220.0)
                .columns(Column::auto().at_least(60.0), dataset.columns.len())
                .header(20.0, |mut header| {
                    for col in &dataset.columns {
                        header.col(|ui: &mut Ui| {
                            ui.strong(col);
                        });
                    }
                })
                .body(|mut body| {
                    for record in view.selected_records(dataset) {
                        body.row(18.0, |mut row| {
                            for col in &dataset.columns {
                                row.col(|ui: &mut Ui| {
                                    ui.label(record.get(col).to_string());
                                });
                            }
                        });
                    }
                });
        });

    ui.add_space(8.0);

    match &view.image_reference {
        Some(url) => {
            ui.add(
                egui::Image::from_uri(url.clone())
                    .max_height(260.0)
                    .max_width(ui.available_width()),
            );
            ui.label(format!("{} {}", state.filter.brand, state.filter.model));
        }
        None if view.has_image_column => {
            ui.label("📷 No image available for this vehicle.");
        }
        None => {
            ui.label("📷 The data file has no image links.");
        }
    }
}

/// Headline numbers for the working subset.
pub fn summary(ui: &mut Ui, state: &AppState) {
    let counts = state.view.counts;
    ui.heading("General statistics");
    egui::Grid::new("summary_grid").num_columns(2).show(ui, |ui: &mut Ui| {
        ui.label("Vehicles");
        ui.strong(counts.total.to_string());
        ui.end_row();
        ui.label("Brands");
        ui.strong(counts.distinct_brands.to_string());
        ui.end_row();
        ui.label("Models");
        ui.strong(counts.distinct_models.to_string());
        ui.end_row();
    });
}
