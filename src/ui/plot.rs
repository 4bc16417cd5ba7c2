use std::collections::BTreeMap;

use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoints, Points};

use crate::data::filter::by_count;
use crate::state::AppState;

const CHART_HEIGHT: f32 = 240.0;

// ---------------------------------------------------------------------------
// Charts (central panel)
// ---------------------------------------------------------------------------

/// Render every chart whose data is available in the current view.
pub fn charts(ui: &mut Ui, state: &AppState) {
    let view = &state.view;

    if let Some(hp) = view.horsepower_distribution.as_ref().filter(|v| !v.is_empty()) {
        ui.heading("⚡ Horsepower distribution");
        horsepower_chart(ui, hp);
    }

    if let Some(fuels) = &view.fuel_type_distribution {
        ui.heading("⛽ Vehicles by fuel type");
        category_chart(ui, "fuel_chart", fuels, |name| {
            state
                .fuel_colors
                .as_ref()
                .map_or(Color32::LIGHT_BLUE, |cm| cm.color_for(Some(name)))
        });
    }

    if let Some(makes) = &view.make_distribution {
        ui.heading("🏢 Vehicles per brand");
        category_chart(ui, "make_chart", makes, |_| Color32::LIGHT_BLUE);
    }

    if view.year_vs_horsepower.is_some() {
        ui.heading("📊 Year vs horsepower (by fuel type)");
        year_vs_horsepower(ui, state);
    }
}

/// One bar per vehicle, in working-subset order.
fn horsepower_chart(ui: &mut Ui, values: &[f64]) {
    let bars: Vec<Bar> = values
        .iter()
        .enumerate()
        .map(|(i, &hp)| Bar::new(i as f64, hp).width(0.8))
        .collect();

    Plot::new("horsepower_chart")
        .height(CHART_HEIGHT)
        .y_axis_label("HP")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("horsepower").color(Color32::LIGHT_BLUE));
        });
}

/// Bar chart of a category → count mapping, largest first.
fn category_chart(
    ui: &mut Ui,
    id: &str,
    distribution: &BTreeMap<String, usize>,
    color_for: impl Fn(&str) -> Color32,
) {
    let entries = by_count(distribution);
    let labels: Vec<String> = entries.iter().map(|(name, _)| name.to_string()).collect();
    let bars: Vec<Bar> = entries
        .iter()
        .enumerate()
        .map(|(i, &(name, count))| {
            Bar::new(i as f64, count as f64)
                .name(name)
                .fill(color_for(name))
                .width(0.7)
        })
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .y_axis_label("count")
        .allow_scroll(false)
        .x_axis_formatter(move |mark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() > f64::EPSILON || i < 0.0 {
                return String::new();
            }
            labels.get(i as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

/// Scatter of year × horsepower, one series per fuel type.
fn year_vs_horsepower(ui: &mut Ui, state: &AppState) {
    let Some(points) = &state.view.year_vs_horsepower else {
        return;
    };

    let mut series: BTreeMap<Option<&str>, Vec<[f64; 2]>> = BTreeMap::new();
    for p in points {
        series
            .entry(p.fuel_type.as_deref())
            .or_default()
            .push([p.year, p.horsepower]);
    }

    Plot::new("year_vs_horsepower")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Horsepower (HP)")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (fuel, coords) in series {
                let color = state
                    .fuel_colors
                    .as_ref()
                    .map_or(Color32::LIGHT_BLUE, |cm| cm.color_for(fuel));
                plot_ui.points(
                    Points::new(PlotPoints::from(coords))
                        .name(fuel.unwrap_or("Unknown"))
                        .color(color)
                        .radius(3.5),
                );
            }
        });
}
