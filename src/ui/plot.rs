use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::color::series_palette;
use crate::data::model::Table;
use crate::data::transform::{self, CHART_COLUMNS};

// ---------------------------------------------------------------------------
// Bar chart of the numeric column subset
// ---------------------------------------------------------------------------

/// Render the first numeric columns (at most [`CHART_COLUMNS`]) as grouped
/// bars, one group per row, series offset side by side. Holes produce no
/// bar. Falls back to a hint when nothing is chartable.
pub fn numeric_bar_chart(ui: &mut Ui, table: &Table) {
    let subset = transform::numeric_columns(table, CHART_COLUMNS);
    if subset.is_empty() {
        ui.label("No numeric columns to chart.");
        return;
    }

    let colors = series_palette(subset.column_count());
    let series = subset.column_count() as f64;
    let bar_width = 0.8 / series;

    Plot::new("numeric_bar_chart")
        .legend(Legend::default())
        .x_axis_label("Row")
        .y_axis_label("Value")
        .height(280.0)
        .show(ui, |plot_ui| {
            for (series_index, column) in subset.columns.iter().enumerate() {
                let offset = (series_index as f64 - (series - 1.0) / 2.0) * bar_width;
                let bars: Vec<Bar> = column
                    .values
                    .iter()
                    .enumerate()
                    .filter_map(|(row, value)| {
                        value
                            .as_f64()
                            .map(|v| Bar::new(row as f64 + offset, v).width(bar_width))
                    })
                    .collect();

                let chart = BarChart::new(bars)
                    .name(column.name.as_str())
                    .color(colors[series_index]);

                plot_ui.bar_chart(chart);
            }
        });
}
