use std::f32::consts::TAU;
use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate};
use eframe::egui::{self, Color32, Pos2, RichText, ScrollArea, Sense, Shape, Stroke, Ui, Vec2};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints};

use crate::pipeline::{ChartSeries, DriverChart, PieSlice};
use crate::state::AppState;

const NOTICE_COLOR: Color32 = Color32::from_rgb(230, 179, 60);

// ---------------------------------------------------------------------------
// Central panel – charts, notices, statistics
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &AppState) {
    // Notices come first: load failures must stay visible even when no
    // dataset survived and nothing else renders.
    for notice in &state.view.notices {
        ui.label(RichText::new(notice.message()).color(NOTICE_COLOR));
    }

    if !state.view.has_data {
        if state.view.notices.is_empty() {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open SLA spreadsheet files to begin  (File → Open…)");
            });
        }
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if state.view.series.is_empty() {
                return;
            }

            ui.heading("Line Chart");
            line_chart(ui, "sla_line", &state.view.series, state);
            ui.add_space(8.0);

            ui.heading("Bar Chart");
            grouped_bar_chart(ui, "sla_bars", &state.view.series, |name| {
                state.colors.color_for(name)
            });
            ui.add_space(8.0);

            ui.heading("Pie Chart");
            pie_chart(ui, &state.view.pie, state);
            ui.add_space(8.0);

            for chart in &state.view.driver_charts {
                driver_chart(ui, chart);
                ui.add_space(8.0);
            }

            if !state.view.stats.is_empty() {
                ui.heading("Statistical Descriptions");
                stats_table(ui, state);
            }
        });
}

// ---------------------------------------------------------------------------
// Date axis helpers
// ---------------------------------------------------------------------------

/// Plot x coordinate for a date: days since the Common Era.
fn day_number(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn date_label(x: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn x_axis_dates(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    date_label(mark.value)
}

// ---------------------------------------------------------------------------
// Line chart
// ---------------------------------------------------------------------------

fn line_chart(ui: &mut Ui, id: &str, series: &[ChartSeries], state: &AppState) {
    Plot::new(id.to_string())
        .legend(Legend::default())
        .height(260.0)
        .x_axis_formatter(x_axis_dates)
        .label_formatter(|name, point| {
            if name.is_empty() {
                date_label(point.x)
            } else {
                format!("{name}\n{}: {:.2}", date_label(point.x), point.y)
            }
        })
        .show(ui, |plot_ui| {
            for s in series {
                let points: PlotPoints = s
                    .points
                    .iter()
                    .map(|&(date, v)| [day_number(date), v])
                    .collect();
                plot_ui.line(
                    Line::new(points)
                        .name(&s.name)
                        .color(state.colors.color_for(&s.name))
                        .width(1.5),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Grouped bar chart
// ---------------------------------------------------------------------------

/// One bar group per date, one colour per series, side by side within a
/// 0.8-day group envelope.
fn grouped_bar_chart(
    ui: &mut Ui,
    id: &str,
    series: &[ChartSeries],
    color_for: impl Fn(&str) -> Color32,
) {
    let n = series.len().max(1);
    let group_width = 0.8;
    let bar_width = group_width / n as f64;

    Plot::new(id.to_string())
        .legend(Legend::default())
        .height(260.0)
        .x_axis_formatter(x_axis_dates)
        .show(ui, |plot_ui| {
            for (i, s) in series.iter().enumerate() {
                let offset = -group_width / 2.0 + (i as f64 + 0.5) * bar_width;
                let bars: Vec<Bar> = s
                    .points
                    .iter()
                    .map(|&(date, v)| Bar::new(day_number(date) + offset, v).width(bar_width))
                    .collect();
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .name(&s.name)
                        .color(color_for(&s.name)),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Pie chart
// ---------------------------------------------------------------------------

/// egui_plot has no pie primitive; draw a triangle fan with the painter.
/// Non-positive slices (empty window, negative sums) are left out.
fn pie_chart(ui: &mut Ui, slices: &[PieSlice], state: &AppState) {
    let total: f64 = slices.iter().map(|s| s.value.max(0.0)).sum();
    if total <= 0.0 {
        ui.label("No data in the selected date range.");
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        let (rect, _) = ui.allocate_exact_size(Vec2::splat(220.0), Sense::hover());
        let painter = ui.painter_at(rect);
        let center = rect.center();
        let radius = rect.width() / 2.0 - 4.0;

        let mut angle = -TAU / 4.0; // start at 12 o'clock
        for slice in slices {
            if slice.value <= 0.0 {
                continue;
            }
            let sweep = (slice.value / total) as f32 * TAU;
            let steps = ((sweep / 0.05).ceil() as usize).max(2);

            let mut points = Vec::with_capacity(steps + 2);
            points.push(center);
            for i in 0..=steps {
                let a = angle + sweep * i as f32 / steps as f32;
                points.push(Pos2::new(
                    center.x + radius * a.cos(),
                    center.y + radius * a.sin(),
                ));
            }
            painter.add(Shape::convex_polygon(
                points,
                state.colors.color_for(&slice.label),
                Stroke::NONE,
            ));
            angle += sweep;
        }

        // Legend with share of total.
        ui.vertical(|ui: &mut Ui| {
            for slice in slices {
                if slice.value <= 0.0 {
                    continue;
                }
                let pct = slice.value / total * 100.0;
                ui.label(
                    RichText::new(format!("{}  {:.1}%  ({:.2})", slice.label, pct, slice.value))
                        .color(state.colors.color_for(&slice.label)),
                );
            }
        });
    });
}

// ---------------------------------------------------------------------------
// Driver charts
// ---------------------------------------------------------------------------

fn driver_chart(ui: &mut Ui, chart: &DriverChart) {
    ui.heading(format!("Bar Chart for {} Data", chart.title));

    // Driver columns get their own palette, independent of the SLA colours.
    let palette = crate::color::generate_palette(chart.series.len());
    let color_for = |name: &str| {
        chart
            .series
            .iter()
            .position(|s| s.name == name)
            .and_then(|i| palette.get(i).copied())
            .unwrap_or(Color32::GRAY)
    };

    grouped_bar_chart(ui, &format!("driver_{}", chart.title), &chart.series, color_for);
}

// ---------------------------------------------------------------------------
// Statistics table
// ---------------------------------------------------------------------------

fn fmt_stat(v: f64) -> String {
    if v.is_nan() {
        "–".to_string()
    } else {
        format!("{v:.2}")
    }
}

fn stats_table(ui: &mut Ui, state: &AppState) {
    egui::Grid::new("stats_grid")
        .striped(true)
        .min_col_width(80.0)
        .show(ui, |ui: &mut Ui| {
            ui.strong("Column");
            ui.strong("Min");
            ui.strong("Std");
            ui.strong("Max");
            ui.end_row();

            for row in &state.view.stats {
                ui.label(RichText::new(&row.column).color(state.colors.color_for(&row.column)));
                ui.label(fmt_stat(row.min));
                ui.label(fmt_stat(row.std));
                ui.label(fmt_stat(row.max));
                ui.end_row();
            }
        });
}
