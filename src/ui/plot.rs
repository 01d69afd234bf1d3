use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoints, Points};

use crate::color::{area_color, diverging, internet_color, ColorMap};
use crate::data::aggregate::{Aggregate, AggregateResult, Histogram, Quartiles};
use crate::data::breakdown::{Breakdowns, Crosstab, GroupSummary};
use crate::data::model::{FieldValue, KnowledgeArea};
use crate::state::{AppState, DistributionTab};
use crate::ui::table;

const CHART_HEIGHT: f32 = 360.0;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render every dashboard section from the last computed view.
pub fn dashboard(ui: &mut Ui, state: &mut AppState) {
    let AppState {
        view,
        distribution_tab,
        ..
    } = state;

    ui.heading("ENEM Analysis Dashboard");
    ui.label(
        "Explore student performance across demographic groups, \
         socioeconomic factors and knowledge areas.",
    );

    let Some(view) = view.as_ref() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Fix the filter selection to see results.");
        });
        return;
    };

    metrics_row(ui, &view.aggregates);
    ui.separator();

    if view.aggregates.is_empty() {
        ui.add_space(24.0);
        ui.vertical_centered(|ui: &mut Ui| {
            ui.heading("No matching records");
            ui.label("Widen the filters in the side panel.");
        });
        return;
    }

    ui.heading("Performance by Knowledge Area");
    area_means_chart(ui, &view.aggregates);

    ui.strong("Score Distribution by Knowledge Area");
    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(distribution_tab, DistributionTab::Histograms, "Histograms");
        ui.selectable_value(distribution_tab, DistributionTab::Boxplots, "Boxplots");
    });
    match distribution_tab {
        DistributionTab::Histograms => area_histograms(ui, &view.aggregates),
        DistributionTab::Boxplots => area_boxplots(ui, &view.aggregates),
    }
    ui.separator();

    socioeconomic_section(ui, &view.breakdowns);
    ui.separator();
    demographic_section(ui, &view.breakdowns);
    ui.separator();
    technology_section(ui, &view.breakdowns);
    ui.separator();

    ui.heading("Matching records");
    table::preview_table(ui, &view.preview, view.aggregates.count);

    ui.separator();
    ui.small(
        "Data source: INEP (National Institute for Educational Studies and Research \
         \"Anísio Teixeira\").",
    );
}

fn format_stat(stat: &Aggregate<f64>) -> String {
    match stat {
        Aggregate::Value(v) => format!("{v:.2}"),
        Aggregate::NoData => "no data".to_string(),
    }
}

fn metric(ui: &mut Ui, label: &str, stat: &Aggregate<f64>) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(label);
        ui.label(RichText::new(format_stat(stat)).size(22.0).strong());
    });
}

fn metrics_row(ui: &mut Ui, agg: &AggregateResult) {
    ui.columns(5, |cols: &mut [Ui]| {
        metric(&mut cols[0], "Average Overall Score", &agg.overall_mean);
        let order = [
            KnowledgeArea::NaturalSciences,
            KnowledgeArea::Mathematics,
            KnowledgeArea::HumanSciences,
            KnowledgeArea::Language,
        ];
        for (col, area) in cols[1..].iter_mut().zip(order) {
            metric(col, &format!("Avg {area}"), &agg.area(area).mean);
        }
    });
}

// ---------------------------------------------------------------------------
// Knowledge-area charts
// ---------------------------------------------------------------------------

fn area_means_chart(ui: &mut Ui, agg: &AggregateResult) {
    Plot::new("area_means")
        .legend(Legend::default())
        .height(CHART_HEIGHT * 0.8)
        .x_axis_label("Average Score")
        .show_axes([true, false])
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (pos, (area, mean)) in agg.means_ascending().into_iter().enumerate() {
                let bar = Bar::new(pos as f64, mean).name(format!("{area}: {mean:.2}"));
                let chart = BarChart::new(vec![bar])
                    .name(area.label())
                    .color(area_color(area))
                    .horizontal()
                    .width(0.6);
                plot_ui.bar_chart(chart);
            }
        });
}

fn histogram_chart(hist: &Histogram, name: &str, color: Color32) -> BarChart {
    let bars = hist
        .counts
        .iter()
        .enumerate()
        .map(|(i, &count)| Bar::new(hist.bin_center(i), count as f64).width(hist.bin_width()))
        .collect();
    BarChart::new(bars).name(name).color(color.gamma_multiply(0.7))
}

fn area_histograms(ui: &mut Ui, agg: &AggregateResult) {
    Plot::new("area_histograms")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Score")
        .y_axis_label("Count")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for area in &agg.areas {
                if let Aggregate::Value(hist) = &area.histogram {
                    plot_ui.bar_chart(histogram_chart(hist, area.area.label(), area_color(area.area)));
                }
            }
        });
}

fn box_elem(position: f64, q: &Quartiles, name: &str, color: Color32) -> BoxElem {
    let spread = BoxSpread::new(q.lower_whisker, q.q1, q.median, q.q3, q.upper_whisker);
    BoxElem::new(position, spread)
        .name(name)
        .fill(color.gamma_multiply(0.4))
        .stroke(egui::Stroke::new(1.5, color))
        .box_width(0.5)
}

fn area_boxplots(ui: &mut Ui, agg: &AggregateResult) {
    Plot::new("area_boxplots")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .y_axis_label("Score")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (pos, area) in agg.areas.iter().enumerate() {
                if let Aggregate::Value(q) = &area.quartiles {
                    let color = area_color(area.area);
                    let elem = box_elem(pos as f64, q, area.area.label(), color);
                    plot_ui.box_plot(BoxPlot::new(vec![elem]).name(area.area.label()).color(color));
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Breakdown charts
// ---------------------------------------------------------------------------

fn group_bars(groups: &[GroupSummary], value: impl Fn(&GroupSummary) -> f64) -> Vec<(String, Bar)> {
    groups
        .iter()
        .enumerate()
        .map(|(pos, g)| {
            let label = group_label(&g.key);
            let bar = Bar::new(pos as f64, value(g)).name(&label).width(0.6);
            (label, bar)
        })
        .collect()
}

fn group_label(key: &FieldValue) -> String {
    match key {
        FieldValue::Flag(true) => "Has Internet".to_string(),
        FieldValue::Flag(false) => "No Internet".to_string(),
        other => other.to_string(),
    }
}

/// One coloured bar series per group, so the legend names each group.
fn group_bar_chart(ui: &mut Ui, id: &str, y_label: &str, groups: &[GroupSummary], value: impl Fn(&GroupSummary) -> f64) {
    let colors = ColorMap::new(groups.iter().map(|g| &g.key));
    Plot::new(id)
        .legend(Legend::default())
        .height(CHART_HEIGHT * 0.8)
        .y_axis_label(y_label)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for ((label, bar), g) in group_bars(groups, &value).into_iter().zip(groups) {
                plot_ui.bar_chart(BarChart::new(vec![bar]).name(label).color(colors.color_for(&g.key)));
            }
        });
}

fn group_box_chart(ui: &mut Ui, id: &str, groups: &[GroupSummary]) {
    let colors = ColorMap::new(groups.iter().map(|g| &g.key));
    Plot::new(id)
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .y_axis_label("Score")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (pos, g) in groups.iter().enumerate() {
                let label = group_label(&g.key);
                let color = colors.color_for(&g.key);
                let elem = box_elem(pos as f64, &g.quartiles, &label, color);
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(label).color(color));
            }
        });
}

fn socioeconomic_section(ui: &mut Ui, b: &Breakdowns) {
    ui.heading("Socioeconomic Analysis");

    ui.strong("Average Score by Family Income");
    let series: Vec<[f64; 2]> = b.by_income.iter().filter_map(|g| Some([g.key.as_f64()?, g.mean])).collect();
    Plot::new("income_line")
        .height(CHART_HEIGHT)
        .x_axis_label("Family Income (R$)")
        .y_axis_label("Average Score")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            let points: PlotPoints = series.iter().copied().collect();
            plot_ui.line(Line::new(points).name("Average").width(2.0));
            let markers: PlotPoints = series.iter().copied().collect();
            plot_ui.points(Points::new(markers).radius(3.5));
        });

    ui.strong("Distribution of Score Ranges Within Each Income Level");
    match &b.crosstab {
        Aggregate::Value(tab) => crosstab_grid(ui, tab),
        Aggregate::NoData => {
            ui.label("No data");
        }
    }
}

fn crosstab_grid(ui: &mut Ui, tab: &Crosstab) {
    egui::ScrollArea::horizontal()
        .id_salt("crosstab_scroll")
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("crosstab").spacing([2.0, 2.0]).show(ui, |ui: &mut Ui| {
                ui.label("Income level");
                for i in 0..tab.bin_edges.len() {
                    ui.small(tab.bin_label(i));
                }
                ui.end_row();

                for (income, shares) in tab.rows.iter().zip(&tab.shares) {
                    ui.label(format!("Up to R${income:.2}"));
                    for &share in shares {
                        let fg = if (0.25..=0.75).contains(&share) {
                            Color32::BLACK
                        } else {
                            Color32::WHITE
                        };
                        ui.label(
                            RichText::new(format!("{:>5.1}%", share * 100.0))
                                .monospace()
                                .color(fg)
                                .background_color(diverging(share)),
                        );
                    }
                    ui.end_row();
                }
            });
        });
}

fn demographic_section(ui: &mut Ui, b: &Breakdowns) {
    ui.heading("Demographic Analysis");
    ui.strong("Gender Analysis");

    ui.columns(2, |cols: &mut [Ui]| {
        group_bar_chart(&mut cols[0], "gender_counts", "Count", &b.by_gender, |g| g.count as f64);
        group_bar_chart(&mut cols[1], "gender_means", "Average Score", &b.by_gender, |g| g.mean);
    });

    ui.strong("Distribution of Overall Scores by Gender");
    group_box_chart(ui, "gender_box", &b.by_gender);
}

fn technology_section(ui: &mut Ui, b: &Breakdowns) {
    ui.heading("Technology Access Analysis");

    ui.strong("Score Distribution by Internet Access");
    Plot::new("internet_histograms")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Average")
        .y_axis_label("Count")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (flag, hist) in &b.internet_histograms {
                let name = group_label(&FieldValue::Flag(*flag));
                plot_ui.bar_chart(histogram_chart(hist, &name, internet_color(*flag)));
            }
        });

    ui.strong("Score Distribution by Number of Computers");
    group_box_chart(ui, "computers_box", &b.by_computers);

    ui.strong("Score vs Number of Computers by Internet Access");
    Plot::new("computers_lines")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Number of Computers at Home")
        .y_axis_label("Average Score")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (flag, line) in &b.computers_lines {
                let name = format!("{} Internet (avg)", if *flag { "With" } else { "Without" });
                let points: PlotPoints = line.iter().map(|&(n, m)| [f64::from(n), m]).collect();
                plot_ui.line(Line::new(points).name(&name).color(internet_color(*flag)).width(3.0));
            }
        });

    ui.strong("Distribution of Students by Technology Access");
    ui.columns(2, |cols: &mut [Ui]| {
        group_bar_chart(&mut cols[0], "internet_counts", "Count", &b.by_internet, |g| g.count as f64);
        group_bar_chart(&mut cols[1], "computer_counts", "Count", &b.by_computers, |g| g.count as f64);
    });
}
