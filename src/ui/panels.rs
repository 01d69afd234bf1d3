use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::KnowledgeArea;
use crate::state::{AppState, FilterSelections};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel, then recompute the view if anything changed.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Data Overview");
    ui.label(format!("Total Students: {}", state.table.len()));
    ui.separator();

    ui.heading("Filters");

    let table = &state.table;
    let sel = &mut state.selections;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Knowledge area + minimum score ----
            ui.strong("Filter by Knowledge Area");
            let before = sel.knowledge_area;
            egui::ComboBox::from_id_salt("knowledge_area")
                .selected_text(sel.knowledge_area.map_or("All", KnowledgeArea::label))
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut sel.knowledge_area, None, "All");
                    for area in KnowledgeArea::ALL {
                        ui.selectable_value(&mut sel.knowledge_area, Some(area), area.label());
                    }
                });
            if let Some(area) = sel.knowledge_area {
                let (lo, hi) = table.score_range(area);
                if before != sel.knowledge_area {
                    sel.min_score = lo;
                }
                ui.add(
                    egui::Slider::new(&mut sel.min_score, lo..=hi)
                        .step_by(10.0)
                        .text(format!("Minimum {area} Score")),
                );
            }
            ui.add_space(6.0);

            // ---- Gender ----
            ui.strong("Gender");
            egui::ComboBox::from_id_salt("gender")
                .selected_text(sel.gender.as_deref().unwrap_or("All"))
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut sel.gender, None, "All");
                    for g in &table.genders {
                        ui.selectable_value(&mut sel.gender, Some(g.clone()), g);
                    }
                });
            ui.add_space(6.0);

            // ---- Family income range ----
            ui.strong("Family Income (R$)");
            ui.small(format!("{} income levels", table.income_levels.len()));
            let (lo, hi) = table.income_range;
            let step = if hi - lo >= 1000.0 { 1000.0 } else { 0.0 };
            ui.add(egui::Slider::new(&mut sel.income.0, lo..=hi).step_by(step).text("from"));
            ui.add(egui::Slider::new(&mut sel.income.1, lo..=hi).step_by(step).text("to"));
            // the widgets must never produce an inverted range
            if sel.income.0 > sel.income.1 {
                sel.income.1 = sel.income.0;
            }
            ui.add_space(6.0);

            // ---- Internet access ----
            ui.strong("Internet Access");
            let internet_text = match sel.internet_access {
                None => "All",
                Some(true) => "Yes",
                Some(false) => "No",
            };
            egui::ComboBox::from_id_salt("internet")
                .selected_text(internet_text)
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut sel.internet_access, None, "All");
                    ui.selectable_value(&mut sel.internet_access, Some(true), "Yes");
                    ui.selectable_value(&mut sel.internet_access, Some(false), "No");
                });
            ui.add_space(6.0);

            // ---- Number of computers ----
            ui.strong("Number of Computers");
            egui::ComboBox::from_id_salt("computers")
                .selected_text(sel.computer_count.map_or("All".to_string(), |n| n.to_string()))
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut sel.computer_count, None, "All");
                    for &n in &table.computer_counts {
                        ui.selectable_value(&mut sel.computer_count, Some(n), n.to_string());
                    }
                });
            ui.add_space(10.0);

            if ui.button("Reset filters").clicked() {
                *sel = FilterSelections::for_table(table);
            }
        });

    state.refresh();

    ui.separator();
    ui.label(format!("Filtered Students: {}", state.filtered_count()));
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
            "{}: {} records loaded, {} matching",
            state.source.display(),
            state.table.len(),
            state.filtered_count()
        ));

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
        .set_title("Open exam results")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
