use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::{Attribute, ExamRecord, KnowledgeArea};

/// Scrollable preview of the first matching records.
pub fn preview_table(ui: &mut Ui, rows: &[ExamRecord], total: usize) {
    ui.label(format!("Showing {} of {total} matching records", rows.len()));

    TableBuilder::new(ui)
        .id_salt("preview_table")
        .striped(true)
        .max_scroll_height(280.0)
        .columns(Column::auto().at_least(70.0), Attribute::ALL.len())
        .header(20.0, |mut header| {
            for attr in Attribute::ALL {
                header.col(|ui: &mut Ui| {
                    ui.strong(attr.column_name());
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let rec = &rows[row.index()];
                row.col(|ui: &mut Ui| {
                    ui.label(&rec.id);
                });
                for area in KnowledgeArea::ALL {
                    row.col(|ui: &mut Ui| {
                        ui.label(format!("{:.1}", rec.score(area)));
                    });
                }
                row.col(|ui: &mut Ui| {
                    ui.label(&rec.gender);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format!("{:.2}", rec.family_income));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(if rec.internet_access { "Yes" } else { "No" });
                });
                row.col(|ui: &mut Ui| {
                    ui.label(rec.computer_count.to_string());
                });
            });
        });
}
