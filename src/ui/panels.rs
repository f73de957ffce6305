use std::path::Path;

use anyhow::Context;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::Table;
use crate::data::transform::{self, PREVIEW_ROWS};
use crate::data::writer::ExportFormat;
use crate::state::{AppState, FileSession};
use crate::ui::plot;

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

        if !state.sessions.is_empty() {
            ui.label(format!("{} file(s) loaded", state.sessions.len()));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – loaded files
// ---------------------------------------------------------------------------

/// Render the file list. Clicking a name focuses it, the small button drops
/// it.
pub fn file_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Files");
    ui.separator();

    if state.sessions.is_empty() {
        ui.label("No files loaded.");
        return;
    }

    let mut remove: Option<usize> = None;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (index, session) in state.sessions.iter().enumerate() {
                ui.horizontal(|ui: &mut Ui| {
                    if ui.small_button("✕").clicked() {
                        remove = Some(index);
                    }
                    let focused = state.active == Some(index);
                    if ui
                        .selectable_label(focused, &session.file_name)
                        .clicked()
                    {
                        state.active = Some(index);
                    }
                });
            }
        });

    if let Some(index) = remove {
        state.remove_session(index);
    }
}

// ---------------------------------------------------------------------------
// Central panel – the per-file workbench
// ---------------------------------------------------------------------------

/// Render the focused file: previews, cleaning and selection controls, the
/// optional chart, and the export row.
pub fn detail_panel(ui: &mut Ui, state: &mut AppState) {
    let Some(session) = state.active_session_mut() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a CSV or Excel file to begin (File → Open…)");
        });
        return;
    };

    ui.heading(&session.file_name);
    ui.label(format!(
        "{} rows, {} columns ({})",
        session.original.row_count(),
        session.original.column_count(),
        session.source_format.name()
    ));
    if let Some(notice) = &session.notice {
        ui.label(RichText::new(notice).color(Color32::DARK_GREEN));
    }
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Source preview");
            preview_table(
                ui,
                "source_preview",
                &transform::preview(&session.original, PREVIEW_ROWS),
                session.original.row_count(),
            );
            ui.separator();

            let mut fill = session.fill_missing;
            if ui
                .checkbox(&mut fill, "Fill missing numeric values with column means")
                .changed()
            {
                session.set_fill_missing(fill);
            }
            column_selector(ui, session);
            ui.separator();

            ui.strong("Result preview");
            preview_table(
                ui,
                "result_preview",
                &transform::preview(&session.current, PREVIEW_ROWS),
                session.current.row_count(),
            );
            ui.separator();

            ui.checkbox(&mut session.show_chart, "Show bar chart");
            if session.show_chart {
                plot::numeric_bar_chart(ui, &session.current);
            }
            ui.separator();

            ui.horizontal(|ui: &mut Ui| {
                ui.label("Convert to:");
                ui.radio_value(&mut session.export_format, ExportFormat::Csv, "CSV");
                ui.radio_value(&mut session.export_format, ExportFormat::Xlsx, "Excel");
            });
            if ui
                .button(format!("Download as {}", session.export_format.name()))
                .clicked()
            {
                save_export(session);
            }
            ui.small(format!("will save as {}", session.output_file_name()));
        });
}

/// Collapsible column checklist with select all / none shortcuts, counts in
/// the header.
fn column_selector(ui: &mut Ui, session: &mut FileSession) {
    let names: Vec<String> = session.original.column_names().map(str::to_string).collect();
    let header_text = format!(
        "Columns  ({}/{})",
        session.selected_columns.len(),
        names.len()
    );

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt("column_selector")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    session.select_all_columns();
                }
                if ui.small_button("None").clicked() {
                    session.select_no_columns();
                }
            });

            for name in &names {
                let mut checked = session.selected_columns.contains(name);
                if ui.checkbox(&mut checked, name).changed() {
                    session.toggle_column(name);
                }
            }
        });
}

/// Render the first rows of a table as a striped grid. `total_rows` is the
/// source row count, mentioned when the preview is truncated.
fn preview_table(ui: &mut Ui, id: &str, table: &Table, total_rows: usize) {
    if table.is_empty() {
        ui.label("No columns selected.");
        return;
    }

    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .columns(TableColumn::auto().at_least(60.0), table.column_count())
            .header(20.0, |mut header| {
                for column in &table.columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(column.name.as_str());
                    });
                }
            })
            .body(|mut body| {
                body.rows(18.0, table.row_count(), |mut row| {
                    let row_index = row.index();
                    for column in &table.columns {
                        row.col(|ui: &mut Ui| {
                            ui.label(column.values[row_index].to_string());
                        });
                    }
                });
            });
    });

    if total_rows > table.row_count() {
        ui.small(format!(
            "showing first {} of {total_rows} rows",
            table.row_count()
        ));
    }
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let Some(paths) = rfd::FileDialog::new()
        .set_title("Open tabular data")
        .add_filter("Tabular files", &["csv", "xlsx"])
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xlsx"])
        .pick_files()
    else {
        return;
    };

    for path in paths {
        match read_upload(&path) {
            Ok((name, bytes)) => state.add_file(name, &bytes),
            Err(e) => {
                log::error!("failed to read {}: {e:#}", path.display());
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

fn read_upload(path: &Path) -> anyhow::Result<(String, Vec<u8>)> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .with_context(|| format!("invalid file name: {}", path.display()))?;
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok((name, bytes))
}

fn save_export(session: &mut FileSession) {
    let Some(path) = rfd::FileDialog::new()
        .set_title("Save converted file")
        .set_file_name(session.output_file_name())
        .save_file()
    else {
        return;
    };

    match write_export(session, &path) {
        Ok(rows) => {
            log::info!(
                "saved {:?} as {} ({})",
                session.file_name,
                path.display(),
                session.export_format.mime_type()
            );
            session.notice = Some(format!("Saved {rows} rows to {}", path.display()));
        }
        Err(e) => {
            log::error!("failed to save {}: {e:#}", path.display());
            session.notice = Some(format!("Save failed: {e:#}"));
        }
    }
}

fn write_export(session: &FileSession, path: &Path) -> anyhow::Result<usize> {
    let output = session.export()?;
    std::fs::write(path, &output.bytes)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(output.table.row_count())
}
