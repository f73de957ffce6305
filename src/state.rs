use std::collections::BTreeSet;

use crate::data::error::DataResult;
use crate::data::loader::{self, SourceFormat};
use crate::data::model::Table;
use crate::data::transform::{self, PipelineOptions, PipelineOutput};
use crate::data::writer::{self, ExportFormat};

// ---------------------------------------------------------------------------
// Per-file session
// ---------------------------------------------------------------------------

/// Everything the UI holds for one uploaded file. The parsed table stays
/// immutable after load; every option change re-derives `current` from it,
/// so toggling an option off always restores the untouched view.
pub struct FileSession {
    pub file_name: String,
    /// Extension substring as it appeared in the name, reused verbatim by
    /// output renaming.
    pub source_ext: String,
    pub source_format: SourceFormat,
    /// The table as parsed.
    pub original: Table,
    /// Result of the current fill + selection, shown and exported.
    pub current: Table,
    pub fill_missing: bool,
    pub selected_columns: BTreeSet<String>,
    pub show_chart: bool,
    pub export_format: ExportFormat,
    /// Per-file message (fill confirmation, selection reset, save result).
    pub notice: Option<String>,
}

impl FileSession {
    /// Parse uploaded bytes into a session. Starts with every column
    /// selected, filling off, chart hidden.
    pub fn new(file_name: String, bytes: &[u8]) -> DataResult<Self> {
        let source_ext = loader::file_extension(&file_name).to_string();
        let source_format = SourceFormat::from_extension(&source_ext)?;
        let original = loader::parse_table(bytes, source_format)?;
        let selected_columns = original.column_names().map(str::to_string).collect();
        let current = original.clone();
        Ok(FileSession {
            file_name,
            source_ext,
            source_format,
            original,
            current,
            fill_missing: false,
            selected_columns,
            show_chart: false,
            export_format: ExportFormat::default(),
            notice: None,
        })
    }

    /// Recompute `current` from the immutable original and the options. A
    /// stale selection naming a column the table no longer has resets to all
    /// columns instead of failing the file.
    pub fn reapply(&mut self) {
        let mut table = self.original.clone();
        if self.fill_missing {
            table = transform::fill_missing(table);
        }
        match transform::select_columns(&table, &self.selected_columns) {
            Ok(selected) => self.current = selected,
            Err(err) => {
                log::warn!("{}: {err}, selection reset", self.file_name);
                self.selected_columns = table.column_names().map(str::to_string).collect();
                self.notice =
                    Some("Selection referenced a missing column; reset to all columns.".to_string());
                self.current = table;
            }
        }
    }

    pub fn set_fill_missing(&mut self, fill: bool) {
        self.fill_missing = fill;
        self.notice = fill.then(|| "Missing numeric values filled with column means.".to_string());
        self.reapply();
    }

    /// Toggle a single column in the selection.
    pub fn toggle_column(&mut self, name: &str) {
        if !self.selected_columns.remove(name) {
            self.selected_columns.insert(name.to_string());
        }
        self.reapply();
    }

    /// Select all columns.
    pub fn select_all_columns(&mut self) {
        self.selected_columns = self.original.column_names().map(str::to_string).collect();
        self.reapply();
    }

    /// Deselect all columns.
    pub fn select_no_columns(&mut self) {
        self.selected_columns.clear();
        self.reapply();
    }

    /// Name offered by the save dialog: source extension swapped for the
    /// export format's (first occurrence, see
    /// [`writer::derive_output_filename`]).
    pub fn output_file_name(&self) -> String {
        writer::derive_output_filename(
            &self.file_name,
            &self.source_ext,
            self.export_format.extension(),
        )
    }

    /// Run the full fill → select → encode pipeline against the original
    /// table; the request/response path behind the download button.
    pub fn export(&self) -> DataResult<PipelineOutput> {
        let options = PipelineOptions {
            fill_missing: self.fill_missing,
            columns: Some(self.selected_columns.clone()),
            format: self.export_format,
        };
        transform::run(self.original.clone(), &options)
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// One session per uploaded file, in upload order.
    pub sessions: Vec<FileSession>,
    /// Index into `sessions` of the file shown in the central panel.
    pub active: Option<usize>,
    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            sessions: Vec::new(),
            active: None,
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest one uploaded file and focus it. A failure becomes a status
    /// message and the file is skipped; already-loaded files are untouched.
    pub fn add_file(&mut self, file_name: String, bytes: &[u8]) {
        match FileSession::new(file_name.clone(), bytes) {
            Ok(session) => {
                log::info!(
                    "loaded {:?}: {} rows, {} columns",
                    session.file_name,
                    session.original.row_count(),
                    session.original.column_count()
                );
                self.sessions.push(session);
                self.active = Some(self.sessions.len() - 1);
                self.status_message = None;
            }
            Err(err) => {
                log::error!("failed to load {file_name:?}: {err}");
                self.status_message = Some(format!("{file_name}: {err}"));
            }
        }
    }

    /// Drop a session and keep the focus sensible.
    pub fn remove_session(&mut self, index: usize) {
        if index >= self.sessions.len() {
            return;
        }
        self.sessions.remove(index);
        self.active = match self.active {
            Some(active) if active == index => {
                if self.sessions.is_empty() {
                    None
                } else {
                    Some(index.min(self.sessions.len() - 1))
                }
            }
            Some(active) if active > index => Some(active - 1),
            other => other,
        };
    }

    pub fn active_session_mut(&mut self) -> Option<&mut FileSession> {
        self.active.and_then(|index| self.sessions.get_mut(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn session() -> FileSession {
        FileSession::new("data.csv".to_string(), b"a,b\n1,\n,4\n").unwrap()
    }

    #[test]
    fn new_session_selects_everything() {
        let session = session();
        assert_eq!(session.source_ext, "csv");
        assert_eq!(session.source_format, SourceFormat::Csv);
        assert_eq!(session.selected_columns.len(), 2);
        assert_eq!(session.current, session.original);
    }

    #[test]
    fn fill_toggle_round_trips() {
        let mut session = session();
        session.set_fill_missing(true);
        assert_eq!(session.current.columns[0].values[1], CellValue::Number(1.0));
        assert_eq!(session.original.columns[0].values[1], CellValue::Missing);

        session.set_fill_missing(false);
        assert_eq!(session.current, session.original);
    }

    #[test]
    fn column_toggles_rebuild_current() {
        let mut session = session();
        session.toggle_column("a");
        let names: Vec<&str> = session.current.column_names().collect();
        assert_eq!(names, vec!["b"]);

        session.select_no_columns();
        assert!(session.current.is_empty());

        session.select_all_columns();
        assert_eq!(session.current, session.original);
    }

    #[test]
    fn stale_selection_resets_to_all_columns() {
        let mut session = session();
        session.selected_columns.insert("gone".to_string());
        session.reapply();
        assert_eq!(session.selected_columns.len(), 2);
        assert_eq!(session.current, session.original);
        assert!(session.notice.is_some());
    }

    #[test]
    fn export_applies_the_active_options() {
        let mut session = session();
        session.set_fill_missing(true);
        session.toggle_column("b");
        let output = session.export().unwrap();
        assert_eq!(output.bytes, b"a\n1\n1\n".to_vec());
        assert_eq!(session.output_file_name(), "data.csv");

        session.export_format = ExportFormat::Xlsx;
        assert_eq!(session.output_file_name(), "data.xlsx");
    }

    #[test]
    fn add_file_skips_bad_uploads() {
        let mut state = AppState::default();
        state.add_file("report.txt".to_string(), b"whatever");
        assert!(state.sessions.is_empty());
        assert!(state.status_message.is_some());

        state.add_file("data.csv".to_string(), b"a\n1\n");
        assert_eq!(state.sessions.len(), 1);
        assert_eq!(state.active, Some(0));
        assert!(state.status_message.is_none());
    }

    #[test]
    fn removing_a_session_keeps_focus_sensible() {
        let mut state = AppState::default();
        state.add_file("one.csv".to_string(), b"a\n1\n");
        state.add_file("two.csv".to_string(), b"a\n2\n");
        state.add_file("three.csv".to_string(), b"a\n3\n");
        assert_eq!(state.active, Some(2));

        state.remove_session(2);
        assert_eq!(state.active, Some(1));

        state.remove_session(0);
        assert_eq!(state.active, Some(0));
        assert_eq!(state.sessions[0].file_name, "two.csv");

        state.remove_session(0);
        assert_eq!(state.active, None);
    }
}
