use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::filter::DateWindow;
use crate::data::model::SourceFile;
use crate::pipeline::{Notice, ViewModel, compute};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering. The three pipeline inputs
/// (files, window, selection) live here; `view` is the cached output of the
/// last [`compute`] pass and is rebuilt whenever any input changes.
pub struct AppState {
    /// Files opened this session, in open order.
    pub files: Vec<SourceFile>,

    /// User-chosen date window (None until SLA data provides a default).
    pub window: Option<DateWindow>,

    /// Selected SLA columns, in click order.
    pub selected: Vec<String>,

    /// Classifier rules and driver triggers.
    pub config: DashboardConfig,

    /// Output of the last pipeline pass.
    pub view: ViewModel,

    /// Colours for the currently selected columns.
    pub colors: ColorMap,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_config(DashboardConfig::default())
    }
}

impl AppState {
    pub fn with_config(config: DashboardConfig) -> Self {
        AppState {
            files: Vec::new(),
            window: None,
            selected: Vec::new(),
            config,
            view: ViewModel::default(),
            colors: ColorMap::default(),
            status_message: None,
        }
    }

    /// Append newly opened files and re-run the pipeline.
    pub fn add_files(&mut self, files: Vec<SourceFile>) {
        self.files.extend(files);
        self.recompute();
    }

    /// Toggle a column's membership in the selection, preserving click order.
    pub fn toggle_column(&mut self, column: &str) {
        match self.selected.iter().position(|c| c == column) {
            Some(i) => {
                self.selected.remove(i);
            }
            None => self.selected.push(column.to_string()),
        }
        self.recompute();
    }

    pub fn is_selected(&self, column: &str) -> bool {
        self.selected.iter().any(|c| c == column)
    }

    /// Apply a date window change from the pickers.
    pub fn set_window(&mut self, window: DateWindow) {
        if self.window != Some(window) {
            self.window = Some(window);
            self.recompute();
        }
    }

    /// Re-run the pure pipeline with the current inputs.
    pub fn recompute(&mut self) {
        self.view = compute(&self.files, self.window, &self.selected, &self.config);

        // First pass with data: adopt the observed range so the pickers
        // start at the dataset's min/max.
        if self.window.is_none() {
            self.window = self
                .view
                .date_bounds
                .map(|(start, end)| DateWindow::new(start, end));
        }

        // Drop selections for columns that vanished with their files.
        let columns = &self.view.sla_columns;
        if self.selected.iter().any(|c| !columns.contains(c)) {
            self.selected.retain(|c| columns.contains(c));
            self.view = compute(&self.files, self.window, &self.selected, &self.config);
        }

        self.colors = ColorMap::new(&self.selected);

        // Mirror load failures into the top bar; the offending files stay
        // in `files`, so the message is re-derived on every pass.
        self.status_message = self.view.notices.iter().find_map(|n| match n {
            Notice::LoadFailed { message } => Some(message.clone()),
            _ => None,
        });
    }
}
