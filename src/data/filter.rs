use chrono::NaiveDate;

use super::model::Dataset;

// ---------------------------------------------------------------------------
// Date window
// ---------------------------------------------------------------------------

/// Inclusive `[start, end]` date range, applied uniformly to every dataset
/// in a pipeline pass.
///
/// `start <= end` is deliberately not enforced: an inverted window matches no
/// rows and flows through the normal "no data" handling, matching the
/// shipped dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateWindow { start, end }
    }

    /// Default window: the dataset's observed min/max dates.
    pub fn from_dataset(dataset: &Dataset) -> Option<Self> {
        dataset
            .date_bounds()
            .map(|(start, end)| DateWindow { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Rows of `dataset` whose date falls inside `window`, inclusive both ends.
/// Row order and the column list are preserved; an empty result is valid.
pub fn apply_window(dataset: &Dataset, window: &DateWindow) -> Dataset {
    Dataset {
        columns: dataset.columns.clone(),
        rows: dataset
            .rows
            .iter()
            .filter(|r| window.contains(r.date))
            .cloned()
            .collect(),
    }
}
