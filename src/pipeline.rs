//! The dashboard pipeline as one pure function: (opened files, date window,
//! selected columns) → everything the UI renders. Re-invoked whenever any
//! input changes; no state survives between passes.

use chrono::NaiveDate;

use crate::config::DashboardConfig;
use crate::data::classify::{Classified, classify};
use crate::data::filter::{DateWindow, apply_window};
use crate::data::loader::load_table;
use crate::data::model::{DATE_COLUMN, Dataset, RawTable, SourceFile};
use crate::data::stats::{StatsRow, column_stats};

// ---------------------------------------------------------------------------
// View model
// ---------------------------------------------------------------------------

/// One chart series: a named sequence of (date, value) points.
#[derive(Debug, Clone)]
pub struct ChartSeries {
    pub name: String,
    pub points: Vec<(NaiveDate, f64)>,
}

/// One pie slice: column name and its sum over the filtered window.
#[derive(Debug, Clone)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
}

/// An auxiliary grouped-bar chart built from a driver dataset.
#[derive(Debug, Clone)]
pub struct DriverChart {
    pub title: String,
    pub series: Vec<ChartSeries>,
}

/// Inline messages shown instead of (or alongside) chart output.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// No SLA column is selected; nothing else renders.
    NoColumnsSelected,
    /// A triggered driver spreadsheet was never opened.
    DriverUnavailable { title: String },
    /// A triggered driver dataset has no rows inside the window.
    DriverNoData { title: String },
    /// A file could not be loaded; the rest of the pass still runs.
    LoadFailed { message: String },
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::NoColumnsSelected => "Please select at least one column.".to_string(),
            Notice::DriverUnavailable { title } => format!("{title} data not available."),
            Notice::DriverNoData { title } => {
                format!("{title}: no data in the selected date range.")
            }
            Notice::LoadFailed { message } => message.clone(),
        }
    }
}

/// Everything one pipeline pass produces.
#[derive(Debug, Clone, Default)]
pub struct ViewModel {
    /// True once a non-empty merged SLA dataset exists.
    pub has_data: bool,
    /// All SLA columns, for the side-panel multiselect.
    pub sla_columns: Vec<String>,
    /// Observed SLA date range, for the date pickers' defaults.
    pub date_bounds: Option<(NaiveDate, NaiveDate)>,
    /// SLA rows inside the window (status line).
    pub rows_in_window: usize,
    /// One series per selected column; drawn as both the combined line
    /// chart and the combined grouped bar chart.
    pub series: Vec<ChartSeries>,
    pub pie: Vec<PieSlice>,
    pub driver_charts: Vec<DriverChart>,
    pub stats: Vec<StatsRow>,
    pub notices: Vec<Notice>,
}

// ---------------------------------------------------------------------------
// compute
// ---------------------------------------------------------------------------

/// Run the whole pipeline. Pure and synchronous: same inputs, same output,
/// safe to re-invoke on every input change.
///
/// `window == None` means "not chosen yet"; the SLA dataset's full observed
/// range is used, which is also what the date pickers default to.
pub fn compute(
    files: &[SourceFile],
    window: Option<DateWindow>,
    selected: &[String],
    config: &DashboardConfig,
) -> ViewModel {
    let mut vm = ViewModel::default();
    let classified = classify(files, &config.rules);

    // No SLA files → nothing to show (driver-only uploads included).
    if classified.sla.is_empty() {
        return vm;
    }

    let sla = match load_sla(&classified, &mut vm) {
        Some(ds) => ds,
        None => return vm,
    };

    vm.has_data = true;
    vm.sla_columns = sla.columns.clone();
    vm.date_bounds = sla.date_bounds();

    let window = match window.or_else(|| DateWindow::from_dataset(&sla)) {
        Some(w) => w,
        None => return vm,
    };

    let filtered = apply_window(&sla, &window);
    vm.rows_in_window = filtered.len();

    if selected.is_empty() {
        vm.notices.push(Notice::NoColumnsSelected);
        return vm;
    }

    // Combined line/bar series plus pie slices, in selection order.
    for col in selected {
        if !filtered.columns.contains(col) {
            continue;
        }
        vm.series.push(column_series(&filtered, col));
        vm.pie.push(PieSlice {
            label: col.clone(),
            value: filtered.column_sum(col),
        });
    }

    // Driver triggers: exact selected-column matches, independent of each
    // other, all sharing the SLA date window.
    for trigger in &config.triggers {
        if !selected.iter().any(|c| c == &trigger.column) {
            continue;
        }
        match classified.drivers.get(&trigger.category) {
            None => {
                if trigger.notice_when_absent {
                    vm.notices.push(Notice::DriverUnavailable {
                        title: trigger.title.clone(),
                    });
                }
            }
            Some(file) => match load_dataset(file) {
                Err(notice) => vm.notices.push(notice),
                Ok(driver) => {
                    let driver = apply_window(&driver, &window);
                    if driver.is_empty() {
                        vm.notices.push(Notice::DriverNoData {
                            title: trigger.title.clone(),
                        });
                    } else {
                        vm.driver_charts.push(DriverChart {
                            title: trigger.title.clone(),
                            series: driver
                                .columns
                                .iter()
                                .filter(|c| *c != DATE_COLUMN)
                                .map(|c| column_series(&driver, c))
                                .collect(),
                        });
                    }
                }
            },
        }
    }

    vm.stats = column_stats(&filtered, selected);
    vm
}

/// Load and merge the SLA files, skipping (with a notice) any that fail.
/// Returns None when no usable SLA data remains.
fn load_sla(classified: &Classified<'_>, vm: &mut ViewModel) -> Option<Dataset> {
    let mut tables: Vec<RawTable> = Vec::new();
    for file in &classified.sla {
        // Validate each table on its own before merging, so one bad cell
        // drops only its file, not the whole merge.
        let validated = load_table(file).and_then(|table| {
            Dataset::from_tables(std::slice::from_ref(&table))?;
            Ok(table)
        });
        match validated {
            Ok(table) => tables.push(table),
            Err(e) => {
                log::error!("Failed to load {}: {e}", file.name);
                vm.notices.push(Notice::LoadFailed {
                    message: e.to_string(),
                });
            }
        }
    }
    if tables.is_empty() {
        return None;
    }

    match Dataset::from_tables(&tables) {
        Ok(ds) => Some(ds),
        Err(e) => {
            log::error!("Failed to merge SLA data: {e}");
            vm.notices.push(Notice::LoadFailed {
                message: e.to_string(),
            });
            None
        }
    }
}

fn load_dataset(file: &SourceFile) -> Result<Dataset, Notice> {
    let table = load_table(file).map_err(|e| {
        log::error!("Failed to load {}: {e}", file.name);
        Notice::LoadFailed {
            message: e.to_string(),
        }
    })?;
    Dataset::from_tables(std::slice::from_ref(&table)).map_err(|e| {
        log::error!("Failed to read {}: {e}", file.name);
        Notice::LoadFailed {
            message: e.to_string(),
        }
    })
}

/// (date, value) points for one column, rows with empty cells skipped.
fn column_series(dataset: &Dataset, column: &str) -> ChartSeries {
    ChartSeries {
        name: column.to_string(),
        points: dataset
            .rows
            .iter()
            .filter_map(|r| r.values.get(column).map(|v| (r.date, *v)))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn csv(name: &str, text: &str) -> SourceFile {
        SourceFile::new(name, text.as_bytes().to_vec())
    }

    fn sla_file() -> SourceFile {
        csv(
            "sla.csv",
            "Date,A,FNB Cards,Group Crime\n\
             2024-01-01,10,100,7\n\
             2024-01-02,20,200,8\n\
             2024-01-03,30,300,9\n",
        )
    }

    fn selected(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn worked_example_window_and_stats() {
        let files = vec![sla_file()];
        let window = DateWindow::new(date("2024-01-01"), date("2024-01-02"));
        let vm = compute(
            &files,
            Some(window),
            &selected(&["A"]),
            &DashboardConfig::default(),
        );

        assert!(vm.has_data);
        assert_eq!(vm.rows_in_window, 2);
        assert_eq!(vm.series.len(), 1);
        assert_eq!(
            vm.series[0].points,
            vec![(date("2024-01-01"), 10.0), (date("2024-01-02"), 20.0)]
        );

        assert_eq!(vm.stats.len(), 1);
        assert_eq!(vm.stats[0].min, 10.0);
        assert_eq!(vm.stats[0].max, 20.0);
        assert!((vm.stats[0].std - 7.0710678).abs() < 1e-6);

        assert_eq!(vm.pie.len(), 1);
        assert_eq!(vm.pie[0].value, 30.0);
    }

    #[test]
    fn driver_only_upload_produces_no_output() {
        let files = vec![
            csv("FNB_CARD_DRIVERS.csv", "Date,X\n2024-01-01,1\n"),
            csv("GROUP_CRIME_DRIVERS.csv", "Date,Y\n2024-01-01,2\n"),
        ];
        let vm = compute(&files, None, &selected(&["X"]), &DashboardConfig::default());
        assert!(!vm.has_data);
        assert!(vm.series.is_empty());
        assert!(vm.driver_charts.is_empty());
    }

    #[test]
    fn no_selection_warns_and_renders_nothing_else() {
        let vm = compute(
            &[sla_file()],
            None,
            &[],
            &DashboardConfig::default(),
        );
        assert!(vm.has_data);
        assert_eq!(vm.notices, vec![Notice::NoColumnsSelected]);
        assert!(vm.series.is_empty());
        assert!(vm.stats.is_empty());
    }

    #[test]
    fn merged_sla_row_count_is_sum_of_files() {
        let files = vec![
            csv("jan.csv", "Date,A\n2024-01-01,1\n2024-01-02,2\n"),
            csv("feb.csv", "Date,B\n2024-02-01,3\n"),
        ];
        let vm = compute(&files, None, &selected(&["A", "B"]), &DashboardConfig::default());
        assert_eq!(vm.rows_in_window, 3);
        // Union of columns in first-appearance order.
        assert_eq!(vm.sla_columns, vec!["A", "B"]);
        // Rows missing a column contribute no points to its series.
        let b = vm.series.iter().find(|s| s.name == "B").unwrap();
        assert_eq!(b.points, vec![(date("2024-02-01"), 3.0)]);
    }

    #[test]
    fn fnb_cards_without_driver_file_is_silently_omitted() {
        let vm = compute(
            &[sla_file()],
            None,
            &selected(&["FNB Cards"]),
            &DashboardConfig::default(),
        );
        assert!(vm.driver_charts.is_empty());
        assert!(vm.notices.is_empty());
    }

    #[test]
    fn group_crime_without_driver_file_shows_notice() {
        let vm = compute(
            &[sla_file()],
            None,
            &selected(&["Group Crime"]),
            &DashboardConfig::default(),
        );
        assert!(vm.driver_charts.is_empty());
        assert_eq!(
            vm.notices,
            vec![Notice::DriverUnavailable {
                title: "Group Crime Drivers".into()
            }]
        );
    }

    #[test]
    fn group_crime_empty_after_filter_shows_no_data_notice() {
        let files = vec![
            sla_file(),
            csv("GROUP_CRIME_DRIVERS.csv", "Date,Robbery\n2023-06-01,4\n"),
        ];
        // Window (defaulting to the SLA range) excludes the 2023 driver row.
        let vm = compute(
            &files,
            None,
            &selected(&["Group Crime"]),
            &DashboardConfig::default(),
        );
        assert!(vm.driver_charts.is_empty());
        assert_eq!(
            vm.notices,
            vec![Notice::DriverNoData {
                title: "Group Crime Drivers".into()
            }]
        );
    }

    #[test]
    fn both_triggers_fire_in_one_pass() {
        let files = vec![
            sla_file(),
            csv(
                "FNB_CARD_DRIVERS.csv",
                "Date,Card Fraud,Chargebacks\n2024-01-02,5,6\n",
            ),
            csv("GROUP_CRIME_DRIVERS.csv", "Date,Robbery\n2024-01-02,4\n"),
        ];
        let vm = compute(
            &files,
            None,
            &selected(&["FNB Cards", "Group Crime"]),
            &DashboardConfig::default(),
        );

        assert_eq!(vm.driver_charts.len(), 2);
        assert_eq!(vm.driver_charts[0].title, "Card Drivers");
        assert_eq!(vm.driver_charts[0].series.len(), 2);
        assert_eq!(vm.driver_charts[1].title, "Group Crime Drivers");
        assert!(vm.notices.is_empty());
    }

    #[test]
    fn duplicate_card_driver_files_first_wins() {
        let files = vec![
            sla_file(),
            csv("FNB_CARD_DRIVERS_a.csv", "Date,First\n2024-01-02,1\n"),
            csv("FNB_CARD_DRIVERS_b.csv", "Date,Second\n2024-01-02,2\n"),
        ];
        let vm = compute(
            &files,
            None,
            &selected(&["FNB Cards"]),
            &DashboardConfig::default(),
        );
        assert_eq!(vm.driver_charts.len(), 1);
        assert_eq!(vm.driver_charts[0].series[0].name, "First");
        assert!(vm.notices.is_empty());
    }

    #[test]
    fn bad_sla_file_is_skipped_with_notice() {
        let files = vec![
            sla_file(),
            csv("extra.json", "{ not json"),
        ];
        let vm = compute(&files, None, &selected(&["A"]), &DashboardConfig::default());
        // The good file still renders.
        assert!(vm.has_data);
        assert_eq!(vm.series.len(), 1);
        assert!(matches!(vm.notices[0], Notice::LoadFailed { .. }));
    }

    #[test]
    fn bad_date_cell_drops_only_its_file() {
        let files = vec![
            csv("jan.csv", "Date,A\n2024-01-01,1\n"),
            csv("feb.csv", "Date,A\nnot-a-date,2\n"),
        ];
        let vm = compute(&files, None, &selected(&["A"]), &DashboardConfig::default());

        // The clean file still renders; the bad one is reported.
        assert!(vm.has_data);
        assert_eq!(vm.rows_in_window, 1);
        assert_eq!(vm.series[0].points, vec![(date("2024-01-01"), 1.0)]);
        assert!(matches!(vm.notices[0], Notice::LoadFailed { .. }));
    }

    #[test]
    fn missing_date_column_surfaces_as_notice_not_crash() {
        let files = vec![csv("sla.csv", "Day,A\n2024-01-01,1\n")];
        let vm = compute(&files, None, &selected(&["A"]), &DashboardConfig::default());
        assert!(!vm.has_data);
        assert!(matches!(vm.notices[0], Notice::LoadFailed { .. }));
    }

    #[test]
    fn inverted_window_silently_yields_empty_data() {
        let window = DateWindow::new(date("2024-01-03"), date("2024-01-01"));
        let vm = compute(
            &[sla_file()],
            Some(window),
            &selected(&["A"]),
            &DashboardConfig::default(),
        );
        assert_eq!(vm.rows_in_window, 0);
        assert!(vm.series[0].points.is_empty());
        assert_eq!(vm.pie[0].value, 0.0);
        assert!(vm.stats[0].min.is_nan());
    }

    #[test]
    fn compute_is_idempotent_for_fixed_inputs() {
        let files = vec![sla_file()];
        let sel = selected(&["A", "FNB Cards"]);
        let config = DashboardConfig::default();
        let a = compute(&files, None, &sel, &config);
        let b = compute(&files, None, &sel, &config);
        assert_eq!(a.rows_in_window, b.rows_in_window);
        assert_eq!(a.series.len(), b.series.len());
        assert_eq!(a.notices, b.notices);
    }
}
