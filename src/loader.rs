//! Spool export ingestion.
//!
//! Reads a MES spool export, normalizes identifiers and classification
//! codes, splits active from archived spools and reports two data-quality
//! findings: ISO workbooks that are active more than once, and archived
//! completed workbooks that are active again.
//!
//! The OP1 task export is read alongside it; tasks attach to spools through
//! `order_id` == spool `id`.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use polars::prelude::*;
use tracing::{info, warn};

use crate::error::SpoolError;
use crate::load::SpoolRecord;
use crate::schema::{label_type, mes, quality, spool, state, task};

const UNKNOWN_STATION: &str = "Unknown";

/// One normalized spool row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpoolRow {
    pub id: String,
    pub iso_workbook_id: String,
    pub spool_type: String,
    pub station: String,
    pub state: String,
    pub quality: String,
    pub pressure: String,
    /// Internal revision, zero-padded to three digits.
    pub revision: String,
    pub archived: bool,
    pub is_red_label: bool,
    /// OP1 tasks attached to this spool; see [`SpoolBatch::attach_task_counts`].
    pub task_count: usize,
}

impl SpoolRow {
    pub fn label_type(&self) -> &'static str {
        if self.is_red_label {
            label_type::RED_LABEL
        } else {
            label_type::STANDARD
        }
    }

    pub fn to_record(&self) -> SpoolRecord {
        SpoolRecord::new(&self.spool_type, &self.quality, &self.pressure)
    }

    fn is_archived_completed(&self) -> bool {
        self.archived && self.state == state::COMPLETED
    }
}

/// One OP1 task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskRow {
    /// Spool `id` the task belongs to.
    pub order_id: String,
    pub task_name: String,
    pub task_description: String,
    pub state: String,
    pub assigned_groups: String,
}

/// An ISO workbook with more than one active spool row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateSpool {
    pub iso_workbook_id: String,
    /// Station of each active occurrence, in export order.
    pub stations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpoolBatch {
    pub active: Vec<SpoolRow>,
    /// Sorted by ISO workbook id.
    pub duplicates: Vec<DuplicateSpool>,
    /// ISO ids of archived completed spools that are also active, first occurrence order.
    pub archive_conflicts: Vec<String>,
}

impl SpoolBatch {
    pub fn from_rows(rows: Vec<SpoolRow>) -> Self {
        let active_ids: HashSet<&str> = rows
            .iter()
            .filter(|r| !r.archived)
            .map(|r| r.iso_workbook_id.as_str())
            .collect();

        let mut seen = HashSet::new();
        let archive_conflicts: Vec<String> = rows
            .iter()
            .filter(|r| r.is_archived_completed())
            .filter(|r| active_ids.contains(r.iso_workbook_id.as_str()))
            .filter(|r| seen.insert(r.iso_workbook_id.as_str()))
            .map(|r| r.iso_workbook_id.clone())
            .collect();

        let active: Vec<SpoolRow> = rows.into_iter().filter(|r| !r.archived).collect();

        let mut by_id: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for row in &active {
            by_id
                .entry(row.iso_workbook_id.as_str())
                .or_default()
                .push(row.station.as_str());
        }
        let duplicates: Vec<DuplicateSpool> = by_id
            .into_iter()
            .filter(|(_, stations)| stations.len() > 1)
            .map(|(id, stations)| DuplicateSpool {
                iso_workbook_id: id.to_string(),
                stations: stations.into_iter().map(str::to_string).collect(),
            })
            .collect();

        if !duplicates.is_empty() {
            warn!(count = duplicates.len(), "Duplicate active spools detected");
        }
        if !archive_conflicts.is_empty() {
            warn!(
                count = archive_conflicts.len(),
                "Archived completed spool conflict detected"
            );
        }

        Self {
            active,
            duplicates,
            archive_conflicts,
        }
    }

    /// Set `task_count` on every active spool from the OP1 tasks.
    pub fn attach_task_counts(&mut self, tasks: &[TaskRow]) {
        let counts = task_counts(tasks);
        for row in &mut self.active {
            row.task_count = counts.get(row.id.as_str()).copied().unwrap_or(0);
        }
    }

    /// Core records for the active spools.
    pub fn records(&self) -> Vec<SpoolRecord> {
        self.active.iter().map(SpoolRow::to_record).collect()
    }

    pub fn active_frame(&self) -> Result<DataFrame, SpoolError> {
        let rows = self.active.as_slice();
        let red: Vec<bool> = self.active.iter().map(|r| r.is_red_label).collect();
        let tasks: Vec<u64> = self.active.iter().map(|r| r.task_count as u64).collect();

        let df = DataFrame::new(vec![
            Column::new(spool::ID.into(), text_column(rows, |r| r.id.as_str())),
            Column::new(spool::ISO_WORKBOOK_ID.into(), text_column(rows, |r| r.iso_workbook_id.as_str())),
            Column::new(spool::INTERNAL_REV.into(), text_column(rows, |r| r.revision.as_str())),
            Column::new(spool::SPOOL_TYPE.into(), text_column(rows, |r| r.spool_type.as_str())),
            Column::new(spool::STATION.into(), text_column(rows, |r| r.station.as_str())),
            Column::new(spool::STATE.into(), text_column(rows, |r| r.state.as_str())),
            Column::new(spool::QUALITY_CLASS.into(), text_column(rows, |r| r.quality.as_str())),
            Column::new(spool::PRESSURE_RISK.into(), text_column(rows, |r| r.pressure.as_str())),
            Column::new(spool::LABEL_TYPE.into(), text_column(rows, |r| r.label_type())),
            Column::new(spool::IS_RED_LABEL.into(), &red),
            Column::new(spool::TASK_COUNT.into(), &tasks),
        ])?;
        Ok(df)
    }

    /// Columns: var_ISOworkbookId, stations (comma separated).
    pub fn duplicates_frame(&self) -> Result<DataFrame, SpoolError> {
        let ids: Vec<&str> = self
            .duplicates
            .iter()
            .map(|d| d.iso_workbook_id.as_str())
            .collect();
        let stations: Vec<String> = self.duplicates.iter().map(|d| d.stations.join(", ")).collect();

        let df = DataFrame::new(vec![
            Column::new(quality::ISO_WORKBOOK_ID.into(), ids),
            Column::new(quality::STATIONS.into(), &stations),
        ])?;
        Ok(df)
    }

    pub fn archive_conflicts_frame(&self) -> Result<DataFrame, SpoolError> {
        let df = DataFrame::new(vec![Column::new(
            quality::ISO_WORKBOOK_ID.into(),
            &self.archive_conflicts,
        )])?;
        Ok(df)
    }
}

// ── Loading ─────────────────────────────────────────────────────────────────

/// Load and normalize a MES spool export (CSV).
pub fn load_spools_csv(path: &Path) -> Result<SpoolBatch, SpoolError> {
    let df = read_csv_as_strings(path, None)?;
    let rows = spool_rows_from_frame(&df)?;
    info!(path = %path.display(), rows = rows.len(), "Loaded spool export");
    Ok(SpoolBatch::from_rows(rows))
}

/// Normalize the rows of a raw export frame (all columns as strings).
///
/// Required columns: see [`mes::REQUIRED`]. `id` and `name` are optional.
pub fn spool_rows_from_frame(df: &DataFrame) -> Result<Vec<SpoolRow>, SpoolError> {
    require_columns(df, &mes::REQUIRED)?;

    let ids = optional_str_column(df, mes::ID)?;
    let names = optional_str_column(df, mes::NAME)?;
    let revisions = optional_str_column(df, mes::INTERNAL_REV)?;
    let states = df.column(mes::STATE)?.str()?;
    let archived = df.column(mes::ARCHIVED)?.str()?;
    let stations = df.column(mes::STATION)?.str()?;
    let iso_ids = df.column(mes::ISO_WORKBOOK_ID)?.str()?;
    let types = df.column(mes::WORKBOOK_TYPE)?.str()?;
    let qualities = df.column(mes::QUALITY_CLASS)?.str()?;
    let pressures = df.column(mes::PRESSURE_RISK)?.str()?;

    let rows = (0..df.height())
        .map(|i| SpoolRow {
            id: ids.and_then(|c| c.get(i)).unwrap_or("").to_string(),
            iso_workbook_id: normalize_iso_id(iso_ids.get(i)),
            spool_type: normalize_spool_type(types.get(i)),
            station: normalize_station(stations.get(i)),
            state: normalize_state(states.get(i)),
            quality: normalize_code(qualities.get(i)),
            pressure: normalize_code(pressures.get(i)),
            revision: normalize_revision(revisions.and_then(|c| c.get(i))),
            archived: parse_flag(archived.get(i)),
            is_red_label: is_red_label_name(names.and_then(|c| c.get(i))),
            task_count: 0,
        })
        .collect();
    Ok(rows)
}

// ── OP1 tasks ───────────────────────────────────────────────────────────────

/// Load an OP1 task export (CSV). Task order is kept as exported.
pub fn load_tasks_csv(path: &Path) -> Result<Vec<TaskRow>, SpoolError> {
    let df = read_csv_as_strings(path, None)?;
    let tasks = task_rows_from_frame(&df)?;
    info!(path = %path.display(), tasks = tasks.len(), "Loaded task export");
    Ok(tasks)
}

/// Required column: `order_id`. The text columns are optional and default to "".
pub fn task_rows_from_frame(df: &DataFrame) -> Result<Vec<TaskRow>, SpoolError> {
    require_columns(df, &[task::ORDER_ID])?;

    let order_ids = df.column(task::ORDER_ID)?.str()?;
    let names = optional_str_column(df, task::TASK_NAME)?;
    let descriptions = optional_str_column(df, task::TASK_DESCRIPTION)?;
    let states = optional_str_column(df, task::STATE)?;
    let groups = optional_str_column(df, task::ASSIGNED_GROUPS)?;

    let text = |col: Option<&StringChunked>, i: usize| {
        col.and_then(|c| c.get(i)).unwrap_or("").to_string()
    };

    let tasks = (0..df.height())
        .map(|i| TaskRow {
            order_id: normalize_code(order_ids.get(i)),
            task_name: text(names, i),
            task_description: text(descriptions, i),
            state: text(states, i),
            assigned_groups: text(groups, i),
        })
        .collect();
    Ok(tasks)
}

/// Number of tasks per order id.
pub fn task_counts(tasks: &[TaskRow]) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for t in tasks {
        *counts.entry(t.order_id.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Tasks of one spool, in export order.
pub fn tasks_for_spool<'a>(tasks: &'a [TaskRow], spool_id: &str) -> Vec<&'a TaskRow> {
    tasks.iter().filter(|t| t.order_id == spool_id).collect()
}

/// Columns: order_id, task_name, task_description, state, assigned_Groups.
pub fn tasks_frame(tasks: &[TaskRow]) -> Result<DataFrame, SpoolError> {
    let df = DataFrame::new(vec![
        Column::new(task::ORDER_ID.into(), text_column(tasks, |t| t.order_id.as_str())),
        Column::new(task::TASK_NAME.into(), text_column(tasks, |t| t.task_name.as_str())),
        Column::new(task::TASK_DESCRIPTION.into(), text_column(tasks, |t| t.task_description.as_str())),
        Column::new(task::STATE.into(), text_column(tasks, |t| t.state.as_str())),
        Column::new(task::ASSIGNED_GROUPS.into(), text_column(tasks, |t| t.assigned_groups.as_str())),
    ])?;
    Ok(df)
}

// ── Search and status ───────────────────────────────────────────────────────

/// Lowercased search terms; commas and whitespace separate them.
pub fn search_terms(text: &str) -> Vec<String> {
    text.replace(',', " ")
        .split_whitespace()
        .map(str::to_lowercase)
        .collect()
}

/// Rows where any column contains any of the terms (case-insensitive substring).
///
/// Blank search text returns the frame unchanged.
pub fn search_frame(df: &DataFrame, text: &str) -> Result<DataFrame, SpoolError> {
    let terms = search_terms(text);
    if terms.is_empty() {
        return Ok(df.clone());
    }

    let mut mask = vec![false; df.height()];
    for column in df.get_columns() {
        let as_text = column.cast(&DataType::String)?;
        for (hit, value) in mask.iter_mut().zip(as_text.str()?.iter()) {
            if *hit {
                continue;
            }
            if let Some(value) = value {
                let value = value.to_lowercase();
                *hit = terms.iter().any(|t| value.contains(t.as_str()));
            }
        }
    }

    let mask = BooleanChunked::from_slice("mask".into(), &mask);
    Ok(df.filter(&mask)?)
}

/// Spools per state, sorted by state. Rows without a state are not counted.
pub fn state_counts(rows: &[SpoolRow]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for row in rows.iter().filter(|r| !r.state.is_empty()) {
        *counts.entry(row.state.clone()).or_insert(0) += 1;
    }
    counts
}

/// Read a CSV file with all columns as String dtype.
/// Trims whitespace from column names and applies optional rename.
pub fn read_csv_as_strings(
    path: &Path,
    rename: Option<HashMap<String, String>>,
) -> Result<DataFrame, SpoolError> {
    if !path.exists() {
        return Err(SpoolError::Io(
            path.to_path_buf(),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        ));
    }

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0)) // all columns as String
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let trimmed: Vec<String> = df
        .get_column_names_str()
        .iter()
        .map(|c| c.trim().to_string())
        .collect();
    df.set_column_names(trimmed.as_slice())?;

    if let Some(map) = rename {
        let old: Vec<&str> = map.keys().map(|s| s.as_str()).collect();
        let new: Vec<&str> = map.values().map(|s| s.as_str()).collect();
        df = df.lazy().rename(old, new, true).collect()?;
    }

    Ok(df)
}

fn optional_str_column<'a>(
    df: &'a DataFrame,
    name: &str,
) -> Result<Option<&'a StringChunked>, SpoolError> {
    match df.column(name) {
        Ok(c) => Ok(Some(c.str()?)),
        Err(_) => Ok(None),
    }
}

fn text_column<'a, T>(rows: &'a [T], f: fn(&T) -> &str) -> Vec<&'a str> {
    rows.iter().map(f).collect()
}

pub(crate) fn require_columns(df: &DataFrame, required: &[&str]) -> Result<(), SpoolError> {
    for &col_name in required {
        if df.column(col_name).is_err() {
            return Err(SpoolError::MissingColumn(col_name.to_string()));
        }
    }
    Ok(())
}

// ── Normalization ───────────────────────────────────────────────────────────

fn normalize_station(raw: Option<&str>) -> String {
    let station = raw.unwrap_or("").replace('\u{a0}', " ");
    match station.trim() {
        "" => UNKNOWN_STATION.to_string(),
        s => s.to_string(),
    }
}

/// Spreadsheet exports turn numeric ids into "12345.0".
fn normalize_iso_id(raw: Option<&str>) -> String {
    let raw = raw.unwrap_or("");
    raw.split('.').next().unwrap_or(raw).to_string()
}

/// "(SW)" and " SW " both become "SW".
fn normalize_spool_type(raw: Option<&str>) -> String {
    raw.unwrap_or("")
        .trim()
        .trim_matches(&['(', ')'][..])
        .to_string()
}

fn normalize_code(raw: Option<&str>) -> String {
    raw.unwrap_or("").trim().to_string()
}

/// "7.0" becomes "007"; a missing revision stays empty.
fn normalize_revision(raw: Option<&str>) -> String {
    let head = raw.unwrap_or("").trim().split('.').next().unwrap_or("");
    if head.is_empty() {
        return String::new();
    }
    format!("{head:0>3}")
}

fn normalize_state(raw: Option<&str>) -> String {
    raw.unwrap_or("").to_lowercase()
}

fn parse_flag(raw: Option<&str>) -> bool {
    matches!(
        raw.map(|s| s.trim().to_ascii_lowercase()).as_deref(),
        Some("true" | "1")
    )
}

fn is_red_label_name(raw: Option<&str>) -> bool {
    raw.unwrap_or("")
        .trim()
        .to_lowercase()
        .ends_with("red label")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(iso: &str, station: &str, state: &str, archived: bool) -> SpoolRow {
        SpoolRow {
            iso_workbook_id: iso.into(),
            station: station.into(),
            state: state.into(),
            archived,
            ..Default::default()
        }
    }

    #[test]
    fn normalization_rules() {
        assert_eq!(normalize_station(Some("\u{a0}Welding ")), "Welding");
        assert_eq!(normalize_station(None), "Unknown");
        assert_eq!(normalize_station(Some("  ")), "Unknown");
        assert_eq!(normalize_iso_id(Some("10234.0")), "10234");
        assert_eq!(normalize_iso_id(Some("ISO-7")), "ISO-7");
        assert_eq!(normalize_iso_id(None), "");
        assert_eq!(normalize_spool_type(Some(" (KRB o.) ")), "KRB o.");
        assert_eq!(normalize_spool_type(Some("SW")), "SW");
        assert_eq!(normalize_code(Some(" Q2 ")), "Q2");
        assert_eq!(normalize_code(None), "");
        assert_eq!(normalize_state(Some("In-Progress")), "in-progress");
        assert_eq!(normalize_revision(Some("3.0")), "003");
        assert_eq!(normalize_revision(Some("12")), "012");
        assert_eq!(normalize_revision(Some("1024")), "1024");
        assert_eq!(normalize_revision(None), "");
        assert!(parse_flag(Some("True")));
        assert!(!parse_flag(Some("False")));
        assert!(!parse_flag(None));
        assert!(is_red_label_name(Some("Spool 12 - Red Label ")));
        assert!(!is_red_label_name(Some("Red label spool")));
        assert!(!is_red_label_name(None));
    }

    #[test]
    fn batch_splits_active_and_finds_duplicates() {
        let batch = SpoolBatch::from_rows(vec![
            row("200", "Welding", "in-progress", false),
            row("100", "Cutting", "in-progress", false),
            row("200", "NDT", "problem", false),
            row("300", "Fitup", "completed", true),
        ]);

        assert_eq!(batch.active.len(), 3);
        assert_eq!(
            batch.duplicates,
            vec![DuplicateSpool {
                iso_workbook_id: "200".into(),
                stations: vec!["Welding".into(), "NDT".into()],
            }]
        );
        assert!(batch.archive_conflicts.is_empty());
    }

    #[test]
    fn archived_completed_spool_active_again_is_a_conflict() {
        let batch = SpoolBatch::from_rows(vec![
            row("500", "Technical Control", "completed", true),
            row("500", "Technical Control", "completed", true),
            row("500", "Cutting", "in-edit", false),
            row("600", "Documentation", "cancelled", true),
            row("600", "Cutting", "in-edit", false),
        ]);

        // Only archived *completed* rows conflict; repeated ids are reported once.
        assert_eq!(batch.archive_conflicts, vec!["500".to_string()]);
        assert!(batch.duplicates.is_empty());
    }

    #[test]
    fn rows_from_raw_frame() {
        let df = df!(
            mes::ID => ["1", "2"],
            mes::NAME => ["A12 red label", "A13"],
            mes::STATE => ["In-Progress", "completed"],
            mes::ARCHIVED => ["False", "True"],
            mes::STATION => ["Welding\u{a0}", "Technical Control"],
            mes::ISO_WORKBOOK_ID => ["4711.0", "4712"],
            mes::WORKBOOK_TYPE => ["(SW)", "TK"],
            mes::QUALITY_CLASS => [" Q2", "Q1"],
            mes::PRESSURE_RISK => ["II ", ""],
            mes::INTERNAL_REV => ["7.0", "12"]
        )
        .unwrap();

        let rows = spool_rows_from_frame(&df).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            SpoolRow {
                id: "1".into(),
                iso_workbook_id: "4711".into(),
                spool_type: "SW".into(),
                station: "Welding".into(),
                state: "in-progress".into(),
                quality: "Q2".into(),
                pressure: "II".into(),
                revision: "007".into(),
                archived: false,
                is_red_label: true,
                task_count: 0,
            }
        );
        assert!(rows[1].archived);
        assert_eq!(rows[1].label_type(), label_type::STANDARD);
        assert_eq!(rows[1].to_record(), SpoolRecord::new("TK", "Q1", ""));
    }

    #[test]
    fn missing_export_column_is_reported() {
        let df = df!(mes::STATE => ["completed"]).unwrap();
        assert!(matches!(
            spool_rows_from_frame(&df),
            Err(SpoolError::MissingColumn(c)) if c == mes::ARCHIVED
        ));
    }

    #[test]
    fn frames_carry_normalized_columns() {
        let mut red = row("9", "Fitup", "in-progress", false);
        red.is_red_label = true;
        let batch = SpoolBatch::from_rows(vec![
            red,
            row("9", "NDT", "in-progress", false),
        ]);

        let active = batch.active_frame().unwrap();
        assert_eq!(active.height(), 2);
        let labels = active.column(spool::LABEL_TYPE).unwrap().str().unwrap();
        assert_eq!(labels.get(0), Some(label_type::RED_LABEL));
        assert_eq!(labels.get(1), Some(label_type::STANDARD));

        let dups = batch.duplicates_frame().unwrap();
        let stations = dups.column(quality::STATIONS).unwrap().str().unwrap();
        assert_eq!(stations.get(0), Some("Fitup, NDT"));

        assert_eq!(batch.archive_conflicts_frame().unwrap().height(), 0);
    }

    fn task_row(order_id: &str, name: &str) -> TaskRow {
        TaskRow {
            order_id: order_id.into(),
            task_name: name.into(),
            ..Default::default()
        }
    }

    #[test]
    fn tasks_from_raw_frame() {
        let df = df!(
            task::ORDER_ID => [Some(" 41 "), Some("42")],
            task::TASK_NAME => [Some("Check drawing"), None],
            task::ASSIGNED_GROUPS => [None, Some("QC")]
        )
        .unwrap();

        let tasks = task_rows_from_frame(&df).unwrap();
        assert_eq!(
            tasks[0],
            TaskRow {
                order_id: "41".into(),
                task_name: "Check drawing".into(),
                ..Default::default()
            }
        );
        assert_eq!(tasks[1].task_name, "");
        assert_eq!(tasks[1].assigned_groups, "QC");
        assert_eq!(tasks[1].task_description, "");

        let df = df!(task::TASK_NAME => ["x"]).unwrap();
        assert!(matches!(
            task_rows_from_frame(&df),
            Err(SpoolError::MissingColumn(c)) if c == task::ORDER_ID
        ));
    }

    #[test]
    fn task_counts_attach_to_spool_ids() {
        let mut a = row("100", "Cutting", "in-progress", false);
        a.id = "1".into();
        let mut b = row("200", "Welding", "in-progress", false);
        b.id = "2".into();
        let mut batch = SpoolBatch::from_rows(vec![a, b]);

        let tasks = vec![task_row("1", "Cut"), task_row("9", "Orphan"), task_row("1", "Bevel")];
        batch.attach_task_counts(&tasks);

        assert_eq!(batch.active[0].task_count, 2);
        assert_eq!(batch.active[1].task_count, 0);

        let frame = batch.active_frame().unwrap();
        let counts = frame
            .column(spool::TASK_COUNT)
            .unwrap()
            .as_materialized_series()
            .u64()
            .unwrap();
        assert_eq!(counts.get(0), Some(2));

        let names: Vec<&str> = tasks_for_spool(&tasks, "1")
            .iter()
            .map(|t| t.task_name.as_str())
            .collect();
        assert_eq!(names, vec!["Cut", "Bevel"]);
        assert!(tasks_for_spool(&tasks, "2").is_empty());
        assert_eq!(tasks_frame(&tasks).unwrap().height(), 3);
    }

    #[test]
    fn search_terms_split_on_commas_and_whitespace() {
        assert_eq!(search_terms(" ISO123, Q2  II,,Welding "), vec!["iso123", "q2", "ii", "welding"]);
        assert!(search_terms(" , ").is_empty());
    }

    #[test]
    fn search_matches_any_term_in_any_column() {
        let df = df!(
            spool::ISO_WORKBOOK_ID => ["ISO123", "ISO200", "ISO300"],
            spool::STATION => ["Welding", "Cutting", "NDT"],
            spool::IS_RED_LABEL => [false, true, false],
            spool::TASK_COUNT => [0u64, 7, 0]
        )
        .unwrap();

        let hits = search_frame(&df, "iso123, ndt").unwrap();
        assert_eq!(hits.height(), 2);

        assert_eq!(search_frame(&df, "TRUE").unwrap().height(), 1);
        assert_eq!(search_frame(&df, "7").unwrap().height(), 1);
        assert_eq!(search_frame(&df, "paint").unwrap().height(), 0);
        assert_eq!(search_frame(&df, "  ").unwrap().height(), 3);
    }

    #[test]
    fn state_counts_are_sorted_and_skip_blank() {
        let rows = vec![
            row("1", "Cutting", "problem", false),
            row("2", "Cutting", "in-progress", false),
            row("3", "NDT", "problem", false),
            row("4", "NDT", "", false),
        ];
        let counts: Vec<(String, usize)> = state_counts(&rows).into_iter().collect();
        assert_eq!(
            counts,
            vec![("in-progress".to_string(), 1), ("problem".to_string(), 2)]
        );
    }
}
