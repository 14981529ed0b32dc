use anyhow::Context;
use chrono::NaiveDate;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const PROFILES_FILE: &str = "student_profiles.csv";
pub const ASSIGNMENTS_FILE: &str = "student_assignments.csv";
pub const ATTENDANCE_FILE: &str = "student_attendance.csv";
pub const REMARKS_FILE: &str = "student_remarks.csv";
pub const SCORES_FILE: &str = "student_scores.csv";
pub const SUMMARY_FILE: &str = "student_summary.csv";

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRow {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Class")]
    pub class: String,
    #[serde(rename = "Section")]
    pub section: String,
    #[serde(rename = "Gender")]
    pub gender: String,
}

/// Column order of `student_summary.csv`; exports must reproduce it even
/// when the filtered table has no rows.
pub const SUMMARY_HEADERS: [&str; 8] = [
    "ID",
    "Name",
    "Class",
    "Section",
    "Gender",
    "Avg_Score",
    "Attendance_Rate",
    "Submission_Rate",
];

/// Summary keeps the upstream column layout so an export round-trips
/// with the same headers the source file carries.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SummaryRow {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Class")]
    pub class: String,
    #[serde(rename = "Section")]
    pub section: String,
    #[serde(rename = "Gender")]
    pub gender: String,
    #[serde(rename = "Avg_Score")]
    pub avg_score: f64,
    #[serde(rename = "Attendance_Rate")]
    pub attendance_rate: f64,
    #[serde(rename = "Submission_Rate")]
    pub submission_rate: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssignmentRow {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Subject")]
    pub subject: String,
    #[serde(rename = "Deadline", deserialize_with = "de_date")]
    pub deadline: NaiveDate,
    #[serde(rename = "Submitted", deserialize_with = "de_boolish")]
    pub submitted: bool,
    // Meaningful only when submitted; the source leaves the cell empty otherwise.
    #[serde(rename = "Marks")]
    pub marks: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceRow {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Date", deserialize_with = "de_date")]
    pub date: NaiveDate,
    #[serde(rename = "Present", deserialize_with = "de_boolish")]
    pub present: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemarkRow {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Date", deserialize_with = "de_date")]
    pub date: NaiveDate,
    #[serde(rename = "Remark")]
    pub remark: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoreRow {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Subject")]
    pub subject: String,
    #[serde(rename = "Term")]
    pub term: String,
    #[serde(rename = "Score")]
    pub score: f64,
}

/// One immutable snapshot of the six source tables, loaded once per
/// workspace select and shared read-only by every request after that.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub profiles: Vec<ProfileRow>,
    pub assignments: Vec<AssignmentRow>,
    pub attendance: Vec<AttendanceRow>,
    pub remarks: Vec<RemarkRow>,
    pub scores: Vec<ScoreRow>,
    pub summary: Vec<SummaryRow>,
}

pub fn load_dataset(dir: &Path) -> anyhow::Result<Dataset> {
    Ok(Dataset {
        profiles: load_table(dir, PROFILES_FILE)?,
        assignments: load_table(dir, ASSIGNMENTS_FILE)?,
        attendance: load_table(dir, ATTENDANCE_FILE)?,
        remarks: load_table(dir, REMARKS_FILE)?,
        scores: load_table(dir, SCORES_FILE)?,
        summary: load_table(dir, SUMMARY_FILE)?,
    })
}

fn load_table<T: de::DeserializeOwned>(dir: &Path, file: &str) -> anyhow::Result<Vec<T>> {
    let path = dir.join(file);
    let mut rdr =
        csv::Reader::from_path(&path).with_context(|| format!("open {}", path.display()))?;
    let mut rows = Vec::new();
    for (i, record) in rdr.deserialize().enumerate() {
        // Header line is 1, so the first record is line 2.
        let row: T = record.with_context(|| format!("{}: line {}", file, i + 2))?;
        rows.push(row);
    }
    Ok(rows)
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let t = raw.trim();
    NaiveDate::parse_from_str(t, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(t, "%m/%d/%Y"))
        .ok()
}

fn de_date<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(d)?;
    parse_date(&raw).ok_or_else(|| de::Error::custom(format!("unparseable date: {raw}")))
}

// The upstream export writes booleans as `True` / `False`; accept the
// usual spreadsheet spellings too.
fn de_boolish<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(d)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Ok(true),
        "0" | "false" | "no" | "n" => Ok(false),
        _ => Err(de::Error::custom(format!("unparseable boolean: {raw}"))),
    }
}
