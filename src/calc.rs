use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::data::{AssignmentRow, AttendanceRow, RemarkRow, ScoreRow, SummaryRow};

#[derive(Debug, Clone, Serialize)]
pub struct CalcError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl CalcError {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }
}

/// Sidebar selectors. `None` is the wildcard; the UI sends either null or
/// the literal string "All" for an unconstrained axis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryFilters {
    pub class: Option<String>,
    pub section: Option<String>,
    pub gender: Option<String>,
}

pub fn parse_summary_filters(
    raw: Option<&serde_json::Value>,
) -> Result<SummaryFilters, CalcError> {
    let Some(raw) = raw else {
        return Ok(SummaryFilters::default());
    };
    if raw.is_null() {
        return Ok(SummaryFilters::default());
    }
    let Some(obj) = raw.as_object() else {
        return Err(CalcError::new("bad_params", "filters must be an object"));
    };
    Ok(SummaryFilters {
        class: selector(obj, "class")?,
        section: selector(obj, "section")?,
        gender: selector(obj, "gender")?,
    })
}

fn selector(
    obj: &serde_json::Map<String, serde_json::Value>,
    key: &str,
) -> Result<Option<String>, CalcError> {
    let Some(v) = obj.get(key) else {
        return Ok(None);
    };
    if v.is_null() {
        return Ok(None);
    }
    let Some(s) = v.as_str() else {
        return Err(CalcError::new(
            "bad_params",
            format!("filters.{key} must be a string or null"),
        ));
    };
    let t = s.trim();
    if t.is_empty() || t.eq_ignore_ascii_case("all") {
        Ok(None)
    } else {
        Ok(Some(t.to_string()))
    }
}

/// Returns the matching rows as a fresh table. The loaded summary is never
/// touched, so every filter change starts again from the full snapshot.
pub fn filter_summary(rows: &[SummaryRow], filters: &SummaryFilters) -> Vec<SummaryRow> {
    rows.iter()
        .filter(|r| {
            matches_selector(&filters.class, &r.class)
                && matches_selector(&filters.section, &r.section)
                && matches_selector(&filters.gender, &r.gender)
        })
        .cloned()
        .collect()
}

fn matches_selector(selector: &Option<String>, value: &str) -> bool {
    selector.as_deref().map(|s| s == value).unwrap_or(true)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_students: usize,
    pub avg_score: Option<f64>,
    pub avg_attendance_rate: Option<f64>,
    pub avg_submission_rate: Option<f64>,
}

pub fn overview(rows: &[SummaryRow]) -> Overview {
    Overview {
        total_students: rows.len(),
        avg_score: mean(rows.iter().map(|r| r.avg_score)),
        avg_attendance_rate: mean(rows.iter().map(|r| r.attendance_rate)),
        avg_submission_rate: mean(rows.iter().map(|r| r.submission_rate)),
    }
}

// Mean of zero rows is undefined, not zero; the UI renders None as blank.
fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let mut sum = 0.0;
    let mut n = 0usize;
    for v in values {
        sum += v;
        n += 1;
    }
    if n > 0 {
        Some(sum / n as f64)
    } else {
        None
    }
}

pub fn top_performers(rows: &[SummaryRow], count: usize) -> Vec<SummaryRow> {
    let mut out = rows.to_vec();
    // Stable: equal scores keep their original row order.
    out.sort_by(|a, b| {
        b.avg_score
            .partial_cmp(&a.avg_score)
            .unwrap_or(Ordering::Equal)
    });
    out.truncate(count);
    out
}

pub fn bottom_performers(rows: &[SummaryRow], count: usize) -> Vec<SummaryRow> {
    let mut out = rows.to_vec();
    out.sort_by(|a, b| {
        a.avg_score
            .partial_cmp(&b.avg_score)
            .unwrap_or(Ordering::Equal)
    });
    out.truncate(count);
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectMean {
    pub subject: String,
    pub avg_score: f64,
}

pub fn subject_mean_scores(scores: &[ScoreRow]) -> Vec<SubjectMean> {
    let mut acc: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for s in scores {
        let e = acc.entry(s.subject.as_str()).or_insert((0.0, 0));
        e.0 += s.score;
        e.1 += 1;
    }
    acc.into_iter()
        .map(|(subject, (sum, n))| SubjectMean {
            subject: subject.to_string(),
            avg_score: sum / n as f64,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectTermMean {
    pub subject: String,
    pub term: String,
    pub avg_score: f64,
}

pub fn subject_term_mean_scores(scores: &[ScoreRow]) -> Vec<SubjectTermMean> {
    let mut acc: BTreeMap<(&str, &str), (f64, usize)> = BTreeMap::new();
    for s in scores {
        let e = acc
            .entry((s.subject.as_str(), s.term.as_str()))
            .or_insert((0.0, 0));
        e.0 += s.score;
        e.1 += 1;
    }
    acc.into_iter()
        .map(|((subject, term), (sum, n))| SubjectTermMean {
            subject: subject.to_string(),
            term: term.to_string(),
            avg_score: sum / n as f64,
        })
        .collect()
}

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyAttendance {
    pub month: String,
    pub month_number: u32,
    pub present_days: usize,
    pub absent_days: usize,
    /// None for a month with no records at all.
    pub attendance_rate: Option<f64>,
}

/// Groups by calendar month, merging years, and always emits all twelve
/// months in calendar order. Present/absent are counted into explicit
/// buckets rather than keyed on the boolean value itself.
pub fn monthly_attendance(rows: &[AttendanceRow]) -> Vec<MonthlyAttendance> {
    let mut present = [0usize; 12];
    let mut absent = [0usize; 12];
    for r in rows {
        let idx = r.date.month0() as usize;
        if r.present {
            present[idx] += 1;
        } else {
            absent[idx] += 1;
        }
    }
    (0..12)
        .map(|i| {
            let total = present[i] + absent[i];
            MonthlyAttendance {
                month: MONTH_NAMES[i].to_string(),
                month_number: (i + 1) as u32,
                present_days: present[i],
                absent_days: absent[i],
                attendance_rate: if total > 0 {
                    Some(present[i] as f64 / total as f64)
                } else {
                    None
                },
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemarkCount {
    pub remark: String,
    pub count: usize,
}

pub fn remark_category_counts(rows: &[RemarkRow]) -> Vec<RemarkCount> {
    let mut acc: BTreeMap<&str, usize> = BTreeMap::new();
    for r in rows {
        *acc.entry(r.remark.as_str()).or_insert(0) += 1;
    }
    let mut out: Vec<RemarkCount> = acc
        .into_iter()
        .map(|(remark, count)| RemarkCount {
            remark: remark.to_string(),
            count,
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.remark.cmp(&b.remark)));
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemarkTrendPoint {
    pub date: NaiveDate,
    pub remark: String,
    pub count: usize,
}

/// Sparse (date, category) series for one student's remarks, ordered by
/// date then category. Dates with no remarks simply do not appear.
pub fn remark_trend(rows: &[RemarkRow]) -> Vec<RemarkTrendPoint> {
    let mut acc: BTreeMap<(NaiveDate, &str), usize> = BTreeMap::new();
    for r in rows {
        *acc.entry((r.date, r.remark.as_str())).or_insert(0) += 1;
    }
    acc.into_iter()
        .map(|((date, remark), count)| RemarkTrendPoint {
            date,
            remark: remark.to_string(),
            count,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectCompletion {
    pub subject: String,
    pub submitted_count: usize,
    pub total_count: usize,
    /// Percentage in [0, 100]. Every emitted subject has at least one row.
    pub completion_rate: f64,
}

pub fn completion_by_subject(rows: &[AssignmentRow]) -> Vec<SubjectCompletion> {
    let mut acc: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for r in rows {
        let e = acc.entry(r.subject.as_str()).or_insert((0, 0));
        e.1 += 1;
        if r.submitted {
            e.0 += 1;
        }
    }
    acc.into_iter()
        .map(|(subject, (submitted, total))| SubjectCompletion {
            subject: subject.to_string(),
            submitted_count: submitted,
            total_count: total,
            completion_rate: 100.0 * submitted as f64 / total as f64,
        })
        .collect()
}

pub fn upcoming_deadlines(
    rows: &[AssignmentRow],
    as_of: NaiveDate,
    count: usize,
) -> Vec<AssignmentRow> {
    let mut out: Vec<AssignmentRow> = rows
        .iter()
        .filter(|r| r.deadline >= as_of)
        .cloned()
        .collect();
    out.sort_by(|a, b| a.deadline.cmp(&b.deadline));
    out.truncate(count);
    out
}

/// Resolves the drill-down target against the filtered summary. An id wins
/// over a name; a bare name takes the first match in row order (names are
/// not guaranteed unique). A miss falls back to the first row so a stale
/// selection after a filter change degrades to a usable default instead of
/// an error. Only an empty summary yields None.
pub fn resolve_student<'a>(
    rows: &'a [SummaryRow],
    student_id: Option<&str>,
    name: Option<&str>,
) -> Option<&'a SummaryRow> {
    if let Some(id) = student_id {
        if let Some(row) = rows.iter().find(|r| r.id == id) {
            return Some(row);
        }
    }
    if let Some(name) = name {
        if let Some(row) = rows.iter().find(|r| r.name == name) {
            return Some(row);
        }
    }
    rows.first()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionCounts {
    pub submitted: usize,
    pub not_submitted: usize,
}

pub fn submission_counts(rows: &[AssignmentRow], student_id: &str) -> SubmissionCounts {
    let mut counts = SubmissionCounts {
        submitted: 0,
        not_submitted: 0,
    };
    for r in rows.iter().filter(|r| r.id == student_id) {
        if r.submitted {
            counts.submitted += 1;
        } else {
            counts.not_submitted += 1;
        }
    }
    counts
}

/// Marks over submitted assignments only; an unsubmitted row's marks cell
/// is ignored even if the source happens to carry a value there.
pub fn submitted_marks(rows: &[AssignmentRow], student_id: &str) -> Vec<f64> {
    rows.iter()
        .filter(|r| r.id == student_id && r.submitted)
        .filter_map(|r| r.marks)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceCounts {
    pub present_days: usize,
    pub absent_days: usize,
}

pub fn attendance_counts(rows: &[AttendanceRow], student_id: &str) -> AttendanceCounts {
    let mut counts = AttendanceCounts {
        present_days: 0,
        absent_days: 0,
    };
    for r in rows.iter().filter(|r| r.id == student_id) {
        if r.present {
            counts.present_days += 1;
        } else {
            counts.absent_days += 1;
        }
    }
    counts
}

pub fn scores_for_student(rows: &[ScoreRow], student_id: &str) -> Vec<ScoreRow> {
    rows.iter().filter(|r| r.id == student_id).cloned().collect()
}

/// Newest first, matching the remarks table in the drill-down view.
pub fn remarks_for_student(rows: &[RemarkRow], student_id: &str) -> Vec<RemarkRow> {
    let mut out: Vec<RemarkRow> = rows.iter().filter(|r| r.id == student_id).cloned().collect();
    out.sort_by(|a, b| b.date.cmp(&a.date));
    out
}
