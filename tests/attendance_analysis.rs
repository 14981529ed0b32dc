
use serde_json::json;
use test_support::{approx, array_at, f64_at, open_default_workspace, request_ok, str_at, u64_at};

#[test]
fn monthly_rates_merge_years_and_leave_empty_months_blank() {
    let (_child, mut stdin, mut reader, _ws) = open_default_workspace();

    let result = request_ok(&mut stdin, &mut reader, "1", "attendance.monthly", json!({}));
    let months = array_at(&result, "months");
    assert_eq!(months.len(), 12);
    assert_eq!(str_at(&months[0], "month"), "January");
    assert_eq!(str_at(&months[11], "month"), "December");

    // January: S01 present twice, S02 absent once.
    assert_eq!(u64_at(&months[0], "presentDays"), 2);
    assert_eq!(u64_at(&months[0], "absentDays"), 1);
    assert!(approx(f64_at(&months[0], "attendanceRate"), 2.0 / 3.0));

    assert!(approx(f64_at(&months[1], "attendanceRate"), 0.5));
    assert!(approx(f64_at(&months[2], "attendanceRate"), 1.0));

    for m in months {
        let rate = m.get("attendanceRate").expect("rate field");
        if rate.is_null() {
            assert_eq!(u64_at(m, "presentDays") + u64_at(m, "absentDays"), 0);
        } else {
            let r = rate.as_f64().expect("rate number");
            assert!((0.0..=1.0).contains(&r), "rate out of range: {r}");
        }
    }

    // Months with no records render blank, not zero.
    assert!(months[3].get("attendanceRate").expect("april").is_null());
    assert!(months[11].get("attendanceRate").expect("december").is_null());
}

#[test]
fn student_day_counts_cover_every_attendance_row() {
    let (_child, mut stdin, mut reader, _ws) = open_default_workspace();

    let asha = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "attendance.student",
        json!({ "studentId": "S01" }),
    );
    assert_eq!(u64_at(&asha, "presentDays"), 3);
    assert_eq!(u64_at(&asha, "absentDays"), 1);
    assert!(approx(f64_at(&asha, "attendanceRate"), 0.75));
    // Present plus absent accounts for all four of S01's records.
    assert_eq!(u64_at(&asha, "presentDays") + u64_at(&asha, "absentDays"), 4);

    let bilal = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "attendance.student",
        json!({ "name": "Bilal Khan" }),
    );
    assert_eq!(u64_at(&bilal, "presentDays"), 1);
    assert_eq!(u64_at(&bilal, "absentDays"), 1);
    assert!(approx(f64_at(&bilal, "attendanceRate"), 0.5));
}

#[test]
fn student_with_no_records_has_undefined_rate() {
    let (_child, mut stdin, mut reader, _ws) = open_default_workspace();

    // S10 exists in the summary but has no attendance rows.
    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "attendance.student",
        json!({ "studentId": "S10" }),
    );
    assert_eq!(u64_at(&result, "presentDays"), 0);
    assert_eq!(u64_at(&result, "absentDays"), 0);
    assert!(result.get("attendanceRate").expect("rate").is_null());

    // Empty filtered summary: null selection, zero counts.
    let none = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "attendance.student",
        json!({ "filters": { "class": "12" } }),
    );
    assert!(none.get("student").expect("student").is_null());
    assert_eq!(u64_at(&none, "presentDays"), 0);
    assert!(none.get("attendanceRate").expect("rate").is_null());
}
