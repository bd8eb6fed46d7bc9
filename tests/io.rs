#![forbid(unsafe_code)]
use chrono::{NaiveDate, NaiveTime};
use horaire::{
    io,
    model::{GroupId, LessonKind, LessonOccurrence, Schedule, SchoolId, Teacher},
};
use tempfile::tempdir;

#[test]
fn import_teachers_csv_with_active_flags() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("teachers.csv");
    std::fs::write(&path, "name,active\nMme Dupont,\nM. Martin,non\n").unwrap();

    let teachers = io::import_teachers_csv(&path).unwrap();
    assert_eq!(teachers.len(), 2);
    assert_eq!(teachers[0].name, "Mme Dupont");
    assert!(teachers[0].active); // défaut
    assert_eq!(teachers[1].name, "M. Martin");
    assert!(!teachers[1].active);
}

#[test]
fn import_teachers_csv_rejects_bad_rows() {
    let dir = tempdir().unwrap();

    let empty_name = dir.path().join("empty.csv");
    std::fs::write(&empty_name, "name,active\n,oui\n").unwrap();
    assert!(io::import_teachers_csv(&empty_name).is_err());

    let bad_flag = dir.path().join("flag.csv");
    std::fs::write(&bad_flag, "name,active\nMme Dupont,peut-être\n").unwrap();
    assert!(io::import_teachers_csv(&bad_flag).is_err());
}

#[test]
fn export_occurrences_csv_resolves_teacher_names() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("occurrences.csv");
    let schedule = sample_schedule();

    io::export_occurrences_csv(&path, &schedule).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();

    let mut lines = content.lines();
    assert_eq!(
        lines.next().unwrap(),
        "id,date,start,end,group,teacher_name,status,kind,substitute"
    );
    let row = lines.next().unwrap();
    assert!(row.contains("2024-02-05"));
    assert!(row.contains("09:00"));
    assert!(row.contains("10:00"));
    assert!(row.contains("Mme Dupont"));
    assert!(row.contains("scheduled"));
    assert!(row.contains("regular"));
    assert!(lines.next().is_none());
}

#[test]
fn export_schedule_json_roundtrips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("schedule.json");
    let schedule = sample_schedule();

    io::export_schedule_json(&path, &schedule).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    let parsed: Schedule = serde_json::from_str(&content).unwrap();

    assert_eq!(parsed.teachers.len(), 1);
    assert_eq!(parsed.occurrences.len(), 1);
    assert_eq!(parsed.occurrences[0].id, schedule.occurrences[0].id);
    assert_eq!(parsed.occurrences[0].date, schedule.occurrences[0].date);
}

fn sample_schedule() -> Schedule {
    let teacher = Teacher::new("Mme Dupont");
    let occurrence = LessonOccurrence::new(
        SchoolId::new("s1"),
        GroupId::new("c1"),
        teacher.id.clone(),
        NaiveDate::from_ymd_opt(2024, 2, 5).unwrap(),
        NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        LessonKind::Regular,
    )
    .unwrap();
    Schedule {
        teachers: vec![teacher],
        assignments: Vec::new(),
        occurrences: vec![occurrence],
        leaves: Vec::new(),
    }
}
