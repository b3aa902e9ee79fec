use roster_tool::{
    AttendanceRecord, Course, IntegrityPolicy, JsonFileStore, Lesson, PersistenceError, Roster,
    RosterConfig, RosterStore, ScheduleManager, Student, Teacher, load_roster_from_json,
    save_attendance_to_csv, save_roster_to_json,
};
use serde_json::json;
use std::fs;
use tempfile::{NamedTempFile, tempdir};

fn build_sample_roster() -> Roster {
    let mut lesson = Lesson::new("Tuesday", "15:30");
    lesson.extra.insert("room".into(), json!("Studio B"));
    lesson.extra.insert("duration_minutes".into(), json!(45));

    let mut roster = Roster::new();
    roster.teachers.push(Teacher::new(1, "Ms. Ortiz", "Classical piano"));
    roster.students.push(Student::new(1, "Alice").with_courses([10]));
    roster.students.push(Student::new(2, "Ben"));
    roster.courses.push(
        Course::new(10, "Piano I", "Piano", 1)
            .with_students([1])
            .with_lesson(lesson)
            .with_lesson(Lesson::new("Friday", "09:00")),
    );
    roster.attendance_log.push(AttendanceRecord {
        student_id: 1,
        course_id: 10,
        timestamp: "2025-02-04T15:31:07.250000".into(),
    });
    roster
}

#[test]
fn json_round_trip_preserves_roster() {
    let roster = build_sample_roster();
    let file = NamedTempFile::new().unwrap();

    save_roster_to_json(&roster, file.path()).unwrap();
    let loaded = load_roster_from_json(file.path()).unwrap();

    assert_eq!(loaded, Some(roster));
}

#[test]
fn saved_document_uses_flat_wire_format() {
    let file = NamedTempFile::new().unwrap();
    save_roster_to_json(&build_sample_roster(), file.path()).unwrap();

    let text = fs::read_to_string(file.path()).unwrap();
    assert!(text.contains('\n'), "document should be pretty-printed");
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["students"][0]["enrolled_course_ids"], json!([10]));
    assert_eq!(value["teachers"][0]["speciality"], json!("Classical piano"));
    assert_eq!(value["courses"][0]["teacher_id"], json!(1));
    assert_eq!(value["courses"][0]["lessons"][0]["room"], json!("Studio B"));
    assert_eq!(value["attendance"][0]["timestamp"], json!("2025-02-04T15:31:07.250000"));
}

#[test]
fn missing_file_loads_as_none() {
    let dir = tempdir().unwrap();
    let loaded = load_roster_from_json(dir.path().join("absent.json")).unwrap();
    assert!(loaded.is_none());
}

#[test]
fn malformed_file_is_reported_as_corrupt() {
    let file = NamedTempFile::new().unwrap();
    fs::write(file.path(), "{\"students\": [ {\"id\": 1,").unwrap();

    match load_roster_from_json(file.path()) {
        Err(PersistenceError::Corrupt { path, .. }) => assert_eq!(path, file.path()),
        other => panic!("expected corrupt error, got {other:?}"),
    }
}

#[test]
fn wrong_field_type_is_reported_as_corrupt() {
    let file = NamedTempFile::new().unwrap();
    fs::write(
        file.path(),
        r#"{"students": [{"id": "one", "name": "Alice"}]}"#,
    )
    .unwrap();
    assert!(matches!(
        load_roster_from_json(file.path()),
        Err(PersistenceError::Corrupt { .. })
    ));
}

#[test]
fn reading_a_directory_is_unreadable() {
    let dir = tempdir().unwrap();
    let result = load_roster_from_json(dir.path());
    assert!(
        matches!(result, Err(PersistenceError::Unreadable { .. })),
        "got {result:?}"
    );
}

#[test]
fn missing_keys_default_to_empty() {
    let file = NamedTempFile::new().unwrap();
    fs::write(
        file.path(),
        r#"{
            "students": [{"id": 1, "name": "Alice"}],
            "courses": [{"id": 10, "name": "Piano I", "instrument": "Piano", "teacher_id": 1}]
        }"#,
    )
    .unwrap();

    let roster = load_roster_from_json(file.path()).unwrap().unwrap();
    assert!(roster.students[0].enrolled_course_ids.is_empty());
    assert!(roster.courses[0].enrolled_student_ids.is_empty());
    assert!(roster.courses[0].lessons.is_empty());
    assert!(roster.teachers.is_empty());
    assert!(roster.attendance_log.is_empty());
}

#[test]
fn save_creates_missing_parent_directories() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data").join("msms.json");
    let store = JsonFileStore::new(&path);

    store.save_roster(&build_sample_roster()).unwrap();

    assert!(path.exists());
    assert_eq!(store.load_roster().unwrap(), Some(build_sample_roster()));
}

#[test]
fn manager_starts_clean_when_file_is_missing() {
    let dir = tempdir().unwrap();
    let config = RosterConfig::new(dir.path().join("msms.json"));

    let manager = ScheduleManager::open(&config).unwrap();

    assert!(manager.roster().is_empty());
    assert!(!config.data_path.exists(), "loading must not create the file");
}

#[test]
fn manager_surfaces_corrupt_file() {
    let file = NamedTempFile::new().unwrap();
    fs::write(file.path(), "not json").unwrap();
    let config = RosterConfig::new(file.path());
    assert!(matches!(
        ScheduleManager::open(&config),
        Err(PersistenceError::Corrupt { .. })
    ));
}

#[test]
fn mutations_are_written_through_to_the_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("msms.json");
    let mut roster = build_sample_roster();
    roster.courses.push(Course::new(20, "Piano II", "Piano", 1));
    save_roster_to_json(&roster, &path).unwrap();

    let config = RosterConfig::new(&path).with_integrity(IntegrityPolicy::Strict);
    let mut manager = ScheduleManager::open(&config).unwrap();
    manager.switch_course(1, 10, 20).unwrap();
    let record = manager.check_in(1, 20).unwrap();

    let reloaded = ScheduleManager::open(&config).unwrap();
    assert_eq!(reloaded.roster(), manager.roster());
    assert_eq!(
        reloaded.find_student_by_id(1).unwrap().enrolled_course_ids,
        vec![20]
    );
    assert_eq!(reloaded.attendance_log().last(), Some(&record));
    assert_eq!(reloaded.attendance_log().len(), 2);
}

#[test]
fn rejected_operations_do_not_touch_the_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("msms.json");
    save_roster_to_json(&build_sample_roster(), &path).unwrap();
    let before = fs::read_to_string(&path).unwrap();

    let mut manager = ScheduleManager::open(&RosterConfig::new(&path)).unwrap();
    assert!(manager.check_in(5, 10).is_err());
    assert!(manager.switch_course(2, 10, 10).is_err());

    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn attendance_csv_export_writes_header_and_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("attendance.csv");
    let records = vec![
        AttendanceRecord {
            student_id: 1,
            course_id: 10,
            timestamp: "2025-02-04T15:31:07.250000Z".into(),
        },
        AttendanceRecord {
            student_id: 2,
            course_id: 10,
            timestamp: "2025-02-04T15:32:00.000000Z".into(),
        },
    ];

    let written = save_attendance_to_csv(&records, &path).unwrap();

    assert_eq!(written, 2);
    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "student_id,course_id,timestamp",
            "1,10,2025-02-04T15:31:07.250000Z",
            "2,10,2025-02-04T15:32:00.000000Z",
        ]
    );
}

#[test]
fn attendance_csv_export_of_empty_log_has_header_only() {
    let file = NamedTempFile::new().unwrap();
    assert_eq!(save_attendance_to_csv(&[], file.path()).unwrap(), 0);
    assert_eq!(
        fs::read_to_string(file.path()).unwrap().trim_end(),
        "student_id,course_id,timestamp"
    );
}
