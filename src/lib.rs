pub mod attendance;
pub mod config;
pub mod course;
pub mod persistence;
pub mod roster;
pub mod roster_validation;
pub mod schedule;
pub mod student;
pub mod teacher;

pub use attendance::{AttendanceClock, AttendanceRecord};
pub use config::{DEFAULT_DATA_PATH, RosterConfig};
pub use course::{Course, Lesson};
pub use persistence::{
    JsonFileStore, MemoryRosterStore, PersistenceError, PersistenceResult, RosterStore,
    load_roster_from_json, save_attendance_to_csv, save_roster_to_json,
};
pub use roster::Roster;
pub use roster_validation::{EntityKind, IntegrityPolicy, RosterIssue, validate_roster};
pub use schedule::{DailyLesson, RosterError, ScheduleManager, ScheduledLesson, UNKNOWN_TEACHER};
pub use student::Student;
pub use teacher::Teacher;
