use crate::{AttendanceRecord, Course, Student, Teacher};
use serde::{Deserialize, Serialize};

/// Everything the school keeps in its data file: the three entity
/// collections plus the attendance log, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub teachers: Vec<Teacher>,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default, rename = "attendance")]
    pub attendance_log: Vec<AttendanceRecord>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
            && self.teachers.is_empty()
            && self.courses.is_empty()
            && self.attendance_log.is_empty()
    }

    pub fn find_student(&self, student_id: i32) -> Option<&Student> {
        self.students.iter().find(|s| s.id == student_id)
    }

    pub fn find_teacher(&self, teacher_id: i32) -> Option<&Teacher> {
        self.teachers.iter().find(|t| t.id == teacher_id)
    }

    pub fn find_course(&self, course_id: i32) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == course_id)
    }

    pub(crate) fn student_index(&self, student_id: i32) -> Option<usize> {
        self.students.iter().position(|s| s.id == student_id)
    }

    pub(crate) fn course_index(&self, course_id: i32) -> Option<usize> {
        self.courses.iter().position(|c| c.id == course_id)
    }
}
