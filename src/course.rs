use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A recurring lesson slot of a course.
///
/// Only `day` and `time` are interpreted by the roster. Any other keys found in
/// the stored document (room, duration, notes, ...) are kept in `extra` and
/// written back untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    #[serde(default)]
    pub day: String,
    #[serde(default)]
    pub time: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Lesson {
    pub fn new(day: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            day: day.into(),
            time: time.into(),
            extra: Map::new(),
        }
    }

    /// Case-insensitive comparison against a weekday name such as "monday".
    pub fn is_on(&self, day: &str) -> bool {
        self.day.to_lowercase() == day.to_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: i32,
    pub name: String,
    pub instrument: String,
    /// Teacher running the course. Not checked against the teacher list on load.
    pub teacher_id: i32,
    #[serde(default)]
    pub enrolled_student_ids: Vec<i32>,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

impl Course {
    pub fn new(
        id: i32,
        name: impl Into<String>,
        instrument: impl Into<String>,
        teacher_id: i32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            instrument: instrument.into(),
            teacher_id,
            enrolled_student_ids: Vec::new(),
            lessons: Vec::new(),
        }
    }

    pub fn with_students(mut self, student_ids: impl IntoIterator<Item = i32>) -> Self {
        self.enrolled_student_ids = student_ids.into_iter().collect();
        self
    }

    pub fn with_lesson(mut self, lesson: Lesson) -> Self {
        self.lessons.push(lesson);
        self
    }

    pub fn has_student(&self, student_id: i32) -> bool {
        self.enrolled_student_ids.contains(&student_id)
    }
}
