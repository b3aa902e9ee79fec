use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub enrolled_course_ids: Vec<i32>,
}

impl Student {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            enrolled_course_ids: Vec::new(),
        }
    }

    pub fn with_courses(mut self, course_ids: impl IntoIterator<Item = i32>) -> Self {
        self.enrolled_course_ids = course_ids.into_iter().collect();
        self
    }

    pub fn is_enrolled_in(&self, course_id: i32) -> bool {
        self.enrolled_course_ids.contains(&course_id)
    }
}
