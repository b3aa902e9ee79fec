use serde::{Deserialize, Serialize};

/// A member of staff who can be assigned to courses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: i32,
    pub name: String,
    /// Free-form description of what the teacher specialises in (e.g. "Jazz piano").
    pub speciality: String,
}

impl Teacher {
    pub fn new(id: i32, name: impl Into<String>, speciality: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            speciality: speciality.into(),
        }
    }
}
