use crate::Roster;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// How strictly a loaded roster is checked for referential problems.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrityPolicy {
    /// Log every issue and load anyway.
    #[default]
    Permissive,
    /// Refuse to load a roster with any issue.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Student,
    Teacher,
    Course,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
            Self::Course => "course",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterIssue {
    DuplicateId {
        kind: EntityKind,
        id: i32,
    },
    UnknownTeacher {
        course_id: i32,
        teacher_id: i32,
    },
    UnknownCourse {
        student_id: i32,
        course_id: i32,
    },
    UnknownStudent {
        course_id: i32,
        student_id: i32,
    },
    DuplicateEnrollment {
        student_id: i32,
        course_id: i32,
    },
    /// The student lists the course but the course does not list the student.
    MissingCourseSide {
        student_id: i32,
        course_id: i32,
    },
    /// The course lists the student but the student does not list the course.
    MissingStudentSide {
        student_id: i32,
        course_id: i32,
    },
}

impl fmt::Display for RosterIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RosterIssue::DuplicateId { kind, id } => {
                write!(f, "duplicate {} id {id}", kind.as_str())
            }
            RosterIssue::UnknownTeacher {
                course_id,
                teacher_id,
            } => write!(f, "course {course_id} references unknown teacher {teacher_id}"),
            RosterIssue::UnknownCourse {
                student_id,
                course_id,
            } => write!(f, "student {student_id} is enrolled in unknown course {course_id}"),
            RosterIssue::UnknownStudent {
                course_id,
                student_id,
            } => write!(f, "course {course_id} lists unknown student {student_id}"),
            RosterIssue::DuplicateEnrollment {
                student_id,
                course_id,
            } => write!(
                f,
                "student {student_id} and course {course_id} are linked more than once"
            ),
            RosterIssue::MissingCourseSide {
                student_id,
                course_id,
            } => write!(
                f,
                "student {student_id} lists course {course_id} but the course does not list the student"
            ),
            RosterIssue::MissingStudentSide {
                student_id,
                course_id,
            } => write!(
                f,
                "course {course_id} lists student {student_id} but the student does not list the course"
            ),
        }
    }
}

fn duplicate_ids(kind: EntityKind, ids: impl Iterator<Item = i32>) -> Vec<RosterIssue> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut issues = Vec::new();
    for id in ids {
        if !seen.insert(id) && reported.insert(id) {
            issues.push(RosterIssue::DuplicateId { kind, id });
        }
    }
    issues
}

/// Collects every referential problem in `roster`, in a stable order.
/// An empty result means the enrollment links are symmetric and all ids resolve.
pub fn validate_roster(roster: &Roster) -> Vec<RosterIssue> {
    let mut issues = Vec::new();
    issues.extend(duplicate_ids(
        EntityKind::Student,
        roster.students.iter().map(|s| s.id),
    ));
    issues.extend(duplicate_ids(
        EntityKind::Teacher,
        roster.teachers.iter().map(|t| t.id),
    ));
    issues.extend(duplicate_ids(
        EntityKind::Course,
        roster.courses.iter().map(|c| c.id),
    ));

    for course in &roster.courses {
        if roster.find_teacher(course.teacher_id).is_none() {
            issues.push(RosterIssue::UnknownTeacher {
                course_id: course.id,
                teacher_id: course.teacher_id,
            });
        }
    }

    for student in &roster.students {
        let mut seen = HashSet::with_capacity(student.enrolled_course_ids.len());
        for &course_id in &student.enrolled_course_ids {
            if !seen.insert(course_id) {
                issues.push(RosterIssue::DuplicateEnrollment {
                    student_id: student.id,
                    course_id,
                });
                continue;
            }
            match roster.find_course(course_id) {
                None => issues.push(RosterIssue::UnknownCourse {
                    student_id: student.id,
                    course_id,
                }),
                Some(course) if !course.has_student(student.id) => {
                    issues.push(RosterIssue::MissingCourseSide {
                        student_id: student.id,
                        course_id,
                    })
                }
                Some(_) => {}
            }
        }
    }

    for course in &roster.courses {
        let mut seen = HashSet::with_capacity(course.enrolled_student_ids.len());
        for &student_id in &course.enrolled_student_ids {
            if !seen.insert(student_id) {
                issues.push(RosterIssue::DuplicateEnrollment {
                    student_id,
                    course_id: course.id,
                });
                continue;
            }
            match roster.find_student(student_id) {
                None => issues.push(RosterIssue::UnknownStudent {
                    course_id: course.id,
                    student_id,
                }),
                Some(student) if !student.is_enrolled_in(course.id) => {
                    issues.push(RosterIssue::MissingStudentSide {
                        student_id,
                        course_id: course.id,
                    })
                }
                Some(_) => {}
            }
        }
    }

    issues
}
