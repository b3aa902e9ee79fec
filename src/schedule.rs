use crate::attendance::{AttendanceClock, AttendanceRecord};
use crate::config::RosterConfig;
use crate::persistence::{JsonFileStore, PersistenceError, PersistenceResult, RosterStore};
use crate::roster_validation::{self, IntegrityPolicy};
use crate::{Course, Lesson, Roster, Student, Teacher};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Teacher name shown when a course points at a teacher id that does not resolve.
pub const UNKNOWN_TEACHER: &str = "Unknown";

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("student {0} not found")]
    StudentNotFound(i32),
    #[error("course {0} not found")]
    CourseNotFound(i32),
    #[error("student {student_id} is not enrolled in course {course_id}")]
    NotEnrolled { student_id: i32, course_id: i32 },
    #[error("student {student_id} is already enrolled in course {course_id}")]
    AlreadyEnrolled { student_id: i32, course_id: i32 },
    #[error(transparent)]
    Storage(#[from] PersistenceError),
}

impl RosterError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RosterError::StudentNotFound(_) | RosterError::CourseNotFound(_)
        )
    }

    pub fn is_invalid_transition(&self) -> bool {
        matches!(
            self,
            RosterError::NotEnrolled { .. } | RosterError::AlreadyEnrolled { .. }
        )
    }
}

/// One row of the daily roster: a lesson joined with its course, teacher and students.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyLesson {
    pub course_name: String,
    pub instrument: String,
    pub teacher: String,
    pub time: String,
    pub students: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct ScheduledLesson<'a> {
    pub course: &'a Course,
    pub lesson: &'a Lesson,
}

/// Owns the school's roster and writes it back to its store after every
/// successful change.
///
/// Exactly one manager should exist per data file. It is built once at
/// startup and handed to whatever drives it; nothing else keeps copies of
/// the entities or the attendance log.
pub struct ScheduleManager<S = JsonFileStore> {
    store: S,
    roster: Roster,
    clock: AttendanceClock,
}

impl ScheduleManager<JsonFileStore> {
    pub fn open(config: &RosterConfig) -> PersistenceResult<Self> {
        Self::load(JsonFileStore::new(config.data_path.clone()), config.integrity)
    }
}

impl<S: RosterStore> ScheduleManager<S> {
    pub fn load(store: S, integrity: IntegrityPolicy) -> PersistenceResult<Self> {
        let roster = match store.load_roster()? {
            Some(roster) => roster,
            None => {
                tracing::warn!("data file not found, starting with a clean state");
                Roster::new()
            }
        };
        check_integrity(&roster, integrity)?;
        tracing::info!(
            students = roster.students.len(),
            teachers = roster.teachers.len(),
            courses = roster.courses.len(),
            attendance = roster.attendance_log.len(),
            "roster loaded"
        );
        Ok(Self {
            store,
            roster,
            clock: AttendanceClock::new(),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn students(&self) -> &[Student] {
        &self.roster.students
    }

    pub fn teachers(&self) -> &[Teacher] {
        &self.roster.teachers
    }

    pub fn courses(&self) -> &[Course] {
        &self.roster.courses
    }

    pub fn attendance_log(&self) -> &[AttendanceRecord] {
        &self.roster.attendance_log
    }

    pub fn save(&self) -> PersistenceResult<()> {
        self.store.save_roster(&self.roster)
    }

    pub fn find_student_by_id(&self, student_id: i32) -> Option<&Student> {
        self.roster.find_student(student_id)
    }

    pub fn find_course_by_id(&self, course_id: i32) -> Option<&Course> {
        self.roster.find_course(course_id)
    }

    pub fn find_teacher_by_id(&self, teacher_id: i32) -> Option<&Teacher> {
        self.roster.find_teacher(teacher_id)
    }

    pub fn attendance_for_student(
        &self,
        student_id: i32,
    ) -> impl Iterator<Item = &AttendanceRecord> + '_ {
        self.roster
            .attendance_log
            .iter()
            .filter(move |record| record.student_id == student_id)
    }

    pub fn attendance_for_course(
        &self,
        course_id: i32,
    ) -> impl Iterator<Item = &AttendanceRecord> + '_ {
        self.roster
            .attendance_log
            .iter()
            .filter(move |record| record.course_id == course_id)
    }

    /// Every lesson held on `day` (case-insensitive), in course order and
    /// then lesson order.
    pub fn lessons_on(&self, day: &str) -> Vec<ScheduledLesson<'_>> {
        let mut lessons = Vec::new();
        for course in &self.roster.courses {
            for lesson in &course.lessons {
                if lesson.is_on(day) {
                    lessons.push(ScheduledLesson { course, lesson });
                }
            }
        }
        lessons
    }

    pub fn get_daily_lessons(&self, day: &str) -> Vec<DailyLesson> {
        self.lessons_on(day)
            .into_iter()
            .map(|scheduled| {
                let course = scheduled.course;
                let teacher = self
                    .roster
                    .find_teacher(course.teacher_id)
                    .map(|t| t.name.clone())
                    .unwrap_or_else(|| UNKNOWN_TEACHER.to_string());
                let students = course
                    .enrolled_student_ids
                    .iter()
                    .filter_map(|&id| self.roster.find_student(id))
                    .map(|s| s.name.clone())
                    .collect();
                DailyLesson {
                    course_name: course.name.clone(),
                    instrument: course.instrument.clone(),
                    teacher,
                    time: scheduled.lesson.time.clone(),
                    students,
                }
            })
            .collect()
    }

    /// Records that a student attended a course and persists the roster.
    pub fn check_in(
        &mut self,
        student_id: i32,
        course_id: i32,
    ) -> Result<AttendanceRecord, RosterError> {
        let (student_name, course_name) = match (
            self.roster.find_student(student_id),
            self.roster.find_course(course_id),
        ) {
            (Some(student), Some(course)) => (student.name.clone(), course.name.clone()),
            (None, _) => return Err(rejected(RosterError::StudentNotFound(student_id))),
            (_, None) => return Err(rejected(RosterError::CourseNotFound(course_id))),
        };

        let record = AttendanceRecord::new(student_id, course_id, self.clock.now());
        self.roster.attendance_log.push(record.clone());
        if let Err(err) = self.store.save_roster(&self.roster) {
            self.roster.attendance_log.pop();
            tracing::error!(%err, "check-in not saved");
            return Err(err.into());
        }

        tracing::info!(
            student = %student_name,
            course = %course_name,
            timestamp = %record.timestamp,
            "student checked in"
        );
        Ok(record)
    }

    /// Moves a student from one course to another, updating both sides of
    /// each enrollment, then persists the roster.
    pub fn switch_course(
        &mut self,
        student_id: i32,
        from_course_id: i32,
        to_course_id: i32,
    ) -> Result<(), RosterError> {
        let (student_idx, from_idx, to_idx) = self
            .validate_switch(student_id, from_course_id, to_course_id)
            .map_err(rejected)?;

        let previous = (
            self.roster.students[student_idx].enrolled_course_ids.clone(),
            self.roster.courses[from_idx].enrolled_student_ids.clone(),
            self.roster.courses[to_idx].enrolled_student_ids.clone(),
        );

        remove_first(
            &mut self.roster.students[student_idx].enrolled_course_ids,
            from_course_id,
        );
        remove_first(
            &mut self.roster.courses[from_idx].enrolled_student_ids,
            student_id,
        );
        self.roster.students[student_idx]
            .enrolled_course_ids
            .push(to_course_id);
        let to_course = &mut self.roster.courses[to_idx];
        if !to_course.has_student(student_id) {
            to_course.enrolled_student_ids.push(student_id);
        }

        if let Err(err) = self.store.save_roster(&self.roster) {
            let (student_courses, from_students, to_students) = previous;
            self.roster.students[student_idx].enrolled_course_ids = student_courses;
            self.roster.courses[from_idx].enrolled_student_ids = from_students;
            self.roster.courses[to_idx].enrolled_student_ids = to_students;
            tracing::error!(%err, "course switch not saved");
            return Err(err.into());
        }

        tracing::info!(
            student = %self.roster.students[student_idx].name,
            from = %self.roster.courses[from_idx].name,
            to = %self.roster.courses[to_idx].name,
            "student switched course"
        );
        Ok(())
    }

    fn validate_switch(
        &self,
        student_id: i32,
        from_course_id: i32,
        to_course_id: i32,
    ) -> Result<(usize, usize, usize), RosterError> {
        let student_idx = self
            .roster
            .student_index(student_id)
            .ok_or(RosterError::StudentNotFound(student_id))?;
        let from_idx = self
            .roster
            .course_index(from_course_id)
            .ok_or(RosterError::CourseNotFound(from_course_id))?;
        let to_idx = self
            .roster
            .course_index(to_course_id)
            .ok_or(RosterError::CourseNotFound(to_course_id))?;

        let student = &self.roster.students[student_idx];
        if !student.is_enrolled_in(from_course_id) {
            return Err(RosterError::NotEnrolled {
                student_id,
                course_id: from_course_id,
            });
        }
        // Also rejects from == to, since the student is enrolled in `from`.
        if student.is_enrolled_in(to_course_id) {
            return Err(RosterError::AlreadyEnrolled {
                student_id,
                course_id: to_course_id,
            });
        }
        Ok((student_idx, from_idx, to_idx))
    }
}

fn check_integrity(roster: &Roster, integrity: IntegrityPolicy) -> PersistenceResult<()> {
    let issues = roster_validation::validate_roster(roster);
    if issues.is_empty() {
        return Ok(());
    }
    match integrity {
        IntegrityPolicy::Permissive => {
            for issue in &issues {
                tracing::warn!(%issue, "roster integrity issue");
            }
            Ok(())
        }
        IntegrityPolicy::Strict => Err(PersistenceError::InvalidData(
            issues
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        )),
    }
}

fn rejected(err: RosterError) -> RosterError {
    tracing::warn!(%err, "operation rejected");
    err
}

fn remove_first(ids: &mut Vec<i32>, id: i32) {
    if let Some(pos) = ids.iter().position(|&existing| existing == id) {
        ids.remove(pos);
    }
}
