use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One check-in event. Records are only ever appended to the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub student_id: i32,
    pub course_id: i32,
    /// ISO-8601 timestamp. New records are written as UTC with a `Z` suffix;
    /// older documents may hold naive local times, which are kept verbatim.
    pub timestamp: String,
}

impl AttendanceRecord {
    pub fn new(student_id: i32, course_id: i32, at: DateTime<Utc>) -> Self {
        Self {
            student_id,
            course_id,
            timestamp: format_timestamp(at),
        }
    }

    /// Parsed form of `timestamp`. Naive stamps are read as UTC.
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.timestamp)
    }
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Hands out check-in times that never go backwards, even if the system
/// clock is adjusted while the process runs.
#[derive(Debug, Clone, Default)]
pub struct AttendanceClock {
    last: Option<DateTime<Utc>>,
}

impl AttendanceClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&mut self) -> DateTime<Utc> {
        self.observe(Utc::now())
    }

    fn observe(&mut self, candidate: DateTime<Utc>) -> DateTime<Utc> {
        let next = match self.last {
            Some(last) if last > candidate => last,
            _ => candidate,
        };
        self.last = Some(next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 4, h, m, s).unwrap()
    }

    #[test]
    fn clock_does_not_move_backwards() {
        let mut clock = AttendanceClock::new();
        let first = clock.observe(at(10, 0, 0));
        let second = clock.observe(at(9, 59, 0));
        let third = clock.observe(at(10, 0, 1));
        assert_eq!(first, at(10, 0, 0));
        assert_eq!(second, first);
        assert_eq!(third, at(10, 0, 1));
    }

    #[test]
    fn clock_now_is_non_decreasing() {
        let mut clock = AttendanceClock::new();
        let mut previous = clock.now();
        for _ in 0..100 {
            let next = clock.now();
            assert!(next >= previous);
            previous = next;
        }
    }

    #[test]
    fn new_records_use_utc_with_microseconds() {
        let record = AttendanceRecord::new(1, 10, at(8, 30, 0) + Duration::microseconds(42));
        assert_eq!(record.timestamp, "2025-03-04T08:30:00.000042Z");
        assert_eq!(
            record.recorded_at(),
            Some(at(8, 30, 0) + Duration::microseconds(42))
        );
    }

    #[test]
    fn naive_timestamps_are_read_as_utc() {
        let mut record = AttendanceRecord::new(1, 10, at(0, 0, 0));
        record.timestamp = "2025-03-04T16:05:09.123456".to_string();
        assert_eq!(
            record.recorded_at(),
            Some(at(16, 5, 9) + Duration::microseconds(123_456))
        );

        record.timestamp = "2025-03-04T16:05:09".to_string();
        assert_eq!(record.recorded_at(), Some(at(16, 5, 9)));

        record.timestamp = "yesterday".to_string();
        assert_eq!(record.recorded_at(), None);
    }
}
