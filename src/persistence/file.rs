use super::{PersistenceError, PersistenceResult, RosterStore};
use crate::{AttendanceRecord, Roster};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Stores the roster as a single pretty-printed JSON document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RosterStore for JsonFileStore {
    fn load_roster(&self) -> PersistenceResult<Option<Roster>> {
        load_roster_from_json(&self.path)
    }

    fn save_roster(&self, roster: &Roster) -> PersistenceResult<()> {
        save_roster_to_json(roster, &self.path)?;
        tracing::debug!(path = %self.path.display(), "roster saved");
        Ok(())
    }
}

/// Reads a roster document. A missing file yields `Ok(None)`.
pub fn load_roster_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Option<Roster>> {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(PersistenceError::Unreadable {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_reader(BufReader::new(file))
        .map(Some)
        .map_err(|source| {
            if source.is_io() {
                PersistenceError::Unreadable {
                    path: path.to_path_buf(),
                    source: io::Error::from(source),
                }
            } else {
                PersistenceError::Corrupt {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })
}

/// Overwrites `path` with the full roster, creating parent directories as needed.
pub fn save_roster_to_json<P: AsRef<Path>>(roster: &Roster, path: P) -> PersistenceResult<()> {
    let path = path.as_ref();
    let mut writer = create_writer(path)?;
    serde_json::to_writer_pretty(&mut writer, roster).map_err(|err| {
        if err.is_io() {
            write_error(path, io::Error::from(err))
        } else {
            PersistenceError::Encode(err)
        }
    })?;
    writer
        .write_all(b"\n")
        .and_then(|_| writer.flush())
        .map_err(|source| write_error(path, source))?;
    Ok(())
}

const ATTENDANCE_CSV_HEADER: [&str; 3] = ["student_id", "course_id", "timestamp"];

/// Writes the attendance log as CSV and returns the number of rows written.
/// The header row is always present, even for an empty log.
pub fn save_attendance_to_csv<P: AsRef<Path>>(
    records: &[AttendanceRecord],
    path: P,
) -> PersistenceResult<usize> {
    let path = path.as_ref();
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(create_writer(path)?);
    writer.write_record(ATTENDANCE_CSV_HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush().map_err(|source| write_error(path, source))?;
    Ok(records.len())
}

fn create_writer(path: &Path) -> PersistenceResult<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| write_error(path, source))?;
    }
    let file = File::create(path).map_err(|source| write_error(path, source))?;
    Ok(BufWriter::new(file))
}

fn write_error(path: &Path, source: io::Error) -> PersistenceError {
    PersistenceError::Write {
        path: path.to_path_buf(),
        source,
    }
}
