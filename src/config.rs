use crate::roster_validation::IntegrityPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_DATA_PATH: &str = "data/msms.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterConfig {
    pub data_path: PathBuf,
    #[serde(default)]
    pub integrity: IntegrityPolicy,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            integrity: IntegrityPolicy::default(),
        }
    }
}

impl RosterConfig {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            ..Self::default()
        }
    }

    pub fn with_integrity(mut self, integrity: IntegrityPolicy) -> Self {
        self.integrity = integrity;
        self
    }
}
