//! School settings shared by every record in a batch.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Issuing school and examination year.
///
/// Every key is optional in the TOML file; missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchoolSettings {
    pub school_name: String,
    pub address: String,
    pub vision: String,
    pub mission: String,
    pub footer: String,
    pub head_teacher: String,
    pub head_teacher_rank: String,
    pub head_teacher_title: String,
    /// Examination year, the last segment of every serial number.
    pub year: String,
}

impl Default for SchoolSettings {
    fn default() -> Self {
        Self {
            school_name: String::new(),
            address: String::new(),
            vision: String::new(),
            mission: String::new(),
            footer: String::new(),
            head_teacher: String::new(),
            head_teacher_rank: String::new(),
            head_teacher_title: "HEAD TEACHER".to_string(),
            year: "2025".to_string(),
        }
    }
}

impl SchoolSettings {
    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), school = %settings.school_name, "loaded school settings");
        Ok(settings)
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Apply a partial update. Empty fields in `update` leave the current value.
    pub fn merge(&mut self, update: SchoolSettings) {
        fn take(field: &mut String, incoming: String) {
            if !incoming.trim().is_empty() {
                *field = incoming;
            }
        }
        take(&mut self.school_name, update.school_name);
        take(&mut self.address, update.address);
        take(&mut self.vision, update.vision);
        take(&mut self.mission, update.mission);
        take(&mut self.footer, update.footer);
        take(&mut self.head_teacher, update.head_teacher);
        take(&mut self.head_teacher_rank, update.head_teacher_rank);
        take(&mut self.head_teacher_title, update.head_teacher_title);
        take(&mut self.year, update.year);
    }
}
