use std::path::Path;

use serde::{Deserialize, Serialize};
use crate::{
    dates::DEFAULT_DATE_FORMAT,
    error::{RecordError, Result},
    status::{StatusVocabulary, UnknownStatusPolicy},
};

/// header names in the clinical export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub subject_id: String,
    pub last_known_alive: String,
    pub index_date: String,
    pub offset: String,
    pub status: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            subject_id: "Patient ID".into(),
            last_known_alive: "Date of Last Known Alive".into(),
            index_date: "CT Date".into(),
            offset: "Days between CT and surgery".into(),
            status: "Survival Status".into(),
        }
    }
}

/// everything the builder needs besides the rows themselves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderConfig {
    pub unknown_status: UnknownStatusPolicy,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default)]
    pub vocabulary: StatusVocabulary,
    #[serde(default)]
    pub columns: ColumnMap,
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

/// config file shape - unknown_status may be left to the command line
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PartialConfig {
    pub unknown_status: Option<UnknownStatusPolicy>,
    pub date_format: Option<String>,
    pub vocabulary: Option<StatusVocabulary>,
    pub columns: Option<ColumnMap>,
}

impl PartialConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// fill in the policy (override wins) and validate
    pub fn resolve(self, unknown_status: Option<UnknownStatusPolicy>) -> Result<BuilderConfig> {
        let policy = unknown_status
            .or(self.unknown_status)
            .ok_or_else(|| RecordError::invalid_config("unknown_status", "not set"))?;

        let mut config = BuilderConfig::new(policy);
        if let Some(format) = self.date_format {
            config = config.with_date_format(format);
        }
        if let Some(vocab) = self.vocabulary {
            config = config.with_vocabulary(vocab);
        }
        if let Some(columns) = self.columns {
            config = config.with_columns(columns);
        }
        config.validate()?;
        Ok(config)
    }
}

impl BuilderConfig {
    /// the unknown-status policy has no default on purpose: callers must choose
    pub fn new(unknown_status: UnknownStatusPolicy) -> Self {
        Self {
            unknown_status,
            date_format: default_date_format(),
            vocabulary: StatusVocabulary::default(),
            columns: ColumnMap::default(),
        }
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    pub fn with_vocabulary(mut self, vocabulary: StatusVocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    pub fn with_columns(mut self, columns: ColumnMap) -> Self {
        self.columns = columns;
        self
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.date_format.trim().is_empty() {
            return Err(RecordError::invalid_config("date_format", "empty"));
        }
        self.vocabulary.validate()?;

        let cols = [
            &self.columns.subject_id,
            &self.columns.last_known_alive,
            &self.columns.index_date,
            &self.columns.offset,
            &self.columns.status,
        ];
        for (i, col) in cols.iter().enumerate() {
            if col.trim().is_empty() {
                return Err(RecordError::invalid_config("columns", "empty header name"));
            }
            if cols[..i].contains(col) {
                return Err(RecordError::invalid_config("columns", col.as_str()));
            }
        }
        Ok(())
    }
}
