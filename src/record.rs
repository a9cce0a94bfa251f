use serde::{Deserialize, Serialize};
use crate::status::SubjectStatus;

/// one raw clinical row, exactly as read - nothing parsed yet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicalRecord {
    pub subject_id: String,
    pub last_known_alive_date: Option<String>,
    pub index_date: Option<String>,                          // CT / baseline date
    pub days_between_index_and_intervention: Option<String>, // offset subtracted from follow-up
    pub status_label: Option<String>,
}

impl ClinicalRecord {
    pub fn new(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            ..Self::default()
        }
    }

    pub fn with_last_known_alive(mut self, date: impl Into<String>) -> Self {
        self.last_known_alive_date = Some(date.into());
        self
    }

    pub fn with_index_date(mut self, date: impl Into<String>) -> Self {
        self.index_date = Some(date.into());
        self
    }

    pub fn with_offset(mut self, days: impl ToString) -> Self {
        self.days_between_index_and_intervention = Some(days.to_string());
        self
    }

    pub fn with_status(mut self, label: impl Into<String>) -> Self {
        self.status_label = Some(label.into());
        self
    }
}

/// per-row data-quality flags; flagged rows stay in the table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFlags {
    pub negative_duration: bool,
    pub unrecognized_status: bool,
    pub ambiguous_subject_id: bool, // empty, or already used by an earlier kept row
}

impl RecordFlags {
    pub fn any(&self) -> bool {
        self.negative_duration || self.unrecognized_status || self.ambiguous_subject_id
    }
}

/// one derived time-to-event row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurvivalRecord {
    pub subject_id: String,
    pub time: f64,   // days of follow-up
    pub event: bool, // true = death observed, false = censored
    pub status: SubjectStatus,
    pub flags: RecordFlags,
}

impl SurvivalRecord {
    pub fn is_valid(&self) -> bool {
        !self.flags.any()
    }
}
