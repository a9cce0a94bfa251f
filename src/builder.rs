use std::collections::HashMap;

use tracing::{debug, info, warn};
use crate::{
    config::BuilderConfig,
    data::SurvivalTable,
    dates::{compute_duration, parse_date, parse_offset},
    diagnostics::{Diagnostic, DiagnosticsReport},
    error::Result,
    record::{ClinicalRecord, RecordFlags, SurvivalRecord},
    status::{event_indicator, SubjectStatus, UnknownReason},
};

/// what a build hands back: the table plus everything noticed on the way
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub table: SurvivalTable,
    pub diagnostics: DiagnosticsReport,
}

/// outcome of deriving a single row
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Kept(SurvivalRecord),
    Skipped,
}

/// turns clinical rows into time-to-event rows. stateless apart from config
#[derive(Debug, Clone)]
pub struct SurvivalRecordBuilder {
    config: BuilderConfig,
}

impl SurvivalRecordBuilder {
    pub fn new(config: BuilderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// derive one row (`row` is its 0-based input position), appending any diagnostics for it
    pub fn derive(&self, row: usize, record: &ClinicalRecord, report: &mut DiagnosticsReport) -> RowOutcome {
        let id = &record.subject_id;
        let format = &self.config.date_format;
        let columns = &self.config.columns;

        let dates = [
            (&columns.last_known_alive, record.last_known_alive_date.as_deref()),
            (&columns.index_date, record.index_date.as_deref()),
        ]
        .map(|(field, raw)| {
            parse_date(raw, format).map_err(|e| Diagnostic::DateParse {
                subject_id: id.clone(),
                field: field.clone(),
                value: e.value,
            })
        });

        let [last_alive, index] = match dates {
            [Ok(last_alive), Ok(index)] => [last_alive, index],
            [a, b] => {
                for d in [a.err(), b.err()].into_iter().flatten() {
                    warn!(subject = %id, row, "{}", d);
                    report.push(row, d);
                }
                return RowOutcome::Skipped;
            }
        };

        let invalid_offset = |report: &mut DiagnosticsReport| {
            let d = Diagnostic::InvalidOffset {
                subject_id: id.clone(),
                value: record.days_between_index_and_intervention.clone().unwrap_or_default(),
            };
            warn!(subject = %id, row, "{}", d);
            report.push(row, d);
            RowOutcome::Skipped
        };

        let offset = match parse_offset(record.days_between_index_and_intervention.as_deref()) {
            Ok(offset) => offset,
            Err(_) => return invalid_offset(report),
        };

        let status = self.config.vocabulary.classify(record.status_label.as_deref());
        let event = match event_indicator(&status, self.config.unknown_status) {
            Some(event) => event,
            None => {
                let label = match &status {
                    SubjectStatus::Unknown(UnknownReason::Unrecognized(label)) => Some(label.clone()),
                    _ => None,
                };
                let d = Diagnostic::UnknownStatusExcluded { subject_id: id.clone(), label };
                debug!(subject = %id, row, "{}", d);
                report.push(row, d);
                return RowOutcome::Skipped;
            }
        };

        let days = match compute_duration(last_alive, index, offset) {
            Some(days) => days,
            None => return invalid_offset(report),
        };
        let mut flags = RecordFlags::default();

        if days < 0 {
            flags.negative_duration = true;
            let d = Diagnostic::NegativeDuration { subject_id: id.clone(), time: days as f64 };
            warn!(subject = %id, row, days, "{}", d);
            report.push(row, d);
        }

        match &status {
            SubjectStatus::Unknown(UnknownReason::Unrecognized(label)) => {
                flags.unrecognized_status = true;
                let d = Diagnostic::UnrecognizedStatus {
                    subject_id: id.clone(),
                    label: label.clone(),
                };
                warn!(subject = %id, row, "{}", d);
                report.push(row, d);
            }
            SubjectStatus::Unknown(UnknownReason::Missing) => {
                report.push(row, Diagnostic::MissingStatus { subject_id: id.clone() });
            }
            SubjectStatus::Deceased | SubjectStatus::Alive => {}
        }

        RowOutcome::Kept(SurvivalRecord {
            subject_id: id.clone(),
            time: days as f64,
            event,
            status,
            flags,
        })
    }

    /// one survival row per clinical row, same order. bad dates/offsets are
    /// skipped and reported, flagged rows are kept. empty or repeated subject
    /// ids among kept rows are flagged since they break joins on the id
    pub fn build(&self, records: &[ClinicalRecord]) -> Result<BuildOutput> {
        debug!(rows = records.len(), "building survival records");

        let mut diagnostics = DiagnosticsReport::new(records.len());
        let mut first_seen: HashMap<&str, usize> = HashMap::new();
        let mut kept = Vec::with_capacity(records.len());

        for (row, record) in records.iter().enumerate() {
            let mut survival = match self.derive(row, record, &mut diagnostics) {
                RowOutcome::Kept(r) => r,
                RowOutcome::Skipped => continue,
            };

            let id = record.subject_id.as_str();
            let issue = if id.is_empty() {
                Some(Diagnostic::EmptySubjectId)
            } else {
                match first_seen.get(id) {
                    Some(&first_row) => Some(Diagnostic::DuplicateSubjectId {
                        subject_id: id.to_string(),
                        first_row,
                    }),
                    None => {
                        first_seen.insert(id, row);
                        None
                    }
                }
            };

            if let Some(d) = issue {
                survival.flags.ambiguous_subject_id = true;
                warn!(subject = %id, row, "{}", d);
                diagnostics.push(row, d);
            }
            kept.push(survival);
        }

        let table = SurvivalTable::new(kept)?;

        info!(
            rows = records.len(),
            kept = table.n_subjects(),
            skipped = diagnostics.n_skipped(),
            flagged = table.n_flagged(),
            events = table.n_events(),
            "survival records built"
        );

        Ok(BuildOutput { table, diagnostics })
    }
}

/// one-shot convenience over `SurvivalRecordBuilder`
pub fn build(records: &[ClinicalRecord], config: BuilderConfig) -> Result<BuildOutput> {
    SurvivalRecordBuilder::new(config)?.build(records)
}
