//! # survival records
//!
//! turn raw clinical exports into time-to-event data any survival model can eat
//!
//! ## what you get
//!
//! - follow-up time from last-known-alive date, index (CT) date and an offset
//! - event indicator from a status label, with an explicit policy for unknowns
//! - bad rows reported, never silently dropped or patched up
//! - csv in, csv/json out
//!
//! ## quick start
//!
//! ```rust
//! use survival_records::{BuilderConfig, ClinicalRecord, SurvivalRecordBuilder, UnknownStatusPolicy};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let records = vec![
//!     ClinicalRecord::new("P1")
//!         .with_index_date("01/01/2020")
//!         .with_last_known_alive("06/15/2020")
//!         .with_offset(10)
//!         .with_status("Death"),
//!     ClinicalRecord::new("P2")
//!         .with_index_date("01/01/2020")
//!         .with_last_known_alive("not recorded")  // skipped + reported
//!         .with_status("Alive"),
//! ];
//!
//! // unknown statuses have no default mapping, pick one
//! let builder = SurvivalRecordBuilder::new(BuilderConfig::new(UnknownStatusPolicy::Censor))?;
//! let out = builder.build(&records)?;
//!
//! assert_eq!(out.table.times()[0], 156.0);
//! assert_eq!(out.diagnostics.skipped(), vec!["P2"]);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod data;
pub mod dates;
pub mod diagnostics;
pub mod error;
pub mod io;
pub mod record;
pub mod status;
pub mod summary;

pub use builder::{build, BuildOutput, SurvivalRecordBuilder};
pub use config::{BuilderConfig, ColumnMap};
pub use data::SurvivalTable;
pub use dates::{compute_duration, parse_date};
pub use diagnostics::{Diagnostic, DiagnosticsReport, Entry, Severity};
pub use error::{DateParseError, RecordError, Result};
pub use record::{ClinicalRecord, SurvivalRecord};
pub use status::{classify_event, StatusVocabulary, SubjectStatus, UnknownStatusPolicy};
pub use summary::CohortSummary;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_functionality() {
        let n_subjects = 100;

        let records: Vec<ClinicalRecord> = (0..n_subjects)
            .map(|i| {
                ClinicalRecord::new(format!("S{}", i))
                    .with_index_date("01/01/2020")
                    .with_last_known_alive("01/01/2021")
                    .with_status(if i % 2 == 0 { "Death" } else { "Alive" })
            })
            .collect();

        let out = build(&records, BuilderConfig::new(UnknownStatusPolicy::Censor)).unwrap();
        assert_eq!(out.table.n_subjects(), n_subjects);
        assert_eq!(out.table.n_events(), n_subjects / 2);
        assert!(out.table.times().iter().all(|&t| t == 366.0));
    }
}
