//! reading clinical exports and writing survival tables
//!
//! missing headers or unreadable input abort the whole read. individual
//! cells are never interpreted here, that's the builder's job.

use std::{fs::File, io::{Read, Write}, path::Path};

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use tracing::debug;
use crate::{
    config::ColumnMap,
    data::SurvivalTable,
    diagnostics::DiagnosticsReport,
    error::{RecordError, Result},
    record::ClinicalRecord,
};

/// column positions resolved against a header row
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    subject_id: usize,
    last_known_alive: usize,
    index_date: usize,
    offset: Option<usize>, // optional - absent means every offset is 0
    status: usize,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord, columns: &ColumnMap) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h == name.trim());
        let require = |name: &str| find(name).ok_or_else(|| RecordError::missing_column(name));

        Ok(Self {
            subject_id: require(columns.subject_id.as_str())?,
            last_known_alive: require(columns.last_known_alive.as_str())?,
            index_date: require(columns.index_date.as_str())?,
            offset: find(columns.offset.as_str()),
            status: require(columns.status.as_str())?,
        })
    }
}

fn cell(row: &StringRecord, i: usize) -> Option<String> {
    row.get(i).filter(|s| !s.is_empty()).map(str::to_string)
}

/// read clinical rows from any delimited source
pub fn read_clinical_records<R: Read>(
    reader: R,
    columns: &ColumnMap,
    delimiter: u8,
) -> Result<Vec<ClinicalRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .trim(Trim::All)
        .from_reader(reader);

    let index = ColumnIndex::resolve(rdr.headers()?, columns)?;
    if index.offset.is_none() {
        debug!(column = %columns.offset, "offset column absent, using 0 for every subject");
    }

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        records.push(ClinicalRecord {
            subject_id: row.get(index.subject_id).unwrap_or_default().to_string(),
            last_known_alive_date: cell(&row, index.last_known_alive),
            index_date: cell(&row, index.index_date),
            days_between_index_and_intervention: index.offset.and_then(|i| cell(&row, i)),
            status_label: cell(&row, index.status),
        });
    }

    debug!(rows = records.len(), "clinical records read");
    Ok(records)
}

pub fn read_clinical_csv(
    path: impl AsRef<Path>,
    columns: &ColumnMap,
    delimiter: u8,
) -> Result<Vec<ClinicalRecord>> {
    read_clinical_records(File::open(path)?, columns, delimiter)
}

/// subject_id,time,event,status,flagged - one row per subject, table order
pub fn write_survival_records<W: Write>(writer: W, table: &SurvivalTable) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(["subject_id", "time", "event", "status", "flagged"])?;

    for record in table.records() {
        let time = record.time.to_string();
        wtr.write_record([
            record.subject_id.as_str(),
            time.as_str(),
            if record.event { "true" } else { "false" },
            record.status.as_str(),
            if record.flags.any() { "true" } else { "false" },
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn write_survival_csv(path: impl AsRef<Path>, table: &SurvivalTable) -> Result<()> {
    write_survival_records(File::create(path)?, table)
}

pub fn write_diagnostics_json<W: Write>(mut writer: W, report: &DiagnosticsReport) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writeln!(writer)?;
    Ok(())
}
