use ndarray::{Array1, ArrayView1};
use crate::{
    error::{RecordError, Result},
    record::{RecordFlags, SurvivalRecord},
    status::SubjectStatus,
};

/// survival table - subject ids, follow-up times, event indicators
#[derive(Debug, Clone, PartialEq)]
pub struct SurvivalTable {
    subject_ids: Vec<String>,
    times: Array1<f64>,          // days from index date, offset already subtracted
    events: Array1<bool>,        // true = death observed, false = censored
    statuses: Vec<SubjectStatus>,
    flags: Vec<RecordFlags>,
}

impl SurvivalTable {
    /// assemble from derived rows, keeping their order
    pub fn new(records: Vec<SurvivalRecord>) -> Result<Self> {
        let n = records.len();
        let mut subject_ids = Vec::with_capacity(n);
        let mut times = Vec::with_capacity(n);
        let mut events = Vec::with_capacity(n);
        let mut statuses = Vec::with_capacity(n);
        let mut flags = Vec::with_capacity(n);

        for record in records {
            if !record.time.is_finite() {
                return Err(RecordError::invalid_table(
                    format!("time for {} is not finite", record.subject_id)
                ));
            }
            subject_ids.push(record.subject_id);
            times.push(record.time);
            events.push(record.event);
            statuses.push(record.status);
            flags.push(record.flags);
        }

        Ok(Self {
            subject_ids,
            times: Array1::from(times),
            events: Array1::from(events),
            statuses,
            flags,
        })
    }

    /// how many subjects
    pub fn n_subjects(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// follow-up times in days
    pub fn times(&self) -> ArrayView1<'_, f64> {
        self.times.view()
    }

    /// event indicators (true = event, false = censored)
    pub fn events(&self) -> ArrayView1<'_, bool> {
        self.events.view()
    }

    pub fn subject_ids(&self) -> &[String] {
        &self.subject_ids
    }

    pub fn statuses(&self) -> &[SubjectStatus] {
        &self.statuses
    }

    pub fn flags(&self) -> &[RecordFlags] {
        &self.flags
    }

    pub fn n_events(&self) -> usize {
        self.events.iter().filter(|&&e| e).count()
    }

    pub fn n_flagged(&self) -> usize {
        self.flags.iter().filter(|f| f.any()).count()
    }

    /// row i as an owned record
    pub fn record(&self, i: usize) -> Option<SurvivalRecord> {
        if i >= self.n_subjects() {
            return None;
        }
        Some(SurvivalRecord {
            subject_id: self.subject_ids[i].clone(),
            time: self.times[i],
            event: self.events[i],
            status: self.statuses[i].clone(),
            flags: self.flags[i],
        })
    }

    pub fn records(&self) -> impl Iterator<Item = SurvivalRecord> + '_ {
        (0..self.n_subjects()).filter_map(move |i| self.record(i))
    }

    /// look a subject up by id
    pub fn get(&self, subject_id: &str) -> Option<SurvivalRecord> {
        self.subject_ids
            .iter()
            .position(|id| id == subject_id)
            .and_then(|i| self.record(i))
    }

    /// unique observed event times in order
    pub fn event_times(&self) -> Vec<f64> {
        let mut times: Vec<f64> = self.times
            .iter()
            .zip(self.events.iter())
            .filter_map(|(time, event)| if *event { Some(*time) } else { None })
            .collect();

        times.sort_by(f64::total_cmp);
        times.dedup();
        times
    }

    /// grab a subset of subjects by indices
    pub fn subset(&self, indices: &[usize]) -> Result<Self> {
        if indices.iter().any(|&i| i >= self.n_subjects()) {
            return Err(RecordError::invalid_table("subset index out of bounds"));
        }

        Self::new(indices.iter().filter_map(|&i| self.record(i)).collect())
    }

    /// new table without flagged rows - the original is left alone
    pub fn valid_only(&self) -> Self {
        let keep: Vec<usize> = (0..self.n_subjects())
            .filter(|&i| !self.flags[i].any())
            .collect();

        Self {
            subject_ids: keep.iter().map(|&i| self.subject_ids[i].clone()).collect(),
            times: keep.iter().map(|&i| self.times[i]).collect(),
            events: keep.iter().map(|&i| self.events[i]).collect(),
            statuses: keep.iter().map(|&i| self.statuses[i].clone()).collect(),
            flags: keep.iter().map(|&i| self.flags[i]).collect(),
        }
    }
}
