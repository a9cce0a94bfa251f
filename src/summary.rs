use serde::Serialize;
use crate::{
    data::SurvivalTable,
    error::{RecordError, Result},
};

/// cohort description printed before handing the table to a model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortSummary {
    pub n_subjects: usize,
    pub n_events: usize,
    pub n_censored: usize,
    pub n_flagged: usize,
    pub event_rate: f64,
    pub min_time: f64,
    pub max_time: f64,
    pub median_follow_up: f64,
}

/// median of a non-empty slice; averages the middle pair
fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

impl CohortSummary {
    pub fn compute(table: &SurvivalTable) -> Result<Self> {
        if table.is_empty() {
            return Err(RecordError::EmptyTable);
        }

        let times = table.times();
        let n_subjects = table.n_subjects();
        let n_events = table.n_events();

        Ok(Self {
            n_subjects,
            n_events,
            n_censored: n_subjects - n_events,
            n_flagged: table.n_flagged(),
            event_rate: n_events as f64 / n_subjects as f64,
            min_time: times.iter().copied().fold(f64::INFINITY, f64::min),
            max_time: times.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            median_follow_up: median(&times.to_vec()),
        })
    }

    pub fn print(&self) {
        println!("cohort summary");
        println!("==============");
        println!("subjects:          {}", self.n_subjects);
        println!("events:            {} ({:.1}%)", self.n_events, 100.0 * self.event_rate);
        println!("censored:          {}", self.n_censored);
        println!("flagged:           {}", self.n_flagged);
        println!("follow-up (days):  min {:.0}, median {:.1}, max {:.0}",
                 self.min_time, self.median_follow_up, self.max_time);
    }
}
