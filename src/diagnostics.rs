use std::collections::BTreeSet;

use serde::Serialize;

/// how much a diagnostic matters to the output table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,    // row kept, nothing suspicious about the numbers
    Warning, // row kept but flagged
    Skip,    // row left out of the table
}

/// one thing worth telling the analyst about a row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    DateParse { subject_id: String, field: String, value: String },
    InvalidOffset { subject_id: String, value: String },
    NegativeDuration { subject_id: String, time: f64 },
    UnrecognizedStatus { subject_id: String, label: String },
    MissingStatus { subject_id: String },
    UnknownStatusExcluded { subject_id: String, label: Option<String> },
    EmptySubjectId,
    DuplicateSubjectId { subject_id: String, first_row: usize },
}

impl Diagnostic {
    pub fn subject_id(&self) -> &str {
        match self {
            Self::DateParse { subject_id, .. }
            | Self::InvalidOffset { subject_id, .. }
            | Self::NegativeDuration { subject_id, .. }
            | Self::UnrecognizedStatus { subject_id, .. }
            | Self::MissingStatus { subject_id }
            | Self::UnknownStatusExcluded { subject_id, .. }
            | Self::DuplicateSubjectId { subject_id, .. } => subject_id,
            Self::EmptySubjectId => "",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::DateParse { .. } | Self::InvalidOffset { .. } | Self::UnknownStatusExcluded { .. } => {
                Severity::Skip
            }
            Self::NegativeDuration { .. }
            | Self::UnrecognizedStatus { .. }
            | Self::EmptySubjectId
            | Self::DuplicateSubjectId { .. } => Severity::Warning,
            Self::MissingStatus { .. } => Severity::Info,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DateParse { subject_id, field, value } => {
                write!(f, "{}: unparseable {} {:?}", subject_id, field, value)
            }
            Self::InvalidOffset { subject_id, value } => {
                write!(f, "{}: offset {:?} is not a usable whole number of days", subject_id, value)
            }
            Self::NegativeDuration { subject_id, time } => {
                write!(f, "{}: negative follow-up ({} days)", subject_id, time)
            }
            Self::UnrecognizedStatus { subject_id, label } => {
                write!(f, "{}: unrecognized status label {:?}", subject_id, label)
            }
            Self::MissingStatus { subject_id } => write!(f, "{}: status missing", subject_id),
            Self::UnknownStatusExcluded { subject_id, label: None } => {
                write!(f, "{}: excluded, status missing", subject_id)
            }
            Self::UnknownStatusExcluded { subject_id, label: Some(label) } => {
                write!(f, "{}: excluded, status {:?} not recognized", subject_id, label)
            }
            Self::EmptySubjectId => write!(f, "subject id is empty"),
            Self::DuplicateSubjectId { subject_id, first_row } => {
                write!(f, "{}: subject id already used on row {}", subject_id, first_row)
            }
        }
    }
}

/// a diagnostic tied to the input row (0-based) it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub row: usize,
    #[serde(flatten)]
    pub diagnostic: Diagnostic,
}

/// everything the builder noticed, in input order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiagnosticsReport {
    n_input: usize,
    diagnostics: Vec<Entry>,
}

impl DiagnosticsReport {
    pub fn new(n_input: usize) -> Self {
        Self { n_input, diagnostics: Vec::new() }
    }

    pub fn push(&mut self, row: usize, diagnostic: Diagnostic) {
        self.diagnostics.push(Entry { row, diagnostic });
    }

    pub fn n_input(&self) -> usize {
        self.n_input
    }

    pub fn entries(&self) -> &[Entry] {
        &self.diagnostics
    }

    pub fn all(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().map(|e| &e.diagnostic)
    }

    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.all().filter(move |d| d.severity() == severity)
    }

    /// first entry of each row carrying the given severity, in push order
    fn rows_with(&self, severity: Severity) -> Vec<&Entry> {
        let mut seen = BTreeSet::new();
        self.diagnostics
            .iter()
            .filter(|e| e.diagnostic.severity() == severity && seen.insert(e.row))
            .collect()
    }

    /// subject ids of the rows left out of the table, one per row
    pub fn skipped(&self) -> Vec<&str> {
        self.rows_with(Severity::Skip)
            .into_iter()
            .map(|e| e.diagnostic.subject_id())
            .collect()
    }

    /// rows left out of the table
    pub fn n_skipped(&self) -> usize {
        self.rows_with(Severity::Skip).len()
    }

    /// rows kept but flagged - matches `SurvivalTable::n_flagged`
    pub fn n_flagged(&self) -> usize {
        self.rows_with(Severity::Warning).len()
    }

    pub fn warnings(&self) -> Vec<&Diagnostic> {
        self.with_severity(Severity::Warning).collect()
    }

    /// warning diagnostics; one row can carry several
    pub fn n_warnings(&self) -> usize {
        self.with_severity(Severity::Warning).count()
    }

    pub fn for_subject<'a>(&'a self, subject_id: &'a str) -> impl Iterator<Item = &'a Diagnostic> {
        self.all().filter(move |d| d.subject_id() == subject_id)
    }

    pub fn for_row(&self, row: usize) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |e| e.row == row)
            .map(|e| &e.diagnostic)
    }

    /// nothing skipped and nothing flagged
    pub fn is_clean(&self) -> bool {
        self.all().all(|d| d.severity() == Severity::Info)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn print(&self) {
        println!("survival record diagnostics");
        println!("===========================");
        println!("rows read:     {}", self.n_input);
        println!("rows skipped:  {}", self.n_skipped());
        println!("rows flagged:  {}", self.n_flagged());
        println!("warnings:      {}", self.n_warnings());
        println!("notes:         {}", self.with_severity(Severity::Info).count());

        if self.diagnostics.is_empty() {
            return;
        }

        println!();
        println!("{:<6} {:<8} {}", "row", "level", "detail");
        println!("{:-<50}", "");
        for e in &self.diagnostics {
            let level = match e.diagnostic.severity() {
                Severity::Skip => "skip",
                Severity::Warning => "warn",
                Severity::Info => "info",
            };
            println!("{:<6} {:<8} {}", e.row, level, e.diagnostic);
        }
    }
}
