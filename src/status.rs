use serde::{Deserialize, Serialize};
use crate::error::{RecordError, Result};

/// the literal the clinical exports use for an observed death
pub const DEATH_SENTINEL: &str = "Death";

/// exact, case-sensitive two-way classification: only the sentinel is an event.
/// "DECEASED", " Death" and "" all come back false - use `StatusVocabulary`
/// when the labels aren't perfectly clean.
pub fn classify_event(status_label: Option<&str>, death_sentinel: &str) -> bool {
    status_label == Some(death_sentinel)
}

/// why a status couldn't be placed in the vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "label", rename_all = "snake_case")]
pub enum UnknownReason {
    Missing,
    Unrecognized(String),
}

/// subject status decided at ingestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectStatus {
    Deceased,
    Alive,
    Unknown(UnknownReason),
}

impl SubjectStatus {
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// short label for tabular output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deceased => "deceased",
            Self::Alive => "alive",
            Self::Unknown(UnknownReason::Missing) => "missing",
            Self::Unknown(UnknownReason::Unrecognized(_)) => "unrecognized",
        }
    }
}

/// what an unknown status means for the event indicator - callers pick one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownStatusPolicy {
    /// treat as censored (event = false)
    Censor,
    /// treat as an observed event
    Event,
    /// leave the subject out of the table and report it
    Exclude,
}

impl std::str::FromStr for UnknownStatusPolicy {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "censor" => Ok(Self::Censor),
            "event" => Ok(Self::Event),
            "exclude" => Ok(Self::Exclude),
            other => Err(RecordError::invalid_config("unknown_status", other)),
        }
    }
}

/// accepted status labels, compared after trim + case-fold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusVocabulary {
    deceased: Vec<String>,
    alive: Vec<String>,
}

impl Default for StatusVocabulary {
    fn default() -> Self {
        Self {
            deceased: vec!["Death".into(), "Dead".into(), "Deceased".into()],
            alive: vec!["Alive".into()],
        }
    }
}

fn normalize(label: &str) -> String {
    label.trim().to_lowercase()
}

impl StatusVocabulary {
    /// build a vocabulary - a label can't be both deceased and alive
    pub fn new<D, A>(deceased: D, alive: A) -> Result<Self>
    where
        D: IntoIterator,
        D::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        let vocab = Self {
            deceased: deceased.into_iter().map(Into::into).collect(),
            alive: alive.into_iter().map(Into::into).collect(),
        };
        vocab.validate()?;
        Ok(vocab)
    }

    pub fn validate(&self) -> Result<()> {
        if self.deceased.iter().all(|l| normalize(l).is_empty()) {
            return Err(RecordError::invalid_config("deceased labels", "none"));
        }
        for label in &self.deceased {
            let norm = normalize(label);
            if norm.is_empty() {
                return Err(RecordError::invalid_config("deceased labels", "empty label"));
            }
            if self.alive.iter().any(|a| normalize(a) == norm) {
                return Err(RecordError::invalid_config("status vocabulary", label.clone()));
            }
        }
        if self.alive.iter().any(|a| normalize(a).is_empty()) {
            return Err(RecordError::invalid_config("alive labels", "empty label"));
        }
        Ok(())
    }

    pub fn deceased_labels(&self) -> &[String] {
        &self.deceased
    }

    pub fn alive_labels(&self) -> &[String] {
        &self.alive
    }

    /// place a raw label into the tagged status
    pub fn classify(&self, status_label: Option<&str>) -> SubjectStatus {
        let raw = match status_label.map(str::trim) {
            None | Some("") => return SubjectStatus::Unknown(UnknownReason::Missing),
            Some(raw) => raw,
        };

        let norm = normalize(raw);
        if self.deceased.iter().any(|l| normalize(l) == norm) {
            SubjectStatus::Deceased
        } else if self.alive.iter().any(|l| normalize(l) == norm) {
            SubjectStatus::Alive
        } else {
            SubjectStatus::Unknown(UnknownReason::Unrecognized(raw.to_string()))
        }
    }
}

/// collapse a status to the event indicator; None means the row is excluded
pub fn event_indicator(status: &SubjectStatus, policy: UnknownStatusPolicy) -> Option<bool> {
    match (status, policy) {
        (SubjectStatus::Deceased, _) => Some(true),
        (SubjectStatus::Alive, _) => Some(false),
        (SubjectStatus::Unknown(_), UnknownStatusPolicy::Censor) => Some(false),
        (SubjectStatus::Unknown(_), UnknownStatusPolicy::Event) => Some(true),
        (SubjectStatus::Unknown(_), UnknownStatusPolicy::Exclude) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_event_exact_match() {
        assert!(classify_event(Some("Death"), DEATH_SENTINEL));
        assert!(!classify_event(Some("Alive"), DEATH_SENTINEL));
        assert!(!classify_event(Some(""), DEATH_SENTINEL));
        assert!(!classify_event(None, DEATH_SENTINEL));
        assert!(!classify_event(Some("DECEASED"), DEATH_SENTINEL));
        assert!(!classify_event(Some("death"), DEATH_SENTINEL));
        assert!(!classify_event(Some("Death "), DEATH_SENTINEL));
    }

    #[test]
    fn test_classify_event_custom_sentinel() {
        assert!(classify_event(Some("Dead"), "Dead"));
        assert!(!classify_event(Some("Death"), "Dead"));
    }

    #[test]
    fn test_vocabulary_normalizes() {
        let vocab = StatusVocabulary::default();
        assert_eq!(vocab.classify(Some(" death ")), SubjectStatus::Deceased);
        assert_eq!(vocab.classify(Some("DECEASED")), SubjectStatus::Deceased);
        assert_eq!(vocab.classify(Some("alive")), SubjectStatus::Alive);
    }

    #[test]
    fn test_vocabulary_unknowns_are_distinguishable() {
        let vocab = StatusVocabulary::default();
        assert_eq!(vocab.classify(None), SubjectStatus::Unknown(UnknownReason::Missing));
        assert_eq!(vocab.classify(Some("  ")), SubjectStatus::Unknown(UnknownReason::Missing));
        assert_eq!(
            vocab.classify(Some("Lost to follow-up")),
            SubjectStatus::Unknown(UnknownReason::Unrecognized("Lost to follow-up".into()))
        );
        assert_ne!(vocab.classify(Some("")), vocab.classify(Some("Alive")));
    }

    #[test]
    fn test_vocabulary_rejects_overlap() {
        assert!(StatusVocabulary::new(["Death"], ["death"]).is_err());
        assert!(StatusVocabulary::new(Vec::<String>::new(), ["Alive"]).is_err());
        assert!(StatusVocabulary::new(["Died", "Death"], ["Alive", "Censored"]).is_ok());
    }

    #[test]
    fn test_event_indicator_policies() {
        let unknown = SubjectStatus::Unknown(UnknownReason::Missing);
        assert_eq!(event_indicator(&SubjectStatus::Deceased, UnknownStatusPolicy::Exclude), Some(true));
        assert_eq!(event_indicator(&SubjectStatus::Alive, UnknownStatusPolicy::Event), Some(false));
        assert_eq!(event_indicator(&unknown, UnknownStatusPolicy::Censor), Some(false));
        assert_eq!(event_indicator(&unknown, UnknownStatusPolicy::Event), Some(true));
        assert_eq!(event_indicator(&unknown, UnknownStatusPolicy::Exclude), None);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("censor".parse::<UnknownStatusPolicy>().unwrap(), UnknownStatusPolicy::Censor);
        assert_eq!("Exclude".parse::<UnknownStatusPolicy>().unwrap(), UnknownStatusPolicy::Exclude);
        assert!("drop".parse::<UnknownStatusPolicy>().is_err());
    }
}
