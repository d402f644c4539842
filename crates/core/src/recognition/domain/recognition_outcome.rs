use std::fmt;
use std::str::FromStr;

use crate::classification::domain::classification::Classification;
use crate::recognition::domain::label_table::LabelTable;

/// Who, if anyone, was recognized in a cycle.
///
/// `Unknown` carries no name; the fallback is only applied by [`Self::tagged_name`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecognitionOutcome {
    Identified(String),
    Unknown,
}

impl RecognitionOutcome {
    /// Applies the confidence threshold (inclusive) to the top classification
    /// and resolves the class index through `labels`.
    ///
    /// A class index the label table does not know degrades to `Unknown`.
    pub fn decide(top: Option<&Classification>, threshold: f32, labels: &LabelTable) -> Self {
        let Some(top) = top else {
            return RecognitionOutcome::Unknown;
        };
        if top.score.is_nan() || top.score < threshold {
            return RecognitionOutcome::Unknown;
        }
        match labels.get(top.class_index) {
            Some(name) => RecognitionOutcome::Identified(name.to_string()),
            None => {
                log::warn!(
                    "Class {} (score {:.3}) has no entry in the label table ({} labels)",
                    top.class_index,
                    top.score,
                    labels.len()
                );
                RecognitionOutcome::Unknown
            }
        }
    }

    pub fn is_identified(&self) -> bool {
        matches!(self, RecognitionOutcome::Identified(_))
    }

    /// Name to tag the snapshot with.
    pub fn tagged_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self {
            RecognitionOutcome::Identified(name) => name,
            RecognitionOutcome::Unknown => fallback,
        }
    }
}

/// When the display gets notified.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NotifyPolicy {
    /// Only when somebody specific was recognized.
    #[default]
    IdentifiedOnly,
    /// Every completed cycle, with the fallback name for `Unknown`.
    EveryCycle,
}

impl NotifyPolicy {
    pub fn should_notify(&self, outcome: &RecognitionOutcome) -> bool {
        match self {
            NotifyPolicy::IdentifiedOnly => outcome.is_identified(),
            NotifyPolicy::EveryCycle => true,
        }
    }
}

impl FromStr for NotifyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "identified" => Ok(NotifyPolicy::IdentifiedOnly),
            "always" => Ok(NotifyPolicy::EveryCycle),
            other => Err(format!(
                "notify policy must be 'identified' or 'always', got '{other}'"
            )),
        }
    }
}

impl fmt::Display for NotifyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyPolicy::IdentifiedOnly => write!(f, "identified"),
            NotifyPolicy::EveryCycle => write!(f, "always"),
        }
    }
}
