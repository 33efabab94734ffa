use std::fmt;

/// One `<option>` of the period selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodOption {
    /// The `value` attribute, trimmed. Empty when the attribute is missing.
    pub value: String,
    /// The visible option text, trimmed.
    pub label: String,
}

impl PeriodOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into().trim().to_string(),
            label: label.into().trim().to_string(),
        }
    }

    /// Text used when announcing this period; falls back to the value.
    pub fn display(&self) -> &str {
        if self.label.is_empty() {
            &self.value
        } else {
            &self.label
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network error, timeout, bad status or rejected response.
    Transport,
    /// The body could not be decoded or parsed.
    Parse,
    /// The period selector or its options are absent.
    MissingSelector,
    /// The selector is present but holds no usable text or value.
    Empty,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Transport => write!(f, "transport error"),
            FailureKind::Parse => write!(f, "parse error"),
            FailureKind::MissingSelector => write!(f, "period selector missing"),
            FailureKind::Empty => write!(f, "period selector empty"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeFailure {
    pub kind: FailureKind,
    pub detail: String,
}

impl ProbeFailure {
    pub fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.detail.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, self.detail)
        }
    }
}
