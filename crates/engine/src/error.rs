use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Rule config validation error (empty or clashing column names, etc.).
    ConfigValidation(String),
    /// A required column is absent from a source's header row.
    MissingColumn { source: String, column: String },
    /// A required column appears more than once in a source's header row.
    DuplicateColumn { source: String, column: String },
    /// Blocklist detail line seen before any partner header.
    DetailBeforePartner { line: usize },
    /// Blocklist detail line without a second tab-delimited field.
    MalformedDetailLine { line: usize },
}

impl EngineError {
    /// Schema faults signal upstream format drift and must abort the run.
    pub fn is_schema_fault(&self) -> bool {
        matches!(
            self,
            Self::MissingColumn { .. }
                | Self::DuplicateColumn { .. }
                | Self::DetailBeforePartner { .. }
                | Self::MalformedDetailLine { .. }
        )
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "rule config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "rule config validation error: {msg}"),
            Self::MissingColumn { source, column } => {
                write!(f, "source '{source}': missing column '{column}'")
            }
            Self::DuplicateColumn { source, column } => {
                write!(f, "source '{source}': column '{column}' appears more than once")
            }
            Self::DetailBeforePartner { line } => {
                write!(f, "blocklist line {line}: detail line before any partner header")
            }
            Self::MalformedDetailLine { line } => {
                write!(f, "blocklist line {line}: detail line has no agreement field")
            }
        }
    }
}

impl std::error::Error for EngineError {}
