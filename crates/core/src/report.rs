//! JSON documents returned to HTTP callers.

use serde::{Serialize, Serializer};
use serde_json::{json, Value};

use crate::model::{message_text, Severity, ToolReport, VERSION_UNAVAILABLE};

/// Maximum number of raw tool messages echoed back for context.
pub const MESSAGE_SAMPLE_LIMIT: usize = 10;

/// Normalized outcome of one successful tool run.
///
/// Counts and validity are derived from the message lists when serialized,
/// so they can never disagree with them.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    /// Texts of `ERROR` messages.
    pub errors: Vec<String>,
    /// Texts of `WARNING` messages.
    pub warnings: Vec<String>,
    /// Texts of `FATAL` messages.
    pub fatals: Vec<String>,
    /// Detected publication version, or `"N/A"`.
    pub version: String,
    /// First [`MESSAGE_SAMPLE_LIMIT`] raw messages, unfiltered.
    pub messages: Vec<Value>,
}

impl ValidationReport {
    /// Partitions the tool's messages by severity. Unclassified messages are
    /// not counted anywhere but still show up in the raw sample.
    pub fn from_tool(tool: &ToolReport) -> Self {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut fatals = Vec::new();

        for message in &tool.messages {
            match Severity::of(message) {
                Severity::Error => errors.push(message_text(message)),
                Severity::Warning => warnings.push(message_text(message)),
                Severity::Fatal => fatals.push(message_text(message)),
                Severity::Other => {}
            }
        }

        Self {
            errors,
            warnings,
            fatals,
            version: tool.version().to_owned(),
            messages: tool
                .messages
                .iter()
                .take(MESSAGE_SAMPLE_LIMIT)
                .cloned()
                .collect(),
        }
    }

    /// True iff no `ERROR` and no `FATAL` message was reported.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty() && self.fatals.is_empty()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportWire<'a> {
    valid: bool,
    errors: &'a [String],
    warnings: &'a [String],
    fatals: &'a [String],
    version: &'a str,
    error_count: usize,
    warning_count: usize,
    fatal_count: usize,
    messages: &'a [Value],
}

impl Serialize for ValidationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ReportWire {
            valid: self.is_valid(),
            errors: &self.errors,
            warnings: &self.warnings,
            fatals: &self.fatals,
            version: &self.version,
            error_count: self.errors.len(),
            warning_count: self.warnings.len(),
            fatal_count: self.fatals.len(),
            messages: &self.messages,
        }
        .serialize(serializer)
    }
}

/// Body of every non-200 response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReport {
    /// Short machine-oriented category.
    pub error: String,
    /// Human-readable explanations.
    pub errors: Vec<String>,
}

impl FailureReport {
    /// A failure with a single explanation.
    pub fn new(error: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            errors: vec![detail.into()],
        }
    }
}

#[derive(Serialize)]
struct FailureWire<'a> {
    valid: bool,
    error: &'a str,
    errors: &'a [String],
    warnings: &'a [String],
    version: &'a str,
}

impl Serialize for FailureReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        FailureWire {
            valid: false,
            error: &self.error,
            errors: &self.errors,
            warnings: &[],
            version: VERSION_UNAVAILABLE,
        }
        .serialize(serializer)
    }
}

/// Static capability descriptor served on `GET /`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusDocument {
    /// Always `"ok"` while the process is serving.
    pub status: &'static str,
    /// Service name.
    pub message: &'static str,
    /// Path to description.
    pub endpoints: Value,
}

impl Default for StatusDocument {
    fn default() -> Self {
        Self {
            status: "ok",
            message: "EPUB Validator API",
            endpoints: json!({
                "/validate": "POST - Upload EPUB file for validation"
            }),
        }
    }
}
