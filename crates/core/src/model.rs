//! The external validator's report as this service understands it.

use serde_json::{Map, Value};

/// Version string reported when the tool does not detect one.
pub const VERSION_UNAVAILABLE: &str = "N/A";

/// Severity tag attached to a single tool message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Makes the publication invalid.
    Error,
    /// Reported, does not affect validity.
    Warning,
    /// Makes the publication invalid; the tool could not finish checking.
    Fatal,
    /// Any other tag (USAGE, INFO, ...) or no tag at all.
    Other,
}

impl Severity {
    /// Classifies a tag exactly as the tool spells it.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "ERROR" => Self::Error,
            "WARNING" => Self::Warning,
            "FATAL" => Self::Fatal,
            _ => Self::Other,
        }
    }

    /// Classifies a raw message entry by its `severity` field.
    pub fn of(message: &Value) -> Self {
        message
            .get("severity")
            .and_then(Value::as_str)
            .map(Self::from_tag)
            .unwrap_or(Self::Other)
    }
}

/// Parsed stdout of the external validator.
///
/// Only `messages` and `publication.epub-version` are interpreted. Message
/// entries are kept verbatim so they can be relayed to the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolReport {
    /// Raw message entries, in tool order.
    pub messages: Vec<Value>,
    /// `publication.epub-version`, if the tool reported one as a string.
    pub epub_version: Option<String>,
}

impl ToolReport {
    /// Parses the tool's stdout. Anything other than a JSON object is an error.
    pub fn parse(stdout: &[u8]) -> Result<Self, serde_json::Error> {
        let root: Map<String, Value> = serde_json::from_slice(stdout)?;
        Ok(Self::from_object(root))
    }

    /// Builds a report from an already-decoded object. A missing or
    /// non-array `messages` field yields no messages.
    pub fn from_object(mut root: Map<String, Value>) -> Self {
        let messages = match root.remove("messages") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        };
        let epub_version = root
            .get("publication")
            .and_then(|p| p.get("epub-version"))
            .and_then(Value::as_str)
            .map(str::to_owned);
        Self {
            messages,
            epub_version,
        }
    }

    /// The detected version, or [`VERSION_UNAVAILABLE`].
    pub fn version(&self) -> &str {
        self.epub_version.as_deref().unwrap_or(VERSION_UNAVAILABLE)
    }
}

/// Human-readable text of a message entry; empty when absent.
pub fn message_text(message: &Value) -> String {
    message
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}
