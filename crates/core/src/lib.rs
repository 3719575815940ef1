#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Transport-free logic for the EPUB validation gateway: upload screening,
//! the external tool's report model, and the response documents.

pub mod model;
pub mod report;
pub mod upload;

pub use model::{Severity, ToolReport, VERSION_UNAVAILABLE};
pub use report::{FailureReport, StatusDocument, ValidationReport, MESSAGE_SAMPLE_LIMIT};
pub use upload::{screen_filename, UploadError, ALLOWED_EXTENSIONS};
