use std::path::PathBuf;
use std::time::Duration;

use crate::runner::ValidatorCommand;

/// Hard wall-clock limit for one validator run.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

/// Largest accepted request body, in MiB.
pub const DEFAULT_MAX_UPLOAD_MB: usize = 50;

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub validator: ValidatorCommand,
    pub timeout: Duration,
    pub max_upload_bytes: usize,
    /// Directory receiving one short-lived file per request.
    pub temp_dir: PathBuf,
}

impl DaemonConfig {
    pub fn new(validator: ValidatorCommand) -> Self {
        Self {
            validator,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
            temp_dir: std::env::temp_dir(),
        }
    }
}
