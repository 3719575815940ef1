use std::io;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// How to invoke the external validator.
///
/// The full argv is `program args.. <upload path> --json -`, which asks the
/// tool for a JSON report on stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ValidatorCommand {
    /// EPUBCheck packaged as a jar.
    pub fn epubcheck(jar: impl Into<String>) -> Self {
        Self {
            program: "java".into(),
            args: vec!["-jar".into(), jar.into()],
        }
    }

    fn command_for(&self, path: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).arg(path).args(["--json", "-"]);
        cmd
    }
}

/// Everything the validator produced, captured in full.
#[derive(Debug)]
pub struct ToolOutput {
    pub stdout: Vec<u8>,
    pub stderr: String,
    pub status: ExitStatus,
    pub elapsed: Duration,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("validator did not finish within {0:?}")]
    TimedOut(Duration),
    #[error("failed to collect validator output: {0}")]
    Io(#[from] io::Error),
}

/// Runs the validator on `path` and waits at most `limit` for it.
///
/// On timeout the child is killed and reaped before this returns, so the
/// caller may delete `path` right away.
pub async fn run(
    validator: &ValidatorCommand,
    path: &Path,
    limit: Duration,
) -> Result<ToolOutput, RunError> {
    let started = Instant::now();

    let mut child = validator
        .command_for(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| RunError::Spawn {
            program: validator.program.clone(),
            source,
        })?;

    let mut stdout = child.stdout.take();
    let mut stderr = child.stderr.take();

    // Drain both pipes while waiting so a chatty tool cannot block on a full pipe.
    let outcome = timeout(limit, async {
        let (out, err, status) = tokio::join!(
            read_all(stdout.as_mut()),
            read_all(stderr.as_mut()),
            child.wait()
        );
        Ok::<_, io::Error>((out?, err?, status?))
    })
    .await;

    match outcome {
        Ok(collected) => {
            let (stdout, stderr, status) = collected?;
            let elapsed = started.elapsed();
            debug!(
                exit_code = ?status.code(),
                stdout_bytes = stdout.len(),
                stderr_bytes = stderr.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                "validator finished"
            );
            Ok(ToolOutput {
                stdout,
                stderr: String::from_utf8_lossy(&stderr).into_owned(),
                status,
                elapsed,
            })
        }
        Err(_) => {
            if let Err(e) = child.kill().await {
                warn!(error = %e, "failed to kill timed out validator");
            }
            Err(RunError::TimedOut(limit))
        }
    }
}

async fn read_all<R: AsyncRead + Unpin>(pipe: Option<&mut R>) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}
