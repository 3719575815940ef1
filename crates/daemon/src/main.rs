use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use epub_validator_daemon::{
    config::{DaemonConfig, DEFAULT_MAX_UPLOAD_MB, DEFAULT_TIMEOUT_SECONDS},
    http,
    runner::ValidatorCommand,
};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Parser)]
#[command(
    name = "epub-validator-daemon",
    version,
    about = "HTTP front end for an external EPUB validator"
)]
struct Cli {
    /// Interface to bind.
    #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// Validator executable.
    #[arg(long, env = "VALIDATOR_PROGRAM", default_value = "java")]
    validator_program: String,

    /// Arguments placed before the upload path. The path is always followed by `--json -`.
    #[arg(
        long = "validator-arg",
        env = "VALIDATOR_ARGS",
        value_delimiter = ' ',
        allow_hyphen_values = true,
        default_values = ["-jar", "/app/epubcheck.jar"]
    )]
    validator_args: Vec<String>,

    /// Seconds a single validator run may take before it is killed.
    #[arg(long, env = "VALIDATION_TIMEOUT_SECONDS", default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    timeout_seconds: u64,

    /// Largest accepted request body in MiB.
    #[arg(long, env = "MAX_UPLOAD_MB", default_value_t = DEFAULT_MAX_UPLOAD_MB)]
    max_upload_mb: usize,

    /// Where uploads are staged while the validator runs. Defaults to the OS temp dir.
    #[arg(long, env = "UPLOAD_TEMP_DIR")]
    temp_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = DaemonConfig::new(ValidatorCommand {
        program: cli.validator_program,
        args: cli.validator_args,
    });
    config.timeout = Duration::from_secs(cli.timeout_seconds);
    config.max_upload_bytes = cli.max_upload_mb * 1024 * 1024;
    if let Some(dir) = cli.temp_dir {
        tokio::fs::create_dir_all(&dir).await?;
        config.temp_dir = dir;
    }

    info!("starting daemon with config: {:?}", config);

    let app = http::router(config);

    let addr = SocketAddr::new(cli.host, cli.port);
    info!("listening on http://{}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    info!("shutdown requested");
}
