use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{eyre, WrapErr};

use orbit_core::services::config_store::{ConfigStore, DEFAULT_CONFIG_FILE};
use orbit_core::services::DeployManager;

/// Webhook-driven build, restart and rollback for self-hosted services.
#[derive(Debug, Parser)]
#[command(name = "orbit", version, about)]
struct Cli {
    /// Path to the JSON config file.
    #[arg(short, long, env = "ORBIT_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Override the port from the config file.
    #[arg(short, long, env = "ORBIT_PORT")]
    port: Option<u16>,

    /// Write logs to this file instead of stdout.
    #[arg(long, env = "ORBIT_LOG_FILE")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    // Held for the life of the process so buffered lines get flushed.
    let _guard = setup_logging(cli.log_file.as_deref());

    println!("orbit v{}", env!("CARGO_PKG_VERSION"));

    let store = ConfigStore::new(&cli.config);
    let config = store
        .load()
        .wrap_err_with(|| format!("loading {}", cli.config.display()))?;
    if config.secret.is_empty() {
        tracing::warn!("webhook_secret is empty; any caller can trigger deployments");
    }
    tracing::info!(
        projects = config.projects.len(),
        config = %cli.config.display(),
        "config loaded"
    );

    let port = cli.port.unwrap_or(config.port);
    let manager = Arc::new(DeployManager::with_system_defaults(config).with_store(store));

    orbit::serve(manager, port)
        .await
        .map_err(|e| eyre!("{e:#}"))
}

/// Plain stdout logging by default. With `log_file`, lines go to that file
/// through a non-blocking writer whose guard must outlive the program.
fn setup_logging(
    log_file: Option<&std::path::Path>,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let Some(path) = log_file else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
        return None;
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => std::path::Path::new("."),
    };
    let file_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "orbit.log".into());
    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();

    Some(guard)
}
