use layerkv::{session, Config};
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // Logs go to stderr so stdout only carries command output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    info!("LayerKV starting...");

    // An optional script path replaces stdin
    let result = match std::env::args_os().nth(1) {
        Some(path) => session::run_file(&config, path).await,
        None => session::run_stdio(&config).await,
    };

    if let Err(e) = result {
        error!("Session failed: {:#}", e);
        std::process::exit(1);
    }
}
