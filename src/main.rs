use std::path::PathBuf;

use clap::Parser;
use tower_lsp::{LspService, Server};

use valhalla_lsp::logging::init_logging;
use valhalla_lsp::{Backend, Config, ConfigOverrides};

/// Vala language server with scope-aware code completion.
#[derive(Debug, Parser)]
#[command(name = "valhalla-lsp", version, about)]
struct Cli {
    /// Accepted for editors that always pass it.  stdin/stdout is the only
    /// transport.
    #[arg(long)]
    stdio: bool,

    /// Directory of `.vapi` declaration files to load at startup.
    #[arg(long, value_name = "DIR")]
    vapi_dir: Option<PathBuf>,

    /// Additional TOML configuration file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log filter used when `RUST_LOG` is not set (e.g. `debug`).
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let overrides = ConfigOverrides {
        vapi_dir: cli.vapi_dir,
        ..ConfigOverrides::default()
    };
    let config = Config::load(cli.config.as_deref(), &overrides);
    tracing::info!("Starting valhalla-lsp {}", env!("CARGO_PKG_VERSION"));
    if !cli.stdio {
        tracing::debug!("No transport flag given, serving over stdio");
    }

    let (service, socket) =
        LspService::new(move |client| Backend::new(client, config, overrides));
    Server::new(tokio::io::stdin(), tokio::io::stdout(), socket)
        .serve(service)
        .await;
    Ok(())
}
