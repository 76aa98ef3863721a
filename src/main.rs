use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use testssl_web::config::Config;
use testssl_web::server::{self, AppState};

/// testssl-web — Streaming HTTP front-end for testssl.sh.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "testssl-web",
    version,
    about = "Streaming HTTP front-end for testssl.sh: live scan output piped straight to the client.",
    long_about = None
)]
struct Cli {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: String,

    /// Scan binary to spawn (name resolved via PATH, or an absolute path).
    #[arg(long = "scan-binary", default_value = "testssl.sh")]
    scan_binary: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env();

    init_tracing(&config);

    println!("testssl-web configuration:");
    println!("  bind         : {}", cli.bind);
    println!("  scan_binary  : {}", cli.scan_binary);
    println!("  quick        : {}", config.quick);
    println!("  debug        : {}", config.debug);
    println!("  console_log  : {}", config.console_log);

    let state = AppState {
        config,
        scan_binary: cli.scan_binary,
    };
    server::spawn_server(&cli.bind, state).await
}

/// Log at info by default, debug when the DEBUG flag is set; RUST_LOG wins
/// over both.
fn init_tracing(config: &Config) {
    let default = if config.debug {
        "testssl_web=debug,tower_http=debug"
    } else {
        "testssl_web=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
