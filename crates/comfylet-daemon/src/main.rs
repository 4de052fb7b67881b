//! comfylet daemon
//!
//! Long-running serve entry point: provisions model weights, launches
//! ComfyUI in the background, then exposes it over HTTP behind the
//! proxy prefix or directly.

use clap::Parser;
use comfylet_api::{create_direct_router, create_router};
use comfylet_core::AppConfig;
use comfylet_runtime::{ComfyRuntime, ServiceRuntime};
use comfylet_store::{HubFetcher, Provisioner};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// comfylet daemon - provision and serve ComfyUI in a GPU container
#[derive(Parser, Debug)]
#[command(name = "comfyletd")]
#[command(version, about, long_about = None)]
struct Args {
    /// Address to bind the HTTP server
    #[arg(long, default_value = "0.0.0.0")]
    address: String,

    /// Port for the HTTP server
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Expose ComfyUI directly instead of behind the proxy prefix
    #[arg(long)]
    direct: bool,

    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    let log_level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    info!("Starting comfylet daemon v{}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => AppConfig::from_file(path).expect("Failed to load config"),
        None => AppConfig::default(),
    };

    // Provision model weights before the service starts
    let fetcher = Arc::new(
        HubFetcher::new(config.provision.cache_dir.clone()).expect("Failed to build hub client"),
    );
    let provisioner = Provisioner::new(config.provision.clone(), fetcher);
    let message = provisioner.provision().await.expect("Provisioning failed");
    info!("{}", message);

    // Launch ComfyUI in the background
    let mut runtime = ComfyRuntime::new(config.runtime.clone());
    runtime.start().await.expect("Failed to launch ComfyUI");
    runtime.wait_ready().await;

    let upstream = runtime.endpoint();
    let router = if args.direct || config.server.direct {
        info!("Exposing ComfyUI directly");
        create_direct_router(upstream)
    } else {
        info!(prefix = %config.server.proxy_prefix, "Proxying ComfyUI");
        create_router(upstream, &config.server.proxy_prefix)
    };

    let addr: SocketAddr = format!("{}:{}", args.address, args.port)
        .parse()
        .expect("Invalid address");

    info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");
    axum::serve(listener, router).await.expect("Server error");
}
