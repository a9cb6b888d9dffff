use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use beacon_server::config::ServerConfig;
use beacon_server::relay::SubscriberRegistry;
use beacon_server::server::ServerHandle;
use beacon_server::{net, server, tls};

/// Local command relay: one device controls, any number of displays follow.
#[derive(Parser)]
#[command(name = "beacon", version, about)]
struct Cli {
    /// Port to listen on.
    #[arg(default_value_t = 8000)]
    port: u16,

    /// Directory to serve (defaults to the current directory).
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Verbose logging, including per-request traces.
    #[arg(long)]
    debug: bool,

    /// Serve plain HTTP even if a certificate could be generated.
    #[arg(long)]
    no_tls: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(if cli.debug { "debug" } else { "info" })
            }),
        )
        .init();

    let serve_dir = cli
        .root
        .clone()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    let ips = net::local_ips();

    let tls = if cli.no_tls {
        None
    } else {
        let cert = serve_dir.join(".beacon-cert.pem");
        let key = serve_dir.join(".beacon-key.pem");
        match tls::ensure_self_signed(&cert, &key, &ips) {
            Ok(files) => Some(files),
            Err(err) => {
                tracing::warn!(error = %err, "certificate bootstrap failed, serving plain HTTP");
                None
            }
        }
    };

    let config = ServerConfig {
        port: cli.port,
        serve_dir,
        tls,
        ..ServerConfig::default()
    };
    let registry = Arc::new(SubscriberRegistry::new(config.max_send_queue));

    let handle = match server::start(config, registry).await {
        Ok(handle) => handle,
        Err(err) => {
            tracing::error!(error = %err, kind = err.kind(), "failed to start server");
            std::process::exit(1);
        }
    };

    print_banner(&handle, &ips);

    if tokio::signal::ctrl_c().await.is_ok() {
        println!("\n  Stopped.");
    }
}

fn print_banner(handle: &ServerHandle, ips: &[IpAddr]) {
    let scheme = handle.scheme();
    let port = handle.port();
    let base = format!("{scheme}://{}:{port}", ips[0]);

    println!();
    println!("  ╔══════════════════════════════════════════════════════╗");
    println!("  ║                 Beacon is running!                   ║");
    println!("  ╚══════════════════════════════════════════════════════╝");
    println!();
    println!("  Homepage:    {scheme}://localhost:{port}");
    println!();
    if ips.len() == 1 {
        println!("  Network:     {base}");
    } else {
        println!("  Network IPs:");
        for ip in ips {
            println!("    • {scheme}://{ip}:{port}");
        }
    }
    println!();
    println!("  ┌──────────────────────────────────────────────────────┐");
    println!("  │  DISPLAY  (open on the big screen / projector)       │");
    println!("  │  {base}/display.html");
    println!("  │                                                      │");
    println!("  │  CONTROLLER  (open on your phone)                    │");
    println!("  │  {base}/controller.html");
    println!("  └──────────────────────────────────────────────────────┘");
    println!();
    println!("  Both devices must be on the same Wi-Fi network.");
    if scheme == "https" {
        println!();
        println!("  ⚠  Using a self-signed certificate. Your browser will");
        println!("     show a security warning — choose \"Advanced\" →");
        println!("     \"Proceed\" to accept it on each device.");
    }
    println!();
    println!("  Press Ctrl+C to stop.");
    println!();
}
