mod api;
mod config;
mod context;
mod error;
mod page;

use log::LevelFilter;
use std::{path::PathBuf, str::FromStr, sync::Arc};

use log::{info, warn};
use tokio::net::{TcpListener, TcpStream};

use anyhow;
use clap::{self, Parser};
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;

use crate::config::Config;
use crate::context::ServiceContext;

#[derive(clap::Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Host to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8000)]
    port: u16,

    /// Directory holding the static front-end; its index.html is served at /
    #[arg(short, long)]
    static_dir: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    gemini_api_key: Option<String>,

    /// Groq API key
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    groq_api_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(
            args.log_level
                .as_deref()
                .and_then(|l| LevelFilter::from_str(l).ok())
                .unwrap_or(LevelFilter::Info),
        )
        .init();

    let config = Config::new(args.gemini_api_key, args.groq_api_key);
    let gateway = config.build_gateway()?;
    info!("Providers: {}", gateway.provider_names().join(", "));

    let ctx = Arc::new(ServiceContext::new(gateway, args.static_dir));

    let addr = format!("{}:{}", args.host, args.port);
    let try_socket = TcpListener::bind(&addr).await;
    let listener = try_socket.expect("Failed to bind");
    let local_addr = listener.local_addr().expect("Failed to get local address");
    info!("Listening on: {}", local_addr);

    while let Ok((stream, _)) = listener.accept().await {
        tokio::spawn(accept_connection(stream, ctx.clone()));
    }

    Ok(())
}

async fn accept_connection(stream: TcpStream, ctx: Arc<ServiceContext>) {
    let addr = stream
        .peer_addr()
        .expect("connected streams should have a peer address");
    info!("Peer address: {}", addr);

    let io = TokioIo::new(stream);
    let service = service_fn(move |req| {
        let ctx = ctx.clone();
        async move { Ok::<_, std::convert::Infallible>(api::route(&ctx, req).await) }
    });

    if let Err(e) = auto::Builder::new(TokioExecutor::new())
        .serve_connection(io, service)
        .await
    {
        warn!("Error serving connection: {}", e);
    }
}
