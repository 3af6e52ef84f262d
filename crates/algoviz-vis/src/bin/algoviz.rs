//! AlgoViz server
//!
//! `algoviz [algorithm] [port]` serves the replay API.
//! `algoviz trace <algorithm>` prints one trace as JSON lines.

use std::env;

use algoviz_steps::Algorithm;
use algoviz_vis::{Session, VisConfig, VisServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "algoviz=info,algoviz_vis=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let mut config = VisConfig::from_env()?;

    if args.first().map(String::as_str) == Some("trace") {
        let slug = args.get(1).ok_or("usage: algoviz trace <algorithm>")?;
        config.algorithm = slug.parse::<Algorithm>()?;
        return print_trace(&config);
    }

    if let Some(slug) = args.first() {
        config.algorithm = slug.parse::<Algorithm>()?;
    }
    if let Some(port) = args.get(1) {
        config.port = port.parse()?;
    }

    tracing::info!(algorithm = %config.algorithm, port = config.port, "Starting AlgoViz");

    let server = VisServer::new(&config)?;
    server.serve(config.port).await?;

    Ok(())
}

fn print_trace(config: &VisConfig) -> Result<(), Box<dyn std::error::Error>> {
    let trace = Session::new(config)?.trace()?;
    for op in &trace.operations {
        println!("{}", serde_json::to_string(op)?);
    }
    tracing::info!(algorithm = %trace.algorithm, steps = trace.len(), "trace printed");
    Ok(())
}
