use clap::Parser;
use netmon_hub::config::Args;
use netmon_hub::engine::{inbound_channel, Engine};
use netmon_hub::routes::{self, AppState};
use netmon_hub::state::DashboardState;
use netmon_hub::transport;
use std::sync::{Arc, RwLock};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let addr = args.listen_addr()?;

    let dashboard = Arc::new(RwLock::new(DashboardState::new(
        args.ticket_capacity,
        args.reset_policy(),
    )));

    let (tx, rx) = inbound_channel();
    let engine = Engine::new(dashboard.clone(), rx, args.tick_interval());
    tokio::spawn(engine.run());

    match args.transport() {
        Some(config) => {
            info!(endpoint = %config.endpoint, "starting transport");
            tokio::spawn(async move {
                if let Err(e) = transport::run(config, tx).await {
                    error!(error = %e, "transport stopped");
                }
            });
        }
        None => warn!("no endpoint configured, serving an empty dashboard"),
    }

    let app = routes::router(AppState { dashboard });

    info!(%addr, ticket_capacity = args.ticket_capacity, "server started");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
