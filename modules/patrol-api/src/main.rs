use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use patrol_api::{build_router, event_channel, forward_lines, run_consumer, AppState};
use patrol_common::Config;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting patrol");

    let config = Config::from_env()?;
    let engine = patrol_api::state::shared_engine();
    let (sender, source) = event_channel(config.event_queue_capacity);

    let consumer = tokio::spawn(run_consumer(source, engine.clone()));

    if config.events_from_stdin {
        tracing::info!("Reading newline-delimited events from stdin");
        // Weak handle: the reader never holds the queue open, and the thread
        // is left blocked in read at exit.
        let weak = sender.downgrade();
        std::thread::Builder::new()
            .name("patrol-stdin".into())
            .spawn(move || forward_lines(std::io::stdin().lock(), &weak))
            .context("Failed to start stdin reader")?;
    }

    let app = build_router(AppState::new(engine, sender));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, "State endpoint at http://{addr}/api/v1/state");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router held the last strong sender; the queue is now closed and
    // the consumer drains what was already accepted before returning.
    let received = consumer.await?;
    tracing::info!(received, "Shut down cleanly");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for ctrl+c");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down...");
}
