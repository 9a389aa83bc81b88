use std::path::PathBuf;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use cabana::compactor;
use cabana::demand::RandomDemand;
use cabana::engine::Engine;
use cabana::model::ReleaseMode;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let metrics_port: Option<u16> = std::env::var("CABANA_METRICS_PORT")
        .ok()
        .and_then(|s| s.parse().ok());
    cabana::observability::init(metrics_port);

    let port = std::env::var("CABANA_PORT").unwrap_or_else(|_| "8080".into());
    let bind = std::env::var("CABANA_BIND").unwrap_or_else(|_| "0.0.0.0".into());
    let data_dir = std::env::var("CABANA_DATA_DIR").unwrap_or_else(|_| "./data".into());
    let compact_threshold: u64 = std::env::var("CABANA_COMPACT_THRESHOLD")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(1000);
    let release_mode: ReleaseMode = match std::env::var("CABANA_RELEASE_MODE") {
        Ok(s) => s.parse()?,
        Err(_) => ReleaseMode::default(),
    };
    let bootstrap_on_start: bool = std::env::var("CABANA_BOOTSTRAP_ON_START")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(true);

    std::fs::create_dir_all(&data_dir)?;
    let wal_path = PathBuf::from(&data_dir).join("ledger.wal");
    let engine = Arc::new(Engine::new(wal_path, release_mode)?);

    if bootstrap_on_start {
        let mut demand = RandomDemand::new();
        let (items, generated) = engine.bootstrap(&mut demand).await?;
        info!("bootstrap: {items} catalog items, {generated} slots generated");
    }

    tokio::spawn(compactor::run_compactor(engine.clone(), compact_threshold));

    let app = cabana::http::router(engine);
    let addr = format!("{bind}:{port}");
    let listener = TcpListener::bind(&addr).await?;
    info!("cabana listening on {addr}");
    info!("  data_dir: {data_dir}");
    info!("  release_mode: {release_mode:?}");
    info!(
        "  metrics: {}",
        metrics_port.map_or("disabled".to_string(), |p| format!(
            "http://0.0.0.0:{p}/metrics"
        ))
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("cabana stopped");
    Ok(())
}

/// Resolve on SIGTERM or ctrl-c; axum then stops accepting and drains
/// in-flight requests.
async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to register SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
    }
    info!("shutdown signal received");
}
