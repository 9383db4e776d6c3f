use std::time::Duration;

use attention_monitor::config::Config;
use attention_monitor::logging::{init_tracing, LogConfig};
use attention_monitor::monitor::{Collaborators, Monitor};
use attention_monitor::services::canvas::ImageSurface;
use attention_monitor::services::replay::ReplaySession;
use attention_monitor::services::sinks::{BellAlertSink, LogStatusSink};
use tokio::sync::broadcast;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = Config::from_env();

    init_tracing(&LogConfig::from(&config));
    tracing::info!("Starting attention-monitor");

    if let Err(e) = config.monitor.validate() {
        tracing::error!(error = %e, "Invalid monitor configuration");
        std::process::exit(2);
    }

    let session = match ReplaySession::load(&config.replay.path).await {
        Ok(session) => session,
        Err(e) => {
            tracing::error!(path = %config.replay.path, error = %e, "Failed to load replay session");
            std::process::exit(1);
        }
    };

    let surface = ImageSurface::new(session.width, session.height);
    let (capture, provider) = session.into_parts(config.replay.looped);

    let (shutdown_tx, _) = broadcast::channel::<()>(8);

    let monitor = Monitor::new(
        &config.monitor,
        Collaborators {
            capture: Box::new(capture),
            provider: Box::new(provider),
            surface: Box::new(surface.clone()),
            alert_sink: Box::new(BellAlertSink::new()),
            status_sink: Box::new(LogStatusSink::new()),
        },
        shutdown_tx.subscribe(),
    );

    tokio::spawn(shutdown_signal(shutdown_tx.clone()));
    if let Some(secs) = config.run_for_secs {
        let shutdown_tx = shutdown_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(secs)).await;
            tracing::info!(secs, "Run duration elapsed");
            let _ = shutdown_tx.send(());
        });
    }

    let exit_code = match monitor.run().await {
        Ok(stats) => {
            match serde_json::to_string(&stats) {
                Ok(json) => tracing::info!(stats = %json, "Session summary"),
                Err(e) => tracing::warn!(error = %e, "Failed to serialize session summary"),
            }
            0
        }
        Err(e) => {
            tracing::error!(error = %e, "Monitor failed");
            1
        }
    };

    if let Some(path) = &config.overlay_snapshot_path {
        match surface.save(path) {
            Ok(()) => tracing::info!(%path, "Overlay snapshot saved"),
            Err(e) => tracing::error!(%path, error = %e, "Failed to save overlay snapshot"),
        }
    }

    tracing::info!("Shutdown complete");
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

async fn shutdown_signal(shutdown_tx: broadcast::Sender<()>) {
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = sigterm.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable, listening for Ctrl-C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("Shutdown signal received");
    let _ = shutdown_tx.send(());
}
