use anyhow::Result;
use tokio::sync::watch;
use tokio::time::{interval, Duration};

use crate::core::state::AppState;

pub(crate) async fn run(state: AppState) -> Result<()> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let handles = vec![tokio::spawn(purge_sessions_loop(state.clone(), shutdown_rx.clone()))];

    crate::core::shutdown::shutdown_signal().await;
    if shutdown_tx.send(true).is_err() {
        tracing::warn!("Failed to broadcast shutdown signal to background tasks");
    }

    for handle in handles {
        if let Err(err) = handle.await {
            tracing::error!(error = %err, "Background task join failed");
        }
    }

    Ok(())
}

/// Deletes expired login sessions once; returns how many were removed.
pub(crate) async fn purge_expired_sessions(state: &AppState) -> Result<u64> {
    let removed = state.sessions().purge_expired().await?;
    if removed > 0 {
        metrics::counter!("sessions_purged_total").increment(removed);
        tracing::info!(removed, "Purged expired sessions");
    }
    Ok(removed)
}

async fn purge_sessions_loop(state: AppState, mut shutdown: watch::Receiver<bool>) {
    let period = Duration::from_secs(state.settings().session().cleanup_interval_seconds);
    let mut tick = interval(period);
    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = tick.tick() => {
                if let Err(err) = purge_expired_sessions(&state).await {
                    tracing::error!(error = %err, "purge_expired_sessions failed");
                }
            }
        }
    }
}
