use crate::events::AppEvent;
use async_channel::Sender;
use std::thread;
use tokio::runtime::Runtime;
use tokio::signal::unix::{SignalKind, signal};

pub fn start_background_services(tx: Sender<AppEvent>) {
    thread::spawn(move || {
        let rt = match Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("Failed to create Tokio runtime: {}", e);
                return;
            }
        };

        rt.block_on(async {
            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    forward_termination(tx).await;
                });
            }

            std::future::pending::<()>().await;
        });
    });
}

/// SIGTERM comes from a newer daemon evicting this one; both it and SIGINT end in a clean
/// release on the UI loop.
async fn forward_termination(tx: Sender<AppEvent>) {
    let (mut term, mut int) = match (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
    ) {
        (Ok(term), Ok(int)) => (term, int),
        (Err(e), _) | (_, Err(e)) => {
            log::error!("Failed to install signal handlers: {}", e);
            return;
        }
    };

    let name = tokio::select! {
        _ = term.recv() => "SIGTERM",
        _ = int.recv() => "SIGINT",
    };
    log::info!("received {}, shutting down", name);

    if tx.send(AppEvent::Quit).await.is_err() {
        log::warn!("UI loop already gone");
    }
}
