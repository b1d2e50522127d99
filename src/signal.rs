/// References: https://stackoverflow.com/questions/77585473/rust-tokio-how-to-handle-more-signals-than-just-sigint-i-e-sigquit
use tracing::error;

/// Waits for SIGTERM or SIGINT.
#[cfg(unix)]
async fn wait_for_signal_impl() -> String {
    use tokio::signal::unix::{signal, SignalKind};

    let (mut terminate, mut interrupt) = match (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
    ) {
        (Ok(t), Ok(i)) => (t, i),
        (Err(e), _) | (_, Err(e)) => {
            error!("signal handler registration failed: {e}");
            return ctrl_c().await;
        }
    };

    tokio::select! {
        _ = terminate.recv() => "SIGTERM".to_string(),
        _ = interrupt.recv() => "SIGINT".to_string(),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal_impl() -> String {
    ctrl_c().await
}

async fn ctrl_c() -> String {
    match tokio::signal::ctrl_c().await {
        Ok(()) => "CTRL_C".to_string(),
        Err(e) => {
            error!("ctrl-c handler failed: {e}");
            std::future::pending::<String>().await
        }
    }
}

/// Registers signal handlers and waits for a signal that
/// indicates a shutdown request.
pub(crate) async fn wait_for_stop_signal() -> String {
    wait_for_signal_impl().await
}
