#[macro_export]
macro_rules! new_broadcast_channel {
    ($capacity:expr) => {{
        let (sender, mut recv) = tokio::sync::broadcast::channel($capacity);
        tokio::spawn(async move {
            loop {
                match recv.recv().await {
                    Ok(_) | Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => {}
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        sender
    }};
}
