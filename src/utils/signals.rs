//! Signal handling for graceful shutdown

use std::io;

use futures::stream::StreamExt;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook_tokio::Signals;
use tracing::info;

/// Wait for SIGTERM or SIGINT and return the signal received
pub async fn shutdown_signal() -> io::Result<i32> {
    let mut signals = Signals::new([SIGTERM, SIGINT])?;
    let handle = signals.handle();

    let signal = signals.next().await.unwrap_or(SIGTERM);
    info!("Received signal: {}", signal);

    handle.close();
    Ok(signal)
}
