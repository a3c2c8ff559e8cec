use anyhow::{Result, bail};
use std::time::Duration;
use tether_client::SessionStatus;
use tether_core::ControlState;
use tokio::sync::watch;
use tokio::time::timeout;

/// Timeout for relay-only steps (ms).
pub const RELAY_TIMEOUT_MS: u64 = 5000;

/// Timeout for the data channel to open (ms).
pub const CONNECTION_TIMEOUT_MS: u64 = 15000;

pub async fn wait_for_status<F>(
    rx: &mut watch::Receiver<SessionStatus>,
    timeout_ms: u64,
    pred: F,
) -> Result<SessionStatus>
where
    F: FnMut(&SessionStatus) -> bool,
{
    let result = timeout(Duration::from_millis(timeout_ms), rx.wait_for(pred))
        .await
        .map(|r| r.map(|status| *status));

    match result {
        Ok(Ok(status)) => Ok(status),
        Ok(Err(_)) => bail!("session dropped its status"),
        Err(_) => bail!("timed out, last status: {}", *rx.borrow()),
    }
}

pub async fn wait_for_controls<F>(
    rx: &mut watch::Receiver<ControlState>,
    timeout_ms: u64,
    pred: F,
) -> Result<ControlState>
where
    F: FnMut(&ControlState) -> bool,
{
    let result = timeout(Duration::from_millis(timeout_ms), rx.wait_for(pred))
        .await
        .map(|r| r.map(|controls| *controls));

    match result {
        Ok(Ok(controls)) => Ok(controls),
        Ok(Err(_)) => bail!("session dropped its controls"),
        Err(_) => bail!("timed out, last controls: {:?}", *rx.borrow()),
    }
}
