use crate::session::{SessionCommand, SessionError, SessionStatus};
use crate::sync::SyncRoute;
use tether_core::{ControlPatch, ControlState};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

/// Handle to a running [`Session`](crate::session::Session). Dropping it
/// stops the session.
pub struct SessionHandle {
    pub(crate) command_tx: mpsc::Sender<SessionCommand>,
    pub(crate) controls: watch::Receiver<ControlState>,
    pub(crate) status: watch::Receiver<SessionStatus>,
    pub(crate) task: JoinHandle<()>,
}

impl SessionHandle {
    /// Applies a local patch and replicates the resulting state. Resolves to
    /// the transport that carried it.
    pub async fn set_local(&self, patch: ControlPatch) -> Result<SyncRoute, SessionError> {
        let (reply, route) = oneshot::channel();
        self.command_tx
            .send(SessionCommand::SetLocal { patch, reply })
            .await
            .map_err(|_| SessionError::Stopped)?;
        route.await.map_err(|_| SessionError::Stopped)
    }

    pub fn controls(&self) -> watch::Receiver<ControlState> {
        self.controls.clone()
    }

    pub fn status(&self) -> watch::Receiver<SessionStatus> {
        self.status.clone()
    }

    /// Leaves the relay, closes the link and waits for the session task.
    pub async fn shutdown(self) {
        let (done, finished) = oneshot::channel();
        if self
            .command_tx
            .send(SessionCommand::Shutdown { done })
            .await
            .is_ok()
        {
            let _ = finished.await;
        }
        let _ = self.task.await;
    }
}
