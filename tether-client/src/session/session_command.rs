use crate::sync::SyncRoute;
use tether_core::ControlPatch;
use tokio::sync::oneshot;

#[derive(Debug)]
pub(crate) enum SessionCommand {
    SetLocal {
        patch: ControlPatch,
        reply: oneshot::Sender<SyncRoute>,
    },
    Shutdown {
        done: oneshot::Sender<()>,
    },
}
