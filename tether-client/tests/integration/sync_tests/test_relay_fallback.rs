use std::sync::Arc;
use std::time::Duration;
use tether_client::{Session, SessionConfig, SessionStatus, SyncRoute, TransportConfig};
use tether_core::{ControlPatch, Role, RoomId};
use tether_server::RelayService;

use crate::integration::init_tracing;
use crate::utils::{LocalConnector, RELAY_TIMEOUT_MS, wait_for_controls, wait_for_status};

fn config(role: Role) -> SessionConfig {
    SessionConfig {
        role,
        room_id: RoomId::new("no-direct"),
        transport: TransportConfig::host_only(),
    }
}

/// With the handshake swallowed the data channel never opens and updates
/// travel over the relay instead.
#[tokio::test]
async fn test_relay_fallback() {
    init_tracing();

    let connector = LocalConnector::without_handshake(RelayService::default());

    let receiver = Session::spawn(config(Role::Receiver), Arc::new(connector.clone()))
        .await
        .expect("spawn receiver");
    let controller = Session::spawn(config(Role::Controller), Arc::new(connector.clone()))
        .await
        .expect("spawn controller");

    let mut controller_status = controller.status();
    wait_for_status(&mut controller_status, RELAY_TIMEOUT_MS, |s| {
        *s == SessionStatus::RelayOnly
    })
    .await
    .expect("controller never joined");

    // The receiver offered, but nothing came of it.
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(connector.count("offer") >= 1);
    assert_eq!(*receiver.status().borrow(), SessionStatus::RelayOnly);

    let route = controller
        .set_local(ControlPatch::a(true))
        .await
        .expect("set_local");
    assert_eq!(route, SyncRoute::Relay);

    let mut receiver_controls = receiver.controls();
    let controls = wait_for_controls(&mut receiver_controls, RELAY_TIMEOUT_MS, |c| c.a)
        .await
        .expect("relay update never arrived");
    assert!(controls.a);
    assert_eq!(connector.count("controls-update"), 1);

    // The reverse direction works the same way.
    let route = receiver
        .set_local(ControlPatch::b(true))
        .await
        .expect("set_local");
    assert_eq!(route, SyncRoute::Relay);

    let mut controller_controls = controller.controls();
    let controls = wait_for_controls(&mut controller_controls, RELAY_TIMEOUT_MS, |c| c.b)
        .await
        .expect("reverse update never arrived");
    // Whole-state replacement: the receiver's view had a == true already.
    assert!(controls.a);

    controller.shutdown().await;
    receiver.shutdown().await;
}
