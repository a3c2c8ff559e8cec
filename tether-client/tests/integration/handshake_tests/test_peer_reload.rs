use std::sync::Arc;
use tether_client::{Session, SessionConfig, SessionStatus, TransportConfig};
use tether_core::{Role, RoomId};
use tether_server::RelayService;

use crate::integration::init_tracing;
use crate::utils::{CONNECTION_TIMEOUT_MS, LocalConnector, RELAY_TIMEOUT_MS, wait_for_status};

fn config(role: Role) -> SessionConfig {
    SessionConfig {
        role,
        room_id: RoomId::new("reload"),
        transport: TransportConfig::host_only(),
    }
}

/// When the controller goes away and comes back, the receiver starts a fresh
/// attempt with a new offer.
#[tokio::test]
async fn test_controller_reload_reconnects() {
    init_tracing();

    let connector = LocalConnector::new(RelayService::default());

    let receiver = Session::spawn(config(Role::Receiver), Arc::new(connector.clone()))
        .await
        .expect("spawn receiver");
    let mut receiver_status = receiver.status();

    let first = Session::spawn(config(Role::Controller), Arc::new(connector.clone()))
        .await
        .expect("spawn controller");
    wait_for_status(&mut receiver_status, CONNECTION_TIMEOUT_MS, |s| {
        *s == SessionStatus::Direct
    })
    .await
    .expect("first attempt never connected");

    first.shutdown().await;
    wait_for_status(&mut receiver_status, RELAY_TIMEOUT_MS, |s| {
        *s == SessionStatus::RelayOnly
    })
    .await
    .expect("receiver kept a dead link");

    let second = Session::spawn(config(Role::Controller), Arc::new(connector.clone()))
        .await
        .expect("spawn controller again");
    let mut second_status = second.status();
    wait_for_status(&mut second_status, CONNECTION_TIMEOUT_MS, |s| {
        *s == SessionStatus::Direct
    })
    .await
    .expect("second attempt never connected");

    assert_eq!(connector.count("offer"), 2);
    assert_eq!(connector.count("answer"), 2);

    second.shutdown().await;
    receiver.shutdown().await;
}

/// When the receiver goes away and a new one joins, the controller drops the
/// old link and answers the new receiver's offer.
#[tokio::test]
async fn test_receiver_reload_reconnects() {
    init_tracing();

    let connector = LocalConnector::new(RelayService::default());

    let controller = Session::spawn(config(Role::Controller), Arc::new(connector.clone()))
        .await
        .expect("spawn controller");
    let mut controller_status = controller.status();
    wait_for_status(&mut controller_status, RELAY_TIMEOUT_MS, |s| {
        *s == SessionStatus::RelayOnly
    })
    .await
    .expect("controller never joined");

    let first = Session::spawn(config(Role::Receiver), Arc::new(connector.clone()))
        .await
        .expect("spawn receiver");
    wait_for_status(&mut controller_status, CONNECTION_TIMEOUT_MS, |s| {
        *s == SessionStatus::Direct
    })
    .await
    .expect("first attempt never connected");

    first.shutdown().await;
    wait_for_status(&mut controller_status, RELAY_TIMEOUT_MS, |s| {
        *s == SessionStatus::RelayOnly
    })
    .await
    .expect("controller kept a dead link");

    let second = Session::spawn(config(Role::Receiver), Arc::new(connector.clone()))
        .await
        .expect("spawn receiver again");
    let mut second_status = second.status();
    wait_for_status(&mut second_status, CONNECTION_TIMEOUT_MS, |s| {
        *s == SessionStatus::Direct
    })
    .await
    .expect("second receiver never connected");
    wait_for_status(&mut controller_status, CONNECTION_TIMEOUT_MS, |s| {
        *s == SessionStatus::Direct
    })
    .await
    .expect("controller never reconnected");

    assert_eq!(connector.count("offer"), 2);
    assert_eq!(connector.count("answer"), 2);

    second.shutdown().await;
    controller.shutdown().await;
}
