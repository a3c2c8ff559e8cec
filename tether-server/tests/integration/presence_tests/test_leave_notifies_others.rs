use serde_json::json;
use tether_core::RelayFrame;
use tether_server::RelayService;

use crate::integration::init_tracing;
use crate::utils::TestMember;

#[tokio::test]
async fn test_explicit_leave_notifies_others() {
    init_tracing();

    let service = RelayService::default();
    let mut stays = TestMember::join(&service, "hall", json!({}))
        .await
        .expect("join failed");
    let goes = TestMember::join(&service, "hall", json!({}))
        .await
        .expect("join failed");

    let enter = stays.next_foreign_frame().await.expect("no enter");
    assert!(matches!(enter, RelayFrame::PresenceEnter { .. }));

    goes.leave().expect("leave failed");

    let frame = stays.next_foreign_frame().await.expect("no leave frame");
    assert_eq!(
        frame,
        RelayFrame::PresenceLeave {
            connection_id: goes.peer_id
        }
    );
}

#[tokio::test]
async fn test_dropped_connection_counts_as_leave() {
    init_tracing();

    let service = RelayService::default();
    let mut stays = TestMember::join(&service, "hall", json!({}))
        .await
        .expect("join failed");
    let goes = TestMember::join(&service, "hall", json!({}))
        .await
        .expect("join failed");
    let gone_id = goes.peer_id;

    let _ = stays.next_foreign_frame().await.expect("no enter");

    drop(goes);

    let frame = stays.next_foreign_frame().await.expect("no leave frame");
    assert_eq!(
        frame,
        RelayFrame::PresenceLeave {
            connection_id: gone_id
        }
    );
}

#[tokio::test]
async fn test_rejoin_gets_fresh_identity() {
    init_tracing();

    let service = RelayService::default();
    let first = TestMember::join(&service, "hall", json!({}))
        .await
        .expect("join failed");
    let first_id = first.peer_id;
    first.leave().expect("leave failed");
    drop(first);

    let again = TestMember::join(&service, "hall", json!({}))
        .await
        .expect("rejoin failed");
    assert_ne!(again.peer_id, first_id);
}
