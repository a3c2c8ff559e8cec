use serde_json::json;
use tether_core::RelayFrame;
use tether_server::RelayService;

use crate::integration::init_tracing;
use crate::utils::TestMember;

#[tokio::test]
async fn test_broadcast_excludes_sender() {
    init_tracing();

    let service = RelayService::default();
    let mut sender = TestMember::join(&service, "hall", json!({}))
        .await
        .expect("join failed");
    let mut listener = TestMember::join(&service, "hall", json!({}))
        .await
        .expect("join failed");

    // Settle presence traffic first.
    let _ = sender.next_foreign_frame().await.expect("no enter");
    let _ = listener.next_frame().await.expect("no echo");

    sender
        .broadcast(json!({ "type": "controls-update" }))
        .expect("broadcast failed");

    let frame = listener.next_frame().await.expect("no event");
    assert_eq!(
        frame,
        RelayFrame::Event {
            from: sender.peer_id,
            event: json!({ "type": "controls-update" }),
        }
    );
    assert!(sender.stays_quiet(200).await);
}

#[tokio::test]
async fn test_events_keep_sender_order() {
    init_tracing();

    let service = RelayService::default();
    let sender = TestMember::join(&service, "hall", json!({}))
        .await
        .expect("join failed");
    let mut listener = TestMember::join(&service, "hall", json!({}))
        .await
        .expect("join failed");
    let _ = listener.next_frame().await.expect("no echo");

    for seq in 0..20 {
        sender.broadcast(json!({ "seq": seq })).expect("broadcast failed");
    }

    for expected in 0..20 {
        match listener.next_frame().await.expect("missing event") {
            RelayFrame::Event { event, .. } => assert_eq!(event, json!({ "seq": expected })),
            other => panic!("unexpected frame {:?}", other),
        }
    }
}
