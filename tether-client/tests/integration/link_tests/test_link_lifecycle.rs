use tether_client::{LinkError, LinkState};

use crate::integration::init_tracing;
use crate::utils::{CONNECTION_TIMEOUT_MS, new_link, route_candidates, wait_for_message, wait_for_open};

#[tokio::test]
async fn test_link_lifecycle() {
    init_tracing();

    let (offerer, offerer_rx) = new_link(1).await.expect("offerer");
    let (answerer, answerer_rx) = new_link(2).await.expect("answerer");
    let mut offerer_events = route_candidates(offerer_rx, answerer.clone());
    let mut answerer_events = route_candidates(answerer_rx, offerer.clone());

    assert_eq!(offerer.state(), LinkState::Idle);
    assert!(!offerer.send("too early").await);

    let offer = offerer.create_offer().await.expect("offer");
    assert_eq!(offerer.state(), LinkState::OfferCreated);

    let answer = answerer.create_answer(offer).await.expect("answer");
    assert_eq!(answerer.state(), LinkState::AnswerCreated);

    offerer.accept_answer(answer).await.expect("accept");
    assert!(matches!(
        offerer.state(),
        LinkState::AnswerPending | LinkState::Connected
    ));

    wait_for_open(&mut offerer_events, CONNECTION_TIMEOUT_MS)
        .await
        .expect("offerer channel never opened");
    wait_for_open(&mut answerer_events, CONNECTION_TIMEOUT_MS)
        .await
        .expect("answerer channel never opened");
    assert_eq!(offerer.state(), LinkState::Connected);
    assert_eq!(answerer.state(), LinkState::Connected);

    assert!(offerer.send("ping").await);
    let payload = wait_for_message(&mut answerer_events, CONNECTION_TIMEOUT_MS)
        .await
        .expect("no message");
    assert_eq!(&payload[..], b"ping");

    offerer.close().await.expect("close");
    offerer.close().await.expect("second close");
    assert_eq!(offerer.state(), LinkState::Closed);
    assert!(!offerer.send("after close").await);

    answerer.close().await.expect("close");
}

#[tokio::test]
async fn test_invalid_transitions_are_rejected() {
    init_tracing();

    let (link, _events) = new_link(1).await.expect("link");

    let err = link.accept_answer("v=0\r\n".into()).await.unwrap_err();
    assert!(matches!(
        err,
        LinkError::InvalidState {
            state: LinkState::Idle,
            ..
        }
    ));

    link.create_offer().await.expect("offer");
    let err = link.create_offer().await.unwrap_err();
    assert!(matches!(
        err,
        LinkError::InvalidState {
            state: LinkState::OfferCreated,
            ..
        }
    ));
    // A failed call leaves the state alone.
    assert_eq!(link.state(), LinkState::OfferCreated);

    link.close().await.expect("close");
    assert!(matches!(
        link.add_remote_ice_candidate(r#"{"candidate":"candidate:1 1 udp 1 10.0.0.1 9 typ host"}"#)
            .await,
        Err(LinkError::Closed)
    ));
    assert!(matches!(link.create_offer().await, Err(LinkError::Closed)));
}

#[tokio::test]
async fn test_malformed_candidate_is_an_error() {
    init_tracing();

    let (link, _events) = new_link(1).await.expect("link");
    let err = link.add_remote_ice_candidate("not json").await.unwrap_err();
    assert!(matches!(err, LinkError::Candidate(_)));

    // Empty candidate marks end of gathering and is accepted.
    link.add_remote_ice_candidate(r#"{"candidate":""}"#)
        .await
        .expect("end-of-candidates");

    link.close().await.expect("close");
}
