use tether_client::LinkState;

use crate::integration::init_tracing;
use crate::utils::{
    CONNECTION_TIMEOUT_MS, gather_candidates, new_link, route_candidates, wait_for_open,
};

/// Candidates reaching the answerer before the offer are held back and
/// applied once the remote description is set; repeats are harmless.
#[tokio::test]
async fn test_early_candidates_are_buffered() {
    init_tracing();

    let (offerer, mut offerer_rx) = new_link(1).await.expect("offerer");
    let (answerer, answerer_rx) = new_link(2).await.expect("answerer");

    let offer = offerer.create_offer().await.expect("offer");
    let candidates = gather_candidates(&mut offerer_rx, 1000).await;
    assert!(!candidates.is_empty(), "no host candidates gathered");

    // Delivered twice and before the offer.
    for candidate in candidates.iter().chain(candidates.iter()) {
        answerer
            .add_remote_ice_candidate(candidate)
            .await
            .expect("early candidate rejected");
    }
    assert_eq!(answerer.state(), LinkState::Idle);

    let mut offerer_events = route_candidates(offerer_rx, answerer.clone());
    let mut answerer_events = route_candidates(answerer_rx, offerer.clone());

    let answer = answerer.create_answer(offer).await.expect("answer");
    offerer.accept_answer(answer).await.expect("accept");

    wait_for_open(&mut offerer_events, CONNECTION_TIMEOUT_MS)
        .await
        .expect("offerer channel never opened");
    wait_for_open(&mut answerer_events, CONNECTION_TIMEOUT_MS)
        .await
        .expect("answerer channel never opened");

    offerer.close().await.expect("close");
    answerer.close().await.expect("close");
}
