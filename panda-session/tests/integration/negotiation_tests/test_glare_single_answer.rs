use panda_core::{ConnectionState, PeerId, SdpType};
use panda_session::Negotiation;

use crate::integration::init_tracing;
use crate::utils::{MockBackend, MockBus, TestPeer, settle};

#[tokio::test]
async fn test_glare_single_answer() {
    init_tracing();

    let bus = MockBus::new();
    let mut a = TestPeer::new(&bus, "peer-a", MockBackend::new());
    let mut b = TestPeer::new(&bus, "peer-b", MockBackend::new());
    a.session.start().await;
    b.session.start().await;

    // Both offers hit the channel before either side reads anything.
    a.session.connect().await;
    b.session.connect().await;
    assert_eq!(bus.published_of("offer").len(), 2);

    settle(&mut [&mut a, &mut b]).await;

    let answers = bus.published_of("answer");
    assert_eq!(answers.len(), 1, "exactly one answer must be published");
    assert_eq!(answers[0].sender(), Some(&PeerId::from("peer-b")));

    assert_eq!(a.session.negotiation(), Negotiation::Stable);
    assert_eq!(b.session.negotiation(), Negotiation::Stable);

    // The lower id kept its only connection and got the answer on it.
    assert_eq!(a.backend.connection_count(), 1);
    let a_conn = a.backend.last_connection().unwrap();
    assert_eq!(a_conn.remote.unwrap().sdp_type, SdpType::Answer);

    // The higher id threw away its half-open offer and answered on a fresh one.
    let b_conns = b.backend.connections();
    assert_eq!(b_conns.len(), 2);
    assert!(b_conns[0].closed);
    assert!(!b_conns[1].closed);
    assert_eq!(b_conns[1].remote.as_ref().unwrap().sdp_type, SdpType::Offer);

    assert_eq!(a.session.state(), ConnectionState::Connected);
    assert_eq!(b.session.state(), ConnectionState::Connected);
}

#[tokio::test]
async fn test_glare_winner_is_lower_random_id() {
    init_tracing();

    let bus = MockBus::new();
    let first = PeerId::new();
    let second = PeerId::new();
    let mut a = TestPeer::new(&bus, first.as_str(), MockBackend::new());
    let mut b = TestPeer::new(&bus, second.as_str(), MockBackend::new());
    a.session.start().await;
    b.session.start().await;

    b.session.connect().await;
    a.session.connect().await;
    settle(&mut [&mut a, &mut b]).await;

    let answers = bus.published_of("answer");
    assert_eq!(answers.len(), 1);

    let loser = std::cmp::max(first, second);
    assert_eq!(answers[0].sender(), Some(&loser));
}
