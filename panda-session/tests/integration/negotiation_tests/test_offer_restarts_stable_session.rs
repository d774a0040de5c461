use panda_core::{ConnectionState, PeerId, RoomId, SessionDescription, SignalMessage};
use panda_session::{Negotiation, PeerEvent, SessionEvent};

use crate::integration::init_tracing;
use crate::utils::{MockBackend, MockBus, TestPeer, is_state, settle};

fn late_offer() -> SignalMessage {
    SignalMessage::Offer {
        sdp: SessionDescription::offer("v=0\r\ns=late\r\n"),
        room: RoomId::default(),
        from: PeerId::from("peer-c"),
    }
}

#[tokio::test]
async fn test_offer_restarts_stable_session() {
    init_tracing();

    let bus = MockBus::new();
    let mut a = TestPeer::new(&bus, "peer-a", MockBackend::new());
    let mut b = TestPeer::new(&bus, "peer-b", MockBackend::new());
    a.session.start().await;
    b.session.start().await;

    a.session.connect().await;
    settle(&mut [&mut a, &mut b]).await;
    assert_eq!(b.session.negotiation(), Negotiation::Stable);
    assert_eq!(b.session.state(), ConnectionState::Connected);
    b.drain_events();

    // A new offer on an established session replaces the connection.
    a.discard_inbound();
    bus.inject(late_offer());
    b.deliver().await;

    let conns = b.backend.connections();
    assert_eq!(conns.len(), 2);
    assert!(conns[0].closed);
    assert_eq!(conns[1].remote.as_ref().unwrap().sdp, "v=0\r\ns=late\r\n");
    assert_eq!(b.session.negotiation(), Negotiation::Stable);
    assert_eq!(bus.published_of("answer").len(), 2);
    assert_eq!(b.session.state(), ConnectionState::New);

    // The replacement's own lifecycle is reported again.
    b.session.process_pending_peer_events().await;
    let events = b.drain_events();
    let states: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            SessionEvent::StateChanged(s) => Some(*s),
            _ => None,
        })
        .collect();
    assert_eq!(
        states,
        [
            ConnectionState::New,
            ConnectionState::Connecting,
            ConnectionState::Connected
        ]
    );
}

#[tokio::test]
async fn test_replaced_connection_leaves_connected_state() {
    init_tracing();

    let bus = MockBus::new();
    let mut a = TestPeer::new(&bus, "peer-a", MockBackend::new());
    let mut b = TestPeer::new(&bus, "peer-b", MockBackend::new().without_auto_connect());
    a.session.start().await;
    b.session.start().await;

    a.session.connect().await;
    settle(&mut [&mut a, &mut b]).await;
    b.session
        .handle_peer_event(1, PeerEvent::StateChanged(ConnectionState::Connected))
        .await;
    assert_eq!(b.session.state(), ConnectionState::Connected);
    b.drain_events();

    a.discard_inbound();
    bus.inject(late_offer());
    b.deliver().await;
    b.session.process_pending_peer_events().await;

    assert_eq!(b.backend.connection_count(), 2);
    assert!(b.backend.connections()[0].closed);
    assert_eq!(b.session.state(), ConnectionState::New);
    assert!(
        b.drain_events()
            .iter()
            .any(|e| is_state(e, ConnectionState::New))
    );
}
