use panda_core::{PeerId, RoomId, SessionDescription, SignalMessage};
use panda_session::{Negotiation, SessionEvent, SignalingInfo};

use crate::integration::init_tracing;
use crate::utils::{MockBackend, MockBus, TestPeer, settle};

#[tokio::test]
async fn test_answer_ignored_when_not_offering() {
    init_tracing();

    let bus = MockBus::new();
    let mut b = TestPeer::new(&bus, "peer-b", MockBackend::new());
    b.session.start().await;

    bus.inject(SignalMessage::Answer {
        sdp: SessionDescription::answer("v=0\r\n"),
        room: RoomId::default(),
        from: PeerId::from("peer-x"),
    });
    b.deliver().await;

    assert_eq!(b.session.negotiation(), Negotiation::Idle);
    assert!(!b.session.has_connection());
    assert_eq!(b.backend.connection_count(), 0);
    assert_eq!(bus.published_of("answer").len(), 1, "only the injected answer");
}

#[tokio::test]
async fn test_answer_ignored_by_stable_answerer() {
    init_tracing();

    let bus = MockBus::new();
    let mut a = TestPeer::new(&bus, "peer-a", MockBackend::new());
    let mut b = TestPeer::new(&bus, "peer-b", MockBackend::new());
    a.session.start().await;
    b.session.start().await;

    a.session.connect().await;
    settle(&mut [&mut a, &mut b]).await;
    assert_eq!(b.session.negotiation(), Negotiation::Stable);
    b.drain_events();

    bus.inject(SignalMessage::Answer {
        sdp: SessionDescription::answer("v=0\r\ns=stray\r\n"),
        room: RoomId::default(),
        from: PeerId::from("peer-x"),
    });
    b.deliver().await;
    b.session.process_pending_peer_events().await;

    assert!(
        !b.drain_events()
            .iter()
            .any(|e| matches!(e, SessionEvent::Signaling(SignalingInfo::ReceivedAnswer)))
    );
    assert_eq!(b.session.negotiation(), Negotiation::Stable);
    assert_eq!(b.backend.connection_count(), 1);
    assert_ne!(
        b.backend.last_connection().unwrap().remote.unwrap().sdp,
        "v=0\r\ns=stray\r\n"
    );
}
