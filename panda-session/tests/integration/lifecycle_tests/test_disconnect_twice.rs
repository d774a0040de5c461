use panda_core::ConnectionState;
use panda_session::{Negotiation, SessionEvent};

use crate::integration::init_tracing;
use crate::utils::{MockBackend, MockBus, TestPeer, is_state, settle};

fn closed_count(events: &[SessionEvent]) -> usize {
    events
        .iter()
        .filter(|e| is_state(e, ConnectionState::Closed))
        .count()
}

#[tokio::test]
async fn test_disconnect_twice() {
    init_tracing();

    let bus = MockBus::new();
    let mut a = TestPeer::new(&bus, "peer-a", MockBackend::new());
    let mut b = TestPeer::new(&bus, "peer-b", MockBackend::new());
    a.session.start().await;
    b.session.start().await;
    a.session.connect().await;
    settle(&mut [&mut a, &mut b]).await;
    assert_eq!(a.session.state(), ConnectionState::Connected);
    a.drain_events();

    a.session.disconnect().await;
    a.session.disconnect().await;
    a.session.process_pending_peer_events().await;

    assert!(!a.backend.any_media_live());
    assert!(!a.session.media_live());
    assert!(!a.session.has_connection());
    assert!(!a.session.is_connecting());
    assert_eq!(a.session.negotiation(), Negotiation::Idle);
    assert_eq!(a.session.state(), ConnectionState::Closed);
    assert_eq!(a.session.format_elapsed(), "00:00:00");
    assert!(a.backend.last_connection().unwrap().closed);
    assert_eq!(closed_count(&a.drain_events()), 1);
}

#[tokio::test]
async fn test_disconnect_twice_without_connecting() {
    init_tracing();

    let bus = MockBus::new();
    let mut a = TestPeer::new(&bus, "peer-a", MockBackend::new());
    a.session.start().await;
    assert!(a.session.media_live());

    a.session.disconnect().await;
    a.session.disconnect().await;

    assert!(!a.backend.any_media_live());
    assert_eq!(a.backend.connection_count(), 0);
    assert_eq!(closed_count(&a.drain_events()), 1);
}
