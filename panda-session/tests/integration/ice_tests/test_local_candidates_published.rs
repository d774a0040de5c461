use panda_core::{PeerId, SignalMessage};

use crate::integration::init_tracing;
use crate::utils::{MockBackend, MockBus, TestPeer, settle};

#[tokio::test]
async fn test_local_candidates_published() {
    init_tracing();

    let bus = MockBus::new();
    let mut a = TestPeer::new(&bus, "peer-a", MockBackend::new().with_local_candidates(2));
    let mut b = TestPeer::new(&bus, "peer-b", MockBackend::new().with_local_candidates(2));
    a.session.start().await;
    b.session.start().await;

    a.session.connect().await;
    settle(&mut [&mut a, &mut b]).await;

    let ice = bus.published_of("ice");
    assert_eq!(ice.len(), 4);

    let from_a: Vec<_> = ice
        .iter()
        .filter(|m| m.sender() == Some(&PeerId::from("peer-a")))
        .collect();
    assert_eq!(from_a.len(), 2);
    for msg in from_a {
        let SignalMessage::Ice { room, .. } = msg else {
            panic!("expected ice");
        };
        assert_eq!(*room, a.session.config().room);
    }

    // Each side applied the other's candidates, none left over.
    assert_eq!(a.backend.last_connection().unwrap().candidates.len(), 2);
    assert_eq!(b.backend.last_connection().unwrap().candidates.len(), 2);
    assert_eq!(a.session.pending_ice_len(), 0);
    assert_eq!(b.session.pending_ice_len(), 0);
}
