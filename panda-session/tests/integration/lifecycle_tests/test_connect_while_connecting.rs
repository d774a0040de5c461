use crate::integration::init_tracing;
use crate::utils::{MockBackend, MockBus, TestPeer};

#[tokio::test]
async fn test_connect_while_connecting() {
    init_tracing();

    let bus = MockBus::new();
    let mut a = TestPeer::new(&bus, "peer-a", MockBackend::new());
    a.session.start().await;

    a.session.connect().await;
    a.session.connect().await;

    assert_eq!(bus.published_of("offer").len(), 1);
    assert_eq!(a.backend.connection_count(), 1);

    // A disconnect clears the in-flight flag and the camera.
    a.session.disconnect().await;
    a.session.connect().await;

    assert_eq!(bus.published_of("offer").len(), 2);
    assert_eq!(a.backend.connection_count(), 2);
    assert_eq!(a.backend.media_opened(), 2);
    assert!(a.backend.connections()[0].closed);
}
