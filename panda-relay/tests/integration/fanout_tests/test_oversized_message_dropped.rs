use panda_relay::RelayConfig;

use crate::integration::init_tracing;
use crate::utils::{TestClient, TestRelay};

#[tokio::test]
async fn test_oversized_message_dropped() {
    init_tracing();

    let config = RelayConfig::default().with_max_message_bytes(64);
    let server = TestRelay::start(config).await.unwrap();
    let mut a = TestClient::connect(server.addr, "r").await.unwrap();
    let mut b = TestClient::connect(server.addr, "r").await.unwrap();
    server.wait_for_subscribers("r", 2).await.unwrap();

    a.send_text("x".repeat(65)).await.unwrap();
    a.send_text("small").await.unwrap();

    // The first frame that arrives is the one under the limit.
    assert_eq!(b.recv_text(2000).await.unwrap(), "small");
    assert_eq!(a.recv_text(2000).await.unwrap(), "small");
}
