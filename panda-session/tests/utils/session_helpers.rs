use panda_core::SignalMessage;
use panda_session::{Session, SessionConfig, SessionEvent, SessionHandle};
use std::time::Duration;
use tokio::sync::mpsc;

use super::mock_backend::MockBackend;
use super::mock_signaling::{MockBus, MockSignaling};
use std::sync::Arc;

pub type MockSession = Session<MockBackend>;

/// A session wired to a `MockBus`, driven by hand from the test.
pub struct TestPeer {
    pub session: MockSession,
    pub handle: SessionHandle,
    pub backend: MockBackend,
    pub signaling: Arc<MockSignaling>,
    pub inbound: mpsc::UnboundedReceiver<SignalMessage>,
    pub events: mpsc::UnboundedReceiver<SessionEvent>,
}

impl TestPeer {
    pub fn new(bus: &MockBus, peer_id: &str, backend: MockBackend) -> Self {
        let config = SessionConfig::default()
            .with_peer_id(peer_id)
            .with_ice_servers(vec![]);
        Self::with_config(bus, config, backend)
    }

    pub fn with_config(bus: &MockBus, config: SessionConfig, backend: MockBackend) -> Self {
        let (signaling, inbound) = bus.subscribe();
        let (session, handle, events) = Session::new(
            config,
            backend.clone(),
            signaling.clone(),
            // Inbound messages are fed by hand through `deliver`, so the
            // session gets a receiver nobody writes to.
            mpsc::unbounded_channel().1,
        );

        Self {
            session,
            handle,
            backend,
            signaling,
            inbound,
            events,
        }
    }

    /// Hand every queued channel message to the session. Returns how many.
    pub async fn deliver(&mut self) -> usize {
        let mut delivered = 0;
        while let Ok(msg) = self.inbound.try_recv() {
            self.session.handle_signal(msg).await;
            delivered += 1;
        }
        delivered
    }

    /// Throw away queued channel messages without handling them.
    pub fn discard_inbound(&mut self) {
        while self.inbound.try_recv().is_ok() {}
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        let mut out = Vec::new();
        while let Ok(evt) = self.events.try_recv() {
            out.push(evt);
        }
        out
    }
}

/// Pump peer callbacks and channel messages until nothing moves.
pub async fn settle(peers: &mut [&mut TestPeer]) {
    for _ in 0..64 {
        let mut delivered = 0;
        for peer in peers.iter_mut() {
            peer.session.process_pending_peer_events().await;
        }
        for peer in peers.iter_mut() {
            delivered += peer.deliver().await;
        }
        if delivered == 0 {
            return;
        }
    }
    panic!("peers did not settle");
}

/// Wait for a matching event from a session running on its own task.
pub async fn wait_for_event<F>(
    events: &mut mpsc::UnboundedReceiver<SessionEvent>,
    timeout_ms: u64,
    mut pred: F,
) -> Option<SessionEvent>
where
    F: FnMut(&SessionEvent) -> bool,
{
    let deadline = tokio::time::Instant::now() + Duration::from_millis(timeout_ms);
    loop {
        match tokio::time::timeout_at(deadline, events.recv()).await {
            Ok(Some(evt)) if pred(&evt) => return Some(evt),
            Ok(Some(_)) => continue,
            Ok(None) | Err(_) => return None,
        }
    }
}

/// Run a session on its own task, subscribed to `bus`.
pub fn spawn_session<B: panda_session::Backend>(
    bus: &MockBus,
    config: SessionConfig,
    backend: B,
) -> (
    SessionHandle,
    mpsc::UnboundedReceiver<SessionEvent>,
    tokio::task::JoinHandle<()>,
) {
    let (signaling, inbound) = bus.subscribe();
    let (session, handle, events) = Session::new(config, backend, signaling, inbound);
    let task = tokio::spawn(session.run());
    (handle, events, task)
}

pub fn is_state(evt: &SessionEvent, state: panda_core::ConnectionState) -> bool {
    matches!(evt, SessionEvent::StateChanged(s) if *s == state)
}
