use crate::backend::{Backend, LocalMedia, PeerConnection, PeerEvent, PeerEventSink};
use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::glare::{GlareOutcome, resolve_glare};
use crate::session::clock::{SessionClock, format_elapsed};
use crate::session::negotiation::{Negotiation, NegotiationStep};
use crate::session::session_command::{SessionCommand, SessionHandle};
use crate::session::session_event::{SessionEvent, SignalingInfo};
use crate::signaling::SignalingChannel;
use panda_core::{ConnectionState, IceCandidate, PeerId, SessionDescription, SignalMessage};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// One browser-tab's worth of video-chat state.
///
/// Owns the only peer connection, the local media, and the queue of remote ICE
/// candidates that arrived before a remote description. All inputs (user
/// commands, pub/sub messages, native connection callbacks) are processed one
/// at a time by [`Session::run`].
pub struct Session<B: Backend> {
    config: SessionConfig,
    backend: B,
    signaling: Arc<dyn SignalingChannel>,

    media: Option<B::Media>,
    connection: Option<B::Connection>,
    generation: u64,
    negotiation: Negotiation,
    offerer: bool,
    pending_ice: VecDeque<IceCandidate>,

    state: ConnectionState,
    connecting: bool,
    clock: SessionClock,
    partner_search: Option<JoinHandle<()>>,

    command_tx: mpsc::WeakSender<SessionCommand>,
    command_rx: mpsc::Receiver<SessionCommand>,
    signal_rx: mpsc::UnboundedReceiver<SignalMessage>,
    peer_tx: mpsc::UnboundedSender<(u64, PeerEvent)>,
    peer_rx: mpsc::UnboundedReceiver<(u64, PeerEvent)>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl<B: Backend> Session<B> {
    pub fn new(
        config: SessionConfig,
        backend: B,
        signaling: Arc<dyn SignalingChannel>,
        signal_rx: mpsc::UnboundedReceiver<SignalMessage>,
    ) -> (Self, SessionHandle, mpsc::UnboundedReceiver<SessionEvent>) {
        let (command_tx, command_rx) = mpsc::channel(32);
        let (peer_tx, peer_rx) = mpsc::unbounded_channel();
        let (events, events_rx) = mpsc::unbounded_channel();

        let session = Self {
            config,
            backend,
            signaling,
            media: None,
            connection: None,
            generation: 0,
            negotiation: Negotiation::Idle,
            offerer: false,
            pending_ice: VecDeque::new(),
            state: ConnectionState::New,
            connecting: false,
            clock: SessionClock::default(),
            partner_search: None,
            command_tx: command_tx.downgrade(),
            command_rx,
            signal_rx,
            peer_tx,
            peer_rx,
            events,
        };

        (session, SessionHandle::new(command_tx), events_rx)
    }

    pub fn peer_id(&self) -> &PeerId {
        &self.config.peer_id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn negotiation(&self) -> Negotiation {
        self.negotiation
    }

    pub fn is_connecting(&self) -> bool {
        self.connecting
    }

    pub fn has_connection(&self) -> bool {
        self.connection.is_some()
    }

    pub fn media_live(&self) -> bool {
        self.media.as_ref().is_some_and(|m| m.is_live())
    }

    pub fn pending_ice_len(&self) -> usize {
        self.pending_ice.len()
    }

    pub fn session_elapsed(&self) -> Duration {
        self.clock.elapsed()
    }

    pub fn format_elapsed(&self) -> String {
        format_elapsed(self.clock.elapsed())
    }

    pub async fn run(mut self) {
        info!(
            "Session {} event loop started in room '{}'",
            self.config.peer_id, self.config.room
        );

        self.start().await;

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(SessionCommand::Shutdown) | None => {
                            info!("Shutting down session {}", self.config.peer_id);
                            break;
                        }
                        Some(c) => self.handle_command(c).await,
                    }
                }

                msg = self.signal_rx.recv() => {
                    match msg {
                        Some(m) => self.handle_signal(m).await,
                        None => {
                            warn!("Signaling channel closed unexpectedly");
                            self.emit(SessionEvent::Error("signaling channel closed".to_owned()));
                            break;
                        }
                    }
                }

                Some((generation, evt)) = self.peer_rx.recv() => {
                    self.handle_peer_event(generation, evt).await;
                }
            }
        }

        self.disconnect().await;
        info!("Session event loop finished");
    }

    /// Open local media and announce presence on the room channel.
    pub async fn start(&mut self) {
        self.ensure_media().await;

        let hello = SignalMessage::Hello {
            room: self.config.room.clone(),
            from: self.config.peer_id.clone(),
        };
        match self.signaling.publish(hello).await {
            Ok(()) => self.report(SignalingInfo::Subscribed),
            Err(e) => warn!("Failed to announce presence: {}", e),
        }
    }

    pub async fn handle_command(&mut self, cmd: SessionCommand) {
        match cmd {
            SessionCommand::Connect => self.connect().await,
            SessionCommand::Disconnect => self.disconnect().await,
            SessionCommand::NextPartner => self.next_partner().await,
            SessionCommand::Shutdown => self.disconnect().await,
        }
    }

    pub async fn connect(&mut self) {
        if self.connecting {
            debug!("Connect ignored: already connecting");
            return;
        }
        if let Err(e) = self.send_offer().await {
            self.fail(e).await;
        }
    }

    /// Stop media, close the connection, forget everything negotiated.
    pub async fn disconnect(&mut self) {
        if let Some(mut media) = self.media.take() {
            media.stop();
            debug!("Local media stopped");
        }
        self.reset_negotiation().await;

        if !self.state.is_terminal() {
            self.set_state(ConnectionState::Closed);
        }
    }

    /// Drop the current partner but keep the camera running, then look again.
    pub async fn next_partner(&mut self) {
        self.reset_negotiation().await;
        self.set_state(ConnectionState::Connecting);

        let Some(command_tx) = self.command_tx.upgrade() else {
            return;
        };
        let delay = self.config.next_partner_delay;
        self.partner_search = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = command_tx.send(SessionCommand::Connect).await;
        }));
    }

    pub async fn handle_signal(&mut self, msg: SignalMessage) {
        if msg.room() != &self.config.room {
            debug!("Ignoring {} for room '{}'", msg.kind(), msg.room());
            return;
        }
        if msg.sender() == Some(&self.config.peer_id) {
            return;
        }

        let result = match msg {
            SignalMessage::Offer { sdp, from, .. } => self.on_offer(sdp, from).await,
            SignalMessage::Answer { sdp, from, .. } => self.on_answer(sdp, from).await,
            SignalMessage::Ice { candidate, .. } => {
                self.on_remote_ice(candidate).await;
                Ok(())
            }
            SignalMessage::Hello { from, .. } => {
                debug!("Presence from {}", from);
                Ok(())
            }
        };

        if let Err(e) = result {
            self.fail(e).await;
        }
    }

    pub async fn handle_peer_event(&mut self, generation: u64, event: PeerEvent) {
        if generation != self.generation || self.connection.is_none() {
            debug!("Dropping {:?} from stale connection #{}", event, generation);
            return;
        }

        match event {
            PeerEvent::IceCandidate(candidate) => {
                let msg = SignalMessage::Ice {
                    candidate,
                    room: self.config.room.clone(),
                    from: Some(self.config.peer_id.clone()),
                };
                if let Err(e) = self.signaling.publish(msg).await {
                    warn!("Failed to publish local ICE candidate: {}", e);
                }
            }

            PeerEvent::StateChanged(state) => {
                info!("Peer connection state: {}", state);
                if state == ConnectionState::Connected || state.is_terminal() {
                    self.connecting = false;
                }
                if self.set_state(state) {
                    self.report(SignalingInfo::Peer(state));
                }
            }

            PeerEvent::RemoteTrack { kind, id } => {
                info!("Remote {} track {}", kind, id);
                self.emit(SessionEvent::RemoteTrack { kind, id });
            }
        }
    }

    /// Handle every peer callback already queued, without blocking.
    pub async fn process_pending_peer_events(&mut self) {
        while let Ok((generation, evt)) = self.peer_rx.try_recv() {
            self.handle_peer_event(generation, evt).await;
        }
    }

    async fn send_offer(&mut self) -> Result<()> {
        if !self.ensure_media().await {
            return Ok(());
        }

        self.connecting = true;
        self.pending_ice.clear();
        self.open_connection().await?;

        let Some(connection) = self.connection.as_ref() else {
            return Err(SessionError::PeerConnection("connection missing".to_owned()));
        };
        let offer = connection.create_offer().await?;
        connection.set_local_description(offer.clone()).await?;
        self.negotiation = self.negotiation.next(NegotiationStep::LocalOffer);
        self.offerer = true;

        self.signaling
            .publish(SignalMessage::Offer {
                sdp: offer,
                room: self.config.room.clone(),
                from: self.config.peer_id.clone(),
            })
            .await?;

        info!("Offer sent by {}", self.config.peer_id);
        self.clock.start();
        self.report(SignalingInfo::SentOffer);
        Ok(())
    }

    async fn on_offer(&mut self, sdp: SessionDescription, from: PeerId) -> Result<()> {
        if self.negotiation.is_unanswered_offer() {
            match resolve_glare(&self.config.peer_id, &from) {
                GlareOutcome::KeepLocalOffer => {
                    info!("Glare with {}: keeping our offer", from);
                    return Ok(());
                }
                GlareOutcome::YieldToRemote => {
                    info!("Glare with {}: yielding, answering their offer", from);
                    self.replace_connection().await;
                }
            }
        } else if self.negotiation.has_remote_description() {
            // A fresh offer on a negotiated connection starts a new negotiation.
            self.replace_connection().await;
        }

        if !self.media_live() {
            debug!("Offer from {} ignored: local media is off", from);
            return Ok(());
        }
        if self.connection.is_none() {
            self.open_connection().await?;
        }
        let Some(connection) = self.connection.as_ref() else {
            return Err(SessionError::PeerConnection("connection missing".to_owned()));
        };

        connection.set_remote_description(sdp).await?;
        self.negotiation = self.negotiation.next(NegotiationStep::RemoteOffer);
        self.offerer = false;

        let answer = connection.create_answer().await?;
        connection.set_local_description(answer.clone()).await?;

        self.signaling
            .publish(SignalMessage::Answer {
                sdp: answer,
                room: self.config.room.clone(),
                from: self.config.peer_id.clone(),
            })
            .await?;
        self.negotiation = self.negotiation.next(NegotiationStep::LocalAnswer);

        info!("Answered offer from {}", from);
        self.flush_pending_ice().await;
        self.report(SignalingInfo::AnsweredOffer);
        Ok(())
    }

    async fn on_answer(&mut self, sdp: SessionDescription, from: PeerId) -> Result<()> {
        let Some(connection) = self.connection.as_ref() else {
            debug!("Answer from {} ignored: no connection", from);
            return Ok(());
        };

        match self.negotiation {
            Negotiation::HaveLocalOffer => {
                connection.set_remote_description(sdp).await?;
                self.negotiation = self.negotiation.next(NegotiationStep::RemoteAnswer);
                info!("Applied answer from {}", from);
            }
            Negotiation::Stable if self.offerer => {
                debug!("Answer from {}: remote description already set", from);
            }
            Negotiation::Stable => {
                debug!("Answer from {} ignored: we answered this negotiation", from);
                return Ok(());
            }
            Negotiation::Idle | Negotiation::HaveRemoteOffer => {
                debug!("Answer from {} ignored: we are not the offerer", from);
                return Ok(());
            }
        }

        self.flush_pending_ice().await;
        self.report(SignalingInfo::ReceivedAnswer);
        Ok(())
    }

    async fn on_remote_ice(&mut self, candidate: IceCandidate) {
        let connection = match self.connection.as_ref() {
            Some(c) if self.negotiation.has_remote_description() => c,
            Some(_) => {
                debug!("Buffering remote ICE candidate");
                self.pending_ice.push_back(candidate);
                return;
            }
            // Offers precede their candidates on the channel, so this one
            // belongs to someone else's negotiation.
            None => {
                debug!("Dropping remote ICE candidate: no connection");
                return;
            }
        };

        if let Err(e) = connection.add_ice_candidate(candidate).await {
            warn!("Failed to add ICE candidate: {}", e);
        }
    }

    async fn flush_pending_ice(&mut self) {
        let Some(connection) = self.connection.as_ref() else {
            return;
        };
        if !self.pending_ice.is_empty() {
            debug!("Flushing {} buffered ICE candidates", self.pending_ice.len());
        }
        while let Some(candidate) = self.pending_ice.pop_front() {
            if let Err(e) = connection.add_ice_candidate(candidate).await {
                warn!("Failed to add buffered ICE candidate: {}", e);
            }
        }
    }

    /// Returns false (and tells the UI) when capture devices are unavailable.
    async fn ensure_media(&mut self) -> bool {
        if self.media_live() {
            return true;
        }

        match self.backend.open_media(self.config.media).await {
            Ok(media) => {
                self.media = Some(media);
                true
            }
            Err(e) => {
                warn!("Cannot open local media: {}", e);
                self.emit(SessionEvent::MediaError(e.to_string()));
                false
            }
        }
    }

    async fn open_connection(&mut self) -> Result<()> {
        self.close_connection().await;

        self.generation += 1;
        let sink = PeerEventSink::new(self.generation, self.peer_tx.clone());
        let connection = self
            .backend
            .create_connection(&self.config.ice_servers, self.media.as_ref(), sink)
            .await?;

        debug!("Opened peer connection #{}", self.generation);
        self.connection = Some(connection);
        Ok(())
    }

    /// Close the current connection ahead of a new negotiation and take the
    /// UI state back to `New`, so the replacement's lifecycle gets reported.
    async fn replace_connection(&mut self) {
        self.close_connection().await;
        self.set_state(ConnectionState::New);
    }

    async fn close_connection(&mut self) {
        if let Some(connection) = self.connection.take() {
            if let Err(e) = connection.close().await {
                warn!("Error closing peer connection: {}", e);
            }
            debug!("Closed peer connection #{}", self.generation);
        }
        self.negotiation = self.negotiation.next(NegotiationStep::Reset);
        self.offerer = false;
    }

    async fn reset_negotiation(&mut self) {
        if let Some(search) = self.partner_search.take() {
            search.abort();
        }
        self.close_connection().await;
        self.pending_ice.clear();
        self.clock.reset();
        self.connecting = false;
    }

    async fn fail(&mut self, err: SessionError) {
        error!("Negotiation failed: {}", err);
        self.reset_negotiation().await;
        self.set_state(ConnectionState::Failed);
        self.emit(SessionEvent::Error(err.to_string()));
    }

    /// Returns true if the state actually changed.
    fn set_state(&mut self, state: ConnectionState) -> bool {
        if self.state == state {
            return false;
        }
        self.state = state;
        self.emit(SessionEvent::StateChanged(state));
        true
    }

    fn report(&self, info: SignalingInfo) {
        debug!("Signaling: {}", info);
        self.emit(SessionEvent::Signaling(info));
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }
}
