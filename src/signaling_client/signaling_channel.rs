use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError},
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use rand::{Rng, rngs::OsRng};

use crate::{
    core::events::EngineEvent,
    log::LogSink,
    signaling_client::{
        protocol::{
            IceCandidateDescriptor, InboundMsg, OutboundMsg, SdpDescriptor, SignalingContext,
            decode_inbound, encode_outbound, escape_line_endings, msg::AuthnMetadata,
        },
        signaling_client_error::SignalingClientError,
        signaling_command::SignalingCommand,
        signaling_event::{SignalingEvent, SignalingFault},
        transport::{SignalingConnector, SignalingTransport, TransportRead},
    },
    sink_debug, sink_info, sink_trace, sink_warn,
};

/// Upper bound on how long a send waits for the network thread.
const SEND_ACK_TIMEOUT: Duration = Duration::from_secs(5);

/// One persistent connection to the signaling server.
///
/// The socket lives on a dedicated `signaling-net` thread. Inbound frames are
/// decoded there and forwarded to the owner as `EngineEvent::Signaling`; a
/// `ping` is answered with `pong` on the spot and never forwarded. Sends are
/// queued to that thread and wait for its write result.
pub struct SignalingChannel {
    cmd_tx: Sender<SignalingCommand>,
    attached: Arc<AtomicBool>,
    net_thread: Option<JoinHandle<()>>,
    logger: Arc<dyn LogSink>,
}

impl SignalingChannel {
    /// Opens the transport to `url` and starts the network thread.
    ///
    /// Blocks until the connection is open or has failed.
    ///
    /// # Errors
    /// The connector could not open the transport, or the thread could not spawn.
    pub fn connect(
        connector: &dyn SignalingConnector,
        url: &str,
        events: Sender<EngineEvent>,
        logger: Arc<dyn LogSink>,
    ) -> Result<Self, SignalingClientError> {
        sink_info!(logger, "[SIG] connecting to {url}");
        let transport = connector.connect(url).inspect_err(|e| {
            sink_warn!(logger, "[SIG] connect to {url} failed: {e}");
        })?;
        Self::open(transport, events, logger)
    }

    /// Wraps an already open transport.
    ///
    /// # Errors
    /// The network thread could not be spawned.
    pub fn open(
        transport: Box<dyn SignalingTransport>,
        events: Sender<EngineEvent>,
        logger: Arc<dyn LogSink>,
    ) -> Result<Self, SignalingClientError> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<SignalingCommand>();
        let attached = Arc::new(AtomicBool::new(true));

        let net = NetLoop {
            transport,
            cmd_rx,
            events,
            attached: Arc::clone(&attached),
            logger: Arc::clone(&logger),
        };
        let net_thread = thread::Builder::new()
            .name("signaling-net".into())
            .spawn(move || net.run())?;

        sink_debug!(logger, "[SIG] channel open");
        Ok(Self {
            cmd_tx,
            attached,
            net_thread: Some(net_thread),
            logger,
        })
    }

    /// True while the network thread is alive.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.net_thread
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    /// Sends `register` with a fresh pseudo-random client id.
    ///
    /// # Errors
    /// The frame could not be written; the cause is also logged.
    pub fn send_register(&self, ctx: &SignalingContext) -> Result<(), SignalingClientError> {
        let client_id = OsRng.gen_range(0..i32::MAX).to_string();
        sink_debug!(
            self.logger,
            "[SIG] register room={} client={client_id}",
            ctx.room_id()
        );
        self.send(&OutboundMsg::Register {
            room_id: ctx.room_id(),
            client_id,
            key: ctx.auth_key(),
            authn_metadata: AuthnMetadata::default(),
        })
    }

    /// # Errors
    /// The frame could not be written; the cause is also logged.
    pub fn send_ice_candidate(
        &self,
        candidate: &IceCandidateDescriptor,
    ) -> Result<(), SignalingClientError> {
        sink_trace!(self.logger, "[SIG] send candidate {}", candidate.content);
        self.send(&OutboundMsg::candidate(candidate))
    }

    /// # Errors
    /// The frame could not be written; the cause is also logged.
    pub fn send_sdp(&self, sdp: &SdpDescriptor) -> Result<(), SignalingClientError> {
        sink_trace!(
            self.logger,
            "[SIG] send {} {}",
            sdp.kind,
            escape_line_endings(&sdp.content)
        );
        self.send(&OutboundMsg::sdp(sdp))
    }

    fn send(&self, msg: &OutboundMsg<'_>) -> Result<(), SignalingClientError> {
        let result = self.send_inner(msg);
        if let Err(e) = &result {
            sink_warn!(self.logger, "[SIG] send {} failed: {e}", msg.name());
        }
        result
    }

    fn send_inner(&self, msg: &OutboundMsg<'_>) -> Result<(), SignalingClientError> {
        let text = encode_outbound(msg)?;
        let (ack_tx, ack_rx) = mpsc::channel();
        self.cmd_tx
            .send(SignalingCommand::Send { text, ack: ack_tx })
            .map_err(|_| SignalingClientError::Disconnected)?;
        match ack_rx.recv_timeout(SEND_ACK_TIMEOUT) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(SignalingClientError::Timeout),
            Err(RecvTimeoutError::Disconnected) => Err(SignalingClientError::Disconnected),
        }
    }

    /// Stops event delivery and closes the transport. Idempotent.
    pub fn close(&mut self) {
        self.attached.store(false, Ordering::SeqCst);
        let Some(handle) = self.net_thread.take() else {
            return;
        };
        let _ = self.cmd_tx.send(SignalingCommand::Disconnect);
        if handle.thread().id() != thread::current().id() {
            let _ = handle.join();
        }
        sink_debug!(self.logger, "[SIG] channel closed");
    }
}

impl Drop for SignalingChannel {
    fn drop(&mut self) {
        self.close();
    }
}

/// State owned by the `signaling-net` thread.
struct NetLoop {
    transport: Box<dyn SignalingTransport>,
    cmd_rx: Receiver<SignalingCommand>,
    events: Sender<EngineEvent>,
    attached: Arc<AtomicBool>,
    logger: Arc<dyn LogSink>,
}

impl NetLoop {
    fn run(mut self) {
        loop {
            if !self.drain_commands() {
                self.transport.close();
                return;
            }

            match self.transport.read() {
                Ok(TransportRead::Text(text)) => self.handle_text(&text),
                Ok(TransportRead::Idle) => {}
                Ok(TransportRead::Closed(reason)) => {
                    let reason = reason.unwrap_or_else(|| "closed by server".into());
                    sink_info!(self.logger, "[SIG] connection closed: {reason}");
                    self.emit(SignalingEvent::Error(SignalingFault::Transport(reason)));
                    return;
                }
                Err(e) => {
                    sink_warn!(self.logger, "[SIG] transport error: {e}");
                    self.emit(SignalingEvent::Error(SignalingFault::Transport(
                        e.to_string(),
                    )));
                    self.transport.close();
                    return;
                }
            }
        }
    }

    /// Processes queued commands. Returns `false` when the loop must stop.
    fn drain_commands(&mut self) -> bool {
        loop {
            match self.cmd_rx.try_recv() {
                Ok(SignalingCommand::Send { text, ack }) => {
                    sink_trace!(self.logger, "[SIG] >> {text}");
                    let _ = ack.send(self.transport.write_text(&text));
                }
                Ok(SignalingCommand::Disconnect) | Err(TryRecvError::Disconnected) => {
                    return false;
                }
                Err(TryRecvError::Empty) => return true,
            }
        }
    }

    fn handle_text(&mut self, text: &str) {
        sink_trace!(self.logger, "[SIG] << {}", escape_line_endings(text));
        match decode_inbound(text) {
            Ok(InboundMsg::Ping) => self.reply_pong(),
            Ok(InboundMsg::Accept(accept)) => {
                self.emit(SignalingEvent::RegisterAccepted(accept));
            }
            Ok(InboundMsg::Sdp(sdp)) => self.emit(SignalingEvent::Sdp(sdp)),
            Ok(InboundMsg::Candidate(c)) => self.emit(SignalingEvent::Candidate(c)),
            Err(e) => {
                sink_warn!(self.logger, "[SIG] {e}");
                self.emit(SignalingEvent::Error(SignalingFault::Protocol(e)));
            }
        }
    }

    fn reply_pong(&mut self) {
        let result = encode_outbound(&OutboundMsg::Pong)
            .map_err(SignalingClientError::from)
            .and_then(|pong| self.transport.write_text(&pong));
        if let Err(e) = result {
            sink_warn!(self.logger, "[SIG] pong failed: {e}");
        }
    }

    fn emit(&self, ev: SignalingEvent) {
        if self.attached.load(Ordering::SeqCst) {
            let _ = self.events.send(EngineEvent::Signaling(ev));
        }
    }
}
