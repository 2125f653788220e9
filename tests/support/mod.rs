//! In-memory collaborators shared by the integration tests.
#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::{
    io,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver, RecvTimeoutError, Sender},
    },
    thread,
    time::{Duration, Instant},
};

use roomlink::{
    app::SessionFacade,
    core::{SessionError, SessionObserver},
    log::NoopLogSink,
    media::{
        FrameSlot, LocalVideoSource, LocalVideoTrack, MediaEngine, MediaError,
        NegotiationDirection, PeerEvent, PeerEventSender, PeerSession, PeerSessionConfig,
        RemoteTrackId, VideoFrame,
    },
    signaling_client::{
        SignalingClientError, SignalingConnector, SignalingTransport, TransportRead,
        protocol::{IceCandidateDescriptor, SdpDescriptor, SdpKind, SignalingContext},
    },
};
use serde_json::{Value, json};

pub const WAIT: Duration = Duration::from_secs(2);
const READ_POLL: Duration = Duration::from_millis(5);

pub const LOCAL_OFFER: &str = "v=0\r\no=- 1 1 IN IP4 0.0.0.0\r\ns=local-offer\r\n";
pub const LOCAL_ANSWER: &str = "v=0\r\no=- 2 2 IN IP4 0.0.0.0\r\ns=local-answer\r\n";

// ---------------------------------------------------------------- transport

enum ServerFrame {
    Text(String),
    Close(Option<String>),
    Fail(String),
}

/// Client side of an in-memory signaling connection.
pub struct MemoryTransport {
    inbound: Receiver<ServerFrame>,
    outbound: Sender<String>,
    fail_writes: Arc<AtomicBool>,
    closed: bool,
}

impl SignalingTransport for MemoryTransport {
    fn read(&mut self) -> Result<TransportRead, SignalingClientError> {
        match self.inbound.recv_timeout(READ_POLL) {
            Ok(ServerFrame::Text(t)) => Ok(TransportRead::Text(t)),
            Ok(ServerFrame::Close(reason)) => Ok(TransportRead::Closed(reason)),
            Ok(ServerFrame::Fail(reason)) => Err(SignalingClientError::Io(io::Error::new(
                io::ErrorKind::ConnectionReset,
                reason,
            ))),
            Err(RecvTimeoutError::Timeout) => Ok(TransportRead::Idle),
            Err(RecvTimeoutError::Disconnected) => Ok(TransportRead::Closed(None)),
        }
    }

    fn write_text(&mut self, text: &str) -> Result<(), SignalingClientError> {
        if self.closed || self.fail_writes.load(Ordering::SeqCst) {
            return Err(SignalingClientError::Disconnected);
        }
        self.outbound
            .send(text.to_owned())
            .map_err(|_| SignalingClientError::Disconnected)
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

/// Server side of an in-memory signaling connection, driven by the test.
pub struct ServerEnd {
    to_client: Sender<ServerFrame>,
    from_client: Receiver<String>,
}

impl ServerEnd {
    pub fn send_text(&self, text: &str) {
        let _ = self.to_client.send(ServerFrame::Text(text.to_owned()));
    }

    pub fn send_json(&self, v: &Value) {
        self.send_text(&v.to_string());
    }

    pub fn close(&self, reason: Option<&str>) {
        let _ = self
            .to_client
            .send(ServerFrame::Close(reason.map(str::to_owned)));
    }

    pub fn fail(&self, reason: &str) {
        let _ = self.to_client.send(ServerFrame::Fail(reason.to_owned()));
    }

    pub fn recv_json(&self) -> Value {
        let text = self
            .from_client
            .recv_timeout(WAIT)
            .expect("client sent nothing");
        serde_json::from_str(&text).expect("client sent invalid JSON")
    }

    /// Next message, which must have the given `type`.
    pub fn expect_type(&self, ty: &str) -> Value {
        let v = self.recv_json();
        assert_eq!(v["type"], ty, "unexpected message {v}");
        v
    }

    pub fn assert_silent(&self, for_: Duration) {
        match self.from_client.recv_timeout(for_) {
            Ok(text) => panic!("unexpected client message {text}"),
            Err(_) => {}
        }
    }

    /// True once the client side has been dropped.
    pub fn wait_disconnected(&self) -> bool {
        let deadline = Instant::now() + WAIT;
        while Instant::now() < deadline {
            match self.from_client.recv_timeout(READ_POLL) {
                Err(RecvTimeoutError::Disconnected) => return true,
                Ok(_) | Err(RecvTimeoutError::Timeout) => {}
            }
        }
        false
    }
}

pub fn memory_pair() -> (MemoryTransport, ServerEnd) {
    memory_pair_with(Arc::new(AtomicBool::new(false)))
}

fn memory_pair_with(fail_writes: Arc<AtomicBool>) -> (MemoryTransport, ServerEnd) {
    let (to_client, inbound) = mpsc::channel();
    let (outbound, from_client) = mpsc::channel();
    (
        MemoryTransport {
            inbound,
            outbound,
            fail_writes,
            closed: false,
        },
        ServerEnd {
            to_client,
            from_client,
        },
    )
}

/// Hands every accepted connection's server end to the test.
pub struct MemoryConnector {
    servers: Mutex<Sender<ServerEnd>>,
    pub refuse: AtomicBool,
    pub fail_writes: Arc<AtomicBool>,
    pub urls: Mutex<Vec<String>>,
}

impl MemoryConnector {
    pub fn new() -> (Arc<Self>, Receiver<ServerEnd>) {
        let (tx, rx) = mpsc::channel();
        let connector = Arc::new(Self {
            servers: Mutex::new(tx),
            refuse: AtomicBool::new(false),
            fail_writes: Arc::new(AtomicBool::new(false)),
            urls: Mutex::new(Vec::new()),
        });
        (connector, rx)
    }
}

impl SignalingConnector for MemoryConnector {
    fn connect(&self, url: &str) -> Result<Box<dyn SignalingTransport>, SignalingClientError> {
        self.urls.lock().unwrap().push(url.to_owned());
        if self.refuse.load(Ordering::SeqCst) {
            return Err(SignalingClientError::Connect("connection refused".into()));
        }
        let (transport, server) = memory_pair_with(Arc::clone(&self.fail_writes));
        let _ = self.servers.lock().unwrap().send(server);
        Ok(Box::new(transport))
    }
}

// ---------------------------------------------------------------- media engine

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    AcquireVideo,
    CreateTrack(String),
    DisposeTrack(String),
    DisposeSource,
    CreateSession(PeerSessionConfig),
    Initialize,
    AddTransceiver(NegotiationDirection, Option<String>),
    CreateOffer,
    CreateAnswer,
    SetRemote(SdpKind, String),
    AddCandidate(String),
    AttachRemoteVideo(String),
    MuteAudio(String),
    DisposeSession,
}

/// Scripted engine: records every call and answers `create_offer` /
/// `create_answer` with `LocalSdpReady` like a real engine would.
#[derive(Default)]
pub struct FakeEngine {
    pub calls: Arc<Mutex<Vec<Call>>>,
    pub events: Mutex<Option<PeerEventSender>>,
    pub remote_slot: Arc<Mutex<Option<Arc<FrameSlot>>>>,
    pub fail_camera: AtomicBool,
    pub fail_track: AtomicBool,
    pub fail_set_remote: Arc<AtomicBool>,
    /// When set, camera start blocks until the test sends on the paired sender.
    pub camera_gate: Mutex<Option<Receiver<()>>>,
}

impl FakeEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn has_call(&self, call: &Call) -> bool {
        self.calls.lock().unwrap().contains(call)
    }

    /// Polls until `pred` holds for the recorded calls.
    pub fn wait_until(&self, pred: impl Fn(&[Call]) -> bool) -> bool {
        let deadline = Instant::now() + WAIT;
        while Instant::now() < deadline {
            if pred(&self.calls.lock().unwrap()) {
                return true;
            }
            thread::sleep(Duration::from_millis(2));
        }
        false
    }

    pub fn wait_for(&self, call: &Call) {
        assert!(
            self.wait_until(|calls| calls.contains(call)),
            "{call:?} never happened; calls: {:?}",
            self.calls()
        );
    }

    /// Raises an engine callback on the session created last.
    pub fn emit(&self, ev: PeerEvent) -> bool {
        self.events
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|tx| tx.send(ev))
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl MediaEngine for FakeEngine {
    fn acquire_local_video(
        &self,
        preview: Arc<FrameSlot>,
    ) -> Result<Box<dyn LocalVideoSource>, MediaError> {
        self.record(Call::AcquireVideo);
        let gate = self.camera_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.recv_timeout(WAIT);
        }
        if self.fail_camera.load(Ordering::SeqCst) {
            return Err(MediaError::DeviceUnavailable("no camera".into()));
        }
        preview.publish(VideoFrame::solid(4, 4, [0, 0, 255, 255]));
        Ok(Box::new(FakeCamera {
            calls: Arc::clone(&self.calls),
            fail_track: self.fail_track.load(Ordering::SeqCst),
        }))
    }

    fn create_peer_session(
        &self,
        config: PeerSessionConfig,
        events: PeerEventSender,
    ) -> Result<Box<dyn PeerSession>, MediaError> {
        self.record(Call::CreateSession(config));
        *self.events.lock().unwrap() = Some(events.clone());
        Ok(Box::new(FakePeerSession {
            calls: Arc::clone(&self.calls),
            events,
            remote_slot: Arc::clone(&self.remote_slot),
            fail_set_remote: Arc::clone(&self.fail_set_remote),
        }))
    }
}

struct FakeCamera {
    calls: Arc<Mutex<Vec<Call>>>,
    fail_track: bool,
}

impl LocalVideoSource for FakeCamera {
    fn create_track(&mut self, name: &str) -> Result<LocalVideoTrack, MediaError> {
        self.calls.lock().unwrap().push(Call::CreateTrack(name.to_owned()));
        if self.fail_track {
            return Err(MediaError::TrackCreation("unsupported format".into()));
        }
        Ok(LocalVideoTrack {
            name: name.to_owned(),
        })
    }

    fn dispose_track(&mut self, track: &LocalVideoTrack) {
        self.calls
            .lock()
            .unwrap()
            .push(Call::DisposeTrack(track.name.clone()));
    }

    fn dispose(&mut self) {
        self.calls.lock().unwrap().push(Call::DisposeSource);
    }
}

struct FakePeerSession {
    calls: Arc<Mutex<Vec<Call>>>,
    events: PeerEventSender,
    remote_slot: Arc<Mutex<Option<Arc<FrameSlot>>>>,
    fail_set_remote: Arc<AtomicBool>,
}

impl FakePeerSession {
    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl PeerSession for FakePeerSession {
    fn initialize(&mut self) -> Result<(), MediaError> {
        self.record(Call::Initialize);
        Ok(())
    }

    fn add_video_transceiver(
        &mut self,
        direction: NegotiationDirection,
        local_track: Option<&LocalVideoTrack>,
    ) -> Result<(), MediaError> {
        self.record(Call::AddTransceiver(
            direction,
            local_track.map(|t| t.name.clone()),
        ));
        Ok(())
    }

    fn create_offer(&mut self) -> Result<(), MediaError> {
        self.record(Call::CreateOffer);
        self.events
            .send(PeerEvent::LocalSdpReady(SdpDescriptor::offer(LOCAL_OFFER)));
        Ok(())
    }

    fn create_answer(&mut self) -> Result<(), MediaError> {
        self.record(Call::CreateAnswer);
        self.events
            .send(PeerEvent::LocalSdpReady(SdpDescriptor::answer(LOCAL_ANSWER)));
        Ok(())
    }

    fn set_remote_description(&mut self, sdp: &SdpDescriptor) -> Result<(), MediaError> {
        self.record(Call::SetRemote(sdp.kind, sdp.content.clone()));
        if self.fail_set_remote.load(Ordering::SeqCst) {
            return Err(MediaError::Sdp("no common codec".into()));
        }
        Ok(())
    }

    fn add_ice_candidate(&mut self, candidate: &IceCandidateDescriptor) -> Result<(), MediaError> {
        self.record(Call::AddCandidate(candidate.content.clone()));
        Ok(())
    }

    fn attach_remote_video(
        &mut self,
        track: &RemoteTrackId,
        frames: Arc<FrameSlot>,
    ) -> Result<(), MediaError> {
        self.record(Call::AttachRemoteVideo(track.0.clone()));
        *self.remote_slot.lock().unwrap() = Some(frames);
        Ok(())
    }

    fn set_remote_audio_output(
        &mut self,
        track: &RemoteTrackId,
        enabled: bool,
    ) -> Result<(), MediaError> {
        if !enabled {
            self.record(Call::MuteAudio(track.0.clone()));
        }
        Ok(())
    }

    fn dispose(&mut self) {
        self.record(Call::DisposeSession);
    }
}

// ---------------------------------------------------------------- observer

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observed {
    Connected,
    Error { kind: &'static str, message: String },
}

pub struct RecordingObserver {
    tx: Mutex<Sender<Observed>>,
}

impl RecordingObserver {
    pub fn new() -> (Arc<Self>, Receiver<Observed>) {
        let (tx, rx) = mpsc::channel();
        (Arc::new(Self { tx: Mutex::new(tx) }), rx)
    }
}

pub fn error_kind(e: &SessionError) -> &'static str {
    match e {
        SessionError::Configuration(_) => "configuration",
        SessionError::Device(_) => "device",
        SessionError::SignalingConnect(_) => "signaling-connect",
        SessionError::Protocol(_) => "protocol",
        SessionError::Transport(_) => "transport",
        SessionError::Negotiation(_) => "negotiation",
        SessionError::AlreadyRunning => "already-running",
        SessionError::Cancelled => "cancelled",
    }
}

impl SessionObserver for RecordingObserver {
    fn on_connected(&self) {
        let _ = self.tx.lock().unwrap().send(Observed::Connected);
    }

    fn on_error(&self, error: &SessionError) {
        let _ = self.tx.lock().unwrap().send(Observed::Error {
            kind: error_kind(error),
            message: error.to_string(),
        });
    }
}

// ---------------------------------------------------------------- wiring

pub fn context() -> SignalingContext {
    SignalingContext::new("ws://signal.test/ws", "k-123", "room-1").unwrap()
}

pub struct Harness {
    pub facade: SessionFacade,
    pub engine: Arc<FakeEngine>,
    pub connector: Arc<MemoryConnector>,
    pub servers: Receiver<ServerEnd>,
    pub observed: Receiver<Observed>,
}

impl Harness {
    pub fn new() -> Self {
        let engine = FakeEngine::new();
        let (connector, servers) = MemoryConnector::new();
        let (observer, observed) = RecordingObserver::new();
        let facade = SessionFacade::new(
            Arc::clone(&engine) as Arc<dyn MediaEngine>,
            Arc::clone(&connector) as Arc<dyn SignalingConnector>,
            context(),
            observer,
            Arc::new(NoopLogSink),
        );
        Self {
            facade,
            engine,
            connector,
            servers,
            observed,
        }
    }

    /// Starts a session and returns the server end after consuming `register`.
    pub fn start(&self, direction: NegotiationDirection) -> ServerEnd {
        self.facade.try_start(direction).expect("start failed");
        let server = self.servers.recv_timeout(WAIT).expect("no connection");
        server.expect_type("register");
        server
    }

    pub fn next_observed(&self) -> Observed {
        self.observed.recv_timeout(WAIT).expect("observer not notified")
    }

    /// Polls until the facade reports `pred`.
    pub fn wait_state(&self, pred: impl Fn(roomlink::core::NegotiationState) -> bool) -> bool {
        let deadline = Instant::now() + WAIT;
        while Instant::now() < deadline {
            if pred(self.facade.state()) {
                return true;
            }
            thread::sleep(Duration::from_millis(2));
        }
        false
    }
}

pub fn stun_server() -> Value {
    json!({ "urls": ["stun:stun.test:3478"], "username": "", "credential": "" })
}

pub fn accept(is_exist_client: bool, ice_servers: Vec<Value>) -> Value {
    json!({
        "type": "accept",
        "connectionId": "conn-1",
        "isExistClient": is_exist_client,
        "isExistUser": is_exist_client,
        "isInitiator": !is_exist_client,
        "iceServers": ice_servers,
    })
}

/// Polls `pred` until it holds or `WAIT` elapses.
pub fn wait_until(pred: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + WAIT;
    while Instant::now() < deadline {
        if pred() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    pred()
}
