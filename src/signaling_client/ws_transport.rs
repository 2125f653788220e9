use std::{
    io,
    net::TcpStream,
    sync::Arc,
    time::Duration,
};

use rustls::ClientConfig;
use tungstenite::{
    Connector, Message, WebSocket, client::IntoClientRequest, stream::MaybeTlsStream,
};

use crate::{
    config::Config,
    signaling_client::{
        signaling_client_error::SignalingClientError,
        transport::{SignalingConnector, SignalingTransport, TransportRead},
    },
    tls_utils::signaling_tls_config,
};

/// How long one read may block before the network thread checks its command queue.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(20);

type WsStream = WebSocket<MaybeTlsStream<TcpStream>>;

/// Blocking WebSocket connection (`ws://` or `wss://`).
pub struct WsTransport {
    ws: WsStream,
}

impl SignalingTransport for WsTransport {
    fn read(&mut self) -> Result<TransportRead, SignalingClientError> {
        match self.ws.read() {
            Ok(Message::Text(text)) => Ok(TransportRead::Text(text)),
            Ok(Message::Close(frame)) => Ok(TransportRead::Closed(
                frame.map(|f| f.reason.to_string()).filter(|r| !r.is_empty()),
            )),
            // binary frames are not part of the protocol; ping/pong is answered by tungstenite
            Ok(_) => Ok(TransportRead::Idle),
            Err(tungstenite::Error::Io(ref e))
                if e.kind() == io::ErrorKind::WouldBlock || e.kind() == io::ErrorKind::TimedOut =>
            {
                Ok(TransportRead::Idle)
            }
            Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                Ok(TransportRead::Closed(None))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write_text(&mut self, text: &str) -> Result<(), SignalingClientError> {
        self.ws.send(Message::Text(text.to_owned()))?;
        Ok(())
    }

    fn close(&mut self) {
        let _ = self.ws.close(None);
        let _ = self.ws.flush();
    }
}

/// Opens [`WsTransport`]s, optionally with a custom rustls configuration.
#[derive(Clone)]
pub struct WsConnector {
    tls: Option<Arc<ClientConfig>>,
    read_timeout: Duration,
}

impl Default for WsConnector {
    fn default() -> Self {
        Self {
            tls: None,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

impl WsConnector {
    #[must_use]
    pub fn new(tls: Option<Arc<ClientConfig>>) -> Self {
        Self {
            tls,
            ..Self::default()
        }
    }

    /// TLS from `[TLS] signaling_ca`, read timeout from
    /// `[Signaling] read_timeout_ms` (default 20).
    ///
    /// # Errors
    /// An unreadable CA file, or a timeout that is not a positive integer.
    pub fn from_config(config: &Config) -> io::Result<Self> {
        let connector = Self::new(signaling_tls_config(config)?);
        let Some(raw) = config.get_non_empty("Signaling", "read_timeout_ms") else {
            return Ok(connector);
        };
        match raw.parse::<u64>() {
            Ok(ms) if ms > 0 => Ok(connector.with_read_timeout(Duration::from_millis(ms))),
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("read_timeout_ms must be a positive integer, got {raw:?}"),
            )),
        }
    }

    #[must_use]
    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    fn open(&self, url: &str) -> Result<WsStream, SignalingClientError> {
        let request = url
            .into_client_request()
            .map_err(|e| SignalingClientError::Connect(format!("{url}: {e}")))?;

        let Some(tls) = &self.tls else {
            let (ws, _response) = tungstenite::connect(request)?;
            return Ok(ws);
        };

        let uri = request.uri();
        let host = uri
            .host()
            .ok_or_else(|| SignalingClientError::Connect(format!("{url}: missing host")))?
            .to_string();
        let port = uri
            .port_u16()
            .unwrap_or(if uri.scheme_str() == Some("wss") { 443 } else { 80 });
        let stream = TcpStream::connect((host.as_str(), port))?;

        let (ws, _response) = tungstenite::client_tls_with_config(
            request,
            stream,
            None,
            Some(Connector::Rustls(Arc::clone(tls))),
        )
        .map_err(|e| SignalingClientError::Connect(e.to_string()))?;
        Ok(ws)
    }
}

impl SignalingConnector for WsConnector {
    fn connect(&self, url: &str) -> Result<Box<dyn SignalingTransport>, SignalingClientError> {
        let ws = self.open(url)?;
        let timeout = Some(self.read_timeout);
        match ws.get_ref() {
            MaybeTlsStream::Plain(tcp) => tcp.set_read_timeout(timeout)?,
            MaybeTlsStream::Rustls(tls) => tls.get_ref().set_read_timeout(timeout)?,
            _ => {}
        }
        Ok(Box::new(WsTransport { ws }))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn read_timeout_defaults_when_not_configured() {
        let connector = WsConnector::from_config(&Config::empty()).unwrap();
        assert_eq!(connector.read_timeout(), DEFAULT_READ_TIMEOUT);
    }

    #[test]
    fn read_timeout_is_taken_from_config() {
        let cfg = Config::parse("[Signaling]\nread_timeout_ms = 75\n");
        let connector = WsConnector::from_config(&cfg).unwrap();
        assert_eq!(connector.read_timeout(), Duration::from_millis(75));
    }

    #[test]
    fn invalid_read_timeout_is_rejected() {
        for raw in ["0", "-5", "soon"] {
            let cfg = Config::parse(&format!("[Signaling]\nread_timeout_ms = {raw}\n"));
            let err = WsConnector::from_config(&cfg).err().expect("rejected");
            assert_eq!(err.kind(), io::ErrorKind::InvalidInput, "{raw}");
        }
    }

    #[test]
    fn missing_ca_file_fails_before_timeout_is_read() {
        let cfg = Config::parse(
            "[TLS]\nsignaling_ca = /no/such/ca.pem\n[Signaling]\nread_timeout_ms = 75\n",
        );
        assert!(WsConnector::from_config(&cfg).is_err());
    }

    #[test]
    fn malformed_url_fails_before_touching_the_network() {
        let err = WsConnector::default().connect("not a url").err();
        assert!(matches!(err, Some(SignalingClientError::Connect(_))));
    }

    #[test]
    fn refused_connection_is_reported() {
        // port 9 (discard) is essentially never listening on loopback
        let connector = WsConnector::default();
        assert!(connector.connect("ws://127.0.0.1:9/ws").is_err());
    }
}
