use std::fmt;

/// Where one session is in the offer/answer exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationState {
    /// Nothing running; `start` is allowed.
    Idle,
    /// Registered with the signaling server, waiting for `accept`.
    AwaitingAccept,
    /// Peer session configured; exchanging SDP and candidates.
    Negotiating,
    Connected,
    /// Torn down after an error. `start` is allowed again.
    Closed,
}

impl NegotiationState {
    /// True while a session holds resources.
    #[must_use]
    pub const fn is_live(self) -> bool {
        matches!(
            self,
            Self::AwaitingAccept | Self::Negotiating | Self::Connected
        )
    }
}

impl fmt::Display for NegotiationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::AwaitingAccept => "waiting",
            Self::Negotiating => "negotiating",
            Self::Connected => "running",
            Self::Closed => "closed",
        })
    }
}
