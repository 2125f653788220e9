use std::fmt;

/// Which way video flows in this session. Fixed at start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationDirection {
    SendOnly,
    ReceiveOnly,
    SendReceive,
}

impl NegotiationDirection {
    /// Maps the user's send/receive choice; `None` when neither is selected.
    #[must_use]
    pub const fn from_send_recv(send: bool, receive: bool) -> Option<Self> {
        match (send, receive) {
            (true, true) => Some(Self::SendReceive),
            (true, false) => Some(Self::SendOnly),
            (false, true) => Some(Self::ReceiveOnly),
            (false, false) => None,
        }
    }

    /// True when a local camera track is needed.
    #[must_use]
    pub const fn sends(self) -> bool {
        matches!(self, Self::SendOnly | Self::SendReceive)
    }

    #[must_use]
    pub const fn receives(self) -> bool {
        matches!(self, Self::ReceiveOnly | Self::SendReceive)
    }
}

impl fmt::Display for NegotiationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SendOnly => "sendonly",
            Self::ReceiveOnly => "recvonly",
            Self::SendReceive => "sendrecv",
        })
    }
}
