use std::fmt;

/// Wire-level decode/encode failures. All of them surface to the session owner
/// as a protocol error; none of them may take the process down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtoError {
    /// The frame is not a JSON object.
    InvalidJson(String),
    /// `type` is absent or not a string.
    MissingType,
    UnknownType(String),
    MissingField(&'static str),
    InvalidField {
        field: &'static str,
        reason: String,
    },
    /// The `accept` payload failed strict deserialization.
    InvalidAccept(String),
    Encode(String),
}

impl fmt::Display for ProtoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidJson(e) => write!(f, "Protocol Error (parse: {e})"),
            Self::MissingType => write!(f, "Protocol Error (type)"),
            Self::UnknownType(t) => write!(f, "Protocol Error (unknown type: {t})"),
            Self::MissingField(name) => write!(f, "Protocol Error (missing {name})"),
            Self::InvalidField { field, reason } => {
                write!(f, "Protocol Error (invalid {field}: {reason})")
            }
            Self::InvalidAccept(e) => write!(f, "Protocol Error (accept: {e})"),
            Self::Encode(e) => write!(f, "Protocol Error (encode: {e})"),
        }
    }
}

impl std::error::Error for ProtoError {}

impl From<serde_json::Error> for ProtoError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidJson(e.to_string())
    }
}
