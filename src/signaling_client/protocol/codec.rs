use serde_json::{Map, Value};

use super::{
    constants::{
        DEFAULT_SDP_MID, DEFAULT_SDP_MLINE_INDEX, TYPE_ACCEPT, TYPE_ANSWER, TYPE_CANDIDATE,
        TYPE_OFFER, TYPE_PING,
    },
    errors::ProtoError,
    msg::{InboundMsg, OutboundMsg},
    sdp_text::unescape_line_endings,
    types::{AcceptPayload, IceCandidateDescriptor, SdpDescriptor, SdpKind},
};

/// Serializes an outbound message to one text frame.
///
/// # Errors
/// [`ProtoError::Encode`] if serialization fails.
pub fn encode_outbound(msg: &OutboundMsg<'_>) -> Result<String, ProtoError> {
    serde_json::to_string(msg).map_err(|e| ProtoError::Encode(e.to_string()))
}

/// Decodes one inbound text frame.
///
/// # Errors
/// Any structural problem: invalid JSON, missing or unknown `type`, a candidate
/// without `candidate`, an SDP without `sdp`, or an `accept` payload that does
/// not deserialize.
pub fn decode_inbound(text: &str) -> Result<InboundMsg, ProtoError> {
    let root: Value = serde_json::from_str(text)?;
    let obj = root
        .as_object()
        .ok_or_else(|| ProtoError::InvalidJson("top level is not an object".into()))?;

    let ty = obj
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ProtoError::MissingType)?;

    match ty {
        TYPE_CANDIDATE => decode_candidate(obj).map(InboundMsg::Candidate),
        TYPE_OFFER | TYPE_ANSWER => {
            let kind = SdpKind::from_type(ty).ok_or_else(|| ProtoError::UnknownType(ty.into()))?;
            decode_sdp(obj, kind).map(InboundMsg::Sdp)
        }
        TYPE_ACCEPT => serde_json::from_value::<AcceptPayload>(root.clone())
            .map(InboundMsg::Accept)
            .map_err(|e| ProtoError::InvalidAccept(e.to_string())),
        TYPE_PING => Ok(InboundMsg::Ping),
        other => Err(ProtoError::UnknownType(other.to_string())),
    }
}

fn decode_sdp(obj: &Map<String, Value>, kind: SdpKind) -> Result<SdpDescriptor, ProtoError> {
    let sdp = obj
        .get("sdp")
        .and_then(Value::as_str)
        .ok_or(ProtoError::MissingField("sdp"))?;
    Ok(SdpDescriptor {
        kind,
        content: unescape_line_endings(sdp),
    })
}

fn decode_candidate(obj: &Map<String, Value>) -> Result<IceCandidateDescriptor, ProtoError> {
    // `ice` is normally an object; some servers forward it as a JSON string.
    let ice = match obj.get("ice") {
        Some(Value::Object(map)) => map.clone(),
        Some(Value::String(s)) => match serde_json::from_str::<Value>(s)? {
            Value::Object(map) => map,
            _ => {
                return Err(ProtoError::InvalidField {
                    field: "ice",
                    reason: "not an object".into(),
                });
            }
        },
        Some(_) => {
            return Err(ProtoError::InvalidField {
                field: "ice",
                reason: "not an object".into(),
            });
        }
        None => return Err(ProtoError::MissingField("ice")),
    };

    let sdp_mid = match ice.get("sdpMid") {
        None | Some(Value::Null) => DEFAULT_SDP_MID.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    let sdp_mline_index = match ice.get("sdpMLineIndex") {
        None | Some(Value::Null) => DEFAULT_SDP_MLINE_INDEX,
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| ProtoError::InvalidField {
                field: "sdpMLineIndex",
                reason: format!("expected a non-negative integer, got {v}"),
            })?,
    };

    let content = ice
        .get("candidate")
        .and_then(Value::as_str)
        .ok_or(ProtoError::MissingField("candidate"))?
        .to_string();

    Ok(IceCandidateDescriptor {
        sdp_mid,
        sdp_mline_index,
        content,
    })
}
