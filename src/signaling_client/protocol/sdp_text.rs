//! Line-ending handling for SDP bodies crossing the wire.
//!
//! In memory an SDP always uses real `\r\n`. The escaped form replaces each
//! CRLF with the four characters `\`, `r`, `\`, `n`.

const CRLF: &str = "\r\n";
const ESCAPED_CRLF: &str = "\\r\\n";

/// Replaces every real CRLF with its escaped two-sequence form.
#[must_use]
pub fn escape_line_endings(sdp: &str) -> String {
    sdp.replace(CRLF, ESCAPED_CRLF)
}

/// Replaces every escaped `\r\n` sequence with a real CRLF.
#[must_use]
pub fn unescape_line_endings(wire: &str) -> String {
    wire.replace(ESCAPED_CRLF, CRLF)
}
