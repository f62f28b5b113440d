//! NDJSON line decoding shared by both streams.

use serde::de::DeserializeOwned;

use crate::ProtocolError;

/// Decodes one line from a newline-delimited JSON stream.
///
/// Returns `Ok(None)` for blank lines — the platform sends those as
/// keep-alives every few seconds and they carry no payload. Non-blank
/// lines must parse as `T` or the line is reported as a decode error;
/// the caller decides whether to skip it (the dispatcher does) or to
/// propagate.
pub fn decode_line<T: DeserializeOwned>(
    line: &str,
) -> Result<Option<T>, ProtocolError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(line)?))
}
