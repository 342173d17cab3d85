//! Helpers for `data:<mime>;base64,<payload>` strings.

use crate::error::{Result, StudioError};
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Build a data URI from a MIME type and an already base64-encoded payload.
pub fn from_base64(mime_type: &str, data: &str) -> String {
    format!("data:{};base64,{}", mime_type, data)
}

pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> String {
    from_base64(mime_type, &STANDARD.encode(bytes))
}

/// Split a base64 data URI into its MIME type and encoded payload.
pub fn split(uri: &str) -> Result<(&str, &str)> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| StudioError::InvalidDataUri("missing data: scheme".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| StudioError::InvalidDataUri("missing payload separator".into()))?;
    let mime_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| StudioError::InvalidDataUri("payload is not base64".into()))?;

    if mime_type.is_empty() {
        return Err(StudioError::InvalidDataUri("empty MIME type".into()));
    }

    Ok((mime_type, payload))
}

/// Decode a base64 data URI into its MIME type and raw bytes.
pub fn decode(uri: &str) -> Result<(String, Vec<u8>)> {
    let (mime_type, payload) = split(uri)?;
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| StudioError::InvalidDataUri(e.to_string()))?;
    Ok((mime_type.to_string(), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_mime_and_payload_verbatim() {
        assert_eq!(
            from_base64("image/png", "iVBORw0KGgo="),
            "data:image/png;base64,iVBORw0KGgo="
        );
    }

    #[test]
    fn decodes_bytes() {
        let uri = from_bytes("image/jpeg", &[0xff, 0xd8, 0xff]);
        let (mime, bytes) = decode(&uri).unwrap();
        assert_eq!(mime, "image/jpeg");
        assert_eq!(bytes, vec![0xff, 0xd8, 0xff]);
    }

    #[test]
    fn rejects_remote_urls_and_plain_payloads() {
        assert!(split("https://example.com/a.png").is_err());
        assert!(split("data:text/plain,hello").is_err());
        assert!(split("data:;base64,AAAA").is_err());
        assert!(decode("data:image/png;base64,@@@").is_err());
    }
}
