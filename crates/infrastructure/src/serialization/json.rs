//! JSON encoding for files the client writes to disk.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Error type for serialization operations.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// Encoding failed.
    #[error("could not encode JSON: {0}")]
    Encode(#[source] serde_json::Error),

    /// Decoding failed.
    #[error("could not decode JSON: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Encodes a value as two-space indented JSON with a trailing newline.
///
/// Map keys keep the order of the source type, so `BTreeMap` documents come
/// out sorted and rewrites of unchanged data are byte-identical.
///
/// # Errors
///
/// Returns an error if the value cannot be encoded.
pub fn to_json_stable_bytes<T: Serialize + ?Sized>(
    value: &T,
) -> Result<Vec<u8>, SerializationError> {
    let mut buffer = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"  "));
    value
        .serialize(&mut serializer)
        .map_err(SerializationError::Encode)?;
    buffer.push(b'\n');
    Ok(buffer)
}

/// Decodes JSON bytes, pretty-printed or minified.
///
/// # Errors
///
/// Returns an error if the bytes are not valid JSON for `T`.
pub fn from_json_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializationError> {
    serde_json::from_slice(bytes).map_err(SerializationError::Decode)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    #[test]
    fn test_keys_sorted_with_trailing_newline() {
        let mut session = BTreeMap::new();
        session.insert("refreshToken", "r1");
        session.insert("accessToken", "a1");

        let bytes = to_json_stable_bytes(&session).unwrap();

        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "{\n  \"accessToken\": \"a1\",\n  \"refreshToken\": \"r1\"\n}\n"
        );
    }

    #[test]
    fn test_decode_minified() {
        let session: BTreeMap<String, String> =
            from_json_bytes(br#"{"accessToken":"a1"}"#).unwrap();
        assert_eq!(session["accessToken"], "a1");
    }

    #[test]
    fn test_decode_rejects_wrong_shape() {
        let result = from_json_bytes::<BTreeMap<String, String>>(b"[1, 2]");
        assert!(matches!(result, Err(SerializationError::Decode(_))));
    }
}
