//! JSON wire codec for [`SignalMessage`].
//!
//! Decoding happens in two steps so that a missing or unrecognized `type`
//! tag is reported as its own error rather than a generic parse failure.

use crate::model::SignalMessage;
use bytes::Bytes;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("failed to encode message: {0}")]
    Encoding(String),

    #[error("failed to decode message: {reason}")]
    Decoding { reason: String },

    #[error("message has no 'type' tag")]
    MissingType,

    #[error("unknown message type '{tag}'")]
    UnknownType { tag: String },
}

impl CodecError {
    fn decoding(reason: impl Into<String>) -> Self {
        Self::Decoding {
            reason: reason.into(),
        }
    }
}

pub fn encode(msg: &SignalMessage) -> Result<Bytes, CodecError> {
    serde_json::to_vec(msg)
        .map(Bytes::from)
        .map_err(|e| CodecError::Encoding(e.to_string()))
}

pub fn decode(bytes: &[u8]) -> Result<SignalMessage, CodecError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| CodecError::decoding(e.to_string()))?;

    let Value::Object(ref fields) = value else {
        return Err(CodecError::decoding("payload is not a JSON object"));
    };

    let tag = match fields.get("type") {
        None | Some(Value::Null) => return Err(CodecError::MissingType),
        Some(Value::String(tag)) => tag,
        Some(other) => {
            return Err(CodecError::decoding(format!(
                "'type' must be a string, got {}",
                other
            )));
        }
    };

    if !SignalMessage::is_known_tag(tag) {
        return Err(CodecError::UnknownType { tag: tag.clone() });
    }

    serde_json::from_value(value).map_err(|e| CodecError::decoding(e.to_string()))
}
