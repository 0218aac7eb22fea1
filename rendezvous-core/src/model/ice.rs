use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// A trickle ICE candidate as carried by the `candidate` message.
///
/// Serialized in the browser's `RTCIceCandidateInit` shape. On input the
/// candidate may also arrive as a JSON string wrapping that object, and
/// `sdpMLineIndex` may be a numeric string; both forms are normalized here.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidate {
    pub candidate: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sdp_mid: Option<String>,
    #[serde(rename = "sdpMLineIndex", skip_serializing_if = "Option::is_none")]
    pub sdp_m_line_index: Option<u16>,
}

impl IceCandidate {
    pub fn new(candidate: impl Into<String>, sdp_mid: impl Into<String>, index: u16) -> Self {
        Self {
            candidate: candidate.into(),
            sdp_mid: Some(sdp_mid.into()),
            sdp_m_line_index: Some(index),
        }
    }

    /// Both the media-line index and the mid are required to apply a candidate.
    pub fn is_complete(&self) -> bool {
        self.sdp_mid.is_some() && self.sdp_m_line_index.is_some()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CandidateRepr {
    Object(CandidateFields),
    Embedded(String),
}

#[derive(Deserialize)]
struct CandidateFields {
    candidate: String,
    #[serde(default, rename = "sdpMid")]
    sdp_mid: Option<String>,
    #[serde(default, rename = "sdpMLineIndex", deserialize_with = "lenient_index")]
    sdp_m_line_index: Option<u16>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IndexRepr {
    Number(u16),
    Text(String),
}

fn lenient_index<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<IndexRepr>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IndexRepr::Number(n)) => Ok(Some(n)),
        Some(IndexRepr::Text(s)) => s
            .trim()
            .parse::<u16>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid sdpMLineIndex '{}'", s))),
    }
}

impl From<CandidateFields> for IceCandidate {
    fn from(f: CandidateFields) -> Self {
        Self {
            candidate: f.candidate,
            sdp_mid: f.sdp_mid,
            sdp_m_line_index: f.sdp_m_line_index,
        }
    }
}

impl<'de> Deserialize<'de> for IceCandidate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match CandidateRepr::deserialize(deserializer)? {
            CandidateRepr::Object(fields) => Ok(fields.into()),
            CandidateRepr::Embedded(text) => serde_json::from_str::<CandidateFields>(&text)
                .map(Into::into)
                .map_err(|e| de::Error::custom(format!("invalid embedded candidate: {}", e))),
        }
    }
}
