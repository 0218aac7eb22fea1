use serde::{Deserialize, Serialize};

/// Which side of the offer/answer exchange the local peer plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Creates the offer once the join is acknowledged.
    #[default]
    Initiator,
    /// Waits for offers and answers them.
    Responder,
}
