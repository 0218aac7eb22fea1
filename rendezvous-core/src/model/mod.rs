mod description;
mod ice;
mod peer;
mod session;
mod signaling;

pub use description::{SdpKind, SessionDescription};
pub use ice::IceCandidate;
pub use peer::PeerId;
pub use session::SessionId;
pub use signaling::SignalMessage;
