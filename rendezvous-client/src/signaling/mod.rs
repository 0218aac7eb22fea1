mod connection_event;
mod connection_state;
mod dialer;
mod retry_policy;
mod signaling_output;
mod signaling_transport;
mod ws_dialer;

pub use connection_event::*;
pub use connection_state::*;
pub use dialer::*;
pub use retry_policy::*;
pub use signaling_output::*;
pub use signaling_transport::*;
pub use ws_dialer::*;
