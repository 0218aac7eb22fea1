mod connection_wrapper;
mod rtc_peer;
mod transport_config;
mod transport_event;

pub use connection_wrapper::*;
pub use rtc_peer::*;
pub use transport_config::*;
pub use transport_event::*;
