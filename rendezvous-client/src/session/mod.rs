mod moderation;
mod session;
mod session_client;
mod session_command;
mod session_coordinator;
mod session_event;

pub use moderation::*;
pub use session::*;
pub use session_client::*;
pub use session_command::*;
pub use session_coordinator::*;
pub use session_event::*;
