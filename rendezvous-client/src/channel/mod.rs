mod channel;
mod channel_registry;

pub use channel::*;
pub use channel_registry::*;
