pub use rendezvous_core::model::{PeerId, SessionId};

pub mod model {
    pub use rendezvous_core::model::*;
}

pub mod codec {
    pub use rendezvous_core::codec::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use rendezvous_client::*;
}
