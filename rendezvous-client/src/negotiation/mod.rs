mod negotiation;
mod negotiation_phase;
mod role;

pub use negotiation::*;
pub use negotiation_phase::*;
pub use role::*;
