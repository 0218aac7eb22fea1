
pub use mock_relay::*;
pub use mock_rtc::*;
pub use signal_helpers::*;
