pub mod backend;
#[cfg(feature = "device")]
pub mod device;
pub mod dsp;
pub mod stream;

pub use backend::{ClickSink, NullClick, QueuedClick};
#[cfg(feature = "device")]
pub use device::DeviceClick;
pub use dsp::ClickTone;
pub use stream::{click_channel, ClickFeeder, ClickPlayback};
