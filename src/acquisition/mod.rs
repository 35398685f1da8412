pub mod clock;
pub mod sampler;
pub mod source;

pub use clock::{Clock, SystemClock, VirtualClock};
pub use sampler::{TimedBurst, UniformSampler};
pub use source::AnalogInput;
