mod hardware;
mod signal;

pub use hardware::{SimulatedAdc, SimulatedInput};
pub use signal::{SignalShape, SyntheticSignal};
