pub mod adc;
pub mod clock;
pub mod serial_link;

pub use adc::{ADC_MAX, AnalogInput, Channel, SimulatedAdc};
pub use clock::{Clock, MonotonicClock};
pub use serial_link::{OutputTarget, list_ports};
