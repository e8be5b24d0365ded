use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

/// Highest code a 10-bit converter produces.
pub const ADC_MAX: u16 = 1023;

/// The three sensor inputs, in the order they are sampled and emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Pressure,
    Magnetic,
    Temperature,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Pressure, Channel::Magnetic, Channel::Temperature];

    /// Analog pin the sensor is wired to.
    pub fn pin(self) -> u8 {
        match self {
            Channel::Pressure => 0,    // A0, pressure transducer
            Channel::Magnetic => 1,    // A1, hall-effect sensor
            Channel::Temperature => 2, // A2, thermistor divider
        }
    }

    /// Column name in the output header.
    pub fn label(self) -> &'static str {
        match self {
            Channel::Pressure => "Pressure(V)",
            Channel::Magnetic => "Magnetic(V)",
            Channel::Temperature => "Temp(V)",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// A source of raw analog readings.
///
/// Reads cannot fail: a disconnected sensor just yields whatever the
/// converter sees on the pin.
pub trait AnalogInput {
    fn read(&mut self, channel: Channel) -> u16;
}

/// Host stand-in for the sensor board: each channel sits at a baseline code
/// and jitters by up to `noise` counts per read.
pub struct SimulatedAdc {
    baselines: [u16; 3],
    noise: u16,
    rng: StdRng,
}

impl SimulatedAdc {
    pub fn new(baselines: [u16; 3], noise: u16) -> Self {
        info!("Initializing simulated ADC with baselines {:?}, noise ±{} counts", baselines, noise);
        Self::with_rng(baselines, noise, StdRng::from_entropy())
    }

    /// Deterministic variant, same seed gives the same reading sequence.
    pub fn with_seed(baselines: [u16; 3], noise: u16, seed: u64) -> Self {
        Self::with_rng(baselines, noise, StdRng::seed_from_u64(seed))
    }

    fn with_rng(baselines: [u16; 3], noise: u16, rng: StdRng) -> Self {
        SimulatedAdc {
            baselines,
            noise,
            rng,
        }
    }
}

impl AnalogInput for SimulatedAdc {
    fn read(&mut self, channel: Channel) -> u16 {
        let base = i32::from(self.baselines[channel.index()]);
        let noise = i32::from(self.noise);
        let offset = if noise == 0 {
            0
        } else {
            self.rng.gen_range(-noise..=noise)
        };
        (base + offset).clamp(0, i32::from(ADC_MAX)) as u16
    }
}
