pub mod data;

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use csv::{Terminator, WriterBuilder};
use data::{HEADER, SampleRecord};
use tracing::{debug, info, warn};

use crate::config::AcquisitionConfig;
use crate::devices::{ADC_MAX, AnalogInput, Channel, Clock};
use crate::error::Result;

/// Take one sample: timestamp first, then the channels in fixed order.
pub fn sample<A: AnalogInput, C: Clock>(input: &mut A, clock: &C) -> SampleRecord {
    let timestamp = clock.elapsed_ms();
    let mut raw = [0u16; 3];
    for (slot, channel) in raw.iter_mut().zip(Channel::ALL) {
        *slot = input.read(channel);
        if *slot > ADC_MAX {
            warn!(
                "{} on A{} read {} above converter range, passing through",
                channel.label(),
                channel.pin(),
                *slot
            );
        }
    }
    SampleRecord::from_raw(timestamp, raw)
}

/// Run the acquisition loop against an already established output stream.
///
/// Waits out the settle delay, writes the header, then emits one record per
/// cycle until `stop` is raised or `max_cycles` records have been written.
/// Returns the number of records written.
pub fn run_acquisition<A, C, W>(
    input: &mut A,
    clock: &C,
    sink: W,
    config: &AcquisitionConfig,
    stop: &AtomicBool,
) -> Result<u64>
where
    A: AnalogInput,
    C: Clock,
    W: Write,
{
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::CRLF)
        .from_writer(sink);

    info!("Waiting {} ms for the receiver to settle", config.settle_ms);
    clock.sleep(config.settle_delay());
    if stop.load(Ordering::Relaxed) {
        info!("Stopped before the header was written");
        return Ok(0);
    }

    writer.write_record(HEADER)?;
    writer.flush()?;
    info!(
        "Acquisition started: period {} ms, limit {:?} cycles",
        config.period_ms, config.max_cycles
    );

    let mut written = 0u64;
    while !stop.load(Ordering::Relaxed) {
        if config.max_cycles.is_some_and(|max| written >= max) {
            break;
        }

        let record = sample(input, clock);
        writer.serialize(record)?;
        writer.flush()?;
        written += 1;
        debug!("Record {}: {:?}", written, record);

        // Work time is not subtracted, so the cadence drifts slightly.
        clock.sleep(config.period());
    }

    info!("Acquisition stopped after {} records", written);
    Ok(written)
}
