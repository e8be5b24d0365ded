use serde::{Serialize, Serializer};

use crate::devices::ADC_MAX;

/// Converter reference voltage.
pub const REFERENCE_VOLTAGE: f64 = 5.0;

/// Column names, in emission order.
pub const HEADER: [&str; 4] = ["Timestamp(ms)", "Pressure(V)", "Magnetic(V)", "Temp(V)"];

/// Linear transfer function from converter code to volts. No offset, no
/// clamping: codes above `ADC_MAX` scale past the reference.
pub fn voltage(raw: u16) -> f64 {
    f64::from(raw) * (REFERENCE_VOLTAGE / f64::from(ADC_MAX))
}

pub fn format_voltage(volts: f64) -> String {
    format!("{:.3}", volts)
}

/// One row of the output stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SampleRecord {
    #[serde(rename = "Timestamp(ms)")]
    pub timestamp: u64, // ms since start
    #[serde(rename = "Pressure(V)", serialize_with = "three_decimals")]
    pub pressure_voltage: f64,
    #[serde(rename = "Magnetic(V)", serialize_with = "three_decimals")]
    pub magnetic_voltage: f64,
    #[serde(rename = "Temp(V)", serialize_with = "three_decimals")]
    pub temperature_voltage: f64,
}

impl SampleRecord {
    /// Build a record from raw codes ordered pressure, magnetic, temperature.
    pub fn from_raw(timestamp: u64, raw: [u16; 3]) -> Self {
        SampleRecord {
            timestamp,
            pressure_voltage: voltage(raw[0]),
            magnetic_voltage: voltage(raw[1]),
            temperature_voltage: voltage(raw[2]),
        }
    }
}

fn three_decimals<S: Serializer>(volts: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_voltage(*volts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::Channel;

    #[test]
    fn conversion_is_linear_over_converter_range() {
        for raw in 0..=ADC_MAX {
            let expected = f64::from(raw) * 5.0 / 1023.0;
            assert!((voltage(raw) - expected).abs() < 1e-6, "raw {raw}");
        }
    }

    #[test]
    fn boundary_codes() {
        assert_eq!(format_voltage(voltage(0)), "0.000");
        assert_eq!(format_voltage(voltage(1023)), "5.000");
    }

    #[test]
    fn out_of_range_code_passes_through() {
        assert_eq!(format_voltage(voltage(2046)), "10.000");
    }

    #[test]
    fn reference_example() {
        let record = SampleRecord::from_raw(0, [512, 256, 1023]);
        // 512 * 5 / 1023 = 2.50244..., which rounds down
        assert_eq!(format_voltage(record.pressure_voltage), "2.502");
        assert_eq!(format_voltage(record.magnetic_voltage), "1.251");
        assert_eq!(format_voltage(record.temperature_voltage), "5.000");
    }

    #[test]
    fn header_follows_channel_labels() {
        let labels: Vec<&str> = Channel::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(&HEADER[1..], labels.as_slice());
    }

    #[test]
    fn record_serializes_as_csv_row() {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        writer
            .serialize(SampleRecord::from_raw(1234, [512, 256, 1023]))
            .unwrap();
        let bytes = writer.into_inner().unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "1234,2.502,1.251,5.000\n");
    }
}
