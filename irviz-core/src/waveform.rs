use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::{Error, Timeline};

/// Carrier used by every supported protocol
pub const CARRIER_HZ: u32 = 38_000;
pub const DISPLAY_SAMPLE_RATE_HZ: u32 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveformSample {
    pub time_sec: f64,
    pub amplitude: f64,
}

/// Carrier samples over the start of a mark.
///
/// Finite and single pass; sample `i` is taken at `i / sample_rate_hz`.
#[derive(Debug)]
pub struct CarrierSamples {
    frequency_hz: f64,
    sample_rate_hz: f64,
    index: usize,
    count: usize,
}

impl Iterator for CarrierSamples {
    type Item = WaveformSample;

    fn next(&mut self) -> Option<WaveformSample> {
        if self.index >= self.count {
            return None;
        }

        let time_sec = self.index as f64 / self.sample_rate_hz;
        self.index += 1;

        Some(WaveformSample {
            time_sec,
            amplitude: (2.0 * PI * self.frequency_hz * time_sec).sin(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.count - self.index;
        (left, Some(left))
    }
}

impl ExactSizeIterator for CarrierSamples {}

/// Clamp into (0, 1]. NaN and non-positive values map to the smallest
/// positive fraction.
pub fn clamp_fraction(fraction: f64) -> f64 {
    if fraction.is_nan() || fraction <= 0.0 {
        f64::MIN_POSITIVE
    } else {
        fraction.min(1.0)
    }
}

/// Sample the carrier over `fraction` of the first mark of `timeline`.
///
/// At most `sample_cap` samples are produced, and at least one (the sample
/// at `t = 0`) unless the cap is zero. A sample rate that is not a positive
/// number yields no samples.
pub fn sample_carrier(
    timeline: &Timeline,
    frequency_hz: f64,
    sample_rate_hz: f64,
    fraction: f64,
    sample_cap: usize,
) -> Result<CarrierSamples, Error> {
    let mark = timeline.first_mark().ok_or(Error::EmptyTimeline)?;

    let window_us = f64::from(mark.duration_us) * clamp_fraction(fraction);

    let count = if sample_rate_hz.is_finite() && sample_rate_hz > 0.0 {
        ((window_us * sample_rate_hz / 1e6).floor() as usize)
            .max(1)
            .min(sample_cap)
    } else {
        0
    };

    Ok(CarrierSamples {
        frequency_hz,
        sample_rate_hz,
        index: 0,
        count,
    })
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct SamplerConfig {
    pub frequency_hz: u32,
    pub sample_rate_hz: u32,
    /// Share of the first mark to render
    pub fraction: f64,
    pub sample_cap: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        SamplerConfig {
            frequency_hz: CARRIER_HZ,
            sample_rate_hz: DISPLAY_SAMPLE_RATE_HZ,
            fraction: 0.1,
            sample_cap: 400,
        }
    }
}

impl SamplerConfig {
    pub fn sample(&self, timeline: &Timeline) -> Result<CarrierSamples, Error> {
        sample_carrier(
            timeline,
            f64::from(self.frequency_hz),
            f64::from(self.sample_rate_hz),
            self.fraction,
            self.sample_cap,
        )
    }
}
