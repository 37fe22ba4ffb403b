//! Infrared remote signal encoding.
//!
//! Turns a button press into the mark/space timeline of a consumer IR
//! protocol and samples the carrier inside a mark for display.

pub mod buttons;
#[cfg(feature = "config")]
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod frame;
pub mod protocol;
pub mod waveform;

pub use buttons::{ButtonBinding, ButtonMap};
#[cfg(feature = "config")]
pub use config::Config;
pub use encoder::{encode, generate_repeat_frame, Encoder, EventKind, Timeline, TimelineEvent, Transmission};
pub use error::Error;
pub use protocol::{ProtocolSpec, Registry};
pub use waveform::{sample_carrier, CarrierSamples, SamplerConfig, WaveformSample};
