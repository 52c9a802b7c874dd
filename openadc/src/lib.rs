//! OpenADC capture buffer decoding
//!
//! Turns the raw bytes read back from an OpenADC style capture board into
//! normalised trace samples.
//!
//! # Wire format
//!
//! A capture is one sync byte (0xAC) followed by 32-bit big-endian words. Each
//! word carries three 10-bit samples, lowest bits first, and a 2-bit trigger
//! marker in the top bits. The marker is 3 until the trigger fires; after that
//! it gives the position of the trigger within the word. The decoded trace
//! starts at the trigger sample. Each sample is `raw / 1024 - 0.5`.
//!
//! Other hardware revisions can be described with a [`WireFormat`].

pub mod adc;
pub mod format;
pub mod word;

pub use adc::{Adc, Capture};
pub use format::{WireFormat, OPENADC};

/// Decode an OpenADC capture buffer into samples in the range `[-0.5, 0.5)`.
pub fn decode(buffer: &[u8]) -> Vec<f64> {
    Adc::default().process_trace_data(buffer)
}
