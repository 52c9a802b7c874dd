use crate::{
    format::WireFormat,
    word::{unpack_word, word_marker},
};

use anyhow::{Context, Result};
use byteorder::{BigEndian, ByteOrder};
use log::{debug, info, warn};

/// A decoded capture buffer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Capture {
    /// Normalised samples starting at the trigger.
    pub samples: Vec<f64>,
    /// Index of the trigger sample counted from the first word of the buffer.
    /// None if the trigger was never seen or the format has no marker.
    pub trigger: Option<usize>,
    /// Whether the header started with the expected sync byte. Always true for
    /// formats without one.
    pub sync_ok: bool,
    /// Trailing bytes that did not make up a whole word.
    pub discarded_bytes: usize,
}

impl Capture {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }

    /// Fit the trace to the number of samples that was requested from the
    /// hardware, cutting it short or filling the end with `pad` (usually NaN).
    pub fn padded(self, len: usize, pad: f64) -> Vec<f64> {
        let mut samples = self.samples;
        samples.resize(len, pad);
        samples
    }
}

/// Decoder for raw ADC capture buffers. It holds no state besides the wire
/// format, so one instance can be shared between threads freely.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Adc {
    format: WireFormat,
}

impl Adc {
    pub fn new(format: WireFormat) -> Result<Self> {
        format.validate().context("Invalid ADC wire format")?;
        Ok(Self { format })
    }

    pub fn format(&self) -> &WireFormat {
        &self.format
    }

    /// Decode a capture buffer into normalised samples, starting at the
    /// trigger. Incomplete trailing words are dropped; this never fails.
    pub fn process_trace_data(&self, data: &[u8]) -> Vec<f64> {
        self.decode_capture(data).samples
    }

    pub fn decode_capture(&self, data: &[u8]) -> Capture {
        let format = &self.format;

        let (header, body) = data.split_at(format.header_bytes.min(data.len()));

        let sync_ok = match (format.sync_byte, header.first()) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(expected), Some(&actual)) => {
                if actual != expected {
                    warn!("Unexpected sync byte 0x{actual:02x} (expected 0x{expected:02x})");
                }
                actual == expected
            }
        };

        let words = body.chunks_exact(format.word_bytes);
        let discarded_bytes = words.remainder().len();

        let mut samples = Vec::with_capacity(format.max_samples(data.len()));
        let mut trigger = None;

        for (index, word) in words.enumerate() {
            let word = BigEndian::read_uint(word, format.word_bytes);

            // Only the first marker counts.
            if trigger.is_none() && format.marker_bits != 0 {
                let marker = word_marker(word, format);
                if marker != format.idle_marker() {
                    trigger = Some(index * format.samples_per_word + marker as usize);
                }
            }

            samples.extend(
                unpack_word(word, format)
                    .into_iter()
                    .map(|raw| raw.normalize(format.sample_bits)),
            );
        }

        let start = match trigger {
            Some(t) => {
                debug!(
                    "Trigger at sample {t} of {}, {discarded_bytes} trailing bytes discarded",
                    samples.len()
                );
                t
            }
            None if format.marker_bits == 0 => 0,
            None => {
                if !samples.is_empty() {
                    info!(
                        "No trigger marker in {} words; capture is empty",
                        samples.len() / format.samples_per_word
                    );
                }
                samples.len()
            }
        };

        // The trigger may point past the end if it is in a word that was cut off.
        samples.drain(..start.min(samples.len()));

        Capture {
            samples,
            trigger,
            sync_ok,
            discarded_bytes,
        }
    }
}
