use anyhow::{bail, Result};

/// Description of how the capture hardware lays out samples on the wire.
///
/// A capture buffer is `header_bytes` of header followed by a run of
/// `word_bytes` big-endian words. Each word packs `samples_per_word` registers
/// of `sample_bits` each, lowest bits first, with `marker_bits` of status at the
/// very top of the word:
///
/// ```text
///  MSB                                                    LSB
/// | marker | unused | sample N-1 | ... | sample 1 | sample 0 |
/// ```
///
/// The marker is all ones while the trigger has not fired. The first word with
/// any other marker value `m` contains the trigger at sample `m` of that word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WireFormat {
    /// Expected value of the first header byte, if the format has one.
    pub sync_byte: Option<u8>,
    /// Number of bytes skipped before the first word.
    pub header_bytes: usize,
    pub word_bytes: usize,
    /// Width of one raw sample register.
    pub sample_bits: u32,
    pub samples_per_word: usize,
    /// Width of the trigger marker at the top of each word. 0 disables trigger
    /// alignment.
    pub marker_bits: u32,
}

/// The OpenADC capture format: a 0xAC sync byte then 32-bit words holding three
/// 10-bit samples and a 2-bit trigger marker.
pub const OPENADC: WireFormat = WireFormat {
    sync_byte: Some(0xAC),
    header_bytes: 1,
    word_bytes: 4,
    sample_bits: 10,
    samples_per_word: 3,
    marker_bits: 2,
};

impl Default for WireFormat {
    fn default() -> Self {
        OPENADC
    }
}

impl WireFormat {
    /// Check that samples and marker actually fit in a word.
    pub fn validate(&self) -> Result<()> {
        if self.word_bytes == 0 || self.word_bytes > 8 {
            bail!(
                "Invalid word size {} bytes (must be 1-8)",
                self.word_bytes
            );
        }
        if self.sample_bits == 0 || self.sample_bits > 16 {
            bail!(
                "Invalid sample width {} bits (must be 1-16)",
                self.sample_bits
            );
        }
        if self.samples_per_word == 0 {
            bail!("Words must contain at least one sample");
        }
        if self.marker_bits > 8 {
            bail!(
                "Invalid marker width {} bits (must be at most 8)",
                self.marker_bits
            );
        }
        let used_bits = self.sample_bits as u64 * self.samples_per_word as u64
            + self.marker_bits as u64;
        if used_bits > self.word_bits() as u64 {
            bail!(
                "{} samples of {} bits plus a {} bit marker need {} bits but words are only {} bits",
                self.samples_per_word,
                self.sample_bits,
                self.marker_bits,
                used_bits,
                self.word_bits()
            );
        }
        if self.sync_byte.is_some() && self.header_bytes == 0 {
            bail!("A sync byte is set but the header is empty");
        }
        Ok(())
    }

    pub fn word_bits(&self) -> u32 {
        self.word_bytes as u32 * 8
    }

    /// Marker value meaning "trigger not seen yet" (all marker bits set).
    ///
    /// # Panics
    ///
    /// May panic if the format does not pass [`WireFormat::validate`].
    pub fn idle_marker(&self) -> u64 {
        (1u64 << self.marker_bits) - 1
    }

    /// Number of complete words in a buffer of `len` bytes.
    pub fn word_count(&self, len: usize) -> usize {
        len.saturating_sub(self.header_bytes) / self.word_bytes
    }

    /// Upper bound on the samples decoded from `len` bytes, reached when the
    /// trigger is at the very first sample.
    pub fn max_samples(&self, len: usize) -> usize {
        self.word_count(len) * self.samples_per_word
    }
}
