use crate::format::WireFormat;
use derive_more::{From, Into};
use tinyvec::TinyVec;

/// A raw, unnormalised ADC register value.
#[derive(From, Into, Debug, Default, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct RawSample(pub u16);

impl RawSample {
    /// Re-centre around zero: `raw / 2^bits - 0.5`. Both steps are exact in
    /// an f64 for any register up to 16 bits.
    pub fn normalize(self, bits: u32) -> f64 {
        self.0 as f64 / (1u32 << bits) as f64 - 0.5
    }
}

/// The samples in one word. Every format in use has at most 4 per word so
/// they stay on the stack.
pub type WordSamples = TinyVec<[RawSample; 4]>;

fn sample_mask(format: &WireFormat) -> u64 {
    (1u64 << format.sample_bits) - 1
}

/// Extract the sample registers from a word, in capture order (lowest bits
/// first).
///
/// # Panics
///
/// May panic if `format` does not pass [`WireFormat::validate`].
pub fn unpack_word(word: u64, format: &WireFormat) -> WordSamples {
    let mask = sample_mask(format);
    (0..format.samples_per_word)
        .map(|i| {
            let shift = i as u32 * format.sample_bits;
            RawSample(((word >> shift) & mask) as u16)
        })
        .collect()
}

/// Extract the marker bits from the top of a word. Always 0 when the format
/// has no marker.
///
/// # Panics
///
/// May panic if `format` does not pass [`WireFormat::validate`].
pub fn word_marker(word: u64, format: &WireFormat) -> u64 {
    if format.marker_bits == 0 {
        return 0;
    }
    (word >> (format.word_bits() - format.marker_bits)) & format.idle_marker()
}

// Decoding never needs this. It is used to build test captures and by the
// fuzzer.

/// Pack samples and a marker into a word. Samples beyond `samples_per_word`
/// are ignored and values are masked to their field width.
///
/// # Panics
///
/// May panic if `format` does not pass [`WireFormat::validate`].
pub fn pack_word(samples: &[RawSample], marker: u64, format: &WireFormat) -> u64 {
    let mask = sample_mask(format);
    let mut word = 0;
    for (i, sample) in samples.iter().take(format.samples_per_word).enumerate() {
        word |= (sample.0 as u64 & mask) << (i as u32 * format.sample_bits);
    }
    if format.marker_bits != 0 {
        word |= (marker & format.idle_marker()) << (format.word_bits() - format.marker_bits);
    }
    word
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::format::OPENADC;

    fn raw(values: &[u16]) -> Vec<RawSample> {
        values.iter().copied().map(RawSample::from).collect()
    }

    /// Words taken from a real capture, split by hand.
    #[test]
    fn test_manual_examples() {
        // Idle marker before the trigger.
        let word = 0xe748ee09;
        assert_eq!(word_marker(word, &OPENADC), 3);
        assert_eq!(unpack_word(word, &OPENADC).as_slice(), raw(&[521, 571, 628]));

        // Trigger at the third sample.
        let word = 0xa1f9221b;
        assert_eq!(word_marker(word, &OPENADC), 2);
        assert_eq!(unpack_word(word, &OPENADC).as_slice(), raw(&[539, 584, 543]));
    }

    #[test]
    fn test_extremes() {
        assert_eq!(unpack_word(0, &OPENADC).as_slice(), raw(&[0, 0, 0]));
        assert_eq!(word_marker(0, &OPENADC), 0);

        assert_eq!(
            unpack_word(0xFFFF_FFFF, &OPENADC).as_slice(),
            raw(&[1023, 1023, 1023])
        );
        assert_eq!(word_marker(0xFFFF_FFFF, &OPENADC), 3);
    }

    #[test]
    fn test_pack_word() {
        assert_eq!(pack_word(&raw(&[521, 571, 628]), 3, &OPENADC), 0xe748ee09);
        assert_eq!(pack_word(&raw(&[539, 584, 543]), 2, &OPENADC), 0xa1f9221b);

        // Out of range values are masked.
        assert_eq!(pack_word(&raw(&[0xFFFF]), 0xFF, &OPENADC), 0xC000_03FF);
    }

    #[test]
    fn test_pack_unpack() {
        for marker in 0..4 {
            for value in (0..1024).step_by(7) {
                let samples = raw(&[value, 1023 - value, value / 2]);
                let word = pack_word(&samples, marker, &OPENADC);
                assert_eq!(unpack_word(word, &OPENADC).as_slice(), samples);
                assert_eq!(word_marker(word, &OPENADC), marker);
            }
        }
    }

    #[test]
    fn test_no_marker() {
        let format = WireFormat {
            marker_bits: 0,
            ..OPENADC
        };
        assert_eq!(word_marker(0xFFFF_FFFF, &format), 0);
        assert_eq!(pack_word(&raw(&[1, 2, 3]), 3, &format), 0x0030_0801);
    }

    #[test]
    fn test_widest_valid_format() {
        let format = WireFormat {
            sync_byte: None,
            header_bytes: 0,
            word_bytes: 8,
            sample_bits: 16,
            samples_per_word: 3,
            marker_bits: 8,
        };
        format.validate().unwrap();

        let word = pack_word(&raw(&[0xFFFF, 0, 0x1234]), 0x5A, &format);
        assert_eq!(word, 0x5A00_1234_0000_FFFF);
        assert_eq!(unpack_word(word, &format).as_slice(), raw(&[0xFFFF, 0, 0x1234]));
        assert_eq!(word_marker(word, &format), 0x5A);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(RawSample(0).normalize(10), -0.5);
        assert_eq!(RawSample(512).normalize(10), 0.0);
        assert_eq!(RawSample(543).normalize(10), 0.0302734375);
        assert_eq!(RawSample(1023).normalize(10), 0.5 - 1.0 / 1024.0);
        assert_eq!(RawSample(u16::MAX).normalize(16), 0.5 - 1.0 / 65536.0);
    }
}
