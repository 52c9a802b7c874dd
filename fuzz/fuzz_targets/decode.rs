#![no_main]

use libfuzzer_sys::fuzz_target;
use openadc::{Adc, OPENADC};

// Arbitrary bytes must decode without panicking and give in-range samples.

fuzz_target!(|data: &[u8]| {
    let capture = Adc::default().decode_capture(data);

    assert!(capture.len() <= OPENADC.max_samples(data.len()));
    assert!(capture.discarded_bytes < OPENADC.word_bytes);
    for &v in &capture.samples {
        assert!((-0.5..0.5).contains(&v));
        assert_eq!((v * 1024.0).fract(), 0.0);
    }

    // Dropping a partial word never changes the result.
    let whole = data.len() - capture.discarded_bytes;
    assert_eq!(openadc::decode(&data[..whole]), capture.samples);
});
