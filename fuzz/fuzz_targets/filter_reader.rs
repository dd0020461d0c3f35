#![no_main]

use std::io::Read;

use libfuzzer_sys::fuzz_target;
use tokenfilter::{FilterConfig, Replacer};

fuzz_target!(|data: Vec<u8>| {
    let mapping = [("${a}", "1"), ("${ab}", "22"), ("€", "EUR"), ("\u{0}", "")];

    let mut outputs = Vec::new();
    for size in [1, 3, 8 * 1024] {
        let config = FilterConfig::default().with_read_buffer_size(size);
        let replacer = Replacer::with_config(mapping, config).unwrap();
        let mut reader = replacer.filter_reader(&data[..]).unwrap();

        let mut out = Vec::new();
        let result = reader.read_to_end(&mut out).map(|_| out);
        outputs.push(result.map_err(|e| e.kind()));
    }

    // Verify: block size never changes the outcome
    for other in &outputs[1..] {
        assert_eq!(&outputs[0], other);
    }

    // Verify: valid UTF-8 is filtered like the in-memory path
    if let Ok(text) = std::str::from_utf8(&data) {
        let replacer = Replacer::new(mapping).unwrap();
        let expected = replacer.replace_str(text).unwrap();
        assert_eq!(outputs[0].as_deref(), Ok(expected.as_bytes()));
    }
});
