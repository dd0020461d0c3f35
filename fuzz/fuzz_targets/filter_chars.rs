#![no_main]

use std::sync::Arc;

use libfuzzer_sys::fuzz_target;
use tokenfilter::{FilterConfig, NaiveLookahead, RingLookahead, StreamFilter, TokenSet};

fuzz_target!(|data: &[u8]| {
    // Tokens and input drawn from a tiny alphabet so matches are frequent
    let alphabet = ['a', 'b', 'é', '$'];
    let Some((&split, rest)) = data.split_first() else {
        return;
    };
    let (keys, text) = rest.split_at((split as usize).min(rest.len()));

    let mapping: Vec<(String, String)> = keys
        .chunks(4)
        .map(|chunk| {
            let key: String = chunk.iter().map(|b| alphabet[(*b % 4) as usize]).collect();
            let value: String = chunk.iter().rev().map(|b| alphabet[(*b / 4 % 4) as usize]).collect();
            (key, value)
        })
        .collect();
    let input: String = text.iter().map(|b| alphabet[(*b % 4) as usize]).collect();

    let tokens = Arc::new(TokenSet::new(mapping).unwrap());
    let config = FilterConfig::default();

    // Reference output through the naive lookahead, read in one go
    let mut naive = StreamFilter::<_, NaiveLookahead>::with_tokens(
        input.chars(),
        Arc::clone(&tokens),
        &config,
    )
    .unwrap();
    let mut expected = String::new();
    naive.read_to_string(&mut expected).unwrap();

    // Verify: ring lookahead agrees for every read size
    for step in [1, 2, 3, 7, 64] {
        let mut ring = StreamFilter::<_, RingLookahead>::with_tokens(
            input.chars(),
            Arc::clone(&tokens),
            &config,
        )
        .unwrap();

        let mut buf = vec!['\0'; step];
        let mut out = String::new();
        while let Some(n) = ring.read(&mut buf).unwrap() {
            assert!(n <= step);
            out.extend(&buf[..n]);
        }
        assert_eq!(out, expected);

        // Verify: end of data is sticky
        assert_eq!(ring.read(&mut buf).unwrap(), None);
    }

    // Verify: with no tokens the filter is the identity
    if tokens.is_empty() {
        assert_eq!(expected, input);
    }
});
