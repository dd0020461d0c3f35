// Integration tests for the StreamFilter streaming API
// Tests cover: replacement semantics, chunked reads, resumption, close, I/O adapters

use std::io::{self, Read};
use std::sync::Arc;

use tokenfilter::{
    CharSource, FilterConfig, FilterError, NaiveLookahead, PrefixMatchIndex, Replacer,
    RingLookahead, StreamFilter, TokenSet,
};

fn filter_all(input: &str, mapping: &[(&str, &str)]) -> String {
    let mut filter = StreamFilter::new(input.chars(), mapping.iter().copied()).unwrap();
    let mut out = String::new();
    filter.read_to_string(&mut out).unwrap();
    out
}

/// Reads the whole filter `step` chars at a time.
fn filter_in_steps<S: CharSource>(mut filter: StreamFilter<S>, step: usize) -> String {
    let mut buf = vec!['\0'; step];
    let mut out = String::new();
    while let Some(n) = filter.read(&mut buf).unwrap() {
        assert!(n <= step);
        out.extend(&buf[..n]);
    }
    out
}

/// Source yielding one fragment per call, with a `WouldBlock` between
/// fragments.
struct Stuttering {
    fragments: Vec<Vec<char>>,
    next: usize,
    blocked: bool,
}

impl Stuttering {
    fn new(fragments: &[&str]) -> Self {
        Self {
            fragments: fragments.iter().map(|f| f.chars().collect()).collect(),
            next: 0,
            blocked: false,
        }
    }
}

impl CharSource for Stuttering {
    fn read_chars(&mut self, buf: &mut [char]) -> io::Result<usize> {
        if !self.blocked && self.next < self.fragments.len() {
            self.blocked = true;
            return Err(io::ErrorKind::WouldBlock.into());
        }
        self.blocked = false;

        let Some(fragment) = self.fragments.get_mut(self.next) else {
            return Ok(0);
        };
        let n = buf.len().min(fragment.len());
        buf[..n].copy_from_slice(&fragment[..n]);
        fragment.drain(..n);
        if fragment.is_empty() {
            self.next += 1;
        }
        Ok(n)
    }
}

/// Source that records whether it was closed.
struct Tracked<'a> {
    chars: std::str::Chars<'a>,
    closes: usize,
}

impl CharSource for Tracked<'_> {
    fn read_chars(&mut self, buf: &mut [char]) -> io::Result<usize> {
        self.chars.read_chars(buf)
    }

    fn close(&mut self) -> io::Result<()> {
        self.closes += 1;
        Ok(())
    }
}

// ============================================================================
// Replacement Semantics
// ============================================================================

#[test]
fn test_no_tokens_present() {
    let input = "plain text without any placeholder";
    assert_eq!(filter_all(input, &[("${name}", "World")]), input);
}

#[test]
fn test_hello_world() {
    assert_eq!(
        filter_all("Hello ${name}!", &[("${name}", "World")]),
        "Hello World!"
    );
}

#[test]
fn test_multiple_tokens_sharing_prefix() {
    let mapping = [
        ("${fname}", "John"),
        ("${lname}", "Doe"),
        ("${age}", "42"),
        ("${address}", "Main St"),
    ];
    assert_eq!(
        filter_all("${fname} ${lname}, ${age}, lives on ${address}.", &mapping),
        "John Doe, 42, lives on Main St."
    );
}

#[test]
fn test_near_miss_left_untouched() {
    let mapping = [("${name}", "World")];
    assert_eq!(filter_all("${nam} ${names ${name", &mapping), "${nam} ${names ${name");
    assert_eq!(filter_all("$${name}}", &mapping), "$World}");
}

#[test]
fn test_longest_token_wins() {
    let mapping = [("ab", "1"), ("abc", "2"), ("a", "3")];
    assert_eq!(filter_all("abcabxa", &mapping), "21x3");
    assert_eq!(filter_all("ab", &mapping), "1");
}

#[test]
fn test_input_one_char_shorter_than_longest_token() {
    let mapping = [("${property0}", "replacement0"), ("${property10}", "x")];
    assert_eq!(filter_all("${property0}", &mapping), "replacement0");
    assert_eq!(filter_all("${property1}", &mapping), "${property1}");
}

#[test]
fn test_multibyte_tokens_and_replacements() {
    let mapping = [("«name»", "Zoë"), ("🦀", "crab")];
    assert_eq!(filter_all("¡Hola «name» 🦀!", &mapping), "¡Hola Zoë crab!");
}

#[test]
fn test_replacement_is_not_rescanned() {
    let mapping = [("a", "aa")];
    assert_eq!(filter_all("aba", &mapping), "aabaa");
}

#[test]
fn test_empty_input_and_empty_mapping() {
    assert_eq!(filter_all("", &[("x", "y")]), "");
    assert_eq!(filter_all("", &[]), "");
    assert_eq!(filter_all("unchanged", &[]), "unchanged");
}

#[test]
fn test_empty_token_rejected() {
    let result = StreamFilter::new("abc".chars(), [("", "x")]);
    assert!(matches!(result, Err(FilterError::InvalidArgument { .. })));
}

#[test]
fn test_duplicate_token_keeps_last_replacement() {
    let tokens = TokenSet::new([("${x}", "first"), ("${x}", "second")]).unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens.get("${x}"), Some("second"));
}

// ============================================================================
// Chunked Reads
// ============================================================================

#[test]
fn test_output_independent_of_read_size() {
    let input = "Dear ${title} ${lname}, your order ${order} of ${qty}× ☕ ships ${when}.";
    let mapping = [
        ("${title}", "Dr."),
        ("${lname}", "Who"),
        ("${order}", "#1963"),
        ("${qty}", "3"),
        ("${when}", "yesterday"),
        ("☕", "coffee"),
    ];
    let expected = "Dear Dr. Who, your order #1963 of 3× coffee ships yesterday.";

    for step in [1, 2, 3, 7, 16, 1024] {
        let filter = StreamFilter::new(input.chars(), mapping).unwrap();
        assert_eq!(filter_in_steps(filter, step), expected, "step {}", step);
    }
}

#[test]
fn test_ring_and_naive_lookahead_agree() {
    let mapping = [("ab", "X"), ("abc", "Y"), ("bca", ""), ("c", "cc")];
    let tokens = Arc::new(TokenSet::new(mapping).unwrap());
    let config = FilterConfig::default();

    // Deterministic pseudo-random text over a small alphabet.
    let input: String = (0u32..2000)
        .map(|i| ['a', 'b', 'c', 'd'][((i * 7 + i / 3) % 4) as usize])
        .collect();

    let mut ring =
        StreamFilter::<_, RingLookahead>::with_tokens(input.chars(), Arc::clone(&tokens), &config)
            .unwrap();
    let mut naive =
        StreamFilter::<_, NaiveLookahead>::with_tokens(input.chars(), Arc::clone(&tokens), &config)
            .unwrap();

    let mut a = String::new();
    let mut b = String::new();
    ring.read_to_string(&mut a).unwrap();
    naive.read_to_string(&mut b).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_read_reports_end_repeatedly() {
    let mut filter = StreamFilter::new("x".chars(), [("x", "yz")]).unwrap();
    let mut buf = ['\0'; 8];
    assert_eq!(filter.read(&mut buf).unwrap(), Some(2));
    assert_eq!(&buf[..2], &['y', 'z']);
    assert_eq!(filter.read(&mut buf).unwrap(), None);
    assert_eq!(filter.read(&mut buf).unwrap(), None);
}

// ============================================================================
// Resumption After Source Errors
// ============================================================================

#[test]
fn test_resumes_after_would_block() {
    let source = Stuttering::new(&["Hello ${na", "me}", "! Bye ${", "name}"]);
    let mut filter = StreamFilter::new(source, [("${name}", "World")]).unwrap();

    let mut out = String::new();
    let mut buf = ['\0'; 4];
    let mut blocked = 0;
    loop {
        match filter.read(&mut buf) {
            Ok(Some(n)) => out.extend(&buf[..n]),
            Ok(None) => break,
            Err(e) => {
                assert!(e.is_transient(), "unexpected error: {}", e);
                blocked += 1;
            }
        }
    }

    assert_eq!(out, "Hello World! Bye World");
    assert!(blocked > 0);
}

#[test]
fn test_error_after_partial_read_is_deferred() {
    struct FailsAfter(usize);

    impl CharSource for FailsAfter {
        fn read_chars(&mut self, buf: &mut [char]) -> io::Result<usize> {
            if self.0 == 0 {
                return Err(io::Error::other("disk on fire"));
            }
            let n = buf.len().min(self.0);
            buf[..n].fill('a');
            self.0 -= n;
            Ok(n)
        }
    }

    let mut filter = StreamFilter::new(FailsAfter(3), [("a", "b")]).unwrap();
    let mut buf = ['\0'; 8];

    assert_eq!(filter.read(&mut buf).unwrap(), Some(3));
    assert_eq!(&buf[..3], &['b', 'b', 'b']);

    let err = filter.read(&mut buf).unwrap_err();
    assert!(matches!(err, FilterError::Io(ref e) if e.kind() == io::ErrorKind::Other));
    assert!(!err.is_transient());
}

// ============================================================================
// Close Semantics
// ============================================================================

#[test]
fn test_close_closes_source_once() {
    let source = Tracked {
        chars: "abc".chars(),
        closes: 0,
    };
    let mut filter = StreamFilter::new(source, [("b", "B")]).unwrap();
    let mut buf = ['\0'; 1];
    assert_eq!(filter.read(&mut buf).unwrap(), Some(1));

    filter.close().unwrap();
    filter.close().unwrap();
    assert_eq!(filter.get_ref().closes, 1);

    let err = filter.read(&mut buf).unwrap_err();
    assert!(matches!(err, FilterError::ClosedStream));

    let io_err: io::Error = err.into();
    assert_eq!(io_err.kind(), io::ErrorKind::NotConnected);
}

#[test]
fn test_close_while_replaying() {
    let mut filter = StreamFilter::new("${x}".chars(), [("${x}", "long replacement")]).unwrap();
    let mut buf = ['\0'; 2];
    filter.read(&mut buf).unwrap();
    assert!(filter.is_replaying());

    filter.close().unwrap();
    assert!(!filter.is_replaying());
    assert!(filter.read(&mut buf).is_err());
}

// ============================================================================
// Byte I/O Adapters
// ============================================================================

#[test]
fn test_filter_reader_pipeline() {
    let replacer = Replacer::new([("${user}", "ferris"), ("${home}", "/home/ferris")]).unwrap();
    let input = "user=${user}\nhome=${home}\nshell=/bin/sh\n";
    let mut reader = replacer.filter_reader(input.as_bytes()).unwrap();

    let mut out = String::new();
    reader.read_to_string(&mut out).unwrap();
    assert_eq!(out, "user=ferris\nhome=/home/ferris\nshell=/bin/sh\n");
}

#[test]
fn test_filter_reader_io_copy_tiny_buffers() {
    let config = FilterConfig::default().with_read_buffer_size(1);
    let replacer = Replacer::with_config([("ä", "ae"), ("ß", "ss")], config).unwrap();
    let mut reader = replacer.filter_reader("Straße, Bär".as_bytes()).unwrap();

    let mut out = Vec::new();
    io::copy(&mut reader, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "Strasse, Baer");
}

#[test]
fn test_filter_reader_invalid_utf8() {
    let replacer = Replacer::new([("a", "b")]).unwrap();
    let mut reader = replacer.filter_reader(&[b'a', 0xFE, b'a'][..]).unwrap();

    let mut out = String::new();
    let err = reader.read_to_string(&mut out).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
}

#[test]
fn test_index_shared_with_filter() {
    let index = PrefixMatchIndex::new(["${a}", "${ab}"]).unwrap();
    assert_eq!(index.start_of_str("${ab} tail"), Some("${ab}"));

    let replacer = Replacer::new([("${a}", "1"), ("${ab}", "2")]).unwrap();
    assert_eq!(replacer.tokens().index().len(), index.len());
    assert_eq!(replacer.replace_str("${a}${ab}").unwrap(), "12");
}

// ============================================================================
// Async (feature = "async-io")
// ============================================================================

#[cfg(feature = "async-io")]
mod async_io {
    use futures_util::StreamExt;
    use tokenfilter::{FilterConfig, Replacer, filter_async};
    use tokio_util::compat::TokioAsyncReadCompatExt;

    #[tokio::test]
    async fn test_async_token_split_across_reads() {
        let mock = tokio_test::io::Builder::new()
            .read(b"Hello ${na")
            .read(b"me}! \xF0\x9F")
            .read(b"\xA6\x80 ${name}")
            .build();

        let replacer = Replacer::new([("${name}", "World")]).unwrap();
        let mut stream = filter_async(mock.compat(), &replacer).unwrap();

        let mut out = String::new();
        while let Some(text) = stream.next().await {
            out.push_str(&text.unwrap());
        }
        assert_eq!(out, "Hello World! 🦀 World");
    }

    #[tokio::test]
    async fn test_async_items_bounded_by_buffer_size() {
        let mock = tokio_test::io::Builder::new().read(b"xxxxxxxx").build();

        let config = FilterConfig::default().with_read_buffer_size(3);
        let replacer = Replacer::with_config([("x", "yy")], config).unwrap();
        let stream = filter_async(mock.compat(), &replacer).unwrap();

        let items: Vec<String> = stream.map(|item| item.unwrap()).collect().await;
        assert!(items.iter().all(|item| item.chars().count() <= 3));
        assert_eq!(items.concat(), "y".repeat(16));
    }

    #[tokio::test]
    async fn test_async_tokio_file() {
        let path = std::env::temp_dir().join("tokenfilter_async_test.txt");
        tokio::fs::write(&path, "name=${name}\n").await.unwrap();

        let file = tokio::fs::File::open(&path).await.unwrap();
        let replacer = Replacer::new([("${name}", "tokio")]).unwrap();
        let stream = filter_async(file.compat(), &replacer).unwrap();

        let items: Vec<_> = stream.collect().await;
        let text: String = items.into_iter().map(|item| item.unwrap()).collect();
        assert_eq!(text, "name=tokio\n");

        let _ = tokio::fs::remove_file(&path).await;
    }
}
