//! Per-file extraction policies run by the worker pool.

pub mod line_match;
pub mod snippet;

pub use line_match::{LineMatchExtractor, classify_match};
pub use snippet::{SnippetExtractor, build_snippet, snippet_from_reader};

use std::io::{self, BufRead, Read};
use std::path::Path;

/// Turns one file into zero or more records.
///
/// Implementations never fail: open and read errors become sentinel records or are logged and
/// skipped, so a bad file cannot stop the pool. `emit` returns `false` when the pipeline no
/// longer wants records (cancelled or collector gone); extractors should stop reading then.
pub trait Extractor: Send + Sync + 'static {
    type Record: Send + 'static;

    fn extract(&self, path: &Path, emit: &mut dyn FnMut(Self::Record) -> bool);
}

/// Reads `\n`-terminated lines, dropping the terminator and a trailing `\r`.
/// Invalid UTF-8 is replaced rather than treated as a read error.
///
/// With a byte limit, a line longer than the limit is returned in limit-sized pieces, so a
/// file without newlines is never buffered whole.
pub(crate) struct Lines<R> {
    reader: R,
    buf: Vec<u8>,
    max_line_bytes: Option<u64>,
}

impl<R: BufRead> Lines<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            max_line_bytes: None,
        }
    }

    pub(crate) fn with_max_line_bytes(reader: R, max_line_bytes: u64) -> Self {
        Self {
            max_line_bytes: Some(max_line_bytes),
            ..Self::new(reader)
        }
    }
}

impl<R: BufRead> Iterator for Lines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        let read = match self.max_line_bytes {
            Some(limit) => (&mut self.reader).take(limit).read_until(b'\n', &mut self.buf),
            None => self.reader.read_until(b'\n', &mut self.buf),
        };
        match read {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_strip_terminators() {
        let input: &[u8] = b"one\r\ntwo\n\nthree";
        let lines: Vec<String> = Lines::new(input).map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["one", "two", "", "three"]);
    }

    #[test]
    fn lines_replace_invalid_utf8() {
        let input: &[u8] = b"ok\xff\n";
        let lines: Vec<String> = Lines::new(input).map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["ok\u{FFFD}"]);
    }

    #[test]
    fn byte_limit_splits_long_lines() {
        let input: &[u8] = b"abcdefg\nhi\n";
        let lines: Vec<String> = Lines::with_max_line_bytes(input, 3)
            .map(|l| l.unwrap())
            .collect();
        assert_eq!(lines, vec!["abc", "def", "g", "hi"]);
    }
}
