//! Line source with an explicit line counter

use super::ParseError;
use std::io::{self, BufRead};

/// Forward-only iterator over the lines of a reader, paired with their
/// 1-based line numbers.
pub struct NumberedLines<R> {
    lines: io::Lines<R>,
    line: usize,
}

impl<R: BufRead> NumberedLines<R> {
    pub fn new(reader: R) -> Self {
        NumberedLines {
            lines: reader.lines(),
            line: 0,
        }
    }

    /// Number of the last line handed out (0 before the first)
    pub fn line(&self) -> usize {
        self.line
    }
}

impl<R: BufRead> Iterator for NumberedLines<R> {
    type Item = Result<(usize, String), ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.lines.next()?;
        self.line += 1;
        let line = self.line;
        Some(
            next.map(|text| (line, text))
                .map_err(|source| ParseError::Io { line, source }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_start_at_one() {
        let mut lines = NumberedLines::new("a\nb\n\nc".as_bytes());
        assert_eq!(lines.line(), 0);
        let collected: Vec<_> = lines.by_ref().map(|l| l.unwrap()).collect();
        assert_eq!(
            collected,
            vec![
                (1, "a".to_string()),
                (2, "b".to_string()),
                (3, String::new()),
                (4, "c".to_string()),
            ]
        );
        assert_eq!(lines.line(), 4);
    }

    #[test]
    fn test_invalid_utf8_reports_line() {
        let bytes: &[u8] = b"ok\n\xff\xfe\n";
        let mut lines = NumberedLines::new(bytes);
        assert!(lines.next().unwrap().is_ok());
        let err = lines.next().unwrap().unwrap_err();
        assert_eq!(err.line(), Some(2));
    }
}
