//! Point line decoding
//!
//! A point line is `<int>,<int>` with any number of extra comma-separated
//! fields, which are ignored. Fields are parsed as-is: the caller trims the
//! line, but whitespace inside a field is a decode failure.

use std::num::ParseIntError;

/// Why a point line could not be decoded
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeFailure {
    #[error("expected at least two comma-separated fields")]
    TooFewFields,
    #[error("`{field}` is not an integer ({source})")]
    NotAnInteger {
        field: String,
        #[source]
        source: ParseIntError,
    },
}

/// A point line that failed to decode, with its 1-based line number
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: cannot read point from `{content}`: {failure}")]
pub struct DecodeError {
    pub line: usize,
    pub content: String,
    pub failure: DecodeFailure,
}

/// Decode a trimmed point line into an `(x, y)` pair.
pub fn decode_point(content: &str, line: usize) -> Result<(i32, i32), DecodeError> {
    let fail = |failure| DecodeError {
        line,
        content: content.to_string(),
        failure,
    };

    let mut fields = content.split(',');
    let (x, y) = match (fields.next(), fields.next()) {
        (Some(x), Some(y)) => (x, y),
        _ => return Err(fail(DecodeFailure::TooFewFields)),
    };

    let parse = |field: &str| {
        field.parse::<i32>().map_err(|source| DecodeFailure::NotAnInteger {
            field: field.to_string(),
            source,
        })
    };

    let x = parse(x).map_err(fail)?;
    let y = parse(y).map_err(fail)?;
    Ok((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_pair() {
        assert_eq!(decode_point("10,20", 1), Ok((10, 20)));
        assert_eq!(decode_point("-3,+4", 1), Ok((-3, 4)));
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        assert_eq!(decode_point("1,2,3,timestamp", 7), Ok((1, 2)));
    }

    #[test]
    fn test_non_numeric_field() {
        let err = decode_point("abc,2", 4).unwrap_err();
        assert_eq!(err.line, 4);
        assert_eq!(err.content, "abc,2");
        assert!(matches!(
            err.failure,
            DecodeFailure::NotAnInteger { ref field, .. } if field == "abc"
        ));
        assert!(err.to_string().contains("`abc,2`"));
    }

    #[test]
    fn test_single_field() {
        let err = decode_point("42", 9).unwrap_err();
        assert_eq!(err.failure, DecodeFailure::TooFewFields);
        assert_eq!(err.line, 9);
        assert_eq!(
            err.to_string(),
            "line 9: cannot read point from `42`: expected at least two comma-separated fields"
        );
    }

    #[test]
    fn test_inner_whitespace_fails() {
        assert!(decode_point("1, 2", 1).is_err());
        assert!(decode_point("1 ,2", 1).is_err());
    }

    #[test]
    fn test_floats_and_overflow_fail() {
        assert!(decode_point("1.5,2", 1).is_err());
        assert!(decode_point("99999999999,2", 1).is_err());
        assert!(decode_point(",", 1).is_err());
    }
}
