//! Numeric Parsing Helpers
//!
//! Zero-allocation parsing utilities for numeric literals with underscore separators.

/// Parse integer skipping underscores without allocation.
///
/// Returns `None` on overflow of `u64` or an invalid digit.
#[inline]
pub(crate) fn parse_int_skip_underscores(s: &str, radix: u32) -> Option<u64> {
    let mut result: u64 = 0;
    for c in s.chars() {
        if c == '_' {
            continue;
        }
        let digit = c.to_digit(radix)?;
        result = result.checked_mul(u64::from(radix))?;
        result = result.checked_add(u64::from(digit))?;
    }
    Some(result)
}

/// Parse float - only allocate if underscores present.
#[inline]
pub(crate) fn parse_float_skip_underscores(s: &str) -> Option<f64> {
    if s.contains('_') {
        s.replace('_', "").parse().ok()
    } else {
        s.parse().ok()
    }
}

/// Parse the width digits of a type keyword like `i32`.
///
/// Never fails: widths that do not fit in `u32` saturate and are rejected by
/// the parser's width validation, which reports them as bad types rather than
/// bad characters.
#[inline]
pub(crate) fn parse_width(digits: &str) -> u32 {
    digits.parse().unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int_skip_underscores() {
        assert_eq!(parse_int_skip_underscores("123", 10), Some(123));
        assert_eq!(parse_int_skip_underscores("1_000_000", 10), Some(1_000_000));
        assert_eq!(parse_int_skip_underscores("___1___", 10), Some(1));
    }

    #[test]
    fn test_parse_int_other_radixes() {
        assert_eq!(parse_int_skip_underscores("dead_beef", 16), Some(0xdead_beef));
        assert_eq!(parse_int_skip_underscores("1111_0000", 2), Some(240));
        assert_eq!(parse_int_skip_underscores("777", 8), Some(511));
        assert_eq!(parse_int_skip_underscores("8", 8), None);
    }

    #[test]
    fn test_parse_int_overflow() {
        assert_eq!(
            parse_int_skip_underscores("99999999999999999999999", 10),
            None
        );
        assert_eq!(
            parse_int_skip_underscores("FFFF_FFFF_FFFF_FFFF", 16),
            Some(u64::MAX)
        );
    }

    #[test]
    fn test_parse_float_skip_underscores() {
        assert_eq!(parse_float_skip_underscores("2.5"), Some(2.5));
        assert_eq!(parse_float_skip_underscores("1_000.25"), Some(1000.25));
        assert_eq!(parse_float_skip_underscores("1.5e3"), Some(1500.0));
    }

    #[test]
    fn test_parse_width_saturates() {
        assert_eq!(parse_width("32"), 32);
        assert_eq!(parse_width("99999999999"), u32::MAX);
    }
}
