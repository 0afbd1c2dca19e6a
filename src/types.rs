// ABOUTME: Defines UBJSON type markers and shared semantic types.
// ABOUTME: Marker bytes map directly to the UBJSON specification ASCII values.

/// Type markers for UBJSON values.
/// Every marker is a single ASCII byte; all multi-byte payloads that follow
/// are big-endian (network byte order).
pub mod marker {
    /// `Z` null
    pub const NULL: u8 = b'Z';
    /// `N` no-op; skipped at value positions, never emits an event
    pub const NO_OP: u8 = b'N';
    /// `T` boolean true
    pub const TRUE: u8 = b'T';
    /// `F` boolean false
    pub const FALSE: u8 = b'F';
    /// `i` int8
    pub const INT8: u8 = b'i';
    /// `U` uint8
    pub const UINT8: u8 = b'U';
    /// `I` int16
    pub const INT16: u8 = b'I';
    /// `l` int32
    pub const INT32: u8 = b'l';
    /// `L` int64
    pub const INT64: u8 = b'L';
    /// `d` float32, widened to double on decode
    pub const FLOAT32: u8 = b'd';
    /// `D` float64
    pub const FLOAT64: u8 = b'D';
    /// `C` single ASCII character
    pub const CHAR: u8 = b'C';
    /// `S` length-prefixed UTF-8 string
    pub const STRING: u8 = b'S';
    /// `H` length-prefixed high-precision number (ASCII payload)
    pub const HIGH_PRECISION: u8 = b'H';
    /// `[` array begin
    pub const BEGIN_ARRAY: u8 = b'[';
    /// `]` array end (open-ended arrays only)
    pub const END_ARRAY: u8 = b']';
    /// `{` object begin
    pub const BEGIN_OBJECT: u8 = b'{';
    /// `}` object end (open-ended objects only)
    pub const END_OBJECT: u8 = b'}';
    /// `$` fixed element type sub-marker inside a container header
    pub const TYPE: u8 = b'$';
    /// `#` element count sub-marker inside a container header
    pub const COUNT: u8 = b'#';

    /// Check if a marker may start a length field (`i U I l L`).
    #[inline]
    #[must_use]
    pub const fn is_length_marker(m: u8) -> bool {
        matches!(m, INT8 | UINT8 | INT16 | INT32 | INT64)
    }

    /// Payload width in bytes for markers whose payload has a fixed size.
    ///
    /// Returns `None` for length-prefixed and container markers. Markers with
    /// no payload at all (`Z N T F`) report zero.
    #[inline]
    #[must_use]
    pub const fn fixed_payload_width(m: u8) -> Option<usize> {
        match m {
            NULL | NO_OP | TRUE | FALSE => Some(0),
            INT8 | UINT8 | CHAR => Some(1),
            INT16 => Some(2),
            INT32 | FLOAT32 => Some(4),
            INT64 | FLOAT64 => Some(8),
            _ => None,
        }
    }
}

/// Semantic tag attached to string events.
///
/// `S` and `C` values and object keys carry `Plain`. `H` values carry one of
/// the arbitrary-precision tags depending on the shape of the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringTag {
    /// An ordinary UTF-8 string.
    Plain,
    /// An arbitrary-precision integer: optional leading `-`, then digits.
    BigInteger,
    /// An arbitrary-precision decimal: any other numeric text.
    BigDecimal,
}

/// Check whether a high-precision payload is integer-shaped: an optional
/// leading `-` followed by one or more ASCII digits and nothing else.
#[inline]
#[must_use]
pub fn is_integer_text(text: &[u8]) -> bool {
    let digits = match text {
        [b'-', rest @ ..] => rest,
        _ => text,
    };
    !digits.is_empty() && digits.iter().all(u8::is_ascii_digit)
}

/// Classify a high-precision payload into its string tag.
#[inline]
#[must_use]
pub fn high_precision_tag(text: &[u8]) -> StringTag {
    if is_integer_text(text) {
        StringTag::BigInteger
    } else {
        StringTag::BigDecimal
    }
}

/// Default resource limits.
pub mod limits {
    /// Maximum container nesting depth
    pub const MAX_DEPTH: usize = 512;

    /// Maximum string length in bytes
    pub const MAX_STRING_LENGTH: usize = 10_000_000;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_bytes_match_wire_values() {
        assert_eq!(marker::NULL, 0x5a);
        assert_eq!(marker::INT8, 0x69);
        assert_eq!(marker::UINT8, 0x55);
        assert_eq!(marker::BEGIN_ARRAY, 0x5b);
        assert_eq!(marker::BEGIN_OBJECT, 0x7b);
        assert_eq!(marker::TYPE, 0x24);
        assert_eq!(marker::COUNT, 0x23);
    }

    #[test]
    fn test_length_markers() {
        assert!(marker::is_length_marker(marker::INT8));
        assert!(marker::is_length_marker(marker::UINT8));
        assert!(marker::is_length_marker(marker::INT64));
        assert!(!marker::is_length_marker(marker::FLOAT64));
        assert!(!marker::is_length_marker(marker::STRING));
    }

    #[test]
    fn test_fixed_payload_widths() {
        assert_eq!(marker::fixed_payload_width(marker::NULL), Some(0));
        assert_eq!(marker::fixed_payload_width(marker::TRUE), Some(0));
        assert_eq!(marker::fixed_payload_width(marker::INT8), Some(1));
        assert_eq!(marker::fixed_payload_width(marker::INT16), Some(2));
        assert_eq!(marker::fixed_payload_width(marker::FLOAT32), Some(4));
        assert_eq!(marker::fixed_payload_width(marker::INT64), Some(8));
        assert_eq!(marker::fixed_payload_width(marker::STRING), None);
        assert_eq!(marker::fixed_payload_width(marker::BEGIN_ARRAY), None);
    }

    #[test]
    fn test_integer_text() {
        assert!(is_integer_text(b"0"));
        assert!(is_integer_text(b"-7"));
        assert!(is_integer_text(b"123456789012345678901234567890"));
        assert!(!is_integer_text(b""));
        assert!(!is_integer_text(b"-"));
        assert!(!is_integer_text(b"1.5"));
        assert!(!is_integer_text(b"1e6"));
        assert!(!is_integer_text(b"+1"));
        assert!(!is_integer_text(b"12-3"));
    }

    #[test]
    fn test_high_precision_tags() {
        assert_eq!(high_precision_tag(b"-7"), StringTag::BigInteger);
        assert_eq!(high_precision_tag(b"1.5"), StringTag::BigDecimal);
        assert_eq!(high_precision_tag(b"3.141592653589793238462643"), StringTag::BigDecimal);
    }
}
