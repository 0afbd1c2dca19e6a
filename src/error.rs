// ABOUTME: Error types for UBJSON decoding.
// ABOUTME: Error variants map to the stable wire-level decode error codes.

use std::fmt;

/// The result type for UBJSON decoding operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding a UBJSON stream.
///
/// Decoding is fail-fast: the first error ends the current read and the
/// source position is not suitable for resuming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Ran out of input inside a marker, scalar payload, or declared length.
    /// Code: "`unexpected_eof`"
    UnexpectedEof,

    /// A byte at a value position is not a recognized type marker.
    /// Code: "`unknown_type`"
    UnknownType(u8),

    /// A length field started with a marker that is not one of `i U I l L`.
    /// Code: "`length_must_be_integer`"
    LengthMustBeInteger(u8),

    /// A length field decoded to a negative value.
    /// Code: "`length_cannot_be_negative`"
    LengthCannotBeNegative,

    /// A container header declared a fixed element type (`$T`) without a
    /// following count (`#`).
    /// Code: "`count_required_after_type`"
    CountRequiredAfterType,

    /// A string, key, char, or high-precision payload is not valid UTF-8.
    /// Code: "`invalid_utf8`"
    InvalidUtf8,

    /// Container nesting exceeded the configured depth limit.
    /// Code: "`max_depth_exceeded`"
    MaxDepthExceeded,

    /// A string payload exceeded the configured length limit.
    /// Code: "`max_string_length_exceeded`"
    MaxStringLengthExceeded,

    /// An error injected by the event sink, propagated unchanged.
    /// Code: "`unknown_error`"
    Custom(String),
}

impl Error {
    /// Create an `UnexpectedEof` error. Marked cold to help branch prediction.
    #[cold]
    #[inline(never)]
    #[must_use] pub fn unexpected_eof() -> Self {
        Error::UnexpectedEof
    }

    /// Create an `UnknownType` error. Marked cold to help branch prediction.
    #[cold]
    #[inline(never)]
    #[must_use] pub fn unknown_type(marker: u8) -> Self {
        Error::UnknownType(marker)
    }

    /// Create a sink-injected error with an arbitrary message.
    #[cold]
    #[inline(never)]
    pub fn custom(msg: impl Into<String>) -> Self {
        Error::Custom(msg.into())
    }

    /// Returns the stable wire-level code for this error.
    #[must_use] pub fn code(&self) -> &'static str {
        match self {
            Error::UnexpectedEof => "unexpected_eof",
            Error::UnknownType(_) => "unknown_type",
            Error::LengthMustBeInteger(_) => "length_must_be_integer",
            Error::LengthCannotBeNegative => "length_cannot_be_negative",
            Error::CountRequiredAfterType => "count_required_after_type",
            Error::InvalidUtf8 => "invalid_utf8",
            Error::MaxDepthExceeded => "max_depth_exceeded",
            Error::MaxStringLengthExceeded => "max_string_length_exceeded",
            Error::Custom(_) => "unknown_error",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnexpectedEof => write!(f, "unexpected end of input"),
            Error::UnknownType(marker) => {
                write!(f, "unknown type marker: 0x{marker:02x}")
            }
            Error::LengthMustBeInteger(marker) => {
                write!(f, "length must be an integer, got marker 0x{marker:02x}")
            }
            Error::LengthCannotBeNegative => write!(f, "length cannot be negative"),
            Error::CountRequiredAfterType => {
                write!(f, "container type marker requires a count")
            }
            Error::InvalidUtf8 => write!(f, "invalid UTF-8 sequence"),
            Error::MaxDepthExceeded => write!(f, "maximum container depth exceeded"),
            Error::MaxStringLengthExceeded => write!(f, "maximum string length exceeded"),
            Error::Custom(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(_: std::str::Utf8Error) -> Self {
        Error::InvalidUtf8
    }
}
