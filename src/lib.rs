// ABOUTME: Streaming, event-based UBJSON (Universal Binary JSON) decoder.
// ABOUTME: Emits semantic events to a visitor-style sink; no document tree inside the decoder.

//! # ubjson-stream
//!
//! A streaming decoder for the Universal Binary JSON (UBJSON) wire format.
//!
//! The decoder consumes a byte stream and emits a sequence of semantic events
//! (scalars, container starts and ends, keys) to a consumer implementing the
//! [`Sink`] trait. It never builds a document tree itself; a sink may
//! materialize one, validate the stream, or transcode it. Decoding is
//! fail-fast and strictly single-threaded.
//!
//! ## Quick Start
//!
//! ```rust
//! use ubjson_stream::decode_value;
//!
//! // { "a": true }
//! let bytes = [b'{', b'i', 0x01, b'a', b'T', b'}'];
//! let value = decode_value(&bytes).unwrap();
//! assert_eq!(value.get_key("a").and_then(|v| v.as_bool()), Some(true));
//! ```
//!
//! ## Streaming with a custom sink
//!
//! ```rust
//! use ubjson_stream::{read_slice, Context, Result, Sink};
//!
//! /// Counts integers without materializing anything.
//! #[derive(Default)]
//! struct IntCounter(usize);
//!
//! impl Sink for IntCounter {
//!     fn on_int(&mut self, _value: i64, _ctx: Context) -> Result<bool> {
//!         self.0 += 1;
//!         Ok(true)
//!     }
//! }
//!
//! // [$i#i3 1 2 3] — a typed, counted array
//! let bytes = [0x5b, 0x24, 0x69, 0x23, 0x69, 0x03, 0x01, 0x02, 0x03];
//! let mut counter = IntCounter::default();
//! read_slice(&bytes, &mut counter).unwrap();
//! assert_eq!(counter.0, 3);
//! ```
//!
//! ## Wire format notes
//!
//! Type markers are single ASCII bytes; all multi-byte scalars are big-endian.
//! Containers come in three header shapes: typed-and-counted (`$T #N`, no
//! per-element markers, no terminator), counted (`#N`), and open-ended
//! (terminated by `]` or `}`). `$T` without a following `#` is rejected.
//!
//! ## Resource limits
//!
//! Declared lengths are checked against the remaining input before any
//! proportional allocation. Nesting depth and string length are capped by
//! [`ReaderConfig`] (defaults: depth 512, strings 10 MB).

pub mod error;
pub mod reader;
pub mod sink;
pub mod source;
pub mod types;
pub mod value;

// Re-export commonly used items at the crate root
pub use error::{Error, Result};
pub use reader::{Reader, ReaderConfig};
pub use sink::{Context, NullSink, Sink};
pub use source::{SliceSource, Source};
pub use types::{limits, marker, StringTag};
pub use value::{Value, ValueBuilder};

/// Decode one top-level value from a byte slice, delivering events to `sink`.
///
/// # Example
///
/// ```rust
/// use ubjson_stream::{read_slice, NullSink};
///
/// // Wire-format validation only: the null sink discards every event.
/// assert!(read_slice(&[b'S', b'i', 0x02, b'o', b'k'], &mut NullSink).is_ok());
/// assert!(read_slice(&[b'S', b'T'], &mut NullSink).is_err());
/// ```
pub fn read_slice<H: Sink>(data: &[u8], sink: &mut H) -> Result<()> {
    Reader::new(SliceSource::new(data), sink).read()
}

/// Decode one top-level value from a byte slice with custom limits.
pub fn read_slice_with_config<H: Sink>(
    data: &[u8],
    sink: &mut H,
    config: ReaderConfig,
) -> Result<()> {
    Reader::with_config(SliceSource::new(data), sink, config).read()
}

/// Decode a UBJSON document into a [`Value`].
///
/// Convenience wrapper pairing the decoder with the [`ValueBuilder`] sink.
/// Exactly one top-level value is consumed; trailing bytes are not examined.
///
/// # Example
///
/// ```rust
/// use ubjson_stream::decode_value;
///
/// let bytes = [b'S', b'i', 0x05, b'h', b'e', b'l', b'l', b'o'];
/// let value = decode_value(&bytes).unwrap();
/// assert_eq!(value.as_str(), Some("hello"));
/// ```
pub fn decode_value(data: &[u8]) -> Result<Value> {
    decode_value_with_config(data, ReaderConfig::default())
}

/// Decode a UBJSON document into a [`Value`] with custom limits.
pub fn decode_value_with_config(data: &[u8], config: ReaderConfig) -> Result<Value> {
    let mut builder = ValueBuilder::new();
    Reader::with_config(SliceSource::new(data), &mut builder, config).read()?;
    builder
        .into_value()
        .ok_or_else(|| Error::custom("no value decoded"))
}
