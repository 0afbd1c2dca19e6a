// ABOUTME: The UBJSON framing state machine.
// ABOUTME: Reads markers from a Source and drives an event Sink, fail-fast.

use crate::error::{Error, Result};
use crate::sink::{Context, Sink};
use crate::source::Source;
use crate::types::{high_precision_tag, limits, marker, StringTag};

/// Validate and convert bytes to a UTF-8 string.
/// Uses simdutf8 for SIMD-accelerated validation when the feature is enabled.
#[cfg(feature = "simd-utf8")]
#[inline]
fn validate_utf8(bytes: &[u8]) -> Result<&str> {
    simdutf8::basic::from_utf8(bytes).map_err(|_| Error::InvalidUtf8)
}

#[cfg(not(feature = "simd-utf8"))]
#[inline]
fn validate_utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|_| Error::InvalidUtf8)
}

/// Configuration options for the reader.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Maximum container nesting depth
    pub max_depth: usize,
    /// Maximum string length in bytes
    pub max_string_length: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_depth: limits::MAX_DEPTH,
            max_string_length: limits::MAX_STRING_LENGTH,
        }
    }
}

/// Container header shapes detected after a begin marker.
enum ContainerHeader {
    /// `$T #N`: N elements of fixed type T, no per-element markers, no terminator.
    Typed { element_type: u8, count: usize },
    /// `#N`: N elements with per-element markers, no terminator.
    Counted { count: usize },
    /// Neither sub-marker: elements until `]` / `}`.
    Open,
}

/// A streaming UBJSON reader.
///
/// Owns a byte [`Source`] for the duration of the decode and borrows an event
/// [`Sink`] mutably. [`read`](Reader::read) consumes exactly one top-level
/// value and delivers its events in document order. Decoding is fail-fast:
/// after an error the source position is indeterminate and the stream cannot
/// be resumed.
pub struct Reader<'h, S, H> {
    source: S,
    sink: &'h mut H,
    config: ReaderConfig,
    depth: usize,
    /// Scratch buffer for string, key, and high-precision payloads (reused).
    buffer: Vec<u8>,
}

impl<'h, S: Source, H: Sink> Reader<'h, S, H> {
    /// Create a reader over `source` delivering events to `sink`.
    pub fn new(source: S, sink: &'h mut H) -> Self {
        Self::with_config(source, sink, ReaderConfig::default())
    }

    /// Create a reader with custom configuration.
    pub fn with_config(source: S, sink: &'h mut H, config: ReaderConfig) -> Self {
        Self {
            source,
            sink,
            config,
            depth: 0,
            buffer: Vec::new(),
        }
    }

    /// Get the reader configuration.
    #[must_use]
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Byte offset just past the last consumed byte.
    #[must_use]
    pub fn position(&self) -> usize {
        self.source.position()
    }

    /// One-based offset alias kept for compatibility with text readers.
    /// The stream is binary, so there are no line semantics.
    #[must_use]
    pub fn column(&self) -> usize {
        self.source.position() + 1
    }

    /// Consume one top-level value from the source.
    ///
    /// On success every event for the value has been delivered and
    /// [`Sink::on_flush`] has been called. If the sink requested a stop, the
    /// decode ends cleanly without flushing. On error,
    /// [`position`](Reader::position) reports where the failure was detected.
    pub fn read(&mut self) -> Result<()> {
        self.depth = 0;
        let m = self.next_marker()?;
        if self.read_value(m)? {
            self.sink.on_flush()?;
        }
        Ok(())
    }

    /// Consume bytes until a non-`no_op` marker is found.
    #[inline]
    fn next_marker(&mut self) -> Result<u8> {
        loop {
            match self.source.get() {
                Some(marker::NO_OP) => {}
                Some(m) => return Ok(m),
                None => return Err(Error::UnexpectedEof),
            }
        }
    }

    #[inline]
    fn ctx(&self) -> Context {
        Context {
            position: self.source.position(),
            depth: self.depth,
        }
    }

    /// Decode one value whose marker has already been consumed.
    ///
    /// Returns the continuation signal: `Ok(false)` means the sink asked to
    /// stop and the decode should unwind cleanly.
    fn read_value(&mut self, m: u8) -> Result<bool> {
        match m {
            marker::NULL => {
                let ctx = self.ctx();
                self.sink.on_null(ctx)
            }
            // Reachable as a typed-container element type: a body of no-ops
            // carries no payload bytes and emits nothing.
            marker::NO_OP => Ok(true),
            marker::TRUE => {
                let ctx = self.ctx();
                self.sink.on_bool(true, ctx)
            }
            marker::FALSE => {
                let ctx = self.ctx();
                self.sink.on_bool(false, ctx)
            }
            marker::INT8 => {
                let [b] = self.read_fixed()?;
                let ctx = self.ctx();
                self.sink.on_int(i64::from(b as i8), ctx)
            }
            marker::UINT8 => {
                let [b] = self.read_fixed()?;
                let ctx = self.ctx();
                self.sink.on_uint(u64::from(b), ctx)
            }
            marker::INT16 => {
                let v = i16::from_be_bytes(self.read_fixed()?);
                let ctx = self.ctx();
                self.sink.on_int(i64::from(v), ctx)
            }
            marker::INT32 => {
                let v = i32::from_be_bytes(self.read_fixed()?);
                let ctx = self.ctx();
                self.sink.on_int(i64::from(v), ctx)
            }
            marker::INT64 => {
                let v = i64::from_be_bytes(self.read_fixed()?);
                let ctx = self.ctx();
                self.sink.on_int(v, ctx)
            }
            marker::FLOAT32 => {
                let v = f32::from_be_bytes(self.read_fixed()?);
                let ctx = self.ctx();
                self.sink.on_double(f64::from(v), ctx)
            }
            marker::FLOAT64 => {
                let v = f64::from_be_bytes(self.read_fixed()?);
                let ctx = self.ctx();
                self.sink.on_double(v, ctx)
            }
            marker::CHAR => {
                let buf: [u8; 1] = self.read_fixed()?;
                // A lone byte above 0x7f is not a one-character UTF-8 string.
                let text = validate_utf8(&buf)?;
                let ctx = self.ctx();
                self.sink.on_string(text, StringTag::Plain, ctx)
            }
            marker::STRING => {
                let len = self.read_length()?;
                self.fill_buffer(len)?;
                let ctx = self.ctx();
                let text = validate_utf8(&self.buffer)?;
                self.sink.on_string(text, StringTag::Plain, ctx)
            }
            marker::HIGH_PRECISION => {
                let len = self.read_length()?;
                self.fill_buffer(len)?;
                let ctx = self.ctx();
                let tag = high_precision_tag(&self.buffer);
                let text = validate_utf8(&self.buffer)?;
                self.sink.on_string(text, tag, ctx)
            }
            marker::BEGIN_ARRAY => self.read_array(),
            marker::BEGIN_OBJECT => self.read_object(),
            _ => Err(Error::unknown_type(m)),
        }
    }

    /// Read a fixed-width big-endian payload.
    #[inline]
    fn read_fixed<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        if self.source.read_exact(&mut buf) {
            Ok(buf)
        } else {
            Err(Error::unexpected_eof())
        }
    }

    /// Decode a length field: one integer marker (`i U I l L`), then its
    /// payload. Negative values and non-integer markers are rejected.
    fn read_length(&mut self) -> Result<usize> {
        let m = self.source.get().ok_or(Error::UnexpectedEof)?;
        let value = match m {
            marker::INT8 => {
                let [b] = self.read_fixed()?;
                i64::from(b as i8)
            }
            marker::UINT8 => {
                let [b] = self.read_fixed()?;
                i64::from(b)
            }
            marker::INT16 => i64::from(i16::from_be_bytes(self.read_fixed()?)),
            marker::INT32 => i64::from(i32::from_be_bytes(self.read_fixed()?)),
            marker::INT64 => i64::from_be_bytes(self.read_fixed()?),
            _ => return Err(Error::LengthMustBeInteger(m)),
        };
        if value < 0 {
            return Err(Error::LengthCannotBeNegative);
        }
        // A length wider than the address space cannot be backed by the
        // bounded source, so surface it the same way as missing bytes.
        usize::try_from(value).map_err(|_| Error::UnexpectedEof)
    }

    /// Read a length-prefixed payload into the scratch buffer, rejecting
    /// lengths beyond the configured cap or the remaining input before
    /// allocating.
    fn fill_buffer(&mut self, len: usize) -> Result<()> {
        if len > self.config.max_string_length {
            return Err(Error::MaxStringLengthExceeded);
        }
        if let Some(rem) = self.source.remaining() {
            if len > rem {
                return Err(Error::UnexpectedEof);
            }
        }
        self.buffer.clear();
        if self.source.read_append(len, &mut self.buffer) {
            Ok(())
        } else {
            Err(Error::unexpected_eof())
        }
    }

    /// Reject a declared element count the remaining input cannot back.
    /// `min_element_size` is a lower bound on the bytes one element consumes;
    /// zero-width elements (`Z N T F` typed bodies) are exempt since they are
    /// legal with no payload at all.
    fn check_count(&self, count: usize, min_element_size: usize) -> Result<()> {
        if min_element_size == 0 {
            return Ok(());
        }
        if let Some(rem) = self.source.remaining() {
            match count.checked_mul(min_element_size) {
                Some(needed) if needed <= rem => {}
                _ => return Err(Error::UnexpectedEof),
            }
        }
        Ok(())
    }

    /// An object key: an unlabelled length-prefixed UTF-8 string.
    fn read_key(&mut self) -> Result<bool> {
        let len = self.read_length()?;
        self.fill_buffer(len)?;
        let ctx = self.ctx();
        let key = validate_utf8(&self.buffer)?;
        self.sink.on_key(key, ctx)
    }

    /// Detect which of the three header shapes follows a container begin
    /// marker. `$T` not followed by `#` is a hard error, including at EOF.
    fn read_container_header(&mut self) -> Result<ContainerHeader> {
        match self.source.peek() {
            Some(marker::TYPE) => {
                self.source.skip(1);
                let element_type = self.source.get().ok_or(Error::UnexpectedEof)?;
                if self.source.peek() != Some(marker::COUNT) {
                    return Err(Error::CountRequiredAfterType);
                }
                self.source.skip(1);
                let count = self.read_length()?;
                Ok(ContainerHeader::Typed {
                    element_type,
                    count,
                })
            }
            Some(marker::COUNT) => {
                self.source.skip(1);
                let count = self.read_length()?;
                Ok(ContainerHeader::Counted { count })
            }
            // EOF right after the begin marker surfaces inside the body loop.
            _ => Ok(ContainerHeader::Open),
        }
    }

    fn enter(&mut self) -> Result<()> {
        if self.depth >= self.config.max_depth {
            return Err(Error::MaxDepthExceeded);
        }
        self.depth += 1;
        Ok(())
    }

    fn read_array(&mut self) -> Result<bool> {
        self.enter()?;
        match self.read_container_header()? {
            ContainerHeader::Typed {
                element_type,
                count,
            } => {
                let width = marker::fixed_payload_width(element_type).unwrap_or(1);
                self.check_count(count, width)?;
                let ctx = self.ctx();
                if !self.sink.on_begin_array(Some(count), ctx)? {
                    return Ok(false);
                }
                for _ in 0..count {
                    if !self.read_value(element_type)? {
                        return Ok(false);
                    }
                }
                let ctx = self.ctx();
                let more = self.sink.on_end_array(ctx)?;
                self.depth -= 1;
                Ok(more)
            }
            ContainerHeader::Counted { count } => {
                self.check_count(count, 1)?;
                let ctx = self.ctx();
                if !self.sink.on_begin_array(Some(count), ctx)? {
                    return Ok(false);
                }
                for _ in 0..count {
                    let m = self.next_marker()?;
                    if !self.read_value(m)? {
                        return Ok(false);
                    }
                }
                let ctx = self.ctx();
                let more = self.sink.on_end_array(ctx)?;
                self.depth -= 1;
                Ok(more)
            }
            ContainerHeader::Open => {
                let ctx = self.ctx();
                if !self.sink.on_begin_array(None, ctx)? {
                    return Ok(false);
                }
                loop {
                    match self.source.peek() {
                        Some(marker::END_ARRAY) => {
                            self.source.skip(1);
                            break;
                        }
                        Some(marker::NO_OP) => {
                            self.source.skip(1);
                        }
                        Some(_) => {
                            let m = self.next_marker()?;
                            if !self.read_value(m)? {
                                return Ok(false);
                            }
                        }
                        None => return Err(Error::unexpected_eof()),
                    }
                }
                let ctx = self.ctx();
                let more = self.sink.on_end_array(ctx)?;
                self.depth -= 1;
                Ok(more)
            }
        }
    }

    fn read_object(&mut self) -> Result<bool> {
        self.enter()?;
        match self.read_container_header()? {
            ContainerHeader::Typed {
                element_type,
                count,
            } => {
                // Each member carries at least a two-byte key prefix on top
                // of the fixed value payload.
                let width = marker::fixed_payload_width(element_type).unwrap_or(1);
                self.check_count(count, width.saturating_add(2))?;
                let ctx = self.ctx();
                if !self.sink.on_begin_object(Some(count), ctx)? {
                    return Ok(false);
                }
                for _ in 0..count {
                    if !self.read_key()? {
                        return Ok(false);
                    }
                    if !self.read_value(element_type)? {
                        return Ok(false);
                    }
                }
                let ctx = self.ctx();
                let more = self.sink.on_end_object(ctx)?;
                self.depth -= 1;
                Ok(more)
            }
            ContainerHeader::Counted { count } => {
                // Two-byte key prefix plus a one-byte value marker per member.
                self.check_count(count, 3)?;
                let ctx = self.ctx();
                if !self.sink.on_begin_object(Some(count), ctx)? {
                    return Ok(false);
                }
                for _ in 0..count {
                    if !self.read_key()? {
                        return Ok(false);
                    }
                    let m = self.next_marker()?;
                    if !self.read_value(m)? {
                        return Ok(false);
                    }
                }
                let ctx = self.ctx();
                let more = self.sink.on_end_object(ctx)?;
                self.depth -= 1;
                Ok(more)
            }
            ContainerHeader::Open => {
                let ctx = self.ctx();
                if !self.sink.on_begin_object(None, ctx)? {
                    return Ok(false);
                }
                loop {
                    match self.source.peek() {
                        Some(marker::END_OBJECT) => {
                            self.source.skip(1);
                            break;
                        }
                        Some(marker::NO_OP) => {
                            self.source.skip(1);
                        }
                        Some(_) => {
                            if !self.read_key()? {
                                return Ok(false);
                            }
                            let m = self.next_marker()?;
                            if !self.read_value(m)? {
                                return Ok(false);
                            }
                        }
                        None => return Err(Error::unexpected_eof()),
                    }
                }
                let ctx = self.ctx();
                let more = self.sink.on_end_object(ctx)?;
                self.depth -= 1;
                Ok(more)
            }
        }
    }
}
