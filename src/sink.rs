// ABOUTME: Event sink trait that receives the decoded UBJSON event stream.
// ABOUTME: One call per semantic token; sinks may stop decoding or inject errors.

use crate::error::Result;
use crate::types::StringTag;

/// Streaming context handed to every sink call.
///
/// `position` is the byte offset just past the token that produced the event;
/// `depth` is the current container nesting depth (0 at top level).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    /// Byte offset of the next unread byte.
    pub position: usize,
    /// Number of currently open containers.
    pub depth: usize,
}

/// Receiver for the decoder's event stream.
///
/// Events arrive in document order: every begin-array is matched by exactly
/// one end-array (same for objects), and keys alternate with values between
/// begin-object and end-object. A sink is a capability set: the default for
/// every event is "accept and continue", so implementations override only
/// the events they care about.
///
/// Each event call returns a continuation signal. `Ok(true)` continues the
/// decode; `Ok(false)` asks the decoder to stop cleanly (no error, no further
/// events). An `Err` is treated as fatal and propagated to the caller
/// unchanged. Sinks must not reenter the decoder.
pub trait Sink {
    /// A `Z` null value.
    fn on_null(&mut self, ctx: Context) -> Result<bool> {
        let _ = ctx;
        Ok(true)
    }

    /// A `T` or `F` boolean value.
    fn on_bool(&mut self, value: bool, ctx: Context) -> Result<bool> {
        let _ = (value, ctx);
        Ok(true)
    }

    /// A signed integer (`i`, `I`, `l`, `L`).
    fn on_int(&mut self, value: i64, ctx: Context) -> Result<bool> {
        let _ = (value, ctx);
        Ok(true)
    }

    /// An unsigned integer (`U`).
    fn on_uint(&mut self, value: u64, ctx: Context) -> Result<bool> {
        let _ = (value, ctx);
        Ok(true)
    }

    /// A double (`D`, or `d` widened from binary32).
    fn on_double(&mut self, value: f64, ctx: Context) -> Result<bool> {
        let _ = (value, ctx);
        Ok(true)
    }

    /// A string value: `S`, a one-character `C`, or a tagged `H` payload.
    fn on_string(&mut self, value: &str, tag: StringTag, ctx: Context) -> Result<bool> {
        let _ = (value, tag, ctx);
        Ok(true)
    }

    /// An object member key.
    fn on_key(&mut self, key: &str, ctx: Context) -> Result<bool> {
        let _ = (key, ctx);
        Ok(true)
    }

    /// Array begin; `count` is present for counted and typed headers.
    fn on_begin_array(&mut self, count: Option<usize>, ctx: Context) -> Result<bool> {
        let _ = (count, ctx);
        Ok(true)
    }

    /// Array end.
    fn on_end_array(&mut self, ctx: Context) -> Result<bool> {
        let _ = ctx;
        Ok(true)
    }

    /// Object begin; `count` is present for counted and typed headers.
    fn on_begin_object(&mut self, count: Option<usize>, ctx: Context) -> Result<bool> {
        let _ = (count, ctx);
        Ok(true)
    }

    /// Object end.
    fn on_end_object(&mut self, ctx: Context) -> Result<bool> {
        let _ = ctx;
        Ok(true)
    }

    /// Called once after a top-level value has been fully delivered.
    fn on_flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// A sink that accepts every event and does nothing.
///
/// Useful for wire-format validation runs where only the decoder's error
/// result matters.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl Sink for NullSink {}
