//! Disguise codec implementations
//!
//! This module holds the per-dialect state machines and the glue that lets a
//! transport pick between them:
//!
//! - [`HttpDisguiseCodec`]: hides payload inside a plain HTTP/1.1 exchange
//! - [`Http2UpgradeCodec`]: hides payload inside an `Upgrade: h2c` handshake
//! - [`DisguiseCodec`]: sum type over the dialects, selected by wire name
//!   via [`DisguiseVariant`], driven through the [`Disguise`] trait or the
//!   [`tokio_util::codec`] adapters
//!
//! Both dialects share the same lifecycle. Outbound, the first chunk is
//! prefixed with a synthetic HTTP response and every later chunk passes
//! unchanged. Inbound, bytes accumulate until the stream can be classified:
//! a matching request prefix leads to header parsing and payload extraction,
//! anything else flips the connection into permanent passthrough.

mod http1;
mod http2;
mod variant;

pub use http1::HttpDisguiseCodec;
pub use http2::Http2UpgradeCodec;
pub use variant::{Disguise, DisguiseCodec, DisguiseVariant};

use bytes::BytesMut;

/// Inbound buffers at or below this length cannot be classified yet.
pub(crate) const MIN_CLASSIFY_LEN: usize = 10;

/// Inbound half of a codec instance.
///
/// The two terminal states never revert: once a connection is classified,
/// every later chunk flows through unmodified.
#[derive(Debug)]
pub(crate) enum RecvState {
    /// Bytes accumulated so far, disguise not yet classified.
    Buffering(BytesMut),
    /// The peer speaks the original protocol; no disguise to strip.
    Passthrough,
    /// Disguise framing fully parsed and removed.
    Stripped,
}

impl RecvState {
    pub(crate) fn new() -> Self {
        RecvState::Buffering(BytesMut::new())
    }
}

/// Returns the offset just past the first `\r\n\r\n`, splitting the header
/// section from the body section.
pub(crate) fn split_at_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|window| window == b"\r\n\r\n").map(|pos| pos + 4)
}

/// Iterator over `\r\n`-separated segments of a raw header buffer.
///
/// The final segment is whatever follows the last separator, which may be
/// empty or a partial body. This mirrors how the wire lays out the request
/// line and header fields.
pub(crate) struct CrlfLines<'a> {
    rest: &'a [u8],
    done: bool,
}

pub(crate) fn crlf_lines(buf: &[u8]) -> CrlfLines<'_> {
    CrlfLines { rest: buf, done: false }
}

impl<'a> Iterator for CrlfLines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        if self.done {
            return None;
        }
        match self.rest.windows(2).position(|window| window == b"\r\n") {
            Some(pos) => {
                let line = &self.rest[..pos];
                self.rest = &self.rest[pos + 2..];
                Some(line)
            }
            None => {
                self.done = true;
                Some(self.rest)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{crlf_lines, split_at_header_end};

    #[test]
    fn header_end_is_found_after_the_blank_line() {
        assert_eq!(split_at_header_end(b"GET / HTTP/1.1\r\nHost: a\r\n\r\nbody"), Some(27));
        assert_eq!(split_at_header_end(b"GET / HTTP/1.1\r\nHost: a\r\n"), None);
        assert_eq!(split_at_header_end(b""), None);
    }

    #[test]
    fn crlf_lines_match_wire_layout() {
        let lines: Vec<&[u8]> = crlf_lines(b"a\r\nb\r\n\r\ntail").collect();
        assert_eq!(lines, vec![&b"a"[..], b"b", b"", b"tail"]);

        let single: Vec<&[u8]> = crlf_lines(b"no terminator").collect();
        assert_eq!(single, vec![&b"no terminator"[..]]);

        let empty: Vec<&[u8]> = crlf_lines(b"").collect();
        assert_eq!(empty, vec![&b""[..]]);
    }
}
