//! HTTP/1.1 disguise dialect (`http_simple`)
//!
//! Inbound, the hidden payload rides in the request line as percent-encoded
//! bytes (`GET /%XX%XX… HTTP/1.1`) with any remainder carried as the request
//! body. Outbound, the tunneled stream is fronted by a `200 OK` response
//! that claims to be a chunked, gzipped text page. None of that is true;
//! the headers exist only for the benefit of a passive observer.

use std::mem;

use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

use crate::codec::{Disguise, MIN_CLASSIFY_LEN, RecvState, crlf_lines, split_at_header_end};
use crate::date;
use crate::protocol::Decoded;

const RESPONSE_HEAD: &[u8] = b"HTTP/1.1 200 OK\r\nServer: openresty\r\nDate: ";
const RESPONSE_TAIL: &[u8] = b"\r\nContent-Type: text/plain; charset=utf-8\r\n\
    Transfer-Encoding: chunked\r\nConnection: keep-alive\r\nKeep-Alive: timeout=20\r\n\
    Vary: Accept-Encoding\r\nContent-Encoding: gzip\r\n\r\n";

/// Smallest embedded payload accepted from a request that looks complete.
///
/// A header can contain `\r\n\r\n` before enough of the peer's handshake has
/// arrived; anything shorter than this is treated as still incomplete rather
/// than accepted early.
const MIN_PAYLOAD_LEN: usize = 15;

/// Server-side codec for the HTTP/1.1 disguise dialect.
///
/// One instance per connection. See [`Disguise`] for the operations and the
/// crate docs for the lifecycle.
#[derive(Debug)]
pub struct HttpDisguiseCodec {
    method: String,
    header_sent: bool,
    recv: RecvState,
}

impl HttpDisguiseCodec {
    /// Creates a codec for one connection. `method` is the negotiated
    /// variant label; it is kept only for observability.
    pub fn new(method: impl Into<String>) -> Self {
        Self { method: method.into(), header_sent: false, recv: RecvState::new() }
    }
}

impl Disguise for HttpDisguiseCodec {
    fn method(&self) -> &str {
        &self.method
    }

    fn server_encode(&mut self, data: Bytes) -> Bytes {
        if self.header_sent {
            return data;
        }
        self.header_sent = true;

        let response_date = date::http_date();
        let mut out =
            BytesMut::with_capacity(RESPONSE_HEAD.len() + response_date.len() + RESPONSE_TAIL.len() + data.len());
        out.put_slice(RESPONSE_HEAD);
        out.put_slice(&response_date);
        out.put_slice(RESPONSE_TAIL);
        out.put_slice(&data);
        trace!(method = %self.method, "emitted disguise response header");
        out.freeze()
    }

    fn server_decode(&mut self, data: Bytes) -> Decoded {
        let buf = match &mut self.recv {
            RecvState::Buffering(buf) => buf,
            RecvState::Passthrough | RecvState::Stripped => return Decoded::Data(data),
        };
        buf.extend_from_slice(&data);

        if buf.len() <= MIN_CLASSIFY_LEN {
            return Decoded::Pending;
        }

        if !buf.starts_with(b"GET /") && !buf.starts_with(b"POST /") {
            // not an http request, the connection runs on the original protocol
            let raw = mem::take(buf).freeze();
            self.header_sent = true;
            self.recv = RecvState::Passthrough;
            trace!(method = %self.method, len = raw.len(), "inbound stream is not disguised, passing through");
            return Decoded::Data(raw);
        }

        let Some(body_start) = split_at_header_end(buf) else {
            return Decoded::Pending;
        };

        let request_line = crlf_lines(buf).next().unwrap_or_default();
        let mut payload = decode_percent_tokens(request_line);
        payload.extend_from_slice(&buf[body_start..]);

        if payload.len() < MIN_PAYLOAD_LEN {
            // header looks complete but carries an implausibly short payload,
            // keep collecting
            return Decoded::Pending;
        }

        self.recv = RecvState::Stripped;
        trace!(method = %self.method, payload_len = payload.len(), "stripped disguise request framing");
        Decoded::Data(payload.freeze())
    }
}

/// Recovers the payload bytes hidden in a percent-encoded request line.
///
/// Every `%`-separated segment after the first contributes the byte named by
/// its first two hex digits. A segment that is not exactly two hex digits
/// (the ` HTTP/1.1` tail, or a truncated final token) contributes whatever
/// prefix still decodes and ends extraction.
fn decode_percent_tokens(line: &[u8]) -> BytesMut {
    let mut out = BytesMut::new();
    let mut tokens = line.split(|byte| *byte == b'%');
    // everything before the first '%' is the method and path prefix
    tokens.next();
    for token in tokens {
        match (token.first().copied().and_then(hex_value), token.get(1).copied().and_then(hex_value)) {
            (Some(high), Some(low)) => out.put_u8((high << 4) | low),
            _ => break,
        }
        if token.len() != 2 {
            break;
        }
    }
    out
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b @ b'0'..=b'9' => Some(b - b'0'),
        b @ b'a'..=b'f' => Some(b - b'a' + 10),
        b @ b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
