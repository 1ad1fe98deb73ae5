//! HTTP/2-upgrade disguise dialect (`http2_simple`)
//!
//! The hidden payload rides base64url-encoded in the `HTTP2-Settings` header
//! of an `Upgrade: h2c` request, which on the wire must be the fifth header
//! line. The server answers with a bare `101 Switching Protocols`.

use std::mem;

use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::{alphabet, Engine as _};
use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

use crate::codec::{Disguise, MIN_CLASSIFY_LEN, RecvState, crlf_lines, split_at_header_end};
use crate::protocol::Decoded;

const UPGRADE_RESPONSE: &[u8] = b"HTTP/1.1 101 Switching Protocols\r\nConnection: Upgrade\r\nUpgrade: h2c\r\n\r\n";

const SETTINGS_PREFIX: &[u8] = b"HTTP2-Settings: ";

/// Zero-based position of the settings line within the request.
const SETTINGS_LINE_INDEX: usize = 4;

// clients disagree on whether the settings token carries padding, accept both
const SETTINGS_B64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Server-side codec for the HTTP/2-upgrade disguise dialect.
#[derive(Debug)]
pub struct Http2UpgradeCodec {
    method: String,
    header_sent: bool,
    recv: RecvState,
}

impl Http2UpgradeCodec {
    /// Creates a codec for one connection. `method` is the negotiated
    /// variant label; it is kept only for observability.
    pub fn new(method: impl Into<String>) -> Self {
        Self { method: method.into(), header_sent: false, recv: RecvState::new() }
    }
}

impl Disguise for Http2UpgradeCodec {
    fn method(&self) -> &str {
        &self.method
    }

    fn server_encode(&mut self, data: Bytes) -> Bytes {
        if self.header_sent {
            return data;
        }
        self.header_sent = true;

        let mut out = BytesMut::with_capacity(UPGRADE_RESPONSE.len() + data.len());
        out.put_slice(UPGRADE_RESPONSE);
        out.put_slice(&data);
        trace!(method = %self.method, "emitted switching-protocols header");
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

        // POST is not a valid upgrade request
        if !buf.starts_with(b"GET /") {
            let raw = mem::take(buf).freeze();
            self.header_sent = true;
            self.recv = RecvState::Passthrough;
            trace!(method = %self.method, len = raw.len(), "inbound stream is not disguised, passing through");
            return Decoded::Data(raw);
        }

        let Some(body_start) = split_at_header_end(buf) else {
            return Decoded::Pending;
        };

        // the fifth line must carry the tunneled settings value; until it
        // shows up the request is treated as incomplete, never rejected
        let settings = crlf_lines(buf)
            .nth(SETTINGS_LINE_INDEX)
            .and_then(|line| line.strip_prefix(SETTINGS_PREFIX));
        let Some(settings) = settings else {
            return Decoded::Pending;
        };

        let Ok(prefix) = SETTINGS_B64.decode(settings) else {
            return Decoded::Pending;
        };

        let mut payload = BytesMut::with_capacity(prefix.len() + buf.len() - body_start);
        payload.put_slice(&prefix);
        payload.put_slice(&buf[body_start..]);

        self.recv = RecvState::Stripped;
        trace!(method = %self.method, payload_len = payload.len(), "stripped upgrade request framing");
        Decoded::Data(payload.freeze())
    }
}
