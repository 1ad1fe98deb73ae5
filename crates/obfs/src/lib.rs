//! HTTP disguise codecs for tunneled byte streams
//!
//! This crate makes an opaque tunneled byte stream look like an ordinary web
//! exchange. On the outbound (server to client) path a synthetic HTTP
//! response header is emitted exactly once in front of the real traffic; on
//! the inbound (client to server) path the first bytes are classified, the
//! payload hidden inside the disguised request is extracted, and all HTTP
//! framing is stripped. A stream that never looked like HTTP in the first
//! place is passed through unmodified, so the disguise stays optional.
//!
//! # Features
//!
//! - HTTP/1.1 dialect: payload percent-encoded into a GET/POST request line,
//!   answered with a plausible `200 OK` response
//! - HTTP/2-upgrade dialect: payload base64url-encoded into an
//!   `HTTP2-Settings` header, answered with `101 Switching Protocols`
//! - Transparent passthrough fallback for non-HTTP peers
//! - Incremental decoding with internal buffering, one instance per
//!   connection
//! - [`tokio_util::codec`] adapters for use with `Framed` transports
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use http_disguise::codec::{Disguise, DisguiseCodec};
//! use http_disguise::protocol::Decoded;
//!
//! let mut codec = DisguiseCodec::from_name("http_simple").expect("known variant");
//!
//! // outbound: only the first chunk gains the synthetic response header
//! let first = codec.server_encode(Bytes::from_static(b"tunneled bytes"));
//! assert!(first.starts_with(b"HTTP/1.1 200 OK\r\n"));
//! let second = codec.server_encode(Bytes::from_static(b"more bytes"));
//! assert_eq!(&second[..], b"more bytes");
//!
//! // inbound: a disguised request gives up its hidden payload
//! let request = Bytes::from_static(
//!     b"GET /%74%75%6e%6e%65%6c%65%64%20%70%61%79%6c%6f%61%64 HTTP/1.1\r\nHost: example.com\r\n\r\n",
//! );
//! match codec.server_decode(request) {
//!     Decoded::Data(payload) => assert_eq!(&payload[..], b"tunneled payload"),
//!     Decoded::Pending => unreachable!(),
//! }
//! ```
//!
//! # Architecture
//!
//! The crate is organized into two modules:
//!
//! - [`codec`]: the per-dialect encode/decode state machines and the
//!   [`codec::DisguiseCodec`] sum type that dispatches between them
//! - [`protocol`]: the shared vocabulary types ([`protocol::Decoded`],
//!   [`protocol::DisguiseError`])
//!
//! A transport owns one codec instance per connection and drives it strictly
//! sequentially: every outbound chunk goes through
//! [`codec::Disguise::server_encode`] before it is written, every inbound
//! chunk goes through [`codec::Disguise::server_decode`] before payload is
//! forwarded to the application layer. Decoding never blocks and never
//! fails; insufficient data is buffered and reported as
//! [`protocol::Decoded::Pending`].
//!
//! # Limitations
//!
//! - Only the server side of the exchange is implemented; the client-side
//!   operations are identity placeholders
//! - The inbound buffer is unbounded while a disguise header is still
//!   incomplete. A peer that trickles bytes without ever completing the
//!   handshake grows the buffer indefinitely; connection size and time
//!   limits are the transport's responsibility

pub mod codec;
pub mod protocol;

mod date;
