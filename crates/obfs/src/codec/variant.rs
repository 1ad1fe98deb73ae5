//! Variant selection and dispatch
//!
//! A plugin host negotiates a disguise method by name and hands the codec to
//! the transport. [`DisguiseVariant`] maps the wire-compatible names to the
//! dialects, [`DisguiseCodec`] is the sum over the concrete codecs, and
//! [`Disguise`] is the capability interface the transport drives. The
//! [`Encoder`]/[`Decoder`] impls let the same codec sit directly inside a
//! `tokio_util` `Framed` transport.

use std::str::FromStr;

use bytes::{Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::codec::{Http2UpgradeCodec, HttpDisguiseCodec};
use crate::protocol::{Decoded, DisguiseError};

/// Disguise dialects this crate can speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisguiseVariant {
    /// Payload hidden in a plain HTTP/1.1 exchange.
    Http,
    /// Payload hidden in an `Upgrade: h2c` handshake.
    Http2Upgrade,
}

impl DisguiseVariant {
    /// Every variant a host can offer during negotiation.
    pub const ALL: [DisguiseVariant; 2] = [DisguiseVariant::Http, DisguiseVariant::Http2Upgrade];

    /// The wire-compatible variant name.
    pub fn name(&self) -> &'static str {
        match self {
            DisguiseVariant::Http => "http_simple",
            DisguiseVariant::Http2Upgrade => "http2_simple",
        }
    }
}

impl FromStr for DisguiseVariant {
    type Err = DisguiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "http_simple" => Ok(DisguiseVariant::Http),
            "http2_simple" => Ok(DisguiseVariant::Http2Upgrade),
            _ => Err(DisguiseError::unknown_variant(s)),
        }
    }
}

/// Capability interface the transport drives on every chunk.
///
/// `server_encode` runs on each outbound chunk before it is written to the
/// socket; `server_decode` runs on each inbound chunk, and only the returned
/// [`Decoded::Data`] bytes are forwarded to the application layer. Both are
/// non-blocking and infallible; a decoder that cannot make progress buffers
/// internally and answers [`Decoded::Pending`].
pub trait Disguise {
    /// The negotiated variant label this instance was built with.
    fn method(&self) -> &str;

    /// Wraps an outbound chunk, emitting the disguise response header
    /// exactly once per connection.
    fn server_encode(&mut self, data: Bytes) -> Bytes;

    /// Classifies the inbound stream and strips disguise framing.
    fn server_decode(&mut self, data: Bytes) -> Decoded;

    /// Client-side encoding is not implemented upstream; identity for now.
    fn client_encode(&mut self, data: Bytes) -> Bytes {
        data
    }

    /// Client-side counterpart of [`Disguise::client_encode`]; identity.
    fn client_decode(&mut self, data: Bytes) -> Decoded {
        Decoded::Data(data)
    }
}

/// A disguise codec of either dialect, one instance per connection.
#[derive(Debug)]
pub enum DisguiseCodec {
    Http(HttpDisguiseCodec),
    Http2Upgrade(Http2UpgradeCodec),
}

impl DisguiseCodec {
    pub fn new(variant: DisguiseVariant) -> Self {
        match variant {
            DisguiseVariant::Http => DisguiseCodec::Http(HttpDisguiseCodec::new(variant.name())),
            DisguiseVariant::Http2Upgrade => {
                DisguiseCodec::Http2Upgrade(Http2UpgradeCodec::new(variant.name()))
            }
        }
    }

    /// Looks a variant up by its wire name, the way a host selects the
    /// negotiated method.
    pub fn from_name(name: &str) -> Result<Self, DisguiseError> {
        name.parse().map(DisguiseCodec::new)
    }

    pub fn variant(&self) -> DisguiseVariant {
        match self {
            DisguiseCodec::Http(_) => DisguiseVariant::Http,
            DisguiseCodec::Http2Upgrade(_) => DisguiseVariant::Http2Upgrade,
        }
    }
}

impl Disguise for DisguiseCodec {
    fn method(&self) -> &str {
        match self {
            DisguiseCodec::Http(codec) => codec.method(),
            DisguiseCodec::Http2Upgrade(codec) => codec.method(),
        }
    }

    fn server_encode(&mut self, data: Bytes) -> Bytes {
        match self {
            DisguiseCodec::Http(codec) => codec.server_encode(data),
            DisguiseCodec::Http2Upgrade(codec) => codec.server_encode(data),
        }
    }

    fn server_decode(&mut self, data: Bytes) -> Decoded {
        match self {
            DisguiseCodec::Http(codec) => codec.server_decode(data),
            DisguiseCodec::Http2Upgrade(codec) => codec.server_decode(data),
        }
    }
}

impl Encoder<Bytes> for DisguiseCodec {
    type Error = DisguiseError;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.extend_from_slice(&self.server_encode(item));
        Ok(())
    }
}

impl Decoder for DisguiseCodec {
    type Item = Bytes;
    type Error = DisguiseError;

    /// Yields stripped payload frames; `Ok(None)` while the disguise header
    /// is still incomplete.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }
        match self.server_decode(src.split().freeze()) {
            Decoded::Pending => Ok(None),
            Decoded::Data(payload) if payload.is_empty() => Ok(None),
            Decoded::Data(payload) => Ok(Some(payload)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_names_round_trip() {
        for variant in DisguiseVariant::ALL {
            assert_eq!(variant.name().parse::<DisguiseVariant>().unwrap(), variant);
        }
        assert!(matches!(
            "tls_simple".parse::<DisguiseVariant>(),
            Err(DisguiseError::UnknownVariant { .. })
        ));
    }

    #[test]
    fn from_name_selects_the_dialect() {
        let codec = DisguiseCodec::from_name("http2_simple").unwrap();
        assert_eq!(codec.variant(), DisguiseVariant::Http2Upgrade);
        assert_eq!(codec.method(), "http2_simple");

        let codec = DisguiseCodec::from_name("http_simple").unwrap();
        assert_eq!(codec.variant(), DisguiseVariant::Http);
    }

    #[test]
    fn client_direction_is_identity() {
        let mut codec = DisguiseCodec::from_name("http_simple").unwrap();
        let data = Bytes::from_static(b"untouched");
        assert_eq!(codec.client_encode(data.clone()), data);
        assert_eq!(codec.client_decode(data.clone()), Decoded::Data(data));
    }

    #[test]
    fn decoder_buffers_until_a_frame_is_ready() {
        let mut codec = DisguiseCodec::new(DisguiseVariant::Http);
        let mut src = BytesMut::from(&b"GET /%30%31%32%33%34%35%36%37%38%39%61%62%63%64%65"[..]);
        assert!(codec.decode(&mut src).unwrap().is_none());

        src.extend_from_slice(b" HTTP/1.1\r\nHost: example.com\r\n\r\n");
        let frame = codec.decode(&mut src).unwrap().expect("complete request");
        assert_eq!(&frame[..], b"0123456789abcde");
        assert!(src.is_empty());
    }

    #[test]
    fn encoder_prefixes_the_first_frame_only() {
        let mut codec = DisguiseCodec::new(DisguiseVariant::Http2Upgrade);
        let mut dst = BytesMut::new();
        codec.encode(Bytes::from_static(b"one"), &mut dst).unwrap();
        codec.encode(Bytes::from_static(b"two"), &mut dst).unwrap();
        assert!(dst.starts_with(b"HTTP/1.1 101 Switching Protocols\r\n"));
        assert!(dst.ends_with(b"\r\n\r\nonetwo"));
    }

    #[tokio::test]
    async fn framed_connection_round_trip() {
        use futures::{SinkExt, StreamExt};
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio_util::codec::Framed;

        let (mut client, server) = tokio::io::duplex(4096);
        let mut framed = Framed::new(server, DisguiseCodec::from_name("http_simple").unwrap());

        client
            .write_all(
                b"GET /%30%31%32%33%34%35%36%37%38%39%61%62%63%64%65 HTTP/1.1\r\nHost: example.com\r\n\r\n",
            )
            .await
            .unwrap();

        let payload = framed.next().await.unwrap().unwrap();
        assert_eq!(&payload[..], b"0123456789abcde");

        framed.send(payload).await.unwrap();
        let mut response = vec![0u8; 1024];
        let n = client.read(&mut response).await.unwrap();
        let response = &response[..n];
        assert!(response.starts_with(b"HTTP/1.1 200 OK\r\n"));
        assert!(response.ends_with(b"\r\n\r\n0123456789abcde"));
    }
}
