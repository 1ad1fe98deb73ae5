//! Shared vocabulary types for the disguise codecs.

mod error;

pub use error::DisguiseError;

use bytes::Bytes;

/// Outcome of feeding one received chunk through a disguise decoder.
///
/// This is the streaming contract with the transport: [`Decoded::Pending`]
/// asks for more bytes (the codec keeps everything buffered internally),
/// [`Decoded::Data`] hands bytes to the application layer: either the
/// extracted hidden payload, or the unmodified inbound stream once the
/// connection has been classified as not disguised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// Not enough data to classify the stream or strip the disguise yet.
    Pending,
    /// Bytes ready for the application layer.
    Data(Bytes),
}

impl Decoded {
    /// Returns the carried bytes, if any.
    pub fn bytes(&self) -> Option<&Bytes> {
        match self {
            Decoded::Pending => None,
            Decoded::Data(bytes) => Some(bytes),
        }
    }

    /// Returns true while the decoder is still waiting for more input.
    pub fn is_pending(&self) -> bool {
        matches!(self, Decoded::Pending)
    }
}
