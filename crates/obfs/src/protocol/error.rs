use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DisguiseError {
    #[error("unknown obfuscation variant: {name}")]
    UnknownVariant { name: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl DisguiseError {
    pub fn unknown_variant<S: ToString>(name: S) -> Self {
        Self::UnknownVariant { name: name.to_string() }
    }
}
