use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetFormatError {
    #[error("The container's magic value does not match the expectation {magic}")]
    InvalidMagicValue { magic: u32 },

    #[error("Unsupported container version {version}")]
    UnsupportedVersion { version: u32 },

    #[error("The container is violating the expected format, because: {reason}")]
    FormatError { reason: &'static str },

    /// Represents all cases of `std::io::Error`, including hitting the end
    /// of the stream mid-chunk.
    #[error(transparent)]
    IOError(#[from] std::io::Error),
}

pub mod common;
pub mod mesh;
