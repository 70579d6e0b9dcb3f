use thiserror::Error;

/// Every failure this crate can surface, synchronously, at a call boundary.
///
/// The core never retries or partially succeeds: any variant here aborts
/// the current `pedersen`/hash/sign/verify call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("hex field element {0:?} is missing the 0x prefix")]
    MissingHexPrefix(String),

    #[error("Message not signable, invalid {0} length.")]
    InvalidRange(&'static str),

    #[error("pedersen input not in [0, p): {0}")]
    InvalidInput(String),

    #[error("constant table corrupted: accumulator x collided with addend at index {0}")]
    PointCollision(usize),

    #[error("digest {0} is not in [0, 2^251)")]
    DigestOutOfRange(String),

    #[error("signature component out of range: {0}")]
    SignatureOutOfRange(&'static str),

    #[error("digest hex length {0} is not in 0..=62 or exactly 63")]
    InvalidDigestLength(usize),

    #[error("constant point table invalid: {0}")]
    InvalidConstantTable(String),
}

pub type Result<T> = std::result::Result<T, CryptoError>;
