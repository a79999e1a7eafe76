use std::result;
use thiserror::Error;

/// Invalid arguments passed to the credential computation.
///
/// These describe programming errors on the calling side. Malformed headers coming
/// from the network never produce an `Error`; the parser and extractor return `None`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("unsupported qop: {0}")]
    BadQop(String),

    #[error("client nonce required by {0}")]
    MissingClientNonce(&'static str),

    #[error("nonce count must be positive when qop is used, got {0}")]
    BadNonceCount(i64),
}

pub type Result<T> = result::Result<T, Error>;
