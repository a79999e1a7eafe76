use crate::utils::latin1_bytes;
use crate::{Error, Error::*, Result};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use digest::Digest;
use md5::Md5;

/// Digest algorithm. Both variants hash with MD5.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Algorithm {
    /// `MD5`, the default when the parameter is left out
    Md5,
    /// `MD5-sess`, HA1 is re-hashed with the server and client nonces
    Md5Sess,
}

impl Algorithm {
    /// True for the `-sess` variant
    pub fn is_session(self) -> bool {
        self == Algorithm::Md5Sess
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Md5 => "MD5",
            Algorithm::Md5Sess => "MD5-sess",
        }
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    /// Parse from the format used in the `algorithm` parameter
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "MD5" => Ok(Algorithm::Md5),
            "MD5-sess" => Ok(Algorithm::Md5Sess),
            _ => Err(UnknownAlgorithm(s.into())),
        }
    }
}

impl Default for Algorithm {
    fn default() -> Self {
        Algorithm::Md5
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quality of protection. `auth-int` is not supported.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Qop {
    Auth,
}

impl Qop {
    pub fn as_str(self) -> &'static str {
        match self {
            Qop::Auth => "auth",
        }
    }
}

impl FromStr for Qop {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "auth" => Ok(Qop::Auth),
            _ => Err(BadQop(s.into())),
        }
    }
}

impl Display for Qop {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// MD5 of the Latin-1 encoding of `input`, as lowercase hex
pub(crate) fn md5_hex(input: &str) -> String {
    let mut hash = Md5::new();
    hash.update(latin1_bytes(input));
    hex::encode(hash.finalize())
}
