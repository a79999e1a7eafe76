//! This crate implements the credential side of HTTP Digest Auth as specified by
//! IETF RFC 2617, including RFC 2069 compatibility. Only `MD5` and `MD5-sess` with
//! `qop=auth` (or no qop) are supported.
//!
//! It does two things:
//!
//! - parse a `Digest k1=v1, k2="v2", ...` header into its parameters and, on the receiving
//!   side, into [`DigestAuthClientCredentials`] that can be verified against a password;
//! - compute the response digest for a challenge on the sending side.
//!
//! Headers come from the network, so parsing never fails loudly: it returns `None` and
//! reports what went wrong to a [`DiagnosticSink`]. Computing credentials takes arguments
//! from the program itself, and returns an [`Error`] for combinations that would give a
//! wrong digest.
//!
//! # Examples
//!
//! Sending side:
//!
//! ```
//! use digest_creds::{DigestChallenge, LogSink};
//!
//! // Value from the WWW-Authenticate HTTP header (usually in a HTTP 401 response)
//! let www_authenticate = r#"Digest realm="testrealm@host.com", qop="auth,auth-int", nonce="dcd98b7102dd2f0e8b11d0f600bfb0c093", opaque="5ccc069c403ebaf9f0171e9517f40e41""#;
//!
//! let challenge = DigestChallenge::parse(www_authenticate, LogSink).unwrap();
//!
//! // For this test, we inject a custom cnonce. Pass None to have one generated.
//! let creds = challenge
//!     .respond("GET", "/dir/index.html", "Mufasa", "Circle Of Life", Some("0a4f113b"), 1)
//!     .unwrap();
//!
//! assert_eq!(creds.response(), "6629fae49393a05397450978507c4ef1");
//! assert_eq!(creds.nonce_count(), Some("00000001"));
//! ```
//!
//! Receiving side:
//!
//! ```
//! let authorization = r#"Digest username="Mufasa", realm="testrealm@host.com", nonce="dcd98b7102dd2f0e8b11d0f600bfb0c093", uri="/dir/index.html", qop=auth, nc=00000001, cnonce="0a4f113b", response="6629fae49393a05397450978507c4ef1", opaque="5ccc069c403ebaf9f0171e9517f40e41""#;
//!
//! let params = digest_creds::parse(authorization).unwrap();
//! let creds = digest_creds::extract_credentials(&params, digest_creds::LogSink).unwrap();
//!
//! assert_eq!(creds.username(), "Mufasa");
//! assert!(creds.verify("GET", "Circle Of Life"));
//! ```

mod challenge;
mod credentials;
mod diag;
mod digest;
mod enums;
mod error;
mod params;
mod utils;

pub use error::{Error, Result};

pub use crate::challenge::DigestChallenge;
pub use crate::credentials::{extract_credentials, DigestAuthClientCredentials};
pub use crate::diag::{Diagnostic, DiagnosticSink, LogSink, NoopSink};
pub use crate::digest::{compute_client_credentials, ClientRequest};
pub use crate::enums::*;
pub use crate::params::{parse_header_map, ParamMap};
pub use crate::utils::{format_nonce_count, generate_client_nonce};

/// Parse a `Digest` header value, logging problems through the `log` crate.
/// It's just a convenience method to call [`parse_header_map()`] with a [`LogSink`].
pub fn parse(header: &str) -> Option<ParamMap> {
    parse_header_map(Some(header), LogSink)
}

/// Parse a `Digest` header value, reporting problems to `sink`.
pub fn parse_with<S: DiagnosticSink>(header: &str, sink: S) -> Option<ParamMap> {
    parse_header_map(Some(header), sink)
}

/// Parse straight from a header map entry.
///
/// Values that aren't visible ASCII are treated like any other malformed header.
#[cfg(feature = "http")]
pub fn parse_header_value<S: DiagnosticSink>(
    value: &http::HeaderValue,
    mut sink: S,
) -> Option<ParamMap> {
    match value.to_str() {
        Ok(s) => parse_header_map(Some(s), sink),
        Err(_) => {
            sink.report(Diagnostic::InvalidEncoding);
            None
        }
    }
}

#[test]
fn test_parse_extract_verify() {
    let src = r#"Digest username="Mufasa", realm="testrealm@host.com", nonce="dcd98b7102dd2f0e8b11d0f600bfb0c093", uri="/dir/index.html", response="1949323746fe6a43ef61f9606e7febea", opaque="5ccc069c403ebaf9f0171e9517f40e41""#;

    let mut diags = Vec::new();
    let params = crate::parse_with(src, &mut diags).unwrap();
    let creds = crate::extract_credentials(&params, &mut diags).unwrap();
    assert!(diags.is_empty());

    assert!(creds.verify("GET", "CircleOfLife"));

    let computed = crate::compute_client_credentials(&ClientRequest {
        method: "GET",
        digest_uri: creds.digest_uri(),
        username: creds.username(),
        password: "CircleOfLife",
        realm: creds.realm(),
        server_nonce: creds.nonce(),
        opaque: creds.opaque(),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(computed, creds);
}

#[cfg(feature = "http")]
#[test]
fn test_parse_header_value() {
    let value = http::HeaderValue::from_static(r#"Digest realm="aaa", nonce="bbb""#);
    let params = crate::parse_header_value(&value, NoopSink).unwrap();
    assert_eq!(params.get("realm"), Some("aaa"));

    let value = http::HeaderValue::from_bytes(b"Digest realm=\"\xe9\"").unwrap();
    let mut diags = Vec::new();
    assert_eq!(crate::parse_header_value(&value, &mut diags), None);
    assert_eq!(diags, vec![Diagnostic::InvalidEncoding]);
}
