use crate::diag::{Diagnostic, DiagnosticSink};
use crate::digest::{compute_client_credentials, ClientRequest};
use crate::params::{report_unexpected, ParamMap};
use crate::utils::{constant_time_eq, parse_nonce_count};

/// Parameter names the extractor understands
const KNOWN_PARAMS: &[&str] = &[
    "username",
    "realm",
    "nonce",
    "uri",
    "response",
    "algorithm",
    "cnonce",
    "opaque",
    "qop",
    "nc",
];

/// Credentials for one Digest Auth exchange, i.e. the content of an `Authorization` header.
///
/// Built either by [`extract_credentials()`] from a received header, or by
/// [`compute_client_credentials()`](crate::compute_client_credentials) when sending one.
/// There are no setters; build a new value for every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestAuthClientCredentials {
    pub(crate) username: String,
    pub(crate) realm: String,
    pub(crate) nonce: String,
    pub(crate) digest_uri: String,
    pub(crate) response: String,
    pub(crate) algorithm: Option<String>,
    pub(crate) client_nonce: Option<String>,
    pub(crate) opaque: Option<String>,
    pub(crate) qop: Option<String>,
    pub(crate) nonce_count: Option<String>,
}

impl DigestAuthClientCredentials {
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Protection domain declared by the server
    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// Server nonce
    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    /// The `uri` parameter. The caller checks that it matches the request target.
    pub fn digest_uri(&self) -> &str {
        &self.digest_uri
    }

    /// Lowercase hex digest proving knowledge of the password
    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn algorithm(&self) -> Option<&str> {
        self.algorithm.as_deref()
    }

    /// The `cnonce` parameter
    pub fn client_nonce(&self) -> Option<&str> {
        self.client_nonce.as_deref()
    }

    pub fn opaque(&self) -> Option<&str> {
        self.opaque.as_deref()
    }

    pub fn qop(&self) -> Option<&str> {
        self.qop.as_deref()
    }

    /// The `nc` parameter, eight hex digits
    pub fn nonce_count(&self) -> Option<&str> {
        self.nonce_count.as_deref()
    }

    /// Check `response` against the digest expected for `method` and `password`.
    ///
    /// The received fields go through the same computation a client would do, so any
    /// inconsistency (qop without cnonce or nc, unknown algorithm, `auth-int`, a
    /// malformed nc) makes verification fail. Never panics.
    pub fn verify(&self, method: &str, password: &str) -> bool {
        let nonce_count = match self.nonce_count.as_deref() {
            Some(nc) => match parse_nonce_count(nc) {
                Some(n) => n,
                None => {
                    log::debug!("digest auth: nc \"{}\" is not 8 lowercase hex digits", nc);
                    return false;
                }
            },
            None => 0,
        };

        let request = ClientRequest {
            method,
            digest_uri: &self.digest_uri,
            username: &self.username,
            password,
            realm: &self.realm,
            server_nonce: &self.nonce,
            algorithm: self.algorithm.as_deref(),
            client_nonce: self.client_nonce.as_deref(),
            opaque: self.opaque.as_deref(),
            qop: self.qop.as_deref(),
            nonce_count,
        };

        match compute_client_credentials(&request) {
            Ok(expected) => {
                constant_time_eq(expected.response.as_bytes(), self.response.as_bytes())
            }
            Err(e) => {
                log::debug!(
                    "digest auth: cannot verify credentials of {}: {}",
                    self.username,
                    e
                );
                false
            }
        }
    }
}

/// Build credentials from the parameters of a received `Authorization` header.
///
/// `username`, `realm`, `nonce`, `uri` and `response` are required; if one is missing
/// this returns `None` and tells `sink` which. The optional parameters are copied as they
/// are, without checking them against each other;
/// [`verify()`](DigestAuthClientCredentials::verify) catches inconsistent combinations.
/// Unknown parameters are reported and otherwise ignored.
pub fn extract_credentials<S: DiagnosticSink>(
    params: &ParamMap,
    mut sink: S,
) -> Option<DigestAuthClientCredentials> {
    report_unexpected(params, KNOWN_PARAMS, &mut sink);

    let mut required = |name: &'static str| match params.get(name) {
        Some(v) => Some(v.to_string()),
        None => {
            sink.report(Diagnostic::MissingParam(name));
            None
        }
    };

    let username = required("username")?;
    let realm = required("realm")?;
    let nonce = required("nonce")?;
    let digest_uri = required("uri")?;
    let response = required("response")?;

    let optional = |name: &str| params.get(name).map(str::to_string);

    Some(DigestAuthClientCredentials {
        username,
        realm,
        nonce,
        digest_uri,
        response,
        algorithm: optional("algorithm"),
        client_nonce: optional("cnonce"),
        opaque: optional("opaque"),
        qop: optional("qop"),
        nonce_count: optional("nc"),
    })
}
