use crate::diag::{Diagnostic, DiagnosticSink};
use crate::digest::{compute_client_credentials, ClientRequest};
use crate::enums::{Algorithm, Qop};
use crate::params::{parse_header_map, report_unexpected, ParamMap};
use crate::utils::generate_client_nonce;
use crate::{DigestAuthClientCredentials, Result};
use std::str::FromStr;

const KNOWN_PARAMS: &[&str] = &[
    "realm",
    "nonce",
    "opaque",
    "stale",
    "algorithm",
    "qop",
    "domain",
];

/// A `WWW-Authenticate: Digest ...` challenge received from a server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestChallenge {
    /// Domain is a list of URIs that will accept the same digest.
    /// None if not given (i.e applies to all)
    pub domain: Option<Vec<String>>,
    /// Authorization realm (i.e. hostname, serial number...)
    pub realm: String,
    /// Server nonce
    pub nonce: String,
    /// Server opaque string
    pub opaque: Option<String>,
    /// True if the server nonce expired.
    /// The previous credentials were fine, retry with the new nonce.
    pub stale: bool,
    /// Hashing algo, `None` when the server left it out
    pub algorithm: Option<Algorithm>,
    /// `Some(Qop::Auth)` if the server offered `auth`, `None` in legacy compat mode (RFC 2069)
    pub qop: Option<Qop>,
}

impl DigestChallenge {
    /// Parse a `WWW-Authenticate` header value
    pub fn parse<S: DiagnosticSink>(header: &str, mut sink: S) -> Option<Self> {
        let params = parse_header_map(Some(header), &mut sink)?;
        Self::from_params(&params, sink)
    }

    /// Interpret parsed challenge parameters.
    ///
    /// Returns `None` when `realm` or `nonce` is missing, the algorithm is not
    /// supported, or `qop` is given but does not offer `auth`.
    pub fn from_params<S: DiagnosticSink>(params: &ParamMap, mut sink: S) -> Option<Self> {
        report_unexpected(params, KNOWN_PARAMS, &mut sink);

        let realm = match params.get("realm") {
            Some(v) => v.to_string(),
            None => {
                sink.report(Diagnostic::MissingParam("realm"));
                return None;
            }
        };
        let nonce = match params.get("nonce") {
            Some(v) => v.to_string(),
            None => {
                sink.report(Diagnostic::MissingParam("nonce"));
                return None;
            }
        };

        let algorithm = match params.get("algorithm") {
            Some(a) => match Algorithm::from_str(a) {
                Ok(algo) => Some(algo),
                Err(_) => {
                    sink.report(Diagnostic::UnsupportedValue {
                        name: "algorithm",
                        value: a.to_string(),
                    });
                    return None;
                }
            },
            None => None,
        };

        // qop is a list of options, "auth-int" is skipped
        let qop = match params.get("qop") {
            Some(options) => {
                if options.split(',').any(|o| o.trim() == "auth") {
                    Some(Qop::Auth)
                } else {
                    sink.report(Diagnostic::UnsupportedValue {
                        name: "qop",
                        value: options.to_string(),
                    });
                    return None;
                }
            }
            None => None,
        };

        Some(Self {
            domain: params.get("domain").map(|d| {
                d.split(' ')
                    .filter(|x| !x.is_empty())
                    .map(str::to_string)
                    .collect()
            }),
            realm,
            nonce,
            opaque: params.get("opaque").map(str::to_string),
            stale: params
                .get("stale")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            algorithm,
            qop,
        })
    }

    /// Compute the credentials answering this challenge.
    ///
    /// `nonce_count` counts the requests made with this challenge's nonce, starting at 1.
    /// If `client_nonce` is `None` and one is needed, a random one is generated.
    pub fn respond(
        &self,
        method: &str,
        uri: &str,
        username: &str,
        password: &str,
        client_nonce: Option<&str>,
        nonce_count: i64,
    ) -> Result<DigestAuthClientCredentials> {
        let needs_cnonce =
            self.qop.is_some() || self.algorithm.map(Algorithm::is_session).unwrap_or(false);

        let generated;
        let client_nonce = match client_nonce {
            Some(c) => Some(c),
            None if needs_cnonce => {
                generated = generate_client_nonce();
                Some(generated.as_str())
            }
            None => None,
        };

        compute_client_credentials(&ClientRequest {
            method,
            digest_uri: uri,
            username,
            password,
            realm: &self.realm,
            server_nonce: &self.nonce,
            algorithm: self.algorithm.map(Algorithm::as_str),
            client_nonce,
            opaque: self.opaque.as_deref(),
            qop: self.qop.map(Qop::as_str),
            nonce_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::NoopSink;

    #[test]
    fn test_challenge_parse() {
        {
            // most things are parsed here...
            let src = "Digest realm=\"api@example.org\", qop=\"auth, auth-int\", \
                       domain=\"/my/nice/url /login /logout\", algorithm=MD5-sess, \
                       nonce=\"5TsQWLVdgBdmrQ0XsxbDODV+57QdFR34I9HAbC/RVvkK\", \
                       opaque=\"HRPCssKJSGjCrkzDg8OhwpzCiGPChXYjwrI2QmXDnsOS\", stale=TRUE";

            let parsed = DigestChallenge::parse(src, NoopSink).unwrap();

            assert_eq!(
                parsed,
                DigestChallenge {
                    domain: Some(vec![
                        "/my/nice/url".to_string(),
                        "/login".to_string(),
                        "/logout".to_string(),
                    ]),
                    realm: "api@example.org".to_string(),
                    nonce: "5TsQWLVdgBdmrQ0XsxbDODV+57QdFR34I9HAbC/RVvkK".to_string(),
                    opaque: Some("HRPCssKJSGjCrkzDg8OhwpzCiGPChXYjwrI2QmXDnsOS".to_string()),
                    stale: true,
                    algorithm: Some(Algorithm::Md5Sess),
                    qop: Some(Qop::Auth),
                }
            )
        }

        {
            // verify some defaults
            let src = r#"Digest realm="aaa", nonce="bbb""#;
            let parsed = DigestChallenge::parse(src, NoopSink).unwrap();

            assert_eq!(
                parsed,
                DigestChallenge {
                    domain: None,
                    realm: "aaa".to_string(),
                    nonce: "bbb".to_string(),
                    opaque: None,
                    stale: false,
                    algorithm: None,
                    qop: None,
                }
            )
        }
    }

    #[test]
    fn test_challenge_rejects() {
        let mut diags = Vec::new();
        let src = r#"Digest realm="a", nonce="b", algorithm=SHA-256"#;
        assert_eq!(DigestChallenge::parse(src, &mut diags), None);
        assert_eq!(
            diags,
            vec![Diagnostic::UnsupportedValue {
                name: "algorithm",
                value: "SHA-256".into()
            }]
        );

        let mut diags = Vec::new();
        let src = r#"Digest realm="a", nonce="b", qop="auth-int""#;
        assert_eq!(DigestChallenge::parse(src, &mut diags), None);
        assert_eq!(
            diags,
            vec![Diagnostic::UnsupportedValue {
                name: "qop",
                value: "auth-int".into()
            }]
        );

        let mut diags = Vec::new();
        assert_eq!(
            DigestChallenge::parse(r#"Digest realm="a", charset=UTF-8"#, &mut diags),
            None
        );
        assert_eq!(
            diags,
            vec![
                Diagnostic::UnexpectedParam("charset".into()),
                Diagnostic::MissingParam("nonce")
            ]
        );
    }

    #[test]
    fn test_respond_rfc2617() {
        let src = "Digest realm=\"testrealm@host.com\", qop=\"auth,auth-int\", \
                   nonce=\"dcd98b7102dd2f0e8b11d0f600bfb0c093\", \
                   opaque=\"5ccc069c403ebaf9f0171e9517f40e41\"";

        let challenge = DigestChallenge::parse(src, NoopSink).unwrap();
        let creds = challenge
            .respond("GET", "/dir/index.html", "Mufasa", "Circle Of Life", Some("0a4f113b"), 1)
            .unwrap();

        assert_eq!(creds.response(), "6629fae49393a05397450978507c4ef1");
        assert_eq!(creds.opaque(), Some("5ccc069c403ebaf9f0171e9517f40e41"));
        assert_eq!(creds.nonce_count(), Some("00000001"));
        assert!(creds.verify("GET", "Circle Of Life"));
    }

    #[test]
    fn test_respond_generates_cnonce() {
        let challenge =
            DigestChallenge::parse(r#"Digest realm="r", nonce="n", qop="auth""#, NoopSink).unwrap();
        let creds = challenge.respond("GET", "/", "user", "pw", None, 1).unwrap();
        assert_eq!(creds.client_nonce().map(str::len), Some(32));
        assert!(creds.verify("GET", "pw"));

        // legacy mode doesn't need one
        let challenge = DigestChallenge::parse(r#"Digest realm="r", nonce="n""#, NoopSink).unwrap();
        let creds = challenge.respond("GET", "/", "user", "pw", None, 1).unwrap();
        assert_eq!(creds.client_nonce(), None);
        assert!(creds.verify("GET", "pw"));
    }
}
