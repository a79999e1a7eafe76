use crate::credentials::DigestAuthClientCredentials;
use crate::enums::{md5_hex, Algorithm, Qop};
use crate::utils::format_nonce_count;
use crate::{Error::*, Result};

/// Everything needed to compute the credentials for one request.
///
/// All fields are borrowed; the struct is meant to be filled in right before the request
/// is sent and dropped afterwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientRequest<'a> {
    /// HTTP method exactly as sent on the wire (uppercase)
    pub method: &'a str,
    /// Request target, the `uri` parameter
    pub digest_uri: &'a str,
    /// Login username
    pub username: &'a str,
    /// Login password (plain), may be empty
    pub password: &'a str,
    /// Realm from the challenge
    pub realm: &'a str,
    /// Nonce from the challenge
    pub server_nonce: &'a str,
    /// `MD5` or `MD5-sess`; `None` means `MD5`
    pub algorithm: Option<&'a str>,
    /// Client nonce, required with qop or `MD5-sess`
    pub client_nonce: Option<&'a str>,
    /// Opaque from the challenge, passed through
    pub opaque: Option<&'a str>,
    /// `auth`, or `None` for RFC 2069 compatibility
    pub qop: Option<&'a str>,
    /// Requests sent with this server nonce so far, including this one
    pub nonce_count: i64,
}

fn require(value: &str, what: &'static str) -> Result<()> {
    if value.is_empty() {
        return Err(MissingArgument(what));
    }
    Ok(())
}

/// Compute the RFC 2617 response digest and return the credentials to send.
///
/// # Errors
///
/// Fails instead of producing a wrong digest when: a required argument is empty,
/// the algorithm is not `MD5` or `MD5-sess`, qop is anything but `auth`, qop is given
/// without a client nonce or with a nonce count below 1, or `MD5-sess` is used without
/// a client nonce.
pub fn compute_client_credentials(req: &ClientRequest) -> Result<DigestAuthClientCredentials> {
    require(req.method, "method")?;
    require(req.digest_uri, "digest_uri")?;
    require(req.username, "username")?;
    require(req.realm, "realm")?;
    require(req.server_nonce, "server_nonce")?;

    let algorithm = match req.algorithm {
        Some(a) => a.parse::<Algorithm>()?,
        None => Algorithm::default(),
    };

    let qop = req.qop.map(str::parse::<Qop>).transpose()?;

    let client_nonce = req.client_nonce.filter(|c| !c.is_empty());

    let nonce_count = match qop {
        Some(_) => {
            if client_nonce.is_none() {
                return Err(MissingClientNonce("qop"));
            }
            Some(format_nonce_count(req.nonce_count).ok_or(BadNonceCount(req.nonce_count))?)
        }
        None => None,
    };

    let mut ha1 = md5_hex(&format!(
        "{name}:{realm}:{pw}",
        name = req.username,
        realm = req.realm,
        pw = req.password
    ));

    if algorithm.is_session() {
        let cnonce = client_nonce.ok_or(MissingClientNonce("MD5-sess"))?;
        ha1 = md5_hex(&format!(
            "{ha1}:{nonce}:{cnonce}",
            ha1 = ha1,
            nonce = req.server_nonce,
            cnonce = cnonce
        ));
    }

    let ha2 = md5_hex(&format!(
        "{method}:{uri}",
        method = req.method,
        uri = req.digest_uri
    ));

    let response = match (qop, &nonce_count, client_nonce) {
        (Some(q), Some(nc), Some(cnonce)) => md5_hex(&format!(
            "{ha1}:{nonce}:{nc}:{cnonce}:{qop}:{ha2}",
            ha1 = ha1,
            nonce = req.server_nonce,
            nc = nc,
            cnonce = cnonce,
            qop = q,
            ha2 = ha2
        )),
        // RFC 2069 compatibility
        _ => md5_hex(&format!(
            "{ha1}:{nonce}:{ha2}",
            ha1 = ha1,
            nonce = req.server_nonce,
            ha2 = ha2
        )),
    };

    log::trace!(
        "computed digest response for {} {} (algorithm={}, qop={:?}, nc={:?})",
        req.method,
        req.digest_uri,
        algorithm,
        qop,
        nonce_count
    );

    Ok(DigestAuthClientCredentials {
        username: req.username.to_string(),
        realm: req.realm.to_string(),
        nonce: req.server_nonce.to_string(),
        digest_uri: req.digest_uri.to_string(),
        response,
        algorithm: req.algorithm.map(str::to_string),
        client_nonce: req.client_nonce.map(str::to_string),
        opaque: req.opaque.map(str::to_string),
        qop: qop.map(|q| q.to_string()),
        nonce_count,
    })
}
