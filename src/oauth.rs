// OAuth 1.0a request signing (RFC 5849) for Twitter's user-context
// endpoints. Only HMAC-SHA1 is supported since that is all Twitter accepts
// for this flow. The signature covers the HTTP method, the bare URL and any
// query/form parameters; JSON and multipart bodies are never signed.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha1::Sha1;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::creds::Credentials;
use crate::error::{PostError, PostResult};

/// RFC 3986: everything but ALPHA / DIGIT / "-" / "." / "_" / "~" gets
/// percent-encoded.
const RESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Signs outgoing requests with a fixed credential set.
#[derive(Debug, Clone)]
pub struct OauthSigner {
    creds: Credentials,
}

impl OauthSigner {
    pub fn new(creds: &Credentials) -> Self {
        OauthSigner {
            creds: creds.clone(),
        }
    }

    /// Produce the `Authorization` header value for one request.
    ///
    /// `url` must be the request URL without any query string; query and
    /// form parameters go in `params` instead so they are signed correctly.
    pub fn authorization_header(
        &self,
        method: &str,
        url: &str,
        params: &[(String, String)],
    ) -> PostResult<String> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| PostError::Unexpected(format!("system clock error: {e}")))?
            .as_secs()
            .to_string();
        self.header_with(method, url, params, &timestamp, &nonce())
    }

    // Split out so tests can pin timestamp and nonce.
    fn header_with(
        &self,
        method: &str,
        url: &str,
        params: &[(String, String)],
        timestamp: &str,
        nonce: &str,
    ) -> PostResult<String> {
        let mut oauth_params = vec![
            ("oauth_consumer_key", self.creds.consumer_key.as_str()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", timestamp),
            ("oauth_token", self.creds.access_token.as_str()),
            ("oauth_version", "1.0"),
        ];

        let base = signature_base(method, url, &oauth_params, params);
        let key = format!(
            "{}&{}",
            encode(&self.creds.consumer_secret),
            encode(&self.creds.access_token_secret)
        );
        let signature = hmac_sha1(&key, &base)?;

        oauth_params.push(("oauth_signature", signature.as_str()));
        let fields = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!("OAuth {fields}"))
    }
}

/// Build the RFC 5849 signature base string: uppercase method, encoded bare
/// URL, and the encoded lexicographically-sorted parameter string.
fn signature_base(
    method: &str,
    url: &str,
    oauth_params: &[(&str, &str)],
    request_params: &[(String, String)],
) -> String {
    let mut pairs: Vec<(String, String)> = oauth_params
        .iter()
        .map(|(k, v)| (encode(k), encode(v)))
        .chain(
            request_params
                .iter()
                .map(|(k, v)| (encode(k), encode(v))),
        )
        .collect();
    pairs.sort();

    let param_string = pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        encode(url),
        encode(&param_string)
    )
}

fn encode(s: &str) -> String {
    utf8_percent_encode(s, RESERVED).to_string()
}

/// Random per-request nonce; 32 alphanumeric characters.
fn nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

fn hmac_sha1(key: &str, data: &str) -> PostResult<String> {
    let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes())
        .map_err(|e| PostError::Unexpected(format!("HMAC key error: {e}")))?;
    mac.update(data.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}
