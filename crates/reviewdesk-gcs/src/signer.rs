//! Cloud Storage V4 signed URLs (`GOOG4-RSA-SHA256`).
//!
//! Signing happens locally with the service account's RSA key; no network call
//! is made. The resulting URL grants `GET` on one object until it expires.
//!
//! Canonical request layout:
//!
//! ```text
//! GET
//! /<bucket>/<percent-encoded object>
//! <sorted, percent-encoded X-Goog-* query>
//! host:storage.googleapis.com
//!
//! host
//! UNSIGNED-PAYLOAD
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use ring::rand::SystemRandom;
use ring::signature::{RSA_PKCS1_SHA256, RsaKeyPair};
use thiserror::Error;
use tracing::debug;

use crate::credentials::{CredentialsError, ServiceAccountKey};
use reviewdesk_core::LocatorError;

const HOST: &str = "storage.googleapis.com";
const ALGORITHM: &str = "GOOG4-RSA-SHA256";
const SIGNED_HEADERS: &str = "host";
const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";

/// Links are valid for 15 minutes unless the caller asks otherwise.
pub const DEFAULT_EXPIRY: Duration = Duration::from_secs(15 * 60);
/// Cloud Storage refuses V4 signatures valid for longer than seven days.
pub const MAX_EXPIRY: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// RFC 3986 unreserved characters stay literal; everything else is encoded.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
const OBJECT_PATH: &AsciiSet = &UNRESERVED.remove(b'/');

#[derive(Debug, Error)]
pub enum SignError {
    #[error(transparent)]
    Locator(#[from] LocatorError),
    #[error(transparent)]
    Credentials(#[from] CredentialsError),
    #[error("private key rejected: {0}")]
    KeyRejected(String),
    #[error("expiry of {0}s is outside 1s..=604800s")]
    ExpiryOutOfRange(u64),
    #[error("RSA signing failed")]
    Signing,
}

/// Issues read-only signed URLs for objects.
pub trait UrlSigner {
    fn signed_get_url(
        &self,
        bucket: &str,
        object: &str,
        expires: Duration,
    ) -> Result<String, SignError>;
}

/// V4 signer backed by a service-account key.
pub struct V4Signer {
    client_email: String,
    key_pair: RsaKeyPair,
    rng: SystemRandom,
}

impl V4Signer {
    pub fn new(key: &ServiceAccountKey) -> Result<Self, SignError> {
        let der = key.private_key_der()?;
        let key_pair =
            RsaKeyPair::from_pkcs8(&der).map_err(|e| SignError::KeyRejected(e.to_string()))?;
        Ok(Self {
            client_email: key.client_email.clone(),
            key_pair,
            rng: SystemRandom::new(),
        })
    }

    /// Sign as of `now`. [`UrlSigner::signed_get_url`] calls this with the current time.
    pub fn signed_get_url_at(
        &self,
        bucket: &str,
        object: &str,
        expires: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, SignError> {
        let request = UnsignedRequest::new(&self.client_email, bucket, object, expires, now)?;
        let string_to_sign = request.string_to_sign();

        let mut signature = vec![0u8; self.key_pair.public().modulus_len()];
        self.key_pair
            .sign(
                &RSA_PKCS1_SHA256,
                &self.rng,
                string_to_sign.as_bytes(),
                &mut signature,
            )
            .map_err(|_| SignError::Signing)?;

        debug!(bucket, object, expires_secs = expires.as_secs(), "signed download url");
        Ok(request.url_with_signature(&hex::encode(signature)))
    }
}

impl UrlSigner for V4Signer {
    fn signed_get_url(
        &self,
        bucket: &str,
        object: &str,
        expires: Duration,
    ) -> Result<String, SignError> {
        self.signed_get_url_at(bucket, object, expires, Utc::now())
    }
}

/// Everything about a signed URL except the signature itself.
#[derive(Debug, Clone, PartialEq, Eq)]
struct UnsignedRequest {
    path: String,
    canonical_query: String,
    timestamp: String,
    scope: String,
}

impl UnsignedRequest {
    fn new(
        client_email: &str,
        bucket: &str,
        object: &str,
        expires: Duration,
        now: DateTime<Utc>,
    ) -> Result<Self, SignError> {
        let secs = expires.as_secs();
        if secs == 0 || expires > MAX_EXPIRY {
            return Err(SignError::ExpiryOutOfRange(secs));
        }

        let timestamp = now.format("%Y%m%dT%H%M%SZ").to_string();
        let scope = format!("{}/auto/storage/goog4_request", now.format("%Y%m%d"));
        let path = format!(
            "/{}/{}",
            utf8_percent_encode(bucket, UNRESERVED),
            utf8_percent_encode(object, OBJECT_PATH)
        );

        let mut params: BTreeMap<&str, String> = BTreeMap::new();
        params.insert("X-Goog-Algorithm", ALGORITHM.to_string());
        params.insert("X-Goog-Credential", format!("{client_email}/{scope}"));
        params.insert("X-Goog-Date", timestamp.clone());
        params.insert("X-Goog-Expires", secs.to_string());
        params.insert("X-Goog-SignedHeaders", SIGNED_HEADERS.to_string());
        let canonical_query = params
            .iter()
            .map(|(k, v)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(k, UNRESERVED),
                    utf8_percent_encode(v, UNRESERVED)
                )
            })
            .collect::<Vec<_>>()
            .join("&");

        Ok(Self {
            path,
            canonical_query,
            timestamp,
            scope,
        })
    }

    fn canonical_request(&self) -> String {
        let canonical_headers = format!("host:{HOST}\n");
        [
            "GET",
            self.path.as_str(),
            self.canonical_query.as_str(),
            canonical_headers.as_str(),
            SIGNED_HEADERS,
            UNSIGNED_PAYLOAD,
        ]
        .join("\n")
    }

    fn string_to_sign(&self) -> String {
        let canonical = self.canonical_request();
        let digest = ring::digest::digest(&ring::digest::SHA256, canonical.as_bytes());
        format!(
            "{ALGORITHM}\n{}\n{}\n{}",
            self.timestamp,
            self.scope,
            hex::encode(digest.as_ref())
        )
    }

    fn url_with_signature(&self, signature_hex: &str) -> String {
        format!(
            "https://{HOST}{}?{}&X-Goog-Signature={signature_hex}",
            self.path, self.canonical_query
        )
    }
}
