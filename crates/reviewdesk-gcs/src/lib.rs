//! Signed download links for source PDFs held in Cloud Storage.

use std::time::Duration;

use reviewdesk_core::BlobLocator;
use tracing::info;

pub mod credentials;
pub mod signer;

pub use credentials::{CredentialsError, ServiceAccountKey};
pub use signer::{DEFAULT_EXPIRY, MAX_EXPIRY, SignError, UrlSigner, V4Signer};

/// Validate `uri` and ask `signer` for a fresh read-only link.
///
/// A malformed locator fails before the signer is touched. Nothing is cached:
/// every call produces a new URL.
pub fn issue_download_link(
    uri: &str,
    expires: Duration,
    signer: &dyn UrlSigner,
) -> Result<String, SignError> {
    let locator = BlobLocator::parse(uri)?;
    info!(
        bucket = %locator.bucket,
        object = %locator.object,
        expires_secs = expires.as_secs(),
        "issuing signed download link"
    );
    signer.signed_get_url(&locator.bucket, &locator.object, expires)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reviewdesk_core::LocatorError;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingSigner {
        calls: RefCell<Vec<(String, String, Duration)>>,
    }

    impl UrlSigner for RecordingSigner {
        fn signed_get_url(
            &self,
            bucket: &str,
            object: &str,
            expires: Duration,
        ) -> Result<String, SignError> {
            self.calls
                .borrow_mut()
                .push((bucket.to_string(), object.to_string(), expires));
            Ok(format!("https://signed.example/{bucket}/{object}"))
        }
    }

    #[test]
    fn signer_receives_bucket_object_and_expiry() {
        let signer = RecordingSigner::default();
        let url =
            issue_download_link("gs://mybucket/path/to/file.pdf", DEFAULT_EXPIRY, &signer).unwrap();
        assert_eq!(url, "https://signed.example/mybucket/path/to/file.pdf");
        assert_eq!(
            signer.calls.borrow().as_slice(),
            [(
                "mybucket".to_string(),
                "path/to/file.pdf".to_string(),
                Duration::from_secs(15 * 60)
            )]
        );
    }

    #[test]
    fn invalid_locator_never_reaches_signer() {
        let signer = RecordingSigner::default();
        let err = issue_download_link("not-a-uri", DEFAULT_EXPIRY, &signer).unwrap_err();
        assert!(matches!(
            err,
            SignError::Locator(LocatorError::InvalidLocator(ref uri)) if uri == "not-a-uri"
        ));
        assert!(signer.calls.borrow().is_empty());
    }

    #[test]
    fn every_call_signs_again() {
        let signer = RecordingSigner::default();
        for _ in 0..2 {
            issue_download_link("gs://b/o.pdf", DEFAULT_EXPIRY, &signer).unwrap();
        }
        assert_eq!(signer.calls.borrow().len(), 2);
    }
}
