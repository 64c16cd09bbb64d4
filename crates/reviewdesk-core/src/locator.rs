//! Blob locators of the form `gs://bucket/path/to/object`.

use thiserror::Error;

const SCHEME: &str = "gs://";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocatorError {
    #[error("invalid blob locator `{0}` (expected gs://bucket/path)")]
    InvalidLocator(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobLocator {
    pub bucket: String,
    pub object: String,
}

impl BlobLocator {
    /// Split on the first `/` after the scheme. Bucket and object must both be non-empty.
    pub fn parse(uri: &str) -> Result<Self, LocatorError> {
        let invalid = || LocatorError::InvalidLocator(uri.to_string());
        let rest = uri.strip_prefix(SCHEME).ok_or_else(invalid)?;
        let (bucket, object) = rest.split_once('/').ok_or_else(invalid)?;
        if bucket.is_empty() || object.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            bucket: bucket.to_string(),
            object: object.to_string(),
        })
    }
}

impl std::fmt::Display for BlobLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{SCHEME}{}/{}", self.bucket, self.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bucket_and_nested_object() {
        let loc = BlobLocator::parse("gs://mybucket/path/to/file.pdf").unwrap();
        assert_eq!(loc.bucket, "mybucket");
        assert_eq!(loc.object, "path/to/file.pdf");
        assert_eq!(loc.to_string(), "gs://mybucket/path/to/file.pdf");
    }

    #[test]
    fn rejects_malformed() {
        for bad in [
            "not-a-uri",
            "s3://bucket/key",
            "gs://bucket",
            "gs://bucket/",
            "gs:///key",
            "",
        ] {
            assert_eq!(
                BlobLocator::parse(bad),
                Err(LocatorError::InvalidLocator(bad.to_string())),
                "{bad}"
            );
        }
    }
}
