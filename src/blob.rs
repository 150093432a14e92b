use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Result, TrustKitError};

/// PEM-encoded bytes produced by this crate.
///
/// Blobs are handed out by [`CertificateAuthority`](crate::authority::CertificateAuthority)
/// and [`LeafCertificate`](crate::leaf::LeafCertificate); they carry certificates, keys, or
/// concatenations of both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob(Vec<u8>);

impl Blob {
    pub(crate) fn new(data: Vec<u8>) -> Self {
        Self(data)
    }

    pub(crate) fn concat<'a>(parts: impl IntoIterator<Item = &'a Blob>) -> Self {
        Self(parts.into_iter().flat_map(|b| b.0.iter().copied()).collect())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    /// PEM is ASCII, so this only fails on data that did not come from this crate.
    pub fn as_str(&self) -> Result<&str> {
        std::str::from_utf8(&self.0).map_err(|e| TrustKitError::DecodingError(e.to_string()))
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Writes the data to `path`, replacing the file unless `append` is set.
    pub fn write_to_path(&self, path: impl AsRef<Path>, append: bool) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)?;
        file.write_all(&self.0)?;
        Ok(())
    }

    /// Writes the data to a fresh `.pem` temporary file.
    ///
    /// The file is removed when the returned handle is dropped, so keep it alive for as long
    /// as the consumer needs the path:
    ///
    /// ```
    /// let ca = trustkit::CertificateAuthority::new()?;
    /// let file = ca.cert_pem().tempfile(None)?;
    /// assert!(std::fs::read_to_string(file.path())?.contains("BEGIN CERTIFICATE"));
    /// # Ok::<(), trustkit::TrustKitError>(())
    /// ```
    pub fn tempfile(&self, dir: Option<&Path>) -> Result<NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.suffix(".pem");
        let mut file = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        file.write_all(&self.0)?;
        file.flush()?;
        Ok(file)
    }
}

impl AsRef<[u8]> for Blob {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_to_path_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.pem");

        Blob::new(b"first\n".to_vec()).write_to_path(&path, false).unwrap();
        Blob::new(b"second\n".to_vec()).write_to_path(&path, true).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"first\nsecond\n");

        Blob::new(b"third\n".to_vec()).write_to_path(&path, false).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"third\n");
    }

    #[test]
    fn test_tempfile_removed_on_drop() {
        let blob = Blob::new(b"pem data".to_vec());
        let file = blob.tempfile(None).unwrap();
        let path = file.path().to_path_buf();
        assert_eq!(path.extension().unwrap(), "pem");
        assert_eq!(std::fs::read(&path).unwrap(), b"pem data");
        drop(file);
        assert!(!path.exists());
    }

    #[test]
    fn test_concat() {
        let joined = Blob::concat([&Blob::new(b"a".to_vec()), &Blob::new(b"bc".to_vec())]);
        assert_eq!(joined.bytes(), b"abc");
    }
}
