//! Load state of a résumé item and the local resource a successful fetch produces.
use crate::data::error::ResumeError;
use bytes::Bytes;
use std::fmt;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tempfile::NamedTempFile;

/// The fetched document, kept in a private temporary file so it can be opened
/// with the system viewer. The file is removed when the last reference goes away.
pub struct LocalResource {
    filename: String,
    digest: String,
    bytes: Bytes,
    file: NamedTempFile,
}

impl LocalResource {
    /// Writes `bytes` to a new temporary `.pdf` file.
    pub fn create(filename: &str, bytes: Bytes) -> Result<LocalResource, ResumeError> {
        let digest = hex::encode(&blake3::hash(&bytes).as_bytes()[..8]);
        let mut file = tempfile::Builder::new()
            .prefix(&format!("resume-{digest}-"))
            .suffix(".pdf")
            .tempfile()
            .map_err(|err| {
                ResumeError::FetchFailure(format!("couldn't create local copy of {filename}: {err}"))
            })?;
        file.write_all(&bytes)
            .and_then(|_| file.flush())
            .map_err(|err| {
                ResumeError::FetchFailure(format!("couldn't write local copy of {filename}: {err}"))
            })?;
        debug!(
            "Stored {} ({} bytes) at {}",
            filename,
            bytes.len(),
            file.path().display()
        );
        Ok(LocalResource {
            filename: filename.to_owned(),
            digest,
            bytes,
            file,
        })
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// First 8 bytes of the content's blake3 hash, hex encoded.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Cheap handle to the document bytes (shared, not copied).
    pub fn bytes(&self) -> Bytes {
        self.bytes.clone()
    }
}

impl Drop for LocalResource {
    fn drop(&mut self) {
        debug!("Releasing local copy of {} at {}", self.filename, self.path().display());
    }
}

impl fmt::Debug for LocalResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalResource")
            .field("filename", &self.filename)
            .field("digest", &self.digest)
            .field("len", &self.bytes.len())
            .field("path", &self.path())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum LoadState {
    Loading,
    Ready(Arc<LocalResource>),
    Failed(ResumeError),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn resource(&self) -> Option<&Arc<LocalResource>> {
        match self {
            Self::Ready(resource) => Some(resource),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ResumeError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}
