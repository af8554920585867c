//! Input resolution: load a user-supplied PDF path into memory.
//!
//! We validate the PDF magic bytes (`%PDF`) up front so the caller gets a
//! "wrong file type" error rather than an opaque pdfium parse failure.

use crate::error::ConvertError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// A PDF held in memory, with the file name it was uploaded under.
#[derive(Clone)]
pub struct PdfSource {
    /// File name, e.g. `report.pdf`. Used to derive output names.
    pub name: String,
    pub path: Option<PathBuf>,
    bytes: Arc<[u8]>,
}

impl std::fmt::Debug for PdfSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfSource")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl PdfSource {
    /// Wrap PDF bytes that did not come from a file.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ConvertError> {
        let name = name.into();
        check_magic(Path::new(&name), &bytes)?;
        Ok(Self {
            name,
            path: None,
            bytes: bytes.into(),
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Read a local PDF file, validating existence, permission and magic bytes.
pub fn read_pdf(path: impl AsRef<Path>) -> Result<PdfSource, ConvertError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConvertError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => ConvertError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => ConvertError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    check_magic(path, &bytes)?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document.pdf".to_string());

    debug!("Resolved local PDF: {} ({} bytes)", path.display(), bytes.len());
    Ok(PdfSource {
        name,
        path: Some(path.to_path_buf()),
        bytes: bytes.into(),
    })
}

fn check_magic(path: &Path, bytes: &[u8]) -> Result<(), ConvertError> {
    if bytes.starts_with(b"%PDF") {
        return Ok(());
    }
    let mut magic = [0u8; 4];
    let n = bytes.len().min(4);
    magic[..n].copy_from_slice(&bytes[..n]);
    Err(ConvertError::NotAPdf {
        path: path.to_path_buf(),
        magic,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_pdf_bytes() {
        let err = PdfSource::from_bytes("photo.pdf", b"\x89PNG....".to_vec()).unwrap_err();
        match err {
            ConvertError::NotAPdf { magic, .. } => assert_eq!(&magic, b"\x89PNG"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn short_input_is_not_a_pdf() {
        assert!(PdfSource::from_bytes("x.pdf", b"%P".to_vec()).is_err());
    }

    #[test]
    fn accepts_pdf_magic() {
        let src = PdfSource::from_bytes("a.pdf", b"%PDF-1.7\n".to_vec()).unwrap();
        assert_eq!(src.name, "a.pdf");
        assert_eq!(src.bytes().len(), 9);
    }

    #[test]
    fn missing_file() {
        let err = read_pdf("/definitely/not/a/real/file.pdf").unwrap_err();
        assert!(matches!(err, ConvertError::FileNotFound { .. }));
    }

    #[test]
    fn reads_file_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Report.PDF");
        std::fs::write(&path, b"%PDF-1.4\n%%EOF\n").unwrap();
        let src = read_pdf(&path).unwrap();
        assert_eq!(src.name, "Report.PDF");
        assert_eq!(src.path.as_deref(), Some(path.as_path()));
    }
}
