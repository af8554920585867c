//! Error types for the imgpdf library.
//!
//! A single error type covers both pipelines. There is no page-level
//! "soft" error: when one image fails to decode or one page fails to
//! rasterise, the whole conversion is abandoned and no partial artifact is
//! produced.
//!
//! Variants fall into three groups, see [`ConvertError::is_user_error`]:
//!
//! * **User input**: nothing was selected, the wrong kind of file was
//!   supplied, the page range resolved to nothing, or the margin leaves no
//!   room on the page. Raised before any work begins.
//! * **Decode / render**: an image or PDF page could not be processed.
//! * **I/O and engine**: reading inputs, writing outputs, binding pdfium.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the imgpdf library.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── User input errors ─────────────────────────────────────────────────
    /// The image set was empty when conversion was requested.
    #[error("No images selected.\nAdd at least one image to convert.")]
    NoImages,

    /// A file was supplied where an image was expected but it is not one.
    #[error("Unsupported file type: '{path}' is not a recognised image")]
    UnsupportedFileType { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// The page selection resolved to an empty set.
    #[error("No pages selected (document has {total} pages).\nSpecify pages like \"1-3, 5\" or \"all\".")]
    NoPagesSelected { total: usize },

    /// A single requested page does not exist in the document.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    /// The margin inset leaves no drawable area on the page.
    #[error("Margin of {margin}pt exceeds page size {width}x{height}pt")]
    MarginExceedsPage { margin: f32, width: f32, height: f32 },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Decode / render errors ────────────────────────────────────────────
    /// An image could not be decoded into pixels.
    #[error("Failed to decode image '{name}': {detail}")]
    ImageDecodeFailed { name: String, detail: String },

    /// An image decoded to zero width or height.
    #[error("Image '{name}' has no pixels ({width}x{height})")]
    InvalidImage { name: String, width: u32, height: u32 },

    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{name}' is corrupt: {detail}")]
    CorruptPdf { name: String, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{name}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { name: String },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{name}'")]
    WrongPassword { name: String },

    /// pdfium returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    /// Encoding a rendered page into the output image format failed.
    #[error("Failed to encode page {page} as {format}: {detail}")]
    EncodeFailed {
        page: usize,
        format: String,
        detail: String,
    },

    /// The PDF encoder rejected a drawing command or could not serialise.
    #[error("PDF generation failed: {0}")]
    PdfWriteFailed(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Reading an input failed for another reason.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The zip writer failed.
    #[error("Failed to build zip archive: {0}")]
    ArchiveFailed(#[from] zip::result::ZipError),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
You can:\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n\
  • Place libpdfium next to the working directory.\n\
  • Install pdfium system-wide.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConvertError {
    /// True for errors caused by what the user supplied rather than by a
    /// failure while processing it.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ConvertError::NoImages
                | ConvertError::UnsupportedFileType { .. }
                | ConvertError::NotAPdf { .. }
                | ConvertError::NoPagesSelected { .. }
                | ConvertError::PageOutOfRange { .. }
                | ConvertError::MarginExceedsPage { .. }
                | ConvertError::InvalidConfig(_)
                | ConvertError::FileNotFound { .. }
                | ConvertError::PasswordRequired { .. }
                | ConvertError::WrongPassword { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_pages_selected_display() {
        let e = ConvertError::NoPagesSelected { total: 10 };
        let msg = e.to_string();
        assert!(msg.contains("10 pages"), "got: {msg}");
    }

    #[test]
    fn margin_exceeds_page_display() {
        let e = ConvertError::MarginExceedsPage {
            margin: 300.0,
            width: 595.0,
            height: 842.0,
        };
        assert!(e.to_string().contains("300pt"));
    }

    #[test]
    fn encode_failed_display() {
        let e = ConvertError::EncodeFailed {
            page: 4,
            format: "jpeg".into(),
            detail: "boom".into(),
        };
        assert!(e.to_string().contains("page 4"));
        assert!(e.to_string().contains("jpeg"));
    }

    #[test]
    fn user_errors_are_classified() {
        assert!(ConvertError::NoImages.is_user_error());
        assert!(ConvertError::NoPagesSelected { total: 3 }.is_user_error());
        assert!(!ConvertError::RasterisationFailed {
            page: 1,
            detail: "x".into()
        }
        .is_user_error());
        assert!(!ConvertError::Internal("x".into()).is_user_error());
    }
}
