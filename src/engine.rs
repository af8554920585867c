//! Seams to the external PDF engine.
//!
//! The pipelines never talk to pdfium directly. They drive two narrow
//! traits, [`PdfRenderer`] for reading and rasterising documents and
//! [`PdfEncoder`] for composing new ones, so they can be exercised against
//! in-memory fakes and the backend can be swapped without touching them.
//!
//! [`PdfiumEngine`] implements both on top of `pdfium-render`. The pdfium
//! library is bound once per process on first use and kept for the
//! lifetime of the process.

use crate::error::ConvertError;
use crate::layout::{PageDimensions, Placement};
use image::DynamicImage;
use once_cell::sync::OnceCell;
use pdfium_render::prelude::*;
use std::path::PathBuf;
use tracing::{debug, info};

/// Read access to existing PDF documents.
pub trait PdfRenderer {
    /// Handle to an opened document.
    type Document;

    /// Parse a PDF from bytes. `name` is only used in error messages.
    fn open_document(
        &self,
        name: &str,
        bytes: &[u8],
        password: Option<&str>,
    ) -> Result<Self::Document, ConvertError>;

    fn page_count(&self, document: &Self::Document) -> usize;

    /// Size of a 1-based page in points.
    fn page_size(
        &self,
        document: &Self::Document,
        page_number: usize,
    ) -> Result<PageDimensions, ConvertError>;

    /// Rasterise a 1-based page at `scale` pixels per point, optionally
    /// capping the longest edge at `max_pixels`.
    fn rasterize_page(
        &self,
        document: &Self::Document,
        page_number: usize,
        scale: f32,
        max_pixels: Option<u32>,
    ) -> Result<DynamicImage, ConvertError>;
}

/// Write access: build a new PDF page by page.
///
/// The document is stateful and order-dependent: `place_image` draws on the
/// page most recently added with `add_page`.
pub trait PdfEncoder {
    type Document;

    fn new_document(&self) -> Result<Self::Document, ConvertError>;

    fn add_page(
        &self,
        document: &mut Self::Document,
        size: PageDimensions,
    ) -> Result<(), ConvertError>;

    /// Draw `image` on the current page. `rect` uses a top-left origin.
    fn place_image(
        &self,
        document: &mut Self::Document,
        rect: Placement,
        image: &DynamicImage,
    ) -> Result<(), ConvertError>;

    fn serialize(&self, document: Self::Document) -> Result<Vec<u8>, ConvertError>;
}

// ── pdfium binding ───────────────────────────────────────────────────────

static PDFIUM: OnceCell<Pdfium> = OnceCell::new();

/// Return the process-wide pdfium instance, binding it on first call.
///
/// Resolution order, first match wins:
///
/// 1. `PDFIUM_LIB_PATH`: explicit path to the shared library.
/// 2. The platform library name in the current directory.
/// 3. The system library search path.
pub fn pdfium() -> Result<&'static Pdfium, ConvertError> {
    PDFIUM.get_or_try_init(|| {
        let bindings = match std::env::var_os("PDFIUM_LIB_PATH") {
            Some(path) => {
                let path = PathBuf::from(path);
                debug!("Binding pdfium from PDFIUM_LIB_PATH={}", path.display());
                Pdfium::bind_to_library(&path)
            }
            None => Pdfium::bind_to_library(&Pdfium::pdfium_platform_library_name_at_path("./"))
                .or_else(|_| Pdfium::bind_to_system_library()),
        }
        .map_err(|e| ConvertError::PdfiumBindingFailed(format!("{e:?}")))?;

        info!("pdfium bound");
        Ok(Pdfium::new(bindings))
    })
}

/// pdfium-backed [`PdfRenderer`] and [`PdfEncoder`].
#[derive(Clone, Copy)]
pub struct PdfiumEngine {
    pub(crate) pdfium: &'static Pdfium,
}

impl PdfiumEngine {
    /// Bind pdfium (first call only) and return an engine handle.
    pub fn new() -> Result<Self, ConvertError> {
        Ok(Self { pdfium: pdfium()? })
    }
}

impl std::fmt::Debug for PdfiumEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PdfiumEngine")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn engine_is_shareable_across_blocking_workers() {
        assert_send_sync::<Pdfium>();
        assert_send_sync::<PdfiumEngine>();
        assert_send_sync::<OnceCell<Pdfium>>();
    }

    #[test]
    fn binding_from_two_threads_yields_one_instance() {
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP: set E2E_ENABLED=1 to bind pdfium");
            return;
        }
        let handles: Vec<_> = (0..2)
            .map(|_| std::thread::spawn(|| pdfium().map(|p| p as *const Pdfium as usize)))
            .collect();
        let addrs: Vec<usize> = handles
            .into_iter()
            .map(|h| h.join().unwrap().unwrap())
            .collect();
        assert_eq!(addrs[0], addrs[1]);
    }
}
