//! PDF rasterisation backend: [`PdfRenderer`] on top of pdfium.
//!
//! ## Why cap pixels as well as scale?
//!
//! Page sizes vary wildly: an A0 poster at 600 DPI would produce a
//! 20,000 × 28,000 px bitmap. The optional pixel cap bounds memory
//! regardless of the page's physical size.

use crate::engine::{PdfRenderer, PdfiumEngine};
use crate::error::ConvertError;
use crate::layout::PageDimensions;
use image::DynamicImage;
use pdfium_render::prelude::*;
use tracing::{debug, info};

impl PdfRenderer for PdfiumEngine {
    type Document = PdfDocument<'static>;

    fn open_document(
        &self,
        name: &str,
        bytes: &[u8],
        password: Option<&str>,
    ) -> Result<Self::Document, ConvertError> {
        let document = self
            .pdfium
            .load_pdf_from_byte_vec(bytes.to_vec(), password)
            .map_err(|e| {
                let err_str = format!("{:?}", e);
                if err_str.contains("Password") || err_str.contains("password") {
                    if password.is_some() {
                        ConvertError::WrongPassword { name: name.to_string() }
                    } else {
                        ConvertError::PasswordRequired { name: name.to_string() }
                    }
                } else {
                    ConvertError::CorruptPdf {
                        name: name.to_string(),
                        detail: err_str,
                    }
                }
            })?;

        info!("PDF loaded: {} ({} pages)", name, document.pages().len());
        Ok(document)
    }

    fn page_count(&self, document: &Self::Document) -> usize {
        document.pages().len() as usize
    }

    fn page_size(
        &self,
        document: &Self::Document,
        page_number: usize,
    ) -> Result<PageDimensions, ConvertError> {
        let page = get_page(document, page_number)?;
        Ok(PageDimensions::new(page.width().value, page.height().value))
    }

    fn rasterize_page(
        &self,
        document: &Self::Document,
        page_number: usize,
        scale: f32,
        max_pixels: Option<u32>,
    ) -> Result<DynamicImage, ConvertError> {
        let page = get_page(document, page_number)?;

        let mut render_config = PdfRenderConfig::new().scale_page_by_factor(scale);
        if let Some(max) = max_pixels {
            let cap = pixel_cap(max);
            render_config = render_config
                .set_maximum_width(cap)
                .set_maximum_height(cap);
        }

        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            ConvertError::RasterisationFailed {
                page: page_number,
                detail: format!("{:?}", e),
            }
        })?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px",
            page_number,
            image.width(),
            image.height()
        );
        Ok(image)
    }
}

fn get_page<'a>(
    document: &'a PdfDocument<'static>,
    page_number: usize,
) -> Result<PdfPage<'a>, ConvertError> {
    let total = document.pages().len() as usize;
    if page_number == 0 || page_number > total {
        return Err(ConvertError::PageOutOfRange {
            page: page_number,
            total,
        });
    }
    document
        .pages()
        .get((page_number - 1) as u16)
        .map_err(|e| ConvertError::RasterisationFailed {
            page: page_number,
            detail: format!("{:?}", e),
        })
}

/// pdfium takes the cap as `i32`; saturate instead of wrapping negative.
fn pixel_cap(max: u32) -> i32 {
    i32::try_from(max).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_cap_saturates() {
        assert_eq!(pixel_cap(2000), 2000);
        assert_eq!(pixel_cap(i32::MAX as u32), i32::MAX);
        assert_eq!(pixel_cap(u32::MAX), i32::MAX);
    }
}
