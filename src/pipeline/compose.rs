//! PDF composition backend: [`PdfEncoder`] on top of pdfium.

use crate::engine::{PdfEncoder, PdfiumEngine};
use crate::error::ConvertError;
use crate::layout::{PageDimensions, Placement};
use image::DynamicImage;
use pdfium_render::prelude::*;
use tracing::debug;

/// A PDF under construction.
pub struct PdfiumDraft {
    document: PdfDocument<'static>,
    /// Size of the most recently added page.
    current: Option<PageDimensions>,
}

impl PdfEncoder for PdfiumEngine {
    type Document = PdfiumDraft;

    fn new_document(&self) -> Result<Self::Document, ConvertError> {
        let document = self
            .pdfium
            .create_new_pdf()
            .map_err(|e| ConvertError::PdfWriteFailed(format!("{:?}", e)))?;
        Ok(PdfiumDraft {
            document,
            current: None,
        })
    }

    fn add_page(
        &self,
        draft: &mut Self::Document,
        size: PageDimensions,
    ) -> Result<(), ConvertError> {
        draft
            .document
            .pages_mut()
            .create_page_at_end(PdfPagePaperSize::Custom(
                PdfPoints::new(size.width),
                PdfPoints::new(size.height),
            ))
            .map_err(|e| ConvertError::PdfWriteFailed(format!("{:?}", e)))?;
        draft.current = Some(size);
        Ok(())
    }

    fn place_image(
        &self,
        draft: &mut Self::Document,
        rect: Placement,
        image: &DynamicImage,
    ) -> Result<(), ConvertError> {
        let size = draft
            .current
            .ok_or_else(|| ConvertError::Internal("place_image called before add_page".into()))?;

        let mut page = draft
            .document
            .pages()
            .last()
            .map_err(|e| ConvertError::PdfWriteFailed(format!("{:?}", e)))?;

        // PDF user space has its origin at the bottom-left corner.
        let bottom = size.height - (rect.y + rect.height);
        page.objects_mut()
            .create_image_object(
                PdfPoints::new(rect.x),
                PdfPoints::new(bottom),
                image,
                Some(PdfPoints::new(rect.width)),
                Some(PdfPoints::new(rect.height)),
            )
            .map_err(|e| ConvertError::PdfWriteFailed(format!("{:?}", e)))?;

        debug!(
            "Placed {}x{} px image at ({:.1}, {:.1}) size {:.1}x{:.1}pt",
            image.width(),
            image.height(),
            rect.x,
            rect.y,
            rect.width,
            rect.height
        );
        Ok(())
    }

    fn serialize(&self, draft: Self::Document) -> Result<Vec<u8>, ConvertError> {
        draft
            .document
            .save_to_bytes()
            .map_err(|e| ConvertError::PdfWriteFailed(format!("{:?}", e)))
    }
}
