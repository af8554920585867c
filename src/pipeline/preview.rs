//! Single-page preview and document inspection.

use crate::engine::PdfRenderer;
use crate::error::ConvertError;
use crate::output::DocumentInfo;
use crate::pipeline::input::PdfSource;
use image::DynamicImage;
use tracing::debug;

/// Pixels per point used for on-screen previews.
pub const PREVIEW_SCALE: f32 = 1.5;

/// Render one 1-based page at [`PREVIEW_SCALE`].
///
/// # Errors
/// [`ConvertError::PageOutOfRange`] if `page` is 0 or past the last page.
pub fn render_preview<R: PdfRenderer>(
    renderer: &R,
    source: &PdfSource,
    page: usize,
    password: Option<&str>,
) -> Result<DynamicImage, ConvertError> {
    let document = renderer.open_document(&source.name, source.bytes(), password)?;
    let total = renderer.page_count(&document);
    if page == 0 || page > total {
        return Err(ConvertError::PageOutOfRange { page, total });
    }
    debug!("Previewing page {}/{} of {}", page, total, source.name);
    renderer.rasterize_page(&document, page, PREVIEW_SCALE, None)
}

/// Page count and page sizes.
pub fn inspect_document<R: PdfRenderer>(
    renderer: &R,
    source: &PdfSource,
    password: Option<&str>,
) -> Result<DocumentInfo, ConvertError> {
    let document = renderer.open_document(&source.name, source.bytes(), password)?;
    let page_count = renderer.page_count(&document);
    let page_sizes = (1..=page_count)
        .map(|page| renderer.page_size(&document, page))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(DocumentInfo {
        name: source.name.clone(),
        page_count,
        page_sizes,
    })
}
