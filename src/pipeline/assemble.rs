//! Image → PDF assembly: one page per image, in display order.
//!
//! Strictly sequential. Each image must be decoded before its page can be
//! sized, and the encoder appends pages in call order, so the order images
//! are visited is the page order of the output.

use crate::config::PackConfig;
use crate::engine::PdfEncoder;
use crate::error::ConvertError;
use crate::images::ImageItem;
use crate::layout::compute_placement;
use crate::output::{ConversionStats, PageLayout, PdfOutput};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Compose a PDF from `items` using `encoder`.
///
/// The first failure aborts the conversion; no partial PDF is returned.
///
/// # Errors
/// * [`ConvertError::NoImages`] if `items` is empty, before any work.
/// * [`ConvertError::ImageDecodeFailed`] if an image cannot be decoded.
/// * Whatever the encoder reports.
pub fn assemble_pdf<E: PdfEncoder>(
    encoder: &E,
    items: &[ImageItem],
    config: &PackConfig,
) -> Result<PdfOutput, ConvertError> {
    if items.is_empty() {
        return Err(ConvertError::NoImages);
    }

    let start = Instant::now();
    let total = items.len();
    let margin = config.margin.inset();
    info!(
        "Assembling {} images into {} ({:?}, {:?}, margin {}pt)",
        total,
        config.output_file_name(),
        config.page_size,
        config.orientation,
        margin
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_start(total);
    }

    let mut document = encoder.new_document()?;
    let mut pages = Vec::with_capacity(total);

    for (idx, item) in items.iter().enumerate() {
        let page_num = idx + 1;
        if let Some(ref cb) = config.progress_callback {
            cb.on_item_start(page_num, total);
        }

        let result = add_image_page(encoder, &mut document, item, page_num, config, margin);
        match result {
            Ok(layout) => {
                if let Some(ref cb) = config.progress_callback {
                    cb.on_item_complete(page_num, total, item.bytes().len());
                }
                pages.push(layout);
            }
            Err(e) => {
                warn!("Image {} ({}) failed: {}", page_num, item.name, e);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_item_error(page_num, total, &e.to_string());
                }
                return Err(e);
            }
        }
    }

    let bytes = encoder.serialize(document)?;

    let stats = ConversionStats {
        total_items: total,
        processed_items: pages.len(),
        output_bytes: bytes.len(),
        total_duration_ms: start.elapsed().as_millis() as u64,
    };
    info!(
        "Assembled {} pages, {} bytes in {}ms",
        stats.processed_items, stats.output_bytes, stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_complete(total);
    }

    Ok(PdfOutput {
        file_name: config.output_file_name(),
        bytes,
        pages,
        stats,
    })
}

/// decode → orientation → page → layout → place, for one image.
fn add_image_page<E: PdfEncoder>(
    encoder: &E,
    document: &mut E::Document,
    item: &ImageItem,
    page_num: usize,
    config: &PackConfig,
    margin: f32,
) -> Result<PageLayout, ConvertError> {
    let image = item.decode()?;
    let (width, height) = (image.width(), image.height());

    let orientation = config.orientation.resolve(width, height);
    let page = config.page_size.dimensions(orientation);
    encoder.add_page(document, page)?;

    let placement = compute_placement(width, height, page, margin).map_err(|e| match e {
        ConvertError::InvalidImage { width, height, .. } => ConvertError::InvalidImage {
            name: item.name.clone(),
            width,
            height,
        },
        other => other,
    })?;
    encoder.place_image(document, placement, &image)?;

    debug!(
        "Page {}: {} {}x{} px, {:?} → {:.1}x{:.1}pt at ({:.1}, {:.1})",
        page_num,
        item.name,
        width,
        height,
        orientation,
        placement.width,
        placement.height,
        placement.x,
        placement.y
    );

    Ok(PageLayout {
        page_num,
        source_name: item.name.clone(),
        image_width: width,
        image_height: height,
        orientation,
        page,
        placement,
    })
}
