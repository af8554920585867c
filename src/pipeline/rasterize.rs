//! PDF → zipped images: render each selected page and add it to a zip.
//!
//! Pages are processed strictly in ascending order and the archive is
//! finalised only after the last page was added. A failure on any page
//! abandons the whole archive.

use crate::config::{strip_suffix_ignore_case, RasterConfig};
use crate::engine::PdfRenderer;
use crate::error::ConvertError;
use crate::output::{ArchiveEntry, ArchiveOutput, ConversionStats};
use crate::pipeline::archive::ArchiveBuilder;
use crate::pipeline::encode::{encode_image, ImageFormat};
use crate::pipeline::input::PdfSource;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Output base name: the source file name without a trailing `.pdf`
/// (any case). Falls back to `document` for an empty name.
pub fn base_name(file_name: &str) -> String {
    let stem = strip_suffix_ignore_case(file_name, ".pdf");
    if stem.is_empty() {
        "document".to_string()
    } else {
        stem.to_string()
    }
}

/// Archive entry name: `{base}-page-{page}.{ext}`, with the page number
/// zero-padded to the digit count of `total`.
pub fn entry_name(base: &str, page: usize, total: usize, format: ImageFormat) -> String {
    let width = total.max(1).to_string().len();
    format!("{base}-page-{page:0width$}.{}", format.extension())
}

/// Rasterise the selected pages of `source` into a zip archive.
///
/// # Errors
/// * [`ConvertError::NoPagesSelected`] if the selection resolves to nothing,
///   before any page is rendered.
/// * Open, render, encode or archive failures from any page.
pub fn rasterize_pdf<R: PdfRenderer>(
    renderer: &R,
    source: &PdfSource,
    config: &RasterConfig,
) -> Result<ArchiveOutput, ConvertError> {
    let start = Instant::now();
    let document = renderer.open_document(&source.name, source.bytes(), config.password.as_deref())?;
    let total_pages = renderer.page_count(&document);

    let pages = config.pages.resolve(total_pages)?;
    let base = base_name(&source.name);
    let scale = config.scale();
    info!(
        "Rasterising {}/{} pages of {} at {} DPI as {}",
        pages.len(),
        total_pages,
        source.name,
        config.dpi,
        config.format
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_start(pages.len());
    }

    let mut archive = ArchiveBuilder::new();
    let mut entries = Vec::with_capacity(pages.len());

    for &page_num in &pages {
        if let Some(ref cb) = config.progress_callback {
            cb.on_item_start(page_num, total_pages);
        }

        let name = entry_name(&base, page_num, total_pages, config.format);
        let result = render_entry(renderer, &document, page_num, scale, config)
            .and_then(|(bytes, width, height)| {
                archive.add(&name, &bytes)?;
                Ok(ArchiveEntry {
                    page_num,
                    name,
                    width,
                    height,
                    size: bytes.len(),
                    mime_type: config.format.mime_type().to_string(),
                })
            });

        match result {
            Ok(entry) => {
                debug!("Added {} ({} bytes)", entry.name, entry.size);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_item_complete(page_num, total_pages, entry.size);
                }
                entries.push(entry);
            }
            Err(e) => {
                warn!("Page {} failed: {}", page_num, e);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_item_error(page_num, total_pages, &e.to_string());
                }
                return Err(e);
            }
        }
    }

    let bytes = archive.finish()?;

    let stats = ConversionStats {
        total_items: total_pages,
        processed_items: entries.len(),
        output_bytes: bytes.len(),
        total_duration_ms: start.elapsed().as_millis() as u64,
    };
    info!(
        "Archived {} pages, {} bytes in {}ms",
        stats.processed_items, stats.output_bytes, stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_complete(entries.len());
    }

    Ok(ArchiveOutput {
        file_name: format!("{base}.zip"),
        bytes,
        entries,
        stats,
    })
}

fn render_entry<R: PdfRenderer>(
    renderer: &R,
    document: &R::Document,
    page_num: usize,
    scale: f32,
    config: &RasterConfig,
) -> Result<(Vec<u8>, u32, u32), ConvertError> {
    let image = renderer.rasterize_page(document, page_num, scale, config.max_rendered_pixels)?;
    let bytes = encode_image(&image, config.format, config.jpeg_quality).map_err(|e| {
        ConvertError::EncodeFailed {
            page: page_num,
            format: config.format.to_string(),
            detail: e.to_string(),
        }
    })?;
    Ok((bytes, image.width(), image.height()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_name_strips_pdf_suffix() {
        assert_eq!(base_name("report.pdf"), "report");
        assert_eq!(base_name("REPORT.PDF"), "REPORT");
        assert_eq!(base_name("archive.tar"), "archive.tar");
        assert_eq!(base_name("my.pdf.pdf"), "my.pdf");
        assert_eq!(base_name(".pdf"), "document");
    }

    #[test]
    fn entry_names_are_padded_to_page_count_width() {
        assert_eq!(entry_name("doc", 2, 10, ImageFormat::Jpeg), "doc-page-02.jpeg");
        assert_eq!(entry_name("doc", 7, 10, ImageFormat::Jpeg), "doc-page-07.jpeg");
        assert_eq!(entry_name("doc", 10, 10, ImageFormat::Png), "doc-page-10.png");
        assert_eq!(entry_name("doc", 3, 9, ImageFormat::Webp), "doc-page-3.webp");
        assert_eq!(entry_name("doc", 42, 120, ImageFormat::Png), "doc-page-042.png");
    }
}
