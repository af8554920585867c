//! Output artifacts returned by the conversion entry points.

use crate::layout::{Orientation, PageDimensions, Placement};
use serde::{Deserialize, Serialize};

/// A finished PDF assembled from images.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfOutput {
    /// `{name}.pdf`
    pub file_name: String,
    /// The serialised PDF.
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// One entry per page, in page order.
    pub pages: Vec<PageLayout>,
    pub stats: ConversionStats,
}

/// How one source image was laid out on its page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLayout {
    /// 1-indexed page number.
    pub page_num: usize,
    pub source_name: String,
    pub image_width: u32,
    pub image_height: u32,
    pub orientation: Orientation,
    pub page: PageDimensions,
    pub placement: Placement,
}

/// A finished zip of rasterised pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveOutput {
    /// `{base}.zip`
    pub file_name: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// One entry per rasterised page, ascending page order.
    pub entries: Vec<ArchiveEntry>,
    pub stats: ConversionStats,
}

/// One image inside the archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveEntry {
    pub page_num: usize,
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Encoded size in bytes.
    pub size: usize,
    pub mime_type: String,
}

/// Summary numbers for one conversion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Images supplied, or pages in the source document.
    pub total_items: usize,
    /// Items written to the output.
    pub processed_items: usize,
    /// Size of the output artifact in bytes.
    pub output_bytes: usize,
    pub total_duration_ms: u64,
}

/// Page count and sizes of a PDF, without rendering anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub name: String,
    pub page_count: usize,
    /// Size of each page in points, page order.
    pub page_sizes: Vec<PageDimensions>,
}
