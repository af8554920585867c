//! # imgpdf
//!
//! Two conversions between images and PDF documents:
//!
//! * **pack**: bundle an ordered set of images into a single PDF, one page
//!   per image, each image scaled to fit the page and centred.
//! * **rasterize**: render selected pages of a PDF to PNG, JPEG or WebP
//!   and collect them in a zip archive.
//!
//! ## Pipeline Overview
//!
//! ```text
//! pack        images ─▶ decode ─▶ layout ─▶ pdfium page + image ─▶ name.pdf
//! rasterize   PDF ─▶ page range ─▶ pdfium render ─▶ encode ─▶ zip ─▶ name.zip
//! ```
//!
//! Both run strictly in sequence: the PDF encoder and the zip writer are
//! appended to in order, and the first failure abandons the whole output.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use imgpdf::{pack_images, rasterize, read_pdf, ImageSet, PackConfig, PageSelection, RasterConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut images = ImageSet::new();
//!     images.add_paths(["scan-1.jpg", "scan-2.jpg"])?;
//!     let pdf = pack_images(&images, &PackConfig::default()).await?;
//!     std::fs::write(&pdf.file_name, &pdf.bytes)?;
//!
//!     let source = read_pdf("report.pdf")?;
//!     let config = RasterConfig::builder()
//!         .pages(PageSelection::Custom("1-3, 5".into()))
//!         .build()?;
//!     let archive = rasterize(&source, &config).await?;
//!     std::fs::write(&archive.file_name, &archive.bytes)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `imgpdf` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! ## PDFium
//!
//! Rendering and composition go through `pdfium-render`, which needs the
//! pdfium shared library at runtime. Set `PDFIUM_LIB_PATH` to point at it,
//! or place it in the working directory or on the system library path.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod images;
pub mod layout;
pub mod output;
pub mod page_range;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{PackConfig, PackConfigBuilder, RasterConfig, RasterConfigBuilder, DPI_PRESETS};
pub use convert::{
    inspect, pack_images, pack_images_sync, pack_images_to_file, preview, rasterize,
    rasterize_sync, rasterize_to_file,
};
pub use engine::{PdfEncoder, PdfRenderer, PdfiumEngine};
pub use error::ConvertError;
pub use images::{ImageId, ImageItem, ImageSet, SortOrder};
pub use layout::{compute_placement, MarginPreset, Orientation, PageDimensions, PageSize, Placement};
pub use output::{ArchiveEntry, ArchiveOutput, ConversionStats, DocumentInfo, PageLayout, PdfOutput};
pub use page_range::{parse_page_range, PageSelection};
pub use pipeline::encode::ImageFormat;
pub use pipeline::input::{read_pdf, PdfSource};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
