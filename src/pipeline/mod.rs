//! Pipeline stages for both conversions.
//!
//! ## Data Flow
//!
//! ```text
//! images ──▶ assemble ──▶ compose (pdfium) ──▶ PDF bytes
//!
//! input ──▶ rasterize ──▶ render (pdfium) ──▶ encode ──▶ archive ──▶ zip bytes
//! ```
//!
//! 1. [`input`]: load and validate a PDF from disk or memory
//! 2. [`assemble`]: decode each image, lay it out, hand it to a [`crate::engine::PdfEncoder`]
//! 3. [`compose`]: the pdfium-backed `PdfEncoder`
//! 4. [`rasterize`]: resolve the page range, render each page, zip the results
//! 5. [`render`]: the pdfium-backed [`crate::engine::PdfRenderer`]
//! 6. [`encode`]: PNG / JPEG / WebP encoding of rendered pages
//! 7. [`archive`]: in-memory zip writer
//! 8. [`preview`]: single-page preview and page-count inspection
//!
//! `assemble`, `rasterize` and `preview` are generic over the engine traits
//! and run synchronously; [`crate::convert`] moves them onto a blocking
//! thread.

pub mod archive;
pub mod assemble;
pub mod compose;
pub mod encode;
pub mod input;
pub mod preview;
pub mod rasterize;
pub mod render;
