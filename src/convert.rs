//! Public conversion entry points.
//!
//! pdfium is CPU-bound and not async-aware, so every entry point moves the
//! whole pipeline onto `tokio::task::spawn_blocking`. Within that thread
//! the pipeline is strictly sequential. The `_sync` variants spin up a
//! temporary runtime for callers without one.

use crate::config::{PackConfig, RasterConfig};
use crate::engine::PdfiumEngine;
use crate::error::ConvertError;
use crate::images::ImageSet;
use crate::output::{ArchiveOutput, DocumentInfo, PdfOutput};
use crate::pipeline::input::PdfSource;
use crate::pipeline::{assemble, preview as preview_stage, rasterize as rasterize_stage};
use image::DynamicImage;
use std::path::{Path, PathBuf};
use tracing::info;

/// Bundle the images of `images` into one PDF, one page per image.
///
/// `images` is not modified; when `config.sort` is set the sort applies to
/// a copy.
///
/// # Errors
/// Returns [`ConvertError::NoImages`] for an empty set, otherwise the first
/// decode or encoder failure. No partial PDF is ever returned.
pub async fn pack_images(images: &ImageSet, config: &PackConfig) -> Result<PdfOutput, ConvertError> {
    if images.is_empty() {
        return Err(ConvertError::NoImages);
    }

    let mut ordered = images.clone();
    if let Some(order) = config.sort {
        ordered.sort(order);
    }
    let config = config.clone();

    tokio::task::spawn_blocking(move || {
        let engine = PdfiumEngine::new()?;
        assemble::assemble_pdf(&engine, ordered.as_slice(), &config)
    })
    .await
    .map_err(|e| ConvertError::Internal(format!("Assembly task panicked: {}", e)))?
}

/// Synchronous wrapper around [`pack_images`].
pub fn pack_images_sync(images: &ImageSet, config: &PackConfig) -> Result<PdfOutput, ConvertError> {
    runtime()?.block_on(pack_images(images, config))
}

/// Assemble a PDF and write it as `{output_dir}/{file_name}.pdf`.
///
/// Returns the written path alongside the output.
pub async fn pack_images_to_file(
    images: &ImageSet,
    output_dir: impl AsRef<Path>,
    config: &PackConfig,
) -> Result<(PathBuf, PdfOutput), ConvertError> {
    let output = pack_images(images, config).await?;
    let path = output_dir.as_ref().join(&output.file_name);
    write_atomic(&path, &output.bytes).await?;
    info!("Wrote {}", path.display());
    Ok((path, output))
}

/// Rasterise pages of `source` into a zip archive.
///
/// # Errors
/// Returns [`ConvertError::NoPagesSelected`] when the page selection
/// resolves to nothing, otherwise the first open/render/encode failure.
pub async fn rasterize(source: &PdfSource, config: &RasterConfig) -> Result<ArchiveOutput, ConvertError> {
    let source = source.clone();
    let config = config.clone();

    tokio::task::spawn_blocking(move || {
        let engine = PdfiumEngine::new()?;
        rasterize_stage::rasterize_pdf(&engine, &source, &config)
    })
    .await
    .map_err(|e| ConvertError::Internal(format!("Render task panicked: {}", e)))?
}

/// Synchronous wrapper around [`rasterize`].
pub fn rasterize_sync(source: &PdfSource, config: &RasterConfig) -> Result<ArchiveOutput, ConvertError> {
    runtime()?.block_on(rasterize(source, config))
}

/// Rasterise and write the archive as `{output_dir}/{base}.zip`.
pub async fn rasterize_to_file(
    source: &PdfSource,
    output_dir: impl AsRef<Path>,
    config: &RasterConfig,
) -> Result<(PathBuf, ArchiveOutput), ConvertError> {
    let output = rasterize(source, config).await?;
    let path = output_dir.as_ref().join(&output.file_name);
    write_atomic(&path, &output.bytes).await?;
    info!("Wrote {}", path.display());
    Ok((path, output))
}

/// Render one page at preview resolution.
pub async fn preview(
    source: &PdfSource,
    page: usize,
    password: Option<&str>,
) -> Result<DynamicImage, ConvertError> {
    let source = source.clone();
    let password = password.map(str::to_string);
    tokio::task::spawn_blocking(move || {
        let engine = PdfiumEngine::new()?;
        preview_stage::render_preview(&engine, &source, page, password.as_deref())
    })
    .await
    .map_err(|e| ConvertError::Internal(format!("Preview task panicked: {}", e)))?
}

/// Page count and page sizes, without rendering.
pub async fn inspect(source: &PdfSource, password: Option<&str>) -> Result<DocumentInfo, ConvertError> {
    let source = source.clone();
    let password = password.map(str::to_string);
    tokio::task::spawn_blocking(move || {
        let engine = PdfiumEngine::new()?;
        preview_stage::inspect_document(&engine, &source, password.as_deref())
    })
    .await
    .map_err(|e| ConvertError::Internal(format!("Inspect task panicked: {}", e)))?
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn runtime() -> Result<tokio::runtime::Runtime, ConvertError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ConvertError::Internal(format!("Failed to create tokio runtime: {}", e)))
}

/// Write to a temp file next to `path`, then rename over it, so a failed
/// write never leaves a truncated artifact behind.
pub(crate) async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ConvertError> {
    let write_err = |source| ConvertError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    tokio::fs::write(&tmp_path, bytes).await.map_err(write_err)?;
    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(write_err(e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_set_fails_before_binding_pdfium() {
        let err = pack_images(&ImageSet::new(), &PackConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::NoImages));
    }

    #[tokio::test]
    async fn write_atomic_creates_parents_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.zip");
        write_atomic(&path, b"abc").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"abc");
        assert!(!dir.path().join("nested/out.zip.tmp").exists());
    }
}
