//! Configuration types for both conversions.
//!
//! [`PackConfig`] controls image → PDF assembly, [`RasterConfig`] controls
//! PDF → images rasterisation. Both are built through a builder whose
//! `build()` validates the values, and both are cheap to clone.

use crate::error::ConvertError;
use crate::images::SortOrder;
use crate::layout::{MarginPreset, Orientation, PageSize};
use crate::page_range::PageSelection;
use crate::pipeline::encode::ImageFormat;
use crate::progress::ProgressCallback;
use std::fmt;

/// DPI presets offered by the CLI.
pub const DPI_PRESETS: [u32; 3] = [150, 300, 600];

/// PDF user space has 72 points per inch.
pub const POINTS_PER_INCH: f32 = 72.0;

// ── Image → PDF ──────────────────────────────────────────────────────────

/// Configuration for bundling images into a PDF.
///
/// # Example
/// ```rust
/// use imgpdf::{MarginPreset, Orientation, PackConfig, PageSize};
///
/// let config = PackConfig::builder()
///     .file_name("holiday")
///     .page_size(PageSize::Letter)
///     .orientation(Orientation::Auto)
///     .margin(MarginPreset::Narrow)
///     .build()
///     .unwrap();
/// assert_eq!(config.output_file_name(), "holiday.pdf");
/// ```
#[derive(Clone)]
pub struct PackConfig {
    /// Output name without extension. Default: `converted-document`.
    pub file_name: String,

    /// Paper size of every page. Default: A4.
    pub page_size: PageSize,

    /// Orientation policy. Default: portrait.
    ///
    /// With [`Orientation::Auto`] each page follows its own image, so a mixed
    /// set of images yields a PDF with mixed page orientations.
    pub orientation: Orientation,

    /// Inset applied to all four edges. Default: none.
    pub margin: MarginPreset,

    /// Reorder the images before assembly. Default: keep the given order.
    pub sort: Option<SortOrder>,

    /// Per-image progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            file_name: "converted-document".to_string(),
            page_size: PageSize::default(),
            orientation: Orientation::default(),
            margin: MarginPreset::default(),
            sort: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for PackConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackConfig")
            .field("file_name", &self.file_name)
            .field("page_size", &self.page_size)
            .field("orientation", &self.orientation)
            .field("margin", &self.margin)
            .field("sort", &self.sort)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl PackConfig {
    pub fn builder() -> PackConfigBuilder {
        PackConfigBuilder {
            config: Self::default(),
        }
    }

    /// `{file_name}.pdf`
    pub fn output_file_name(&self) -> String {
        format!("{}.pdf", self.file_name)
    }
}

/// Builder for [`PackConfig`].
#[derive(Debug)]
pub struct PackConfigBuilder {
    config: PackConfig,
}

impl PackConfigBuilder {
    /// Output name; a trailing `.pdf` is stripped.
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        let trimmed = strip_suffix_ignore_case(name.trim(), ".pdf");
        self.config.file_name = trimmed.to_string();
        self
    }

    pub fn page_size(mut self, size: PageSize) -> Self {
        self.config.page_size = size;
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.config.orientation = orientation;
        self
    }

    pub fn margin(mut self, margin: MarginPreset) -> Self {
        self.config.margin = margin;
        self
    }

    pub fn sort(mut self, order: SortOrder) -> Self {
        self.config.sort = Some(order);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PackConfig, ConvertError> {
        let c = &self.config;
        if c.file_name.is_empty() {
            return Err(ConvertError::InvalidConfig("File name must not be empty".into()));
        }
        if c.file_name.contains(['/', '\\']) {
            return Err(ConvertError::InvalidConfig(format!(
                "File name must not contain path separators, got '{}'",
                c.file_name
            )));
        }
        if let PageSize::Custom { width, height } = c.page_size {
            if !(width > 0.0 && height > 0.0) {
                return Err(ConvertError::InvalidConfig(format!(
                    "Custom page size must be positive, got {}x{}",
                    width, height
                )));
            }
        }
        let inset = c.margin.inset();
        if !(inset >= 0.0) {
            return Err(ConvertError::InvalidConfig(format!(
                "Margin must be ≥ 0, got {}",
                inset
            )));
        }
        let page = c.page_size.portrait();
        if 2.0 * inset >= page.width.min(page.height) {
            return Err(ConvertError::MarginExceedsPage {
                margin: inset,
                width: page.width,
                height: page.height,
            });
        }
        Ok(self.config)
    }
}

// ── PDF → images ─────────────────────────────────────────────────────────

/// Configuration for rasterising PDF pages into a zip of images.
///
/// # Example
/// ```rust
/// use imgpdf::{ImageFormat, PageSelection, RasterConfig};
///
/// let config = RasterConfig::builder()
///     .pages(PageSelection::Custom("2-4,7".into()))
///     .format(ImageFormat::Jpeg)
///     .dpi(150)
///     .build()
///     .unwrap();
/// assert!((config.scale() - 150.0 / 72.0).abs() < 1e-6);
/// ```
#[derive(Clone)]
pub struct RasterConfig {
    /// Which pages to rasterise. Default: all.
    pub pages: PageSelection,

    /// Output image format. Default: PNG.
    pub format: ImageFormat,

    /// Rendering resolution. Range: 36–1200. Default: 300.
    pub dpi: u32,

    /// JPEG quality, 1–100. Default: 92.
    pub jpeg_quality: u8,

    /// Cap on either rendered dimension in pixels. Default: none.
    pub max_rendered_pixels: Option<u32>,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Per-page progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            pages: PageSelection::default(),
            format: ImageFormat::default(),
            dpi: 300,
            jpeg_quality: 92,
            max_rendered_pixels: None,
            password: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for RasterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterConfig")
            .field("pages", &self.pages)
            .field("format", &self.format)
            .field("dpi", &self.dpi)
            .field("jpeg_quality", &self.jpeg_quality)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl RasterConfig {
    pub fn builder() -> RasterConfigBuilder {
        RasterConfigBuilder {
            config: Self::default(),
        }
    }

    /// Pixels per PDF point at the configured DPI.
    pub fn scale(&self) -> f32 {
        self.dpi as f32 / POINTS_PER_INCH
    }
}

/// Builder for [`RasterConfig`].
#[derive(Debug)]
pub struct RasterConfigBuilder {
    config: RasterConfig,
}

impl RasterConfigBuilder {
    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn format(mut self, format: ImageFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality;
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = Some(px.max(100));
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RasterConfig, ConvertError> {
        let c = &self.config;
        if c.dpi < 36 || c.dpi > 1200 {
            return Err(ConvertError::InvalidConfig(format!(
                "DPI must be 36–1200, got {}",
                c.dpi
            )));
        }
        if c.jpeg_quality == 0 || c.jpeg_quality > 100 {
            return Err(ConvertError::InvalidConfig(format!(
                "JPEG quality must be 1–100, got {}",
                c.jpeg_quality
            )));
        }
        Ok(self.config)
    }
}

pub(crate) fn strip_suffix_ignore_case<'a>(name: &'a str, suffix: &str) -> &'a str {
    let split = name.len().saturating_sub(suffix.len());
    match (name.get(..split), name.get(split..)) {
        (Some(stem), Some(tail)) if tail.eq_ignore_ascii_case(suffix) => stem,
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_defaults() {
        let c = PackConfig::default();
        assert_eq!(c.output_file_name(), "converted-document.pdf");
        assert_eq!(c.page_size, PageSize::A4);
        assert_eq!(c.orientation, Orientation::Portrait);
        assert_eq!(c.margin, MarginPreset::None);
        assert!(c.sort.is_none());
    }

    #[test]
    fn pack_file_name_strips_extension() {
        let c = PackConfig::builder().file_name("scan.PDF").build().unwrap();
        assert_eq!(c.output_file_name(), "scan.pdf");
    }

    #[test]
    fn pack_rejects_bad_names() {
        assert!(PackConfig::builder().file_name("  ").build().is_err());
        assert!(PackConfig::builder().file_name("a/b").build().is_err());
    }

    #[test]
    fn pack_rejects_oversized_margin() {
        let err = PackConfig::builder()
            .page_size(PageSize::Custom {
                width: 200.0,
                height: 300.0,
            })
            .margin(MarginPreset::Wide)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConvertError::MarginExceedsPage { .. }));
    }

    #[test]
    fn pack_rejects_negative_margin() {
        assert!(PackConfig::builder()
            .margin(MarginPreset::Custom(-1.0))
            .build()
            .is_err());
    }

    #[test]
    fn raster_defaults_and_scale() {
        let c = RasterConfig::default();
        assert_eq!(c.dpi, 300);
        assert_eq!(c.format, ImageFormat::Png);
        assert_eq!(c.pages, PageSelection::All);
        assert!((c.scale() - 300.0 / 72.0).abs() < 1e-6);
    }

    #[test]
    fn raster_validates_dpi_and_quality() {
        assert!(RasterConfig::builder().dpi(10).build().is_err());
        assert!(RasterConfig::builder().dpi(5000).build().is_err());
        assert!(RasterConfig::builder().jpeg_quality(0).build().is_err());
        for dpi in DPI_PRESETS {
            assert!(RasterConfig::builder().dpi(dpi).build().is_ok());
        }
    }

    #[test]
    fn debug_redacts_password() {
        let c = RasterConfig::builder().password("hunter2").build().unwrap();
        let dbg = format!("{:?}", c);
        assert!(!dbg.contains("hunter2"));
    }

    #[test]
    fn suffix_strip() {
        assert_eq!(strip_suffix_ignore_case("a.pdf", ".pdf"), "a");
        assert_eq!(strip_suffix_ignore_case("a.Pdf", ".pdf"), "a");
        assert_eq!(strip_suffix_ignore_case("a.pdfx", ".pdf"), "a.pdfx");
        assert_eq!(strip_suffix_ignore_case("df", ".pdf"), "df");
        assert_eq!(strip_suffix_ignore_case("ü.pdf", ".pdf"), "ü");
    }
}
