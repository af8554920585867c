//! Page geometry: fit an image inside a page's drawable area.
//!
//! All lengths are PDF points (1/72 inch) with a top-left origin. The
//! encoder converts to PDF user space (bottom-left origin) when drawing.

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};

/// Physical width and height of a page in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageDimensions {
    pub width: f32,
    pub height: f32,
}

impl PageDimensions {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Orientation implied by the page's aspect ratio.
    pub fn orientation(&self) -> Orientation {
        if self.width > self.height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

/// Named page-size presets, plus an arbitrary custom size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    Letter,
    A3,
    A5,
    /// Portrait width and height in points.
    Custom { width: f32, height: f32 },
}

impl PageSize {
    /// Portrait dimensions in points.
    pub fn portrait(&self) -> PageDimensions {
        match *self {
            PageSize::A4 => PageDimensions::new(595.28, 841.89),
            PageSize::Letter => PageDimensions::new(612.0, 792.0),
            PageSize::A3 => PageDimensions::new(841.89, 1190.55),
            PageSize::A5 => PageDimensions::new(419.53, 595.28),
            PageSize::Custom { width, height } => {
                PageDimensions::new(width.min(height), width.max(height))
            }
        }
    }

    /// Dimensions for a resolved orientation. `Auto` is treated as portrait;
    /// resolve it per image first with [`Orientation::resolve`].
    pub fn dimensions(&self, orientation: Orientation) -> PageDimensions {
        let p = self.portrait();
        match orientation {
            Orientation::Landscape => PageDimensions::new(p.height, p.width),
            Orientation::Portrait | Orientation::Auto => p,
        }
    }
}

/// Page orientation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
    /// Pick per image: landscape when the image is wider than tall.
    Auto,
}

impl Orientation {
    /// Resolve the policy for one image. Never returns `Auto`.
    pub fn resolve(self, image_width: u32, image_height: u32) -> Orientation {
        match self {
            Orientation::Auto if image_width > image_height => Orientation::Landscape,
            Orientation::Auto => Orientation::Portrait,
            fixed => fixed,
        }
    }
}

/// Uniform inset applied to all four page edges.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum MarginPreset {
    #[default]
    None,
    /// 0.5 inch.
    Narrow,
    /// 0.75 inch.
    Moderate,
    /// 1 inch.
    Normal,
    /// 2 inches.
    Wide,
    /// Any inset in points.
    Custom(f32),
}

impl MarginPreset {
    pub fn inset(&self) -> f32 {
        match *self {
            MarginPreset::None => 0.0,
            MarginPreset::Narrow => 36.0,
            MarginPreset::Moderate => 54.0,
            MarginPreset::Normal => 72.0,
            MarginPreset::Wide => 144.0,
            MarginPreset::Custom(points) => points,
        }
    }
}

/// Where an image lands on its page, in points from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Scale an image uniformly to fit the page's drawable area and centre it.
///
/// The drawable area is the page minus `margin` on every side. The image is
/// scaled by `min(drawable_w / image_w, drawable_h / image_h)`, so its aspect
/// ratio is preserved and it always fits.
///
/// # Errors
/// * [`ConvertError::InvalidImage`] if either image dimension is zero.
/// * [`ConvertError::MarginExceedsPage`] if the margin leaves no drawable area.
pub fn compute_placement(
    image_width: u32,
    image_height: u32,
    page: PageDimensions,
    margin: f32,
) -> Result<Placement, ConvertError> {
    if image_width == 0 || image_height == 0 {
        return Err(ConvertError::InvalidImage {
            name: String::new(),
            width: image_width,
            height: image_height,
        });
    }

    let drawable_width = page.width - 2.0 * margin;
    let drawable_height = page.height - 2.0 * margin;
    if !(drawable_width > 0.0 && drawable_height > 0.0) {
        return Err(ConvertError::MarginExceedsPage {
            margin,
            width: page.width,
            height: page.height,
        });
    }

    let (iw, ih) = (image_width as f32, image_height as f32);
    let scale = (drawable_width / iw).min(drawable_height / ih);
    let width = iw * scale;
    let height = ih * scale;

    Ok(Placement {
        x: margin + (drawable_width - width) / 2.0,
        y: margin + (drawable_height - height) / 2.0,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn landscape_image_on_a4_portrait_uses_full_width() {
        let p = compute_placement(800, 600, PageDimensions::new(595.0, 842.0), 0.0).unwrap();
        assert!(close(p.width, 595.0), "width {}", p.width);
        assert!(close(p.height, 446.25), "height {}", p.height);
        assert!(close(p.x, 0.0));
        assert!(close(p.y, 197.875), "y {}", p.y);
    }

    #[test]
    fn placement_is_deterministic() {
        let page = PageSize::Letter.dimensions(Orientation::Portrait);
        let a = compute_placement(1234, 987, page, 36.0).unwrap();
        let b = compute_placement(1234, 987, page, 36.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn stays_inside_drawable_area() {
        let sizes = [(1, 1), (10, 4000), (4000, 10), (800, 600), (600, 800), (3000, 3000)];
        let pages = [
            PageSize::A4.dimensions(Orientation::Portrait),
            PageSize::A3.dimensions(Orientation::Landscape),
            PageSize::A5.dimensions(Orientation::Portrait),
        ];
        for margin in [0.0, 36.0, 72.0, 144.0] {
            for page in pages {
                for (w, h) in sizes {
                    let p = compute_placement(w, h, page, margin).unwrap();
                    let dw = page.width - 2.0 * margin;
                    let dh = page.height - 2.0 * margin;
                    assert!(p.width <= dw + 1e-3 && p.height <= dh + 1e-3);
                    assert!(p.x >= margin - 1e-3 && p.y >= margin - 1e-3);
                    // centred: equal slack on opposite sides
                    let right = page.width - (p.x + p.width);
                    let bottom = page.height - (p.y + p.height);
                    assert!((p.x - right).abs() < 1e-2);
                    assert!((p.y - bottom).abs() < 1e-2);
                }
            }
        }
    }

    #[test]
    fn oversized_margin_is_rejected() {
        let err = compute_placement(100, 100, PageDimensions::new(200.0, 400.0), 100.0).unwrap_err();
        assert!(matches!(err, ConvertError::MarginExceedsPage { .. }));
    }

    #[test]
    fn zero_sized_image_is_rejected() {
        let err = compute_placement(0, 10, PageDimensions::new(200.0, 400.0), 0.0).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidImage { .. }));
    }

    #[test]
    fn auto_orientation_follows_aspect_ratio() {
        assert_eq!(Orientation::Auto.resolve(800, 600), Orientation::Landscape);
        assert_eq!(Orientation::Auto.resolve(600, 800), Orientation::Portrait);
        assert_eq!(Orientation::Auto.resolve(500, 500), Orientation::Portrait);
        assert_eq!(Orientation::Portrait.resolve(800, 600), Orientation::Portrait);
        assert_eq!(Orientation::Landscape.resolve(600, 800), Orientation::Landscape);
    }

    #[test]
    fn landscape_swaps_dimensions() {
        let d = PageSize::A4.dimensions(Orientation::Landscape);
        assert!(close(d.width, 841.89) && close(d.height, 595.28));
        assert_eq!(d.orientation(), Orientation::Landscape);
    }

    #[test]
    fn margin_presets_are_distinct() {
        let insets: Vec<f32> = [
            MarginPreset::None,
            MarginPreset::Narrow,
            MarginPreset::Moderate,
            MarginPreset::Normal,
            MarginPreset::Wide,
        ]
        .iter()
        .map(MarginPreset::inset)
        .collect();
        for (i, a) in insets.iter().enumerate() {
            for b in &insets[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
