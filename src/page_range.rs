//! Page-range parsing: free text like `"1-3, 5; 8"` → sorted 1-based pages.
//!
//! Malformed tokens are dropped rather than rejected, so a partly mistyped
//! range still selects the pages that were typed correctly. Only a selection
//! that resolves to nothing is an error, see [`PageSelection::resolve`].

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Which pages of a PDF to rasterise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// Every page (default).
    #[default]
    All,
    /// User-typed specification, e.g. `"1-3, 5"`.
    Custom(String),
}

impl PageSelection {
    /// Build a selection from CLI-style input; `"all"` maps to [`PageSelection::All`].
    pub fn parse(input: &str) -> Self {
        if input.trim().eq_ignore_ascii_case("all") {
            PageSelection::All
        } else {
            PageSelection::Custom(input.to_string())
        }
    }

    /// Resolve against a document with `total` pages.
    ///
    /// # Errors
    /// [`ConvertError::NoPagesSelected`] when nothing valid remains.
    pub fn resolve(&self, total: usize) -> Result<Vec<usize>, ConvertError> {
        let pages = match self {
            PageSelection::All => (1..=total).collect(),
            PageSelection::Custom(spec) => parse_page_range(spec, total),
        };
        if pages.is_empty() {
            return Err(ConvertError::NoPagesSelected { total });
        }
        Ok(pages)
    }
}

impl fmt::Display for PageSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSelection::All => f.write_str("all"),
            PageSelection::Custom(spec) => f.write_str(spec),
        }
    }
}

/// Parse a page-range specification into a strictly increasing list of
/// page numbers within `1..=total`.
///
/// ```
/// use imgpdf::parse_page_range;
///
/// assert_eq!(parse_page_range("1-3, 5", 10), vec![1, 2, 3, 5]);
/// assert_eq!(parse_page_range("3-1, abc, 0, 100", 10), Vec::<usize>::new());
/// ```
pub fn parse_page_range(spec: &str, total: usize) -> Vec<usize> {
    if spec.trim().eq_ignore_ascii_case("all") {
        return (1..=total).collect();
    }

    let mut pages = BTreeSet::new();
    for token in spec.split([',', ';']).map(str::trim) {
        if let Some((start, end)) = token.split_once('-') {
            let (Ok(start), Ok(end)) = (start.trim().parse::<i64>(), end.trim().parse::<i64>())
            else {
                continue;
            };
            if start > end {
                continue;
            }
            // Clamp before iterating so "1-999999999" costs nothing.
            let lo = start.max(1);
            let hi = end.min(total as i64);
            for page in lo..=hi {
                pages.insert(page as usize);
            }
        } else if let Ok(page) = token.parse::<i64>() {
            if page >= 1 && page <= total as i64 {
                pages.insert(page as usize);
            }
        }
    }

    pages.into_iter().collect()
}
