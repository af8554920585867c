//! The ordered working set of images to bundle into a PDF.
//!
//! Display order is the page order of the output document. Items own their
//! file bytes; removing an item from the set (or clearing it) drops them.

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, warn};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identifier of an [`ImageItem`], unique within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ImageId(u64);

impl ImageId {
    fn next() -> Self {
        ImageId(NEXT_ID.fetch_add(1, AtomicOrdering::Relaxed))
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "img-{}", self.0)
    }
}

/// One source image, not yet decoded.
#[derive(Clone)]
pub struct ImageItem {
    id: ImageId,
    /// File name used for display and name sorting.
    pub name: String,
    pub path: Option<PathBuf>,
    pub modified: Option<SystemTime>,
    /// Creation time, where the platform reports one.
    pub created: Option<SystemTime>,
    pub format: image::ImageFormat,
    bytes: Arc<[u8]>,
}

impl fmt::Debug for ImageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageItem")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("path", &self.path)
            .field("format", &self.format)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl ImageItem {
    /// Read an image file and its timestamps.
    ///
    /// The format is sniffed from the file's magic bytes, not its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConvertError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConvertError::FileNotFound {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::PermissionDenied => ConvertError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => ConvertError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let mut item = Self::from_bytes(name, bytes).map_err(|e| match e {
            ConvertError::UnsupportedFileType { .. } => ConvertError::UnsupportedFileType {
                path: path.to_path_buf(),
            },
            other => other,
        })?;
        item.path = Some(path.to_path_buf());
        if let Ok(meta) = std::fs::metadata(path) {
            item.modified = meta.modified().ok();
            item.created = meta.created().ok();
        }
        Ok(item)
    }

    /// Wrap in-memory image bytes.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ConvertError> {
        let name = name.into();
        let format = image::guess_format(&bytes).map_err(|_| ConvertError::UnsupportedFileType {
            path: PathBuf::from(&name),
        })?;
        Ok(Self {
            id: ImageId::next(),
            name,
            path: None,
            modified: None,
            created: None,
            format,
            bytes: bytes.into(),
        })
    }

    /// Set the modification time; used when bytes did not come from disk.
    pub fn with_modified(mut self, modified: SystemTime) -> Self {
        self.modified = Some(modified);
        self
    }

    pub fn id(&self) -> ImageId {
        self.id
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decode the image into pixels.
    pub fn decode(&self) -> Result<image::DynamicImage, ConvertError> {
        image::load_from_memory_with_format(&self.bytes, self.format).map_err(|e| {
            ConvertError::ImageDecodeFailed {
                name: self.name.clone(),
                detail: e.to_string(),
            }
        })
    }

    fn created_or_modified(&self) -> Option<SystemTime> {
        self.created.or(self.modified)
    }
}

/// How to reorder an [`ImageSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    NameAsc,
    NameDesc,
    ModifiedAsc,
    ModifiedDesc,
    /// Falls back to modification time where creation time is unavailable.
    CreatedAsc,
    CreatedDesc,
}

/// Ordered collection of images; order is the output page order.
#[derive(Debug, Clone, Default)]
pub struct ImageSet {
    items: Vec<ImageItem>,
}

impl ImageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every image among `paths`.
    ///
    /// Files that are not images are skipped with a warning; other read
    /// failures abort.
    pub fn add_paths<P: AsRef<Path>>(
        &mut self,
        paths: impl IntoIterator<Item = P>,
    ) -> Result<Vec<ImageId>, ConvertError> {
        let mut added = Vec::new();
        for path in paths {
            match ImageItem::from_path(path.as_ref()) {
                Ok(item) => {
                    debug!("Added image {} ({:?})", item.name, item.format);
                    added.push(item.id);
                    self.items.push(item);
                }
                Err(ConvertError::UnsupportedFileType { path }) => {
                    warn!("Skipping non-image file: {}", path.display());
                }
                Err(e) => return Err(e),
            }
        }
        Ok(added)
    }

    /// Append an item. An item whose id is already in the set (a clone of
    /// a member) gets a fresh id, so ids stay unique within the set.
    pub fn push(&mut self, mut item: ImageItem) -> ImageId {
        if self.get(item.id).is_some() {
            item.id = ImageId::next();
        }
        let id = item.id;
        self.items.push(item);
        id
    }

    /// Remove one image. Returns whether it was present.
    pub fn remove(&mut self, id: ImageId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Move the item at `from` so it ends up at index `to`.
    ///
    /// Out-of-range indices leave the set unchanged.
    pub fn move_item(&mut self, from: usize, to: usize) {
        if from >= self.items.len() || to >= self.items.len() || from == to {
            return;
        }
        let item = self.items.remove(from);
        self.items.insert(to, item);
    }

    /// Stable sort; ties keep their current relative order.
    pub fn sort(&mut self, order: SortOrder) {
        self.items.sort_by(|a, b| match order {
            SortOrder::NameAsc => compare_names(a, b),
            SortOrder::NameDesc => compare_names(b, a),
            SortOrder::ModifiedAsc => a.modified.cmp(&b.modified),
            SortOrder::ModifiedDesc => b.modified.cmp(&a.modified),
            SortOrder::CreatedAsc => a.created_or_modified().cmp(&b.created_or_modified()),
            SortOrder::CreatedDesc => b.created_or_modified().cmp(&a.created_or_modified()),
        });
    }

    pub fn get(&self, id: ImageId) -> Option<&ImageItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageItem> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[ImageItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Case-insensitive name order, byte order as tiebreak.
fn compare_names(a: &ImageItem, b: &ImageItem) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}
