//! In-memory zip archive builder for rasterised pages.

use crate::error::ConvertError;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Appends named blobs to a zip held in memory.
///
/// Entries are written in insertion order; the central directory is written
/// by [`ArchiveBuilder::finish`], so the bytes are only valid after it.
pub struct ArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
    entries: usize,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
            entries: 0,
        }
    }

    pub fn add(&mut self, name: &str, bytes: &[u8]) -> Result<(), ConvertError> {
        self.writer.start_file(name, self.options)?;
        self.writer
            .write_all(bytes)
            .map_err(|e| ConvertError::ArchiveFailed(e.into()))?;
        self.entries += 1;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Write the central directory and return the archive bytes.
    pub fn finish(self) -> Result<Vec<u8>, ConvertError> {
        Ok(self.writer.finish()?.into_inner())
    }
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn entries_round_trip_in_order() {
        let mut builder = ArchiveBuilder::new();
        builder.add("doc-page-1.png", b"first").unwrap();
        builder.add("doc-page-2.png", b"second").unwrap();
        assert_eq!(builder.len(), 2);
        let bytes = builder.finish().unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);
        let mut content = String::new();
        archive
            .by_name("doc-page-2.png")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "second");
        assert_eq!(archive.by_index(0).unwrap().name(), "doc-page-1.png");
    }

    #[test]
    fn empty_archive_is_valid() {
        let bytes = ArchiveBuilder::new().finish().unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 0);
    }
}
