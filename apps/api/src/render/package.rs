//! OPC package writing — the ZIP container behind a `.pptx` file.
//!
//! Collects part paths with their content types, then emits the archive with a
//! generated `[Content_Types].xml`. XML parts are deflated; media parts are
//! stored as-is (already compressed).

use std::io::{Cursor, Write};

use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

use crate::errors::AppError;

/// One `<Default>` extension mapping in `[Content_Types].xml`.
const DEFAULT_TYPES: &[(&str, &str)] = &[
    ("rels", "application/vnd.openxmlformats-package.relationships+xml"),
    ("xml", "application/xml"),
    ("png", "image/png"),
    ("jpeg", "image/jpeg"),
    ("jpg", "image/jpeg"),
];

struct OverrideEntry {
    part_name: String,
    content_type: String,
}

/// Builder for an OPC package held in memory.
pub struct PackageWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    overrides: Vec<OverrideEntry>,
}

impl PackageWriter {
    pub fn new() -> Self {
        PackageWriter {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            overrides: Vec::new(),
        }
    }

    /// Adds an XML part with an explicit content-type override.
    pub fn add_part(&mut self, path: &str, content_type: &str, content: &[u8]) -> Result<(), AppError> {
        self.overrides.push(OverrideEntry {
            part_name: format!("/{path}"),
            content_type: content_type.to_string(),
        });
        self.write_entry(path, content, CompressionMethod::Deflated)
    }

    /// Adds a relationship part (covered by the `rels` default type).
    pub fn add_rels(&mut self, path: &str, content: &[u8]) -> Result<(), AppError> {
        self.write_entry(path, content, CompressionMethod::Deflated)
    }

    /// Adds a media part (covered by an extension default type).
    pub fn add_media(&mut self, path: &str, content: &[u8]) -> Result<(), AppError> {
        self.write_entry(path, content, CompressionMethod::Stored)
    }

    fn write_entry(
        &mut self,
        path: &str,
        content: &[u8],
        method: CompressionMethod,
    ) -> Result<(), AppError> {
        let options = SimpleFileOptions::default().compression_method(method);
        self.zip
            .start_file(path, options)
            .map_err(|e| AppError::Render(format!("zip entry {path}: {e}")))?;
        self.zip
            .write_all(content)
            .map_err(|e| AppError::Render(format!("zip write {path}: {e}")))?;
        Ok(())
    }

    /// Emits `[Content_Types].xml` and closes the archive.
    pub fn finish(mut self) -> Result<Vec<u8>, AppError> {
        let content_types = self.content_types_xml();
        self.write_entry(
            "[Content_Types].xml",
            content_types.as_bytes(),
            CompressionMethod::Deflated,
        )?;
        let cursor = self
            .zip
            .finish()
            .map_err(|e| AppError::Render(format!("zip finish: {e}")))?;
        Ok(cursor.into_inner())
    }

    fn content_types_xml(&self) -> String {
        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">",
        );
        for (ext, ty) in DEFAULT_TYPES {
            xml.push_str(&format!(
                "<Default Extension=\"{ext}\" ContentType=\"{ty}\"/>"
            ));
        }
        for entry in &self.overrides {
            xml.push_str(&format!(
                "<Override PartName=\"{}\" ContentType=\"{}\"/>",
                entry.part_name, entry.content_type
            ));
        }
        xml.push_str("</Types>");
        xml
    }
}

impl Default for PackageWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn entry_names(bytes: &[u8]) -> Vec<String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn test_finish_produces_zip_with_content_types() {
        let mut writer = PackageWriter::new();
        writer
            .add_part("ppt/presentation.xml", "application/test+xml", b"<x/>")
            .unwrap();
        let bytes = writer.finish().unwrap();

        assert_eq!(&bytes[..2], b"PK", "output must be a ZIP archive");
        let names = entry_names(&bytes);
        assert!(names.contains(&"[Content_Types].xml".to_string()));
        assert!(names.contains(&"ppt/presentation.xml".to_string()));
    }

    #[test]
    fn test_content_types_lists_override() {
        let mut writer = PackageWriter::new();
        writer
            .add_part("ppt/slides/slide1.xml", "application/slide+xml", b"<s/>")
            .unwrap();
        let bytes = writer.finish().unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut types = String::new();
        archive
            .by_name("[Content_Types].xml")
            .unwrap()
            .read_to_string(&mut types)
            .unwrap();
        assert!(types.contains("/ppt/slides/slide1.xml"));
        assert!(types.contains("Extension=\"png\""));
    }

    #[test]
    fn test_media_entries_are_stored() {
        let mut writer = PackageWriter::new();
        writer.add_media("ppt/media/image1.png", b"\x89PNGfake").unwrap();
        let bytes = writer.finish().unwrap();
        assert!(entry_names(&bytes).contains(&"ppt/media/image1.png".to_string()));
    }
}
