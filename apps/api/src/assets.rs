//! Asset catalog — background and content images with best-effort placeholder
//! substitution.
//!
//! A missing image never fails a build: `resolve` writes a minimal valid 1×1
//! PNG in its place and carries on. Only an unwritable assets directory is
//! fatal, surfaced as `AppError::Asset`.

use std::path::{Path, PathBuf};

use base64::Engine;
use tracing::warn;

use crate::errors::AppError;

/// The fixed base64 payload of a 1×1 transparent PNG.
const PLACEHOLDER_PNG_B64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR4nGNgYAAAAAMAASsJTYQAAAAASUVORK5CYII=";

/// The five image roles a deck consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AssetKind {
    TitleBackground,
    BodyBackground,
    FinalBackground,
    MissionImage,
    TeamImage,
}

impl AssetKind {
    pub const ALL: [AssetKind; 5] = [
        AssetKind::TitleBackground,
        AssetKind::BodyBackground,
        AssetKind::FinalBackground,
        AssetKind::MissionImage,
        AssetKind::TeamImage,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            AssetKind::TitleBackground => "title_bg.png",
            AssetKind::BodyBackground => "body_bg.png",
            AssetKind::FinalBackground => "final_bg.png",
            AssetKind::MissionImage => "mission.png",
            AssetKind::TeamImage => "team.png",
        }
    }
}

/// Resolves asset kinds to readable image files under one directory.
#[derive(Debug, Clone)]
pub struct AssetCatalog {
    dir: PathBuf,
}

impl AssetCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        AssetCatalog { dir: dir.into() }
    }

    /// Writes placeholders for every missing asset. Called once at startup so
    /// builds never race over placeholder creation.
    pub fn ensure_all(&self) -> Result<(), AppError> {
        for kind in AssetKind::ALL {
            self.resolve(kind)?;
        }
        Ok(())
    }

    /// Returns a usable path for `kind`, substituting a placeholder PNG when
    /// the real file is missing.
    pub fn resolve(&self, kind: AssetKind) -> Result<PathBuf, AppError> {
        let path = self.dir.join(kind.file_name());
        if path.exists() {
            return Ok(path);
        }
        warn!(asset = kind.file_name(), "asset missing, writing placeholder");
        write_placeholder(&path)?;
        Ok(path)
    }

    /// Reads the asset bytes (placeholder-substituted if needed).
    pub fn read(&self, kind: AssetKind) -> Result<Vec<u8>, AppError> {
        let path = self.resolve(kind)?;
        std::fs::read(&path)
            .map_err(|e| AppError::Asset(format!("cannot read {}: {e}", path.display())))
    }

    /// Intrinsic pixel dimensions, used for aspect-fit scaling.
    pub fn dimensions(&self, kind: AssetKind) -> Result<(u32, u32), AppError> {
        let path = self.resolve(kind)?;
        image::image_dimensions(&path)
            .map_err(|e| AppError::Asset(format!("cannot probe {}: {e}", path.display())))
    }
}

fn write_placeholder(path: &Path) -> Result<(), AppError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(PLACEHOLDER_PNG_B64)
        .map_err(|e| AppError::Asset(format!("placeholder payload invalid: {e}")))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| AppError::Asset(format!("cannot create {}: {e}", parent.display())))?;
    }
    std::fs::write(path, bytes)
        .map_err(|e| AppError::Asset(format!("cannot write {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_asset_gets_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = AssetCatalog::new(dir.path());

        let path = catalog.resolve(AssetKind::MissionImage).unwrap();
        assert!(path.exists(), "placeholder must be written");

        let bytes = catalog.read(AssetKind::MissionImage).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n", "placeholder is a valid PNG");
    }

    #[test]
    fn test_placeholder_dimensions_are_1x1() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = AssetCatalog::new(dir.path());
        assert_eq!(catalog.dimensions(AssetKind::TeamImage).unwrap(), (1, 1));
    }

    #[test]
    fn test_existing_asset_left_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join(AssetKind::BodyBackground.file_name());
        std::fs::write(&real, b"not a png but mine").unwrap();

        let catalog = AssetCatalog::new(dir.path());
        let path = catalog.resolve(AssetKind::BodyBackground).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"not a png but mine");
    }

    #[test]
    fn test_ensure_all_writes_every_role() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = AssetCatalog::new(dir.path());
        catalog.ensure_all().unwrap();
        for kind in AssetKind::ALL {
            assert!(dir.path().join(kind.file_name()).exists());
        }
    }
}
