// Rendering boundary: the assembler produces pure slide data, a DeckBackend
// turns it into document bytes. The backend is pluggable behind a trait so the
// pipeline and layout stay serialization-agnostic.

pub mod assembler;
pub mod model;
pub mod package;
pub mod pptx;

use bytes::Bytes;

use crate::assets::AssetCatalog;
use crate::errors::AppError;
use crate::render::model::SlideDeck;

/// Serializes an assembled deck to a downloadable document.
pub trait DeckBackend: Send + Sync {
    fn render(&self, deck: &SlideDeck, assets: &AssetCatalog) -> Result<Bytes, AppError>;
}

pub use assembler::assemble_deck;
pub use pptx::{PptxBackend, PPTX_FILENAME, PPTX_MIME};
