use std::sync::Arc;

use crate::assets::AssetCatalog;
use crate::config::Config;
use crate::layout::SlideGeometry;
use crate::render::DeckBackend;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Fixed slide geometry shared by every build.
    pub geometry: SlideGeometry,
    /// Image catalog with placeholder substitution for missing files.
    pub assets: AssetCatalog,
    /// Pluggable document backend. Default: PptxBackend.
    pub backend: Arc<dyn DeckBackend>,
}
