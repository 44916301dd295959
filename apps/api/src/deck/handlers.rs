//! Axum route handlers for the Deck API.

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    Json,
};
use bytes::Bytes;
use tracing::info;

use crate::deck::pipeline::{build_plan, DeckPlan};
use crate::errors::AppError;
use crate::models::deck::DeckRequest;
use crate::render::{assemble_deck, PPTX_FILENAME, PPTX_MIME};
use crate::state::AppState;

/// POST /api/v1/decks/plan
///
/// Runs the selection pipeline only and returns the derived plan — a preview
/// of what the deck would contain, before committing to a build.
pub async fn handle_plan(
    State(_state): State<AppState>,
    Json(request): Json<DeckRequest>,
) -> Result<Json<DeckPlan>, AppError> {
    Ok(Json(build_plan(&request)))
}

/// POST /api/v1/decks/build
///
/// Full pipeline: selection → slide assembly → serialization. Responds with
/// the document bytes as a download; a failed build returns an error body and
/// no partial document.
pub async fn handle_build(
    State(state): State<AppState>,
    Json(request): Json<DeckRequest>,
) -> Result<(HeaderMap, Bytes), AppError> {
    // Assembly and serialization are CPU-bound; keep the async executor free.
    let bytes = tokio::task::spawn_blocking(move || -> Result<Bytes, AppError> {
        let plan = build_plan(&request);
        info!(
            pool = plan.stats.pool_size,
            kept = plan.stats.kept_total,
            "building deck"
        );
        let deck = assemble_deck(&plan, &state.assets, &state.geometry)?;
        state.backend.render(&deck, &state.assets)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in build: {e}")))??;

    info!(bytes = bytes.len(), "deck serialized");

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(PPTX_MIME));
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!("attachment; filename=\"{PPTX_FILENAME}\""))
            .map_err(|e| AppError::Internal(anyhow::anyhow!("disposition header: {e}")))?,
    );

    Ok((headers, bytes))
}
