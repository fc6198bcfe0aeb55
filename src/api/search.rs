use anyhow::Context;
use axum::extract::{Query, State};
use axum::{Extension, Json};

use crate::auth::Claims;
use crate::error::ApiError;
use crate::models::{QuestionDto, SearchQuery};
use crate::search::fulltext;
use crate::state::AppState;

/// GET /api/questions/search?q= - Phrase search ranked title > category >
/// body/answers, newest first within a tier
pub async fn search_questions(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<QuestionDto>>, ApiError> {
    let query = params.q.unwrap_or_default();
    if query.trim().is_empty() {
        return Err(fulltext::SearchError::EmptyQuery.into());
    }

    let store = state.store.clone();
    let limit = state.config.max_search_results;
    let results = tokio::task::spawn_blocking(move || {
        fulltext::search(&store.questions(), &query, limit)
    })
    .await
    .context("Search task failed")??;

    Ok(Json(
        results
            .iter()
            .map(|q| QuestionDto::from_question(q, Some(&claims.sub)))
            .collect(),
    ))
}
