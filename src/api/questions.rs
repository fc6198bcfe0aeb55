use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::auth::Claims;
use crate::error::ApiError;
use crate::models::{
    AnswerDto, CreateAnswerRequest, CreateQuestionRequest, ListQuestionsQuery, QuestionDto,
    UpdateQuestionRequest, VoteRequest,
};
use crate::state::AppState;
use crate::store::QuestionFields;

/// GET /api/questions - All questions, newest first, optionally by category
pub async fn list_questions(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ListQuestionsQuery>,
) -> Json<Vec<QuestionDto>> {
    let category = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());
    let questions = state.store.list_questions(category);
    Json(
        questions
            .iter()
            .map(|q| QuestionDto::from_question(q, Some(&claims.sub)))
            .collect(),
    )
}

/// GET /api/questions/:id
pub async fn get_question(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<u64>,
) -> Result<Json<QuestionDto>, ApiError> {
    let question = state
        .store
        .get_question(id)
        .ok_or_else(|| ApiError::NotFound(format!("Question {id} not found")))?;
    Ok(Json(QuestionDto::from_question(&question, Some(&claims.sub))))
}

/// POST /api/questions
pub async fn create_question(
    State(state): State<AppState>,
    Json(req): Json<CreateQuestionRequest>,
) -> Result<(StatusCode, Json<QuestionDto>), ApiError> {
    let question = state.store.create_question(
        QuestionFields {
            title: req.title,
            body: req.body,
            category: req.category,
        },
        req.image_urls,
    )?;
    tracing::info!("Created question {} in '{}'", question.id, question.category);
    Ok((StatusCode::CREATED, Json(QuestionDto::from_question(&question, None))))
}

/// PUT /api/questions/:id - Replace title, body and category
pub async fn update_question(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<UpdateQuestionRequest>,
) -> Result<StatusCode, ApiError> {
    if req.id.is_some_and(|body_id| body_id != id) {
        return Err(ApiError::BadRequest("ID mismatch".to_string()));
    }
    state.store.update_question(
        id,
        QuestionFields {
            title: req.title,
            body: req.body,
            category: req.category,
        },
    )?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/questions/:id - Removes answers, images and votes with it
pub async fn delete_question(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_question(id)?;
    tracing::info!("Deleted question {id}");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/questions/categories
pub async fn categories(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.store.categories())
}

/// POST /api/questions/:id/answers
pub async fn create_answer(
    State(state): State<AppState>,
    Path(question_id): Path<u64>,
    Json(req): Json<CreateAnswerRequest>,
) -> Result<(StatusCode, Json<AnswerDto>), ApiError> {
    let answer = state
        .store
        .add_answer(question_id, &req.body, req.image_urls)?;
    Ok((StatusCode::CREATED, Json(AnswerDto::from_answer(&answer, None))))
}

/// DELETE /api/answers/:id
pub async fn delete_answer(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_answer(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/answers/:id/vote - One vote per user; voting again replaces it
pub async fn vote_answer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<u64>,
    Json(req): Json<VoteRequest>,
) -> Result<Json<AnswerDto>, ApiError> {
    let answer = state.store.vote(id, &claims.sub, req.is_upvote)?;
    Ok(Json(AnswerDto::from_answer(&answer, Some(&claims.sub))))
}
