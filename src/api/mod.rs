//! Axum HTTP surface.

pub mod auth;
pub mod chat;
pub mod middleware;
pub mod questions;
pub mod search;

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;

use crate::state::AppState;

/// Build the full router. Everything except register/login needs a bearer
/// token; every route sits behind the error boundary.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/questions", get(questions::list_questions))
        .route("/api/questions", post(questions::create_question))
        .route("/api/questions/categories", get(questions::categories))
        .route("/api/questions/search", get(search::search_questions))
        .route("/api/questions/chatbot", post(chat::chatbot))
        .route("/api/questions/{id}", get(questions::get_question))
        .route("/api/questions/{id}", put(questions::update_question))
        .route("/api/questions/{id}", delete(questions::delete_question))
        .route("/api/questions/{id}/answers", post(questions::create_answer))
        .route("/api/answers/{id}", delete(questions::delete_answer))
        .route("/api/answers/{id}/vote", post(questions::vote_answer))
        .route("/api/auth/me", get(auth::me))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    let app = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .merge(protected)
        .with_state(state);
    with_error_boundary(app)
}

/// Panics become 500s, and every 5xx leaves as the opaque error body.
pub fn with_error_boundary<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(CatchPanicLayer::custom(middleware::panic_response))
        .layer(axum::middleware::from_fn(middleware::error_boundary))
}
