use anyhow::{Context, Result};
use axum::extract::State;
use axum::Json;

use crate::llm::context::build_context;
use crate::models::{ChatbotRequest, ChatbotResponse, RelatedQuestionDto};
use crate::search::relevance::find_relevant;
use crate::state::AppState;

const MAX_CHAT_MESSAGE_LEN: usize = 2000;
const MAX_RELATED_IN_RESPONSE: usize = 3;

pub const NO_MATCHES_RESPONSE: &str = "I couldn't find any questions related to your query. \
Please try rephrasing or browse through our categories.";
pub const TROUBLE_RESPONSE: &str =
    "I'm having trouble processing your request right now. Please try again later.";

/// POST /api/questions/chatbot - Answer a message from the FAQ.
///
/// Always 200: failures anywhere in the pipeline become a canned apology.
pub async fn chatbot(
    State(state): State<AppState>,
    Json(req): Json<ChatbotRequest>,
) -> Json<ChatbotResponse> {
    Json(reply_or_apology(answer_message(&state, &req.message).await))
}

fn reply_or_apology(result: Result<ChatbotResponse>) -> ChatbotResponse {
    result.unwrap_or_else(|e| {
        tracing::error!("Error processing chatbot query: {e:#}");
        ChatbotResponse {
            response: TROUBLE_RESPONSE.to_string(),
            related_questions: Vec::new(),
        }
    })
}

/// Relevance search → prompt → LLM (or local summary).
pub async fn answer_message(state: &AppState, message: &str) -> Result<ChatbotResponse> {
    let message = truncate_to_char_boundary(message, MAX_CHAT_MESSAGE_LEN);

    // ── Step 1: Find relevant questions ──────────────────
    let store = state.store.clone();
    let limit = state.config.max_related_questions;
    let policy = state.config.empty_query_policy;
    let query = message.clone();
    let relevant = run_blocking("Relevance search", move || {
        find_relevant(&store.questions(), &query, limit, policy)
    })
    .await?;

    if relevant.is_empty() {
        return Ok(ChatbotResponse {
            response: NO_MATCHES_RESPONSE.to_string(),
            related_questions: Vec::new(),
        });
    }
    tracing::info!("Chatbot matched {} questions", relevant.len());

    // ── Step 2: Build prompt and ask the LLM ─────────────
    let context = build_context(&relevant, &message);
    let response = state.gateway.answer(&context).await;

    Ok(ChatbotResponse {
        response,
        related_questions: relevant
            .iter()
            .take(MAX_RELATED_IN_RESPONSE)
            .map(RelatedQuestionDto::from)
            .collect(),
    })
}

/// Run a CPU-bound step on the blocking pool; a panic inside it becomes an error.
async fn run_blocking<T, F>(step: &'static str, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .with_context(|| format!("{step} task failed"))
}

/// Cut `s` to at most `max_len` bytes without splitting a character.
fn truncate_to_char_boundary(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    use crate::config::{Config, EmptyQueryPolicy};
    use crate::models::Question;
    use crate::llm::fallback::summarize;
    use crate::store::{FaqStore, QuestionFields};

    // ─── Input validation ────────────────────────────────

    #[test]
    fn test_message_at_limit_kept_whole() {
        let message = "x".repeat(MAX_CHAT_MESSAGE_LEN);
        assert_eq!(truncate_to_char_boundary(&message, MAX_CHAT_MESSAGE_LEN), message);
    }

    #[test]
    fn test_char_straddling_limit_dropped() {
        // "é" is two bytes and would occupy bytes 1999..2001
        let message = format!("{}é tail", "x".repeat(MAX_CHAT_MESSAGE_LEN - 1));
        let result = truncate_to_char_boundary(&message, MAX_CHAT_MESSAGE_LEN);
        assert_eq!(result.len(), MAX_CHAT_MESSAGE_LEN - 1);
        assert!(result.chars().all(|c| c == 'x'));
    }

    #[test]
    fn test_truncate_unicode_safe() {
        // 4-byte emoji spans bytes 6..10
        let s = "Hello 🌍 world";
        let result = truncate_to_char_boundary(s, 8);
        assert_eq!(result, "Hello ");
    }

    // ─── Orchestration ───────────────────────────────────

    fn state_with(questions: &[(&str, &[&str])]) -> AppState {
        let store = FaqStore::in_memory();
        for (title, answers) in questions {
            let q = store
                .create_question(
                    QuestionFields {
                        title: title.to_string(),
                        body: None,
                        category: "General".into(),
                    },
                    vec![],
                )
                .unwrap();
            for a in answers.iter() {
                store.add_answer(q.id, a, vec![]).unwrap();
            }
        }
        AppState::with_parts(Config::default(), store, reqwest::Client::new())
    }

    #[tokio::test]
    async fn test_no_matches_returns_canned_response() {
        let state = state_with(&[("Billing FAQ", &[])]);
        let resp = answer_message(&state, "kubernetes").await.unwrap();
        assert_eq!(resp.response, NO_MATCHES_RESPONSE);
        assert!(resp.related_questions.is_empty());
    }

    #[tokio::test]
    async fn test_noise_only_message_matches_nothing() {
        let state = state_with(&[("Billing FAQ", &["a"])]);
        assert_eq!(state.config.empty_query_policy, EmptyQueryPolicy::MatchNothing);
        let resp = answer_message(&state, "is it ok").await.unwrap();
        assert_eq!(resp.response, NO_MATCHES_RESPONSE);
    }

    #[tokio::test]
    async fn test_without_api_key_answers_from_fallback() {
        let state = state_with(&[
            ("How do I fix installation error?", &["Run the repair tool", "Reboot"]),
            ("Billing FAQ", &[]),
        ]);
        let resp = answer_message(&state, "installation error").await.unwrap();

        assert_eq!(resp.related_questions.len(), 1);
        assert_eq!(resp.related_questions[0].title, "How do I fix installation error?");
        assert_eq!(
            resp.related_questions[0].answer_bodies,
            vec!["Run the repair tool".to_string(), "Reboot".to_string()]
        );

        let relevant = find_relevant(
            &state.store.questions(),
            "installation error",
            5,
            EmptyQueryPolicy::MatchNothing,
        );
        let expected = summarize(&build_context(&relevant, "installation error"));
        assert_eq!(resp.response, expected);
    }

    #[tokio::test]
    async fn test_related_questions_capped_at_three() {
        let state = state_with(&[
            ("printer one", &[]),
            ("printer two", &[]),
            ("printer three", &[]),
            ("printer four", &[]),
            ("printer five", &[]),
        ]);
        let resp = answer_message(&state, "printer").await.unwrap();
        assert_eq!(resp.related_questions.len(), 3);
        let ids: Vec<u64> = resp.related_questions.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_long_message_still_answered() {
        let state = state_with(&[("Printer offline", &["Check the cable"])]);
        let message = format!("printer {}", "é".repeat(MAX_CHAT_MESSAGE_LEN));
        let resp = answer_message(&state, &message).await.unwrap();
        assert_eq!(resp.related_questions.len(), 1);
    }

    // ─── Failure handling ────────────────────────────────

    #[tokio::test]
    async fn test_pipeline_failure_becomes_apology() {
        let err = run_blocking("Relevance search", || -> Vec<Question> {
            panic!("store snapshot corrupted")
        })
        .await
        .unwrap_err();
        assert!(format!("{err:#}").contains("Relevance search task failed"));

        let reply = reply_or_apology(Err(err));
        assert_eq!(reply.response, TROUBLE_RESPONSE);
        assert!(reply.related_questions.is_empty());

        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["relatedQuestions"], serde_json::json!([]));
    }

    #[test]
    fn test_successful_reply_passes_through() {
        let reply = reply_or_apology(Ok(ChatbotResponse {
            response: "Reinstall.".into(),
            related_questions: vec![],
        }));
        assert_eq!(reply.response, "Reinstall.");
    }

    #[tokio::test]
    async fn test_handler_responds_200() {
        let state = state_with(&[]);
        let response = chatbot(
            State(state),
            Json(ChatbotRequest {
                message: "anything at all".into(),
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
