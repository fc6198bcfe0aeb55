use thiserror::Error;

use crate::models::Question;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("Search query cannot be empty")]
    EmptyQuery,
}

/// Match priority: title beats category beats body/answers.
fn tier(question: &Question, term: &str) -> Option<u8> {
    if question.title.to_lowercase().contains(term) {
        return Some(3);
    }
    if question.category.to_lowercase().contains(term) {
        return Some(2);
    }
    let in_body = question
        .body
        .as_deref()
        .is_some_and(|b| b.to_lowercase().contains(term));
    let in_answers = question
        .answers
        .iter()
        .any(|a| a.body.to_lowercase().contains(term));
    (in_body || in_answers).then_some(1)
}

/// Search for the whole query as a case-insensitive substring.
///
/// Results are ordered by tier, then newest first (id breaks timestamp ties),
/// and truncated to `limit`.
pub fn search(questions: &[Question], query: &str, limit: usize) -> Result<Vec<Question>, SearchError> {
    let term = query.trim().to_lowercase();
    if term.is_empty() {
        return Err(SearchError::EmptyQuery);
    }

    let mut ranked: Vec<(u8, &Question)> = questions
        .iter()
        .filter_map(|q| tier(q, &term).map(|t| (t, q)))
        .collect();

    ranked.sort_by(|(ta, a), (tb, b)| {
        tb.cmp(ta)
            .then(b.created_at.cmp(&a.created_at))
            .then(b.id.cmp(&a.id))
    });

    Ok(ranked.into_iter().take(limit).map(|(_, q)| q.clone()).collect())
}
