use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Stored entities ─────────────────────────────────────

/// A FAQ question. Answers and images are owned, so removing the question
/// removes everything hanging off it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: u64,
    pub title: String,
    pub body: Option<String>,
    pub category: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub answers: Vec<Answer>,
    #[serde(default)]
    pub images: Vec<QuestionImage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub id: u64,
    pub question_id: u64,
    pub body: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub images: Vec<AnswerImage>,
    #[serde(default)]
    pub votes: Vec<AnswerVote>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerVote {
    pub id: u64,
    pub answer_id: u64,
    pub user_email: String,
    pub is_upvote: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionImage {
    pub id: u64,
    pub question_id: u64,
    pub image_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerImage {
    pub id: u64,
    pub answer_id: u64,
    pub image_url: String,
}

/// A registered account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

// ─── Requests ────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    pub title: String,
    pub body: Option<String>,
    pub category: String,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuestionRequest {
    /// Optional echo of the path id; must match it when present
    pub id: Option<u64>,
    pub title: String,
    pub body: Option<String>,
    pub category: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnswerRequest {
    pub body: String,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub is_upvote: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListQuestionsQuery {
    pub category: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Chatbot request
#[derive(Debug, Clone, Deserialize)]
pub struct ChatbotRequest {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

// ─── Responses ───────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDto {
    pub id: u64,
    pub title: String,
    pub body: Option<String>,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub image_urls: Vec<String>,
    pub answers: Vec<AnswerDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerDto {
    pub id: u64,
    pub question_id: u64,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub image_urls: Vec<String>,
    pub upvote_count: usize,
    pub downvote_count: usize,
    /// The caller's own vote, if any
    pub user_vote: Option<bool>,
}

impl QuestionDto {
    /// Project a stored question for `viewer` (used to fill `user_vote`).
    pub fn from_question(question: &Question, viewer: Option<&str>) -> Self {
        Self {
            id: question.id,
            title: question.title.clone(),
            body: question.body.clone(),
            category: question.category.clone(),
            created_at: question.created_at,
            image_urls: question.images.iter().map(|i| i.image_url.clone()).collect(),
            answers: question
                .answers
                .iter()
                .map(|a| AnswerDto::from_answer(a, viewer))
                .collect(),
        }
    }
}

impl AnswerDto {
    pub fn from_answer(answer: &Answer, viewer: Option<&str>) -> Self {
        let upvote_count = answer.votes.iter().filter(|v| v.is_upvote).count();
        Self {
            id: answer.id,
            question_id: answer.question_id,
            body: answer.body.clone(),
            created_at: answer.created_at,
            image_urls: answer.images.iter().map(|i| i.image_url.clone()).collect(),
            upvote_count,
            downvote_count: answer.votes.len() - upvote_count,
            user_vote: viewer.and_then(|email| {
                answer
                    .votes
                    .iter()
                    .find(|v| v.user_email.eq_ignore_ascii_case(email))
                    .map(|v| v.is_upvote)
            }),
        }
    }
}

/// Chatbot response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatbotResponse {
    pub response: String,
    pub related_questions: Vec<RelatedQuestionDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedQuestionDto {
    pub id: u64,
    pub title: String,
    pub body: Option<String>,
    pub category: String,
    pub answer_bodies: Vec<String>,
}

impl From<&Question> for RelatedQuestionDto {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id,
            title: q.title.clone(),
            body: q.body.clone(),
            category: q.category.clone(),
            answer_bodies: q.answers.iter().map(|a| a.body.clone()).collect(),
        }
    }
}

/// Public view of a user (no password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub id: u64,
    pub email: String,
    pub name: String,
}

impl From<&User> for UserDto {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            email: u.email.clone(),
            name: u.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserDto,
}
