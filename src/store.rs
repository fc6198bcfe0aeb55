//! JSON-file backed FAQ store.
//!
//! Everything lives in memory behind a single `RwLock`; every mutation is
//! written back to disk atomically (temp file + rename). Answers, images and
//! votes are owned by their parent, so a cascading delete is just removing the
//! parent from its collection.

use anyhow::Context;
use chrono::Utc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{Answer, AnswerImage, AnswerVote, Question, QuestionImage, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },

    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct FaqData {
    questions: Vec<Question>,
    users: Vec<User>,
    ids: IdCounters,
}

/// Last identifier handed out per entity kind. Identifiers are never reused.
#[derive(Debug, Default, Serialize, Deserialize)]
struct IdCounters {
    question: u64,
    answer: u64,
    question_image: u64,
    answer_image: u64,
    vote: u64,
    user: u64,
}

fn next_id(counter: &mut u64) -> u64 {
    *counter += 1;
    *counter
}

/// Fields of a question as supplied by a caller.
#[derive(Debug, Clone)]
pub struct QuestionFields {
    pub title: String,
    pub body: Option<String>,
    pub category: String,
}

impl QuestionFields {
    fn validated(self) -> Result<Self, StoreError> {
        let title = self.title.trim().to_string();
        let category = self.category.trim().to_string();
        if title.is_empty() {
            return Err(StoreError::Invalid("Title is required".to_string()));
        }
        if category.is_empty() {
            return Err(StoreError::Invalid("Category is required".to_string()));
        }
        let body = self.body.filter(|b| !b.trim().is_empty());
        Ok(Self { title, body, category })
    }
}

pub struct FaqStore {
    data: RwLock<FaqData>,
    /// `None` keeps the store purely in memory.
    path: Option<PathBuf>,
}

impl FaqStore {
    /// Open the store file at `path`, creating an empty store if it does not exist.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            FaqData::default()
        };

        Ok(Self {
            data: RwLock::new(data),
            path: Some(path.to_path_buf()),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            data: RwLock::new(FaqData::default()),
            path: None,
        }
    }

    fn persist(&self, data: &FaqData) {
        let Some(path) = &self.path else {
            return;
        };
        let serialized = match serde_json::to_string_pretty(data) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("Failed to serialize FAQ store: {e}");
                return;
            }
        };
        let tmp_path = path.with_extension("json.tmp");
        if let Err(e) = std::fs::write(&tmp_path, serialized)
            .and_then(|_| std::fs::rename(&tmp_path, path))
        {
            tracing::warn!("Failed to persist FAQ store to {}: {e}", path.display());
        }
    }

    // ─── Questions ───────────────────────────────────────

    /// Snapshot of every question with answers, images and votes loaded.
    pub fn questions(&self) -> Vec<Question> {
        self.data.read().questions.clone()
    }

    /// Newest first, optionally restricted to an exact category.
    pub fn list_questions(&self, category: Option<&str>) -> Vec<Question> {
        let mut questions: Vec<Question> = self
            .data
            .read()
            .questions
            .iter()
            .filter(|q| category.map_or(true, |c| q.category == c))
            .cloned()
            .collect();
        questions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        questions
    }

    pub fn get_question(&self, id: u64) -> Option<Question> {
        self.data.read().questions.iter().find(|q| q.id == id).cloned()
    }

    pub fn create_question(
        &self,
        fields: QuestionFields,
        image_urls: Vec<String>,
    ) -> Result<Question, StoreError> {
        let fields = fields.validated()?;
        let mut data = self.data.write();

        let id = next_id(&mut data.ids.question);
        let images = image_urls
            .into_iter()
            .filter(|url| !url.trim().is_empty())
            .map(|image_url| QuestionImage {
                id: next_id(&mut data.ids.question_image),
                question_id: id,
                image_url,
            })
            .collect();

        let question = Question {
            id,
            title: fields.title,
            body: fields.body,
            category: fields.category,
            created_at: Utc::now(),
            answers: Vec::new(),
            images,
        };
        data.questions.push(question.clone());
        self.persist(&data);
        Ok(question)
    }

    /// Replace title, body and category. Answers and images are untouched.
    pub fn update_question(&self, id: u64, fields: QuestionFields) -> Result<Question, StoreError> {
        let fields = fields.validated()?;
        let mut data = self.data.write();

        let question = data
            .questions
            .iter_mut()
            .find(|q| q.id == id)
            .ok_or(StoreError::NotFound { entity: "Question", id })?;
        question.title = fields.title;
        question.body = fields.body;
        question.category = fields.category;
        let updated = question.clone();

        self.persist(&data);
        Ok(updated)
    }

    /// Remove a question together with its answers, images and votes.
    pub fn delete_question(&self, id: u64) -> Result<(), StoreError> {
        let mut data = self.data.write();
        let before = data.questions.len();
        data.questions.retain(|q| q.id != id);
        if data.questions.len() == before {
            return Err(StoreError::NotFound { entity: "Question", id });
        }
        self.persist(&data);
        Ok(())
    }

    /// Distinct categories, sorted.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .data
            .read()
            .questions
            .iter()
            .map(|q| q.category.clone())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }

    // ─── Answers ─────────────────────────────────────────

    pub fn add_answer(
        &self,
        question_id: u64,
        body: &str,
        image_urls: Vec<String>,
    ) -> Result<Answer, StoreError> {
        let body = body.trim();
        if body.is_empty() {
            return Err(StoreError::Invalid("Answer body is required".to_string()));
        }

        let mut data = self.data.write();
        if !data.questions.iter().any(|q| q.id == question_id) {
            return Err(StoreError::NotFound {
                entity: "Question",
                id: question_id,
            });
        }

        let id = next_id(&mut data.ids.answer);
        let images = image_urls
            .into_iter()
            .filter(|url| !url.trim().is_empty())
            .map(|image_url| AnswerImage {
                id: next_id(&mut data.ids.answer_image),
                answer_id: id,
                image_url,
            })
            .collect();
        let answer = Answer {
            id,
            question_id,
            body: body.to_string(),
            created_at: Utc::now(),
            images,
            votes: Vec::new(),
        };

        // Existence checked above under the same lock
        if let Some(question) = data.questions.iter_mut().find(|q| q.id == question_id) {
            question.answers.push(answer.clone());
        }
        self.persist(&data);
        Ok(answer)
    }

    /// Remove an answer together with its images and votes.
    pub fn delete_answer(&self, answer_id: u64) -> Result<(), StoreError> {
        let mut data = self.data.write();
        let mut removed = false;
        for question in data.questions.iter_mut() {
            let before = question.answers.len();
            question.answers.retain(|a| a.id != answer_id);
            if question.answers.len() != before {
                removed = true;
                break;
            }
        }
        if !removed {
            return Err(StoreError::NotFound {
                entity: "Answer",
                id: answer_id,
            });
        }
        self.persist(&data);
        Ok(())
    }

    /// Record `user_email`'s vote on an answer, replacing any earlier vote by
    /// the same user.
    pub fn vote(&self, answer_id: u64, user_email: &str, is_upvote: bool) -> Result<Answer, StoreError> {
        let mut data = self.data.write();
        let FaqData { questions, ids, .. } = &mut *data;

        let answer = questions
            .iter_mut()
            .flat_map(|q| q.answers.iter_mut())
            .find(|a| a.id == answer_id)
            .ok_or(StoreError::NotFound {
                entity: "Answer",
                id: answer_id,
            })?;

        match answer
            .votes
            .iter_mut()
            .find(|v| v.user_email.eq_ignore_ascii_case(user_email))
        {
            Some(existing) => existing.is_upvote = is_upvote,
            None => answer.votes.push(AnswerVote {
                id: next_id(&mut ids.vote),
                answer_id,
                user_email: user_email.to_string(),
                is_upvote,
            }),
        }
        let updated = answer.clone();

        self.persist(&data);
        Ok(updated)
    }

    // ─── Users ───────────────────────────────────────────

    pub fn find_user_by_email(&self, email: &str) -> Option<User> {
        let email = email.trim();
        self.data
            .read()
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    pub fn create_user(&self, email: &str, name: &str, password_hash: String) -> Result<User, StoreError> {
        let email = email.trim();
        let mut data = self.data.write();
        if data.users.iter().any(|u| u.email.eq_ignore_ascii_case(email)) {
            return Err(StoreError::Duplicate("User already exists".to_string()));
        }
        let user = User {
            id: next_id(&mut data.ids.user),
            email: email.to_string(),
            name: name.trim().to_string(),
            password_hash,
            created_at: Utc::now(),
        };
        data.users.push(user.clone());
        self.persist(&data);
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(title: &str, category: &str) -> QuestionFields {
        QuestionFields {
            title: title.into(),
            body: None,
            category: category.into(),
        }
    }

    #[test]
    fn test_create_and_get_question() {
        let store = FaqStore::in_memory();
        let q = store
            .create_question(fields("How do I reset?", "Account"), vec!["https://i/1.png".into()])
            .unwrap();
        assert_eq!(q.id, 1);
        assert_eq!(q.images.len(), 1);
        assert_eq!(q.images[0].question_id, q.id);
        assert_eq!(store.get_question(1).unwrap().title, "How do I reset?");
    }

    #[test]
    fn test_create_rejects_blank_title_and_category() {
        let store = FaqStore::in_memory();
        assert!(matches!(
            store.create_question(fields("  ", "Account"), vec![]),
            Err(StoreError::Invalid(_))
        ));
        assert!(matches!(
            store.create_question(fields("Title", ""), vec![]),
            Err(StoreError::Invalid(_))
        ));
        assert!(store.questions().is_empty());
    }

    #[test]
    fn test_update_missing_question_is_not_found() {
        let store = FaqStore::in_memory();
        let err = store.update_question(42, fields("t", "c")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { id: 42, .. }));
    }

    #[test]
    fn test_update_keeps_answers() {
        let store = FaqStore::in_memory();
        let q = store.create_question(fields("Old", "General"), vec![]).unwrap();
        store.add_answer(q.id, "An answer", vec![]).unwrap();
        let updated = store
            .update_question(
                q.id,
                QuestionFields {
                    title: "New".into(),
                    body: Some("details".into()),
                    category: "Billing".into(),
                },
            )
            .unwrap();
        assert_eq!(updated.title, "New");
        assert_eq!(updated.body.as_deref(), Some("details"));
        assert_eq!(updated.answers.len(), 1);
    }

    #[test]
    fn test_delete_question_cascades() {
        let store = FaqStore::in_memory();
        let q = store.create_question(fields("Q", "C"), vec!["u".into()]).unwrap();
        let a = store.add_answer(q.id, "A", vec!["v".into()]).unwrap();
        store.vote(a.id, "x@y.com", true).unwrap();

        store.delete_question(q.id).unwrap();
        assert!(store.get_question(q.id).is_none());
        assert!(matches!(store.vote(a.id, "x@y.com", true), Err(StoreError::NotFound { .. })));
        assert!(matches!(store.delete_answer(a.id), Err(StoreError::NotFound { .. })));
        assert!(matches!(store.delete_question(q.id), Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn test_add_answer_to_missing_question() {
        let store = FaqStore::in_memory();
        assert!(matches!(
            store.add_answer(9, "body", vec![]),
            Err(StoreError::NotFound { entity: "Question", id: 9 })
        ));
    }

    #[test]
    fn test_vote_replaces_previous_vote() {
        let store = FaqStore::in_memory();
        let q = store.create_question(fields("Q", "C"), vec![]).unwrap();
        let a = store.add_answer(q.id, "A", vec![]).unwrap();
        store.vote(a.id, "x@y.com", true).unwrap();
        let updated = store.vote(a.id, "X@Y.com", false).unwrap();
        assert_eq!(updated.votes.len(), 1);
        assert!(!updated.votes[0].is_upvote);
        let updated = store.vote(a.id, "other@y.com", true).unwrap();
        assert_eq!(updated.votes.len(), 2);
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let store = FaqStore::in_memory();
        let first = store.create_question(fields("1", "C"), vec![]).unwrap();
        store.delete_question(first.id).unwrap();
        let second = store.create_question(fields("2", "C"), vec![]).unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn test_list_by_category_newest_first() {
        let store = FaqStore::in_memory();
        store.create_question(fields("a", "Billing"), vec![]).unwrap();
        store.create_question(fields("b", "Setup"), vec![]).unwrap();
        store.create_question(fields("c", "Billing"), vec![]).unwrap();

        let billing = store.list_questions(Some("Billing"));
        let titles: Vec<&str> = billing.iter().map(|q| q.title.as_str()).collect();
        assert_eq!(titles, vec!["c", "a"]);
        assert_eq!(store.list_questions(None).len(), 3);
        assert_eq!(store.categories(), vec!["Billing".to_string(), "Setup".to_string()]);
    }

    #[test]
    fn test_duplicate_user_rejected_case_insensitively() {
        let store = FaqStore::in_memory();
        store.create_user("a@b.com", "A", "hash".into()).unwrap();
        assert!(matches!(
            store.create_user("A@B.com", "A2", "hash".into()),
            Err(StoreError::Duplicate(_))
        ));
        assert_eq!(store.find_user_by_email(" A@b.COM ").unwrap().name, "A");
    }

    #[test]
    fn test_persist_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("faq.json");
        {
            let store = FaqStore::open(&path).unwrap();
            let q = store.create_question(fields("Persisted", "C"), vec![]).unwrap();
            store.add_answer(q.id, "Yes", vec![]).unwrap();
        }
        let reopened = FaqStore::open(&path).unwrap();
        let questions = reopened.questions();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].answers[0].body, "Yes");
        // Counters survive too
        let next = reopened.create_question(fields("Next", "C"), vec![]).unwrap();
        assert_eq!(next.id, 2);
    }

    #[test]
    fn test_open_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("faq.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(FaqStore::open(&path).is_err());
    }
}
