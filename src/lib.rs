//! # faq-service
//!
//! A FAQ backend: question/answer CRUD, keyword search, JWT login, and a
//! chatbot that answers from the FAQ through an LLM with a local fallback.
//!
//! ## Chatbot pipeline
//!
//! ```text
//!                 ┌──────────────┐
//!                 │ User message │
//!                 └──────┬───────┘
//!                        ▼
//!           ┌─────────────────────────┐
//!           │   Relevance Search      │
//!           │  tokens > 2 chars       │
//!           │  substring, any field   │
//!           │  most answers first     │
//!           └────────────┬────────────┘
//!                        │ 0 hits → "couldn't find any questions"
//!                        ▼
//!           ┌─────────────────────────┐
//!           │    Context Builder      │
//!           │  Question / Details /   │
//!           │  Category / ≤3 answers  │
//!           └────────────┬────────────┘
//!                        ▼
//!           ┌─────────────────────────┐
//!           │      LLM Gateway        │
//!           │  one POST, no retry     │
//!           └─────┬─────────────┬─────┘
//!          2xx    │             │ no key / error / timeout
//!                 ▼             ▼
//!          ┌────────────┐ ┌──────────────────┐
//!          │ first text │ │ Fallback Summary │
//!          └─────┬──────┘ └────────┬─────────┘
//!                └────────┬────────┘
//!                         ▼
//!           ┌─────────────────────────┐
//!           │ answer + top 3 related  │
//!           └─────────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration (LLM, JWT, search limits)
//! - [`models`] - Stored entities and request/response DTOs
//! - [`store`] - JSON-file backed store with cascading deletes
//! - [`search::relevance`] - Tokenized keyword match ranked by answer count
//! - [`search::fulltext`] - Phrase match ranked title > category > body/answers
//! - [`llm::context`] - Prompt construction from matched questions
//! - [`llm::gateway`] - Anthropic Messages API client with fail-open fallback
//! - [`llm::fallback`] - Deterministic local summary of a prompt
//! - [`auth`] - Argon2 password hashing and JWT issuance/verification
//! - [`api`] - Axum router, handlers and middleware
//! - [`error`] - API error type and its HTTP mapping
//! - [`state`] - Shared application state

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod search;
pub mod state;
pub mod store;
