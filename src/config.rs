use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";
/// Upper bound for `JWT_TTL_HOURS` (one year)
pub const MAX_JWT_TTL_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where the FAQ store file lives
    pub data_dir: PathBuf,
    /// Server bind address
    pub bind_addr: String,
    /// LLM provider configuration
    pub llm: LlmConfig,
    /// Token signing configuration
    pub jwt: JwtConfig,
    /// Maximum questions returned by the chatbot's relevance search
    pub max_related_questions: usize,
    /// Maximum questions returned by the search endpoint
    pub max_search_results: usize,
    /// What a query made only of short tokens matches
    pub empty_query_policy: EmptyQueryPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key. When absent every chatbot answer comes from the local summary.
    pub api_key: Option<String>,
    /// Messages endpoint
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Per-request timeout in seconds (capped at 120)
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HMAC secret. Never serialized back out.
    #[serde(skip_serializing)]
    pub secret: String,
    /// Used as both issuer and audience
    pub issuer: String,
    pub ttl_hours: i64,
}

/// Behaviour of relevance search when every query token is noise (≤ 2 chars).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyQueryPolicy {
    /// An empty keyword set matches no question.
    #[default]
    MatchNothing,
    /// An empty keyword set matches every question.
    MatchAll,
}

impl EmptyQueryPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "nothing" | "none" | "match_nothing" => Some(Self::MatchNothing),
            "all" | "match_all" => Some(Self::MatchAll),
            _ => None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            bind_addr: "127.0.0.1:8080".to_string(),
            llm: LlmConfig::default(),
            jwt: JwtConfig::default(),
            max_related_questions: 5,
            max_search_results: 20,
            empty_query_policy: EmptyQueryPolicy::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 500,
            temperature: 0.7,
            timeout_secs: 30,
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            // Random per process: tokens do not survive a restart unless
            // JWT_SECRET is set.
            secret: format!("{}{}", uuid::Uuid::new_v4().simple(), uuid::Uuid::new_v4().simple()),
            issuer: "faq-service".to_string(),
            ttl_hours: 24,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("FAQ_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(addr) = std::env::var("FAQ_BIND_ADDR") {
            config.bind_addr = addr;
        }

        // LLM config
        if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
            if !key.trim().is_empty() {
                config.llm.api_key = Some(key);
            }
        }
        if let Ok(url) = std::env::var("ANTHROPIC_API_URL") {
            config.llm.api_url = url;
        }
        if let Ok(model) = std::env::var("ANTHROPIC_MODEL") {
            config.llm.model = model;
        }
        if let Ok(val) = std::env::var("LLM_TIMEOUT_SECS") {
            if let Ok(v) = val.parse::<u64>() {
                config.llm.timeout_secs = v.min(120);
            }
        }

        // JWT config
        match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => config.jwt.secret = secret,
            _ => tracing::warn!("JWT_SECRET not set, using a random per-process secret"),
        }
        if let Ok(issuer) = std::env::var("JWT_ISSUER") {
            config.jwt.issuer = issuer;
        }
        if let Ok(val) = std::env::var("JWT_TTL_HOURS") {
            if let Ok(v) = val.parse::<i64>() {
                config.jwt.ttl_hours = clamp_ttl_hours(v);
            }
        }

        // Search limits
        if let Ok(val) = std::env::var("FAQ_MAX_RELATED_QUESTIONS") {
            if let Ok(v) = val.parse() {
                config.max_related_questions = v;
            }
        }
        if let Ok(val) = std::env::var("FAQ_MAX_SEARCH_RESULTS") {
            if let Ok(v) = val.parse() {
                config.max_search_results = v;
            }
        }
        if let Ok(val) = std::env::var("FAQ_EMPTY_QUERY_POLICY") {
            match EmptyQueryPolicy::parse(&val) {
                Some(policy) => config.empty_query_policy = policy,
                None => tracing::warn!("Ignoring unknown FAQ_EMPTY_QUERY_POLICY value '{val}'"),
            }
        }

        config
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("faq.json")
    }
}

/// Token lifetime must be positive and at most a year.
fn clamp_ttl_hours(hours: i64) -> i64 {
    let clamped = hours.clamp(1, MAX_JWT_TTL_HOURS);
    if clamped != hours {
        tracing::warn!("JWT_TTL_HOURS={hours} out of range, using {clamped}");
    }
    clamped
}
