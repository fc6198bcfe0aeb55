use crate::config::EmptyQueryPolicy;
use crate::models::Question;

/// Tokens this short are treated as noise.
const MIN_KEYWORD_CHARS: usize = 3;

/// Lower-case `query`, split on whitespace and drop noise tokens.
pub fn keywords(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .filter(|w| w.chars().count() >= MIN_KEYWORD_CHARS)
        .map(str::to_string)
        .collect()
}

/// True when any keyword is a substring of the question's title, body,
/// category or one of its answers (all lower-cased).
fn matches_any(question: &Question, keywords: &[String]) -> bool {
    let title = question.title.to_lowercase();
    let body = question.body.as_deref().unwrap_or_default().to_lowercase();
    let category = question.category.to_lowercase();
    let answers: Vec<String> = question.answers.iter().map(|a| a.body.to_lowercase()).collect();

    keywords.iter().any(|k| {
        title.contains(k.as_str())
            || body.contains(k.as_str())
            || category.contains(k.as_str())
            || answers.iter().any(|a| a.contains(k.as_str()))
    })
}

/// Find questions relevant to a free-form chatbot message.
///
/// Ranking: more answers first, ties by ascending question id. At most
/// `limit` questions are returned. A message with no keyword longer than two
/// characters is resolved by `policy`.
pub fn find_relevant(
    questions: &[Question],
    query: &str,
    limit: usize,
    policy: EmptyQueryPolicy,
) -> Vec<Question> {
    let keywords = keywords(query);

    let mut matched: Vec<&Question> = if keywords.is_empty() {
        match policy {
            EmptyQueryPolicy::MatchNothing => Vec::new(),
            EmptyQueryPolicy::MatchAll => questions.iter().collect(),
        }
    } else {
        questions.iter().filter(|q| matches_any(q, &keywords)).collect()
    };

    matched.sort_by(|a, b| {
        b.answers
            .len()
            .cmp(&a.answers.len())
            .then(a.id.cmp(&b.id))
    });

    matched.into_iter().take(limit).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Answer;
    use chrono::Utc;

    fn question(id: u64, title: &str, category: &str, answers: &[&str]) -> Question {
        Question {
            id,
            title: title.into(),
            body: None,
            category: category.into(),
            created_at: Utc::now(),
            answers: answers
                .iter()
                .enumerate()
                .map(|(i, body)| Answer {
                    id: id * 100 + i as u64,
                    question_id: id,
                    body: body.to_string(),
                    created_at: Utc::now(),
                    images: vec![],
                    votes: vec![],
                })
                .collect(),
            images: vec![],
        }
    }

    // ─── Tokenization ────────────────────────────────────

    #[test]
    fn test_keywords_drop_short_tokens() {
        assert_eq!(keywords("How do I fix it"), vec!["how", "fix"]);
    }

    #[test]
    fn test_keywords_length_boundary() {
        // 2 chars is noise, 3 chars survives
        assert!(keywords("ab").is_empty());
        assert_eq!(keywords("abc"), vec!["abc"]);
    }

    #[test]
    fn test_keywords_lowercase_and_whitespace() {
        assert_eq!(keywords("  Billing\tERROR\n"), vec!["billing", "error"]);
    }

    #[test]
    fn test_keywords_count_chars_not_bytes() {
        // "日本" is 6 bytes but only 2 chars
        assert!(keywords("日本").is_empty());
    }

    // ─── Matching and ranking ────────────────────────────

    #[test]
    fn test_installation_error_end_to_end() {
        let questions = vec![
            question(1, "Billing FAQ", "Billing", &[]),
            question(2, "How do I fix installation error?", "Setup", &["Reinstall", "Clear cache"]),
        ];
        let results = find_relevant(&questions, "installation error", 5, EmptyQueryPolicy::MatchNothing);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 2);
    }

    #[test]
    fn test_matches_answer_body_and_category() {
        let questions = vec![
            question(1, "Unrelated", "Network", &[]),
            question(2, "Other", "General", &["Check the firewall settings"]),
        ];
        let by_answer = find_relevant(&questions, "firewall", 5, EmptyQueryPolicy::MatchNothing);
        assert_eq!(by_answer.len(), 1);
        assert_eq!(by_answer[0].id, 2);

        let by_category = find_relevant(&questions, "NETWORK", 5, EmptyQueryPolicy::MatchNothing);
        assert_eq!(by_category[0].id, 1);
    }

    #[test]
    fn test_matches_body() {
        let mut q = question(1, "Title", "Cat", &[]);
        q.body = Some("Mentions the Proxy configuration".into());
        let results = find_relevant(&[q], "proxy", 5, EmptyQueryPolicy::MatchNothing);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_substring_not_word_match() {
        let questions = vec![question(1, "Reinstallation guide", "Setup", &[])];
        let results = find_relevant(&questions, "install", 5, EmptyQueryPolicy::MatchNothing);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_sorted_by_answer_count_then_id() {
        let questions = vec![
            question(5, "setup b", "x", &["1"]),
            question(3, "setup a", "x", &["1"]),
            question(4, "setup c", "x", &["1", "2", "3"]),
            question(1, "setup d", "x", &[]),
        ];
        let results = find_relevant(&questions, "setup", 10, EmptyQueryPolicy::MatchNothing);
        let ids: Vec<u64> = results.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![4, 3, 5, 1]);
    }

    #[test]
    fn test_limit_respected() {
        let questions: Vec<Question> = (1..=20)
            .map(|i| question(i, &format!("printer issue {i}"), "Hardware", &[]))
            .collect();
        let results = find_relevant(&questions, "printer", 5, EmptyQueryPolicy::MatchNothing);
        assert_eq!(results.len(), 5);
        for pair in results.windows(2) {
            assert!(pair[0].answers.len() >= pair[1].answers.len());
        }
    }

    // ─── All-noise queries ───────────────────────────────

    #[test]
    fn test_noise_only_query_matches_nothing_by_default() {
        let questions = vec![question(1, "a b", "c", &["d"])];
        let results = find_relevant(&questions, "a b c to", 5, EmptyQueryPolicy::MatchNothing);
        assert!(results.is_empty());
    }

    #[test]
    fn test_noise_only_query_match_all_policy() {
        let questions = vec![
            question(1, "x", "c", &[]),
            question(2, "y", "c", &["one"]),
            question(3, "z", "c", &[]),
        ];
        let results = find_relevant(&questions, "is it", 2, EmptyQueryPolicy::MatchAll);
        let ids: Vec<u64> = results.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_empty_store() {
        assert!(find_relevant(&[], "anything", 5, EmptyQueryPolicy::MatchAll).is_empty());
    }
}
