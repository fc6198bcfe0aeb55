//! Local answer used whenever the LLM API cannot be used.

pub const FALLBACK_INTRO: &str = "Based on our FAQ database, here's what I found:";
pub const FALLBACK_OUTRO: &str =
    "For more detailed information, please check the specific questions in the FAQ section.";
pub const NO_INFORMATION: &str = "I couldn't find specific information about your query. \
Please try browsing our FAQ categories or asking a more specific question.";

const MAX_SUMMARY_LINES: usize = 5;

/// Summarize a prompt built by [`crate::llm::context::build_context`] by
/// quoting its question titles and answer bullets.
pub fn summarize(context: &str) -> String {
    let relevant: Vec<&str> = context
        .lines()
        .filter(|line| !line.is_empty())
        .filter(|line| line.starts_with("Question:") || line.starts_with("- "))
        .take(MAX_SUMMARY_LINES)
        .collect();

    if relevant.is_empty() {
        return NO_INFORMATION.to_string();
    }

    format!("{FALLBACK_INTRO}\n\n{}\n\n{FALLBACK_OUTRO}", relevant.join("\n"))
}
