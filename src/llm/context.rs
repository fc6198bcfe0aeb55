use std::fmt::Write;

use crate::models::Question;

const PREAMBLE: &str =
    "You are a helpful FAQ assistant. Answer the user's question based on the following Q&A data:";
const TRAILER: &str = "Please provide a helpful and concise answer based on the above information. \
If the exact answer isn't available, provide the most relevant information from the FAQ data.";

/// Answers per question included in the prompt.
const MAX_ANSWERS_PER_QUESTION: usize = 3;

/// Render matched questions and the user's message as a single prompt.
///
/// The line prefixes (`Question:`, `- `) are also what the fallback summary
/// picks out, so keep the two in sync.
pub fn build_context(questions: &[Question], user_query: &str) -> String {
    let mut ctx = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(ctx, "{PREAMBLE}");
    ctx.push('\n');

    for question in questions {
        let _ = writeln!(ctx, "Question: {}", question.title);
        if let Some(body) = question.body.as_deref().filter(|b| !b.is_empty()) {
            let _ = writeln!(ctx, "Details: {body}");
        }
        let _ = writeln!(ctx, "Category: {}", question.category);

        if !question.answers.is_empty() {
            ctx.push_str("Answers:\n");
            for answer in question.answers.iter().take(MAX_ANSWERS_PER_QUESTION) {
                let _ = writeln!(ctx, "- {}", answer.body);
            }
        }
        ctx.push('\n');
    }

    let _ = writeln!(ctx, "User Question: {user_query}");
    ctx.push('\n');
    let _ = writeln!(ctx, "{TRAILER}");
    ctx
}
