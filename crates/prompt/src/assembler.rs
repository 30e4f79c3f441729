//! Prompt assembly for grounded and ungrounded questions.
//!
//! Pure functions: same inputs always produce the same output string.
//! No network, no I/O.

use handlebars::Handlebars;
use paperchat_core::{AppError, AppResult};
use serde_json::json;

/// Template for a grounded prompt: retrieved chunks followed by the question.
const GROUNDED_TEMPLATE: &str =
    "Answer using the following context:\n{{context}}\n\nQuestion: {{question}}";

/// Assemble a grounded prompt from retrieved chunk texts and a question.
///
/// Output shape:
/// `"Answer using the following context:\n<chunk_1>\n<chunk_2>\n...\n\nQuestion: <question>"`
pub fn assemble_grounded(chunks: &[String], question: &str) -> AppResult<String> {
    tracing::debug!("Assembling grounded prompt from {} chunks", chunks.len());

    let context = chunks.join("\n");
    render_template(
        GROUNDED_TEMPLATE,
        &json!({ "context": context, "question": question }),
    )
}

/// Assemble an ungrounded prompt: the raw question, unchanged.
pub fn assemble_ungrounded(question: &str) -> String {
    question.to_string()
}

/// Render a Handlebars template with the given variables.
fn render_template(template: &str, variables: &serde_json::Value) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Disable HTML escaping for plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| {
            AppError::InvalidConfiguration(format!("Failed to register template: {}", e))
        })?;

    let rendered = handlebars
        .render("prompt", variables)
        .map_err(|e| AppError::InvalidConfiguration(format!("Failed to render template: {}", e)))?;

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grounded_prompt_shape() {
        let chunks = vec!["The sky is blue.".to_string(), "Grass is green.".to_string()];
        let prompt = assemble_grounded(&chunks, "What color is grass?").unwrap();

        assert_eq!(
            prompt,
            "Answer using the following context:\nThe sky is blue.\nGrass is green.\n\nQuestion: What color is grass?"
        );
    }

    #[test]
    fn test_grounded_prompt_deterministic() {
        let chunks = vec!["chunk one".to_string(), "chunk two".to_string()];
        let a = assemble_grounded(&chunks, "question?").unwrap();
        let b = assemble_grounded(&chunks, "question?").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_grounded_prompt_no_html_escaping() {
        let chunks = vec!["a < b && c > d".to_string()];
        let prompt = assemble_grounded(&chunks, "compare?").unwrap();
        assert!(prompt.contains("a < b && c > d"));
    }

    #[test]
    fn test_grounded_prompt_empty_context() {
        let prompt = assemble_grounded(&[], "anyone there?").unwrap();
        assert_eq!(
            prompt,
            "Answer using the following context:\n\n\nQuestion: anyone there?"
        );
    }

    #[test]
    fn test_ungrounded_prompt_is_raw_question() {
        assert_eq!(assemble_ungrounded("Hello"), "Hello");
    }
}
