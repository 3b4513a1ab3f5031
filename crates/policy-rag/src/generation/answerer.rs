//! Grounded answer generation

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::Generator;

use super::prompt::PromptBuilder;

/// Turns retrieved policy text into an answer through a [`Generator`]
pub struct Answerer {
    generator: Arc<dyn Generator>,
}

impl Answerer {
    /// Create an answerer around an injected generator
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }

    /// The generator in use
    pub fn generator(&self) -> &Arc<dyn Generator> {
        &self.generator
    }

    /// Answer `question` from `context`, returning the model text verbatim.
    /// Failures are reported as [`Error::Generation`] and never retried.
    pub async fn answer(&self, question: &str, context: &str) -> Result<String> {
        let prompt = PromptBuilder::build_policy_prompt(question, context);

        tracing::debug!(
            generator = self.generator.name(),
            model = self.generator.model(),
            prompt_chars = prompt.len(),
            "Requesting answer"
        );

        self.generator.generate(&prompt).await.map_err(|e| match e {
            Error::Generation(_) => e,
            other => Error::generation(other.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FailingGenerator, RecordingGenerator};

    #[tokio::test]
    async fn test_answer_is_verbatim() {
        let generator = Arc::new(RecordingGenerator::new("  According to page 1, 15 days.\n"));
        let answerer = Answerer::new(generator.clone());

        let answer = answerer
            .answer("How many vacation days?", "[Page 1]\nEmployees get 15 vacation days per year.")
            .await
            .unwrap();
        assert_eq!(answer, "  According to page 1, 15 days.\n");

        let prompts = generator.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Employees get 15 vacation days per year."));
        assert!(prompts[0].contains("QUESTION: How many vacation days?"));
    }

    #[tokio::test]
    async fn test_failure_is_generation_error() {
        let answerer = Answerer::new(Arc::new(FailingGenerator));
        let err = answerer.answer("q", "c").await.unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
    }
}
