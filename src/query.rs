//! Question answering over a graph description.

use crate::error::Result;
use crate::generator::prompts::answer_prompt;
use crate::generator::TextGenerator;

/// Message shown instead of an answer when no question was given.
pub const MISSING_QUESTION_MESSAGE: &str = "Please enter a question before asking.";

/// Result of one ask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// The generator's text, unmodified.
    Answer(String),
    /// The question was empty; the generator was not called.
    MissingQuestion,
}

impl QueryOutcome {
    /// Text to show the user.
    pub fn message(&self) -> &str {
        match self {
            QueryOutcome::Answer(text) => text,
            QueryOutcome::MissingQuestion => MISSING_QUESTION_MESSAGE,
        }
    }
}

/// Forwards the whole description and a question to the generator.
pub struct QueryFacade<'g, G> {
    generator: &'g G,
}

impl<'g, G: TextGenerator> QueryFacade<'g, G> {
    pub fn new(generator: &'g G) -> Self {
        Self { generator }
    }

    /// Ask `question` about `description`.
    ///
    /// A blank (empty or whitespace-only) question short-circuits to
    /// `MissingQuestion`. Generator failures are returned as-is.
    pub async fn ask(&self, description: &str, question: &str) -> Result<QueryOutcome> {
        if question.trim().is_empty() {
            log::warn!("Ask requested without a question");
            return Ok(QueryOutcome::MissingQuestion);
        }

        let prompt = answer_prompt(description, question);
        let answer = self.generator.generate(&prompt).await?;
        Ok(QueryOutcome::Answer(answer))
    }
}
