//! Analysis pipeline: prompt, completion, decode, sanitize, with one retry.

use crate::analysis::{AnalyzeRequest, AnalyzeResult, InputError};
use crate::category::Catalog;
use crate::client::{CompletionClient, TransportError};
use crate::prompt::{Prompt, PromptBuilder};
use crate::sanitize::{Sanitizer, ValidationError};
use serde_json::Value;
use thiserror::Error;

/// Additional attempts after the first one.
pub const MAX_RETRIES: usize = 1;

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("model reply is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("model reply failed validation: {0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl AnalyzeError {
    /// Whether repeating the same prompt may produce a different outcome.
    ///
    /// Only malformed model output qualifies. Transport failures and bad
    /// input fail the same way on every attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AnalyzeError::Decode(_) | AnalyzeError::Validation(_))
    }

    /// Short label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            AnalyzeError::Input(_) => "input",
            AnalyzeError::Decode(_) => "decode",
            AnalyzeError::Validation(_) => "validation",
            AnalyzeError::Transport(_) => "transport",
        }
    }
}

/// Runs the full analysis for one request at a time; shareable across tasks.
pub struct Analyzer<C: ?Sized> {
    prompts: PromptBuilder,
    sanitizer: Sanitizer,
    client: C,
}

impl<C: CompletionClient> Analyzer<C> {
    pub fn new(client: C, catalog: &'static Catalog) -> Self {
        Self {
            prompts: PromptBuilder::new(catalog),
            sanitizer: Sanitizer::new(catalog),
            client,
        }
    }
}

impl<C: CompletionClient + ?Sized> Analyzer<C> {
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Analyze an article.
    ///
    /// Blank content is rejected before any remote call. Decode and
    /// validation failures are retried up to `MAX_RETRIES` times with the
    /// same prompt; anything else is returned immediately.
    pub async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalyzeResult, AnalyzeError> {
        request.validate()?;

        let prompt = self.prompts.build(request);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.attempt(&prompt).await {
                Ok(result) => {
                    tracing::info!(
                        attempt,
                        category = %result.category,
                        confidence = result.confidence,
                        language = %result.language,
                        "article analyzed"
                    );
                    return Ok(result);
                }
                Err(err) if err.is_retryable() && attempt <= MAX_RETRIES => {
                    tracing::warn!(attempt, kind = err.kind(), error = ?err, "retrying analysis");
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn attempt(&self, prompt: &Prompt) -> Result<AnalyzeResult, AnalyzeError> {
        let raw = self.client.complete(&prompt.system, &prompt.user).await?;
        let decoded: Value = serde_json::from_str(strip_markdown_json(&raw))?;
        Ok(self.sanitizer.sanitize(&decoded)?)
    }
}

/// Strip markdown code block wrappers from a JSON reply
fn strip_markdown_json(text: &str) -> &str {
    let trimmed = text.trim();

    // Remove ```json ... ```, ```JSON ... ``` or ``` ... ```
    if let Some(rest) = trimmed.strip_prefix("```") {
        let without_prefix = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
        if let Some(end_idx) = without_prefix.rfind("```") {
            return without_prefix[..end_idx].trim();
        }
    }

    trimmed
}
