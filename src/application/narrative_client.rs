// Narrative client trait - seam for the external text-generation collaborator

use async_trait::async_trait;

/// Prompt-in, text-out contract for the external LLM. The engine never
/// parses structured fields out of the response; chart selection does not
/// depend on it.
#[async_trait]
pub trait NarrativeClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}
