pub mod canned;
pub mod cli;
pub mod structured_output;

use crate::errors::AppResult;
use crate::models::{GeneratorSettings, LeadPriorities};
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub use canned::CannedTextGenerator;
pub use cli::CliTextGenerator;

pub type GenerationFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Generative-text collaborator used for follow-up drafts and lead triage.
pub trait TextGenerator: Send + Sync {
    fn name(&self) -> &'static str;

    fn draft_follow_up<'a>(
        &'a self,
        customer_name: &'a str,
        context: &'a str,
    ) -> GenerationFuture<'a, String>;

    fn analyze_leads<'a>(&'a self, leads: &'a Value) -> GenerationFuture<'a, LeadPriorities>;
}

pub fn follow_up_prompt(customer_name: &str, context: &str) -> String {
    format!(
        "Write a professional and friendly follow-up SMS/Email draft for a real estate client named {}. Context: {}. Keep it under 200 characters if it's for SMS. Language: Korean.",
        customer_name, context
    )
}

pub fn lead_analysis_prompt(leads: &Value) -> String {
    format!(
        "Analyze these real estate leads and identify the top 3 priorities. Data: {}. Provide reasoning for each. Respond with JSON only, shaped as {{ \"priorities\": [{{ \"name\": string, \"reason\": string, \"score\": number }}] }}. Language: Korean.",
        leads
    )
}

pub fn lead_priority_schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "priorities": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "reason": { "type": "string" },
                        "score": { "type": "number" }
                    },
                    "required": ["name", "reason", "score"]
                }
            }
        }
    })
}

/// Tries the primary generator and degrades to canned text when it fails.
pub struct FallbackTextGenerator {
    primary: Arc<dyn TextGenerator>,
    fallback: CannedTextGenerator,
}

impl FallbackTextGenerator {
    pub fn new(primary: Arc<dyn TextGenerator>) -> Self {
        Self {
            primary,
            fallback: CannedTextGenerator::new(),
        }
    }
}

impl TextGenerator for FallbackTextGenerator {
    fn name(&self) -> &'static str {
        self.primary.name()
    }

    fn draft_follow_up<'a>(
        &'a self,
        customer_name: &'a str,
        context: &'a str,
    ) -> GenerationFuture<'a, String> {
        Box::pin(async move {
            match self.primary.draft_follow_up(customer_name, context).await {
                Ok(draft) => Ok(draft),
                Err(error) => {
                    tracing::warn!(
                        generator = self.primary.name(),
                        error = %error,
                        "follow-up draft failed; using canned draft"
                    );
                    self.fallback.draft_follow_up(customer_name, context).await
                }
            }
        })
    }

    fn analyze_leads<'a>(&'a self, leads: &'a Value) -> GenerationFuture<'a, LeadPriorities> {
        Box::pin(async move {
            match self.primary.analyze_leads(leads).await {
                Ok(priorities) => Ok(priorities),
                Err(error) => {
                    tracing::warn!(
                        generator = self.primary.name(),
                        error = %error,
                        "lead analysis failed; using canned ranking"
                    );
                    self.fallback.analyze_leads(leads).await
                }
            }
        })
    }
}

/// Builds the generator described by the settings.
pub fn build_generator(settings: &GeneratorSettings) -> Arc<dyn TextGenerator> {
    if !settings.enabled {
        return Arc::new(CannedTextGenerator::new());
    }
    Arc::new(FallbackTextGenerator::new(Arc::new(CliTextGenerator::new(
        settings.clone(),
    ))))
}
