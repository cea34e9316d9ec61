use super::structured_output::{extract_json, validate_structured_reply};
use super::{follow_up_prompt, lead_analysis_prompt, lead_priority_schema, GenerationFuture, TextGenerator};
use crate::errors::{AppError, AppResult};
use crate::models::{GeneratorSettings, LeadPriorities};
use anyhow::Context;
use serde_json::Value;
use std::process::Stdio;
use tokio::process::Command;
use tokio::time::{timeout, Duration};

const STDERR_TAIL_CHARS: usize = 400;

/// Runs a generative-text CLI in print mode (`-p <prompt>`) and reads stdout.
#[derive(Debug, Clone)]
pub struct CliTextGenerator {
    settings: GeneratorSettings,
}

impl CliTextGenerator {
    pub fn new(settings: GeneratorSettings) -> Self {
        Self { settings }
    }

    pub fn build_args(&self, prompt: &str) -> Vec<String> {
        let mut args = vec!["-p".to_string(), prompt.to_string()];
        if let Some(model) = &self.settings.model {
            args.push("--model".to_string());
            args.push(model.clone());
        }
        args.push("--output-format".to_string());
        args.push("text".to_string());
        args
    }

    async fn run(&self, prompt: &str) -> AppResult<String> {
        let binary = &self.settings.binary_path;
        let mut command = Command::new(binary);
        command
            .args(self.build_args(prompt))
            .env("CLAUDE_NON_INTERACTIVE", "1")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = command.spawn().map_err(|error| {
            if error.kind() == std::io::ErrorKind::NotFound {
                AppError::Collaborator(format!("Generator CLI '{}' was not found.", binary))
            } else {
                AppError::Collaborator(format!("Failed to start generator CLI '{}': {}", binary, error))
            }
        })?;

        let limit = Duration::from_secs(self.settings.timeout_secs.max(1));
        let output = timeout(limit, child.wait_with_output())
            .await
            .map_err(|_| {
                AppError::Collaborator(format!(
                    "Generator CLI timed out after {}s.",
                    limit.as_secs()
                ))
            })?
            .with_context(|| format!("reading output of generator CLI '{}'", binary))
            .map_err(collaborator_failure)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail = stderr_tail(&stderr);
            return Err(AppError::Collaborator(format!(
                "Generator CLI exited with {:?}: {}",
                output.status.code(),
                tail
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        tracing::debug!(binary = %binary, bytes = stdout.len(), "generator cli finished");
        Ok(stdout)
    }
}

fn collaborator_failure(error: anyhow::Error) -> AppError {
    AppError::Collaborator(format!("{:#}", error))
}

fn stderr_tail(stderr: &str) -> String {
    let trimmed = stderr.trim();
    let count = trimmed.chars().count();
    trimmed
        .chars()
        .skip(count.saturating_sub(STDERR_TAIL_CHARS))
        .collect()
}

/// Interprets lead analysis output. An empty reply means no priorities.
pub fn parse_lead_priorities(raw: &str) -> AppResult<LeadPriorities> {
    if raw.trim().is_empty() {
        return Ok(LeadPriorities::default());
    }
    let reply = validate_structured_reply(extract_json(raw), &lead_priority_schema());
    if let Some(error) = reply.error {
        let detail = if reply.errors.is_empty() {
            error
        } else {
            format!("{} {}", error, reply.errors.join("; "))
        };
        return Err(AppError::Collaborator(detail));
    }
    let value = reply.value.unwrap_or(Value::Null);
    let mut priorities: LeadPriorities = serde_json::from_value(value)
        .context("unexpected lead analysis shape")
        .map_err(collaborator_failure)?;
    priorities
        .priorities
        .sort_by(|left, right| right.score.total_cmp(&left.score));
    Ok(priorities)
}

impl TextGenerator for CliTextGenerator {
    fn name(&self) -> &'static str {
        "cli"
    }

    fn draft_follow_up<'a>(
        &'a self,
        customer_name: &'a str,
        context: &'a str,
    ) -> GenerationFuture<'a, String> {
        Box::pin(async move {
            let draft = self.run(&follow_up_prompt(customer_name, context)).await?;
            if draft.is_empty() {
                return Err(AppError::Collaborator("Generator returned an empty draft.".to_string()));
            }
            Ok(draft)
        })
    }

    fn analyze_leads<'a>(&'a self, leads: &'a Value) -> GenerationFuture<'a, LeadPriorities> {
        Box::pin(async move {
            let raw = self.run(&lead_analysis_prompt(leads)).await?;
            parse_lead_priorities(&raw)
        })
    }
}
