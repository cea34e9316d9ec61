use crate::errors::{AppError, AppResult};
use crate::models::AppSettings;
use serde_json::Value;
use std::fs;
use std::path::Path;

pub const SETTINGS_FILE: &str = "settings.yaml";
pub const ENV_AI_BINARY: &str = "REALTY_CRM_AI_BINARY";
pub const ENV_AI_DISABLED: &str = "REALTY_CRM_AI_DISABLED";

/// Reads `settings.yaml` from `config_dir` (defaults when absent or empty),
/// then applies environment overrides.
pub fn load_settings(config_dir: &Path) -> AppResult<AppSettings> {
    let path = config_dir.join(SETTINGS_FILE);
    let settings = if path.is_file() {
        let raw = fs::read_to_string(&path)?;
        if raw.trim().is_empty() {
            AppSettings::default()
        } else {
            serde_yaml::from_str::<AppSettings>(&raw).map_err(|error| {
                AppError::Io(format!("Invalid settings in {}: {}", path.display(), error))
            })?
        }
    } else {
        tracing::debug!(path = %path.display(), "no settings file; using defaults");
        AppSettings::default()
    };
    let settings = apply_env_overrides(settings, |key| std::env::var(key).ok());
    validate_settings(&settings)?;
    Ok(settings)
}

pub fn apply_env_overrides(
    mut settings: AppSettings,
    lookup: impl Fn(&str) -> Option<String>,
) -> AppSettings {
    if let Some(binary) = lookup(ENV_AI_BINARY).filter(|value| !value.trim().is_empty()) {
        settings.generator.binary_path = binary.trim().to_string();
    }
    if let Some(flag) = lookup(ENV_AI_DISABLED) {
        let disabled = matches!(
            flag.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        );
        if disabled {
            settings.generator.enabled = false;
        }
    }
    settings
}

/// Applies a partial JSON update on top of `current`.
pub fn merge_settings(current: &AppSettings, update: Value) -> AppResult<AppSettings> {
    let mut merged = serde_json::to_value(current)?;
    merge_json(&mut merged, update);
    let settings: AppSettings = serde_json::from_value(merged)
        .map_err(|error| AppError::Validation(format!("Invalid settings: {}", error)))?;
    validate_settings(&settings)?;
    Ok(settings)
}

fn validate_settings(settings: &AppSettings) -> AppResult<()> {
    if settings.page_size == 0 {
        return Err(AppError::Validation("pageSize must be at least 1".to_string()));
    }
    if settings.contact_cycle_days < 0 || settings.postpone_days < 0 {
        return Err(AppError::Validation(
            "contact cycle and postpone days cannot be negative".to_string(),
        ));
    }
    if settings.generator.enabled && settings.generator.binary_path.trim().is_empty() {
        return Err(AppError::Validation(
            "generator.binaryPath is required when the generator is enabled".to_string(),
        ));
    }
    Ok(())
}

fn merge_json(target: &mut Value, update: Value) {
    match (target, update) {
        (Value::Object(target_map), Value::Object(update_map)) => {
            for (key, value) in update_map {
                merge_json(target_map.entry(key).or_insert(Value::Null), value);
            }
        }
        (target, update) => {
            *target = update;
        }
    }
}
