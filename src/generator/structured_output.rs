use serde_json::Value;

#[derive(Debug, Clone)]
pub struct StructuredReply {
    pub value: Option<Value>,
    pub error: Option<String>,
    pub errors: Vec<String>,
}

impl StructuredReply {
    pub fn is_valid(&self) -> bool {
        self.value.is_some() && self.error.is_none()
    }
}

/// Pulls a JSON document out of collaborator output: the whole reply when it
/// parses, otherwise the last line that does.
pub fn extract_json(raw: &str) -> Option<Value> {
    parse_json_value(raw).or_else(|| parse_last_json_line(raw))
}

fn parse_json_value(raw: &str) -> Option<Value> {
    let trimmed = strip_code_fence(raw.trim());
    if trimmed.is_empty() {
        return None;
    }
    serde_json::from_str(trimmed).ok()
}

fn strip_code_fence(raw: &str) -> &str {
    let Some(body) = raw.strip_prefix("```") else {
        return raw;
    };
    let body = body.strip_prefix("json").unwrap_or(body);
    body.strip_suffix("```").unwrap_or(body).trim()
}

fn parse_last_json_line(raw: &str) -> Option<Value> {
    raw.lines().rev().find_map(|line| {
        let trimmed = line.trim();
        if trimmed.starts_with('{') || trimmed.starts_with('[') {
            serde_json::from_str::<Value>(trimmed).ok()
        } else {
            None
        }
    })
}

pub fn validate_structured_reply(value: Option<Value>, schema: &Value) -> StructuredReply {
    let Some(value) = value else {
        return StructuredReply {
            value: None,
            error: Some("Structured reply is missing or invalid JSON.".to_string()),
            errors: vec![],
        };
    };

    let compiled = match jsonschema::JSONSchema::compile(schema) {
        Ok(compiled) => compiled,
        Err(error) => {
            return StructuredReply {
                value: Some(value),
                error: Some(format!("Failed to compile reply schema: {}", error)),
                errors: vec![],
            }
        }
    };

    let errors: Vec<String> = compiled
        .validate(&value)
        .err()
        .map(|errors| {
            errors
                .map(|error| {
                    let path = error.instance_path.to_string();
                    if path.is_empty() {
                        error.to_string()
                    } else {
                        format!("{}: {}", path, error)
                    }
                })
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    let error = (!errors.is_empty()).then(|| "Structured reply did not match schema.".to_string());
    StructuredReply {
        value: Some(value),
        error,
        errors,
    }
}
