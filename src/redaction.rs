use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(01[016789]|0[2-6][0-9]?)[-. ]?([0-9]{3,4})[-. ]?([0-9]{4})\b").expect("valid regex")
});
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Za-z0-9._%+\-])[A-Za-z0-9._%+\-]*@([A-Za-z0-9.\-]+\.[A-Za-z]{2,})\b")
        .expect("valid regex")
});

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedactionResult {
    pub content: String,
    pub redaction_count: usize,
}

/// Masks customer phone numbers and email addresses before text is logged
/// or handed to the generative-text collaborator.
#[derive(Debug, Default, Clone)]
pub struct Redactor {
    mask_emails: bool,
}

impl Redactor {
    pub fn new(mask_emails: bool) -> Self {
        Self { mask_emails }
    }

    pub fn redact(&self, input: &str) -> RedactionResult {
        if input.is_empty() {
            return RedactionResult {
                content: String::new(),
                redaction_count: 0,
            };
        }

        let mut redaction_count = PHONE_PATTERN.find_iter(input).count();
        let mut result = PHONE_PATTERN
            .replace_all(input, |caps: &regex::Captures<'_>| {
                format!("{}-****-{}", &caps[1], &caps[3])
            })
            .to_string();

        if self.mask_emails {
            let matches = EMAIL_PATTERN.find_iter(&result).count();
            if matches > 0 {
                redaction_count += matches;
                result = EMAIL_PATTERN
                    .replace_all(&result, |caps: &regex::Captures<'_>| {
                        format!("{}***@{}", &caps[1], &caps[2])
                    })
                    .to_string();
            }
        }

        RedactionResult {
            content: result,
            redaction_count,
        }
    }

    pub fn mask(&self, input: &str) -> String {
        self.redact(input).content
    }

    /// Masks every string leaf of a JSON document in place.
    pub fn redact_value(&self, value: &mut Value) -> usize {
        match value {
            Value::String(text) => {
                let result = self.redact(text);
                *text = result.content;
                result.redaction_count
            }
            Value::Array(items) => items.iter_mut().map(|item| self.redact_value(item)).sum(),
            Value::Object(map) => map.values_mut().map(|item| self.redact_value(item)).sum(),
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Redactor;

    #[test]
    fn masks_middle_block_of_phone_numbers() {
        let redactor = Redactor::new(true);
        let result = redactor.redact("연락처 010-1234-5678 로 연락");
        assert_eq!(result.content, "연락처 010-****-5678 로 연락");
        assert_eq!(result.redaction_count, 1);
        assert_eq!(redactor.mask("01098765432"), "010-****-5432");
    }

    #[test]
    fn masks_email_local_part_when_enabled() {
        let result = Redactor::new(true).redact("hong@email.com");
        assert_eq!(result.content, "h***@email.com");
        let untouched = Redactor::new(false).redact("hong@email.com");
        assert_eq!(untouched.content, "hong@email.com");
        assert_eq!(untouched.redaction_count, 0);
    }

    #[test]
    fn walks_nested_json() {
        let mut payload = serde_json::json!({
            "customers": [{ "name": "홍길동", "phone": "010-1234-5678", "email": "hong@email.com" }],
            "count": 1
        });
        let count = Redactor::new(true).redact_value(&mut payload);
        assert_eq!(count, 2);
        assert_eq!(payload["customers"][0]["phone"], "010-****-5678");
        assert_eq!(payload["customers"][0]["name"], "홍길동");
        assert_eq!(payload["count"], 1);
    }
}
