use super::{GenerationFuture, TextGenerator};
use crate::models::{LeadPriorities, LeadPriority};
use serde_json::Value;

const TOP_LEADS: usize = 3;

/// Deterministic templates, always available.
#[derive(Debug, Default, Clone, Copy)]
pub struct CannedTextGenerator;

impl CannedTextGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn draft(customer_name: &str, context: &str) -> String {
        let context = context.trim();
        if context.is_empty() {
            format!(
                "안녕하세요, {}님. 문의하신 매물 관련하여 안내드릴 내용이 있어 연락드립니다. 편하신 시간에 회신 부탁드립니다.",
                customer_name
            )
        } else {
            format!(
                "안녕하세요, {}님. {} 관련하여 안내드릴 내용이 있어 연락드립니다. 편하신 시간에 회신 부탁드립니다.",
                customer_name, context
            )
        }
    }

    /// Ranks leads by how overdue their follow-up is, then by tier.
    pub fn rank(leads: &Value) -> LeadPriorities {
        let entries = match leads {
            Value::Array(items) => items.as_slice(),
            Value::Object(map) => map
                .get("customers")
                .or_else(|| map.get("leads"))
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default(),
            _ => &[],
        };

        let mut scored = entries
            .iter()
            .filter(|entry| entry.get("status").and_then(Value::as_str) != Some("INACTIVE"))
            .filter_map(|entry| {
                let name = entry.get("name").and_then(Value::as_str)?.to_string();
                let due = entry
                    .get("contactDueDays")
                    .and_then(Value::as_i64)
                    .unwrap_or(99);
                let tier_bonus = match entry.get("tier").and_then(Value::as_str) {
                    Some("Platinum Elite") => 15.0,
                    Some("Gold Medal") => 10.0,
                    Some("Silver Link") => 5.0,
                    _ => 0.0,
                };
                let score = (80.0 - due as f64 * 3.0 + tier_bonus).clamp(0.0, 100.0);
                Some(LeadPriority {
                    name,
                    reason: due_reason(due),
                    score,
                })
            })
            .collect::<Vec<_>>();

        scored.sort_by(|left, right| right.score.total_cmp(&left.score));
        scored.truncate(TOP_LEADS);
        LeadPriorities { priorities: scored }
    }
}

fn due_reason(due: i64) -> String {
    match due {
        d if d > 90 => "연락 주기가 설정되지 않은 고객입니다.".to_string(),
        d if d < 0 => format!("연락 예정일이 {}일 지났습니다. 즉시 연락이 필요합니다.", -d),
        0 => "오늘 연락 예정인 고객입니다.".to_string(),
        d => format!("{}일 후 연락 예정입니다.", d),
    }
}

impl TextGenerator for CannedTextGenerator {
    fn name(&self) -> &'static str {
        "canned"
    }

    fn draft_follow_up<'a>(
        &'a self,
        customer_name: &'a str,
        context: &'a str,
    ) -> GenerationFuture<'a, String> {
        Box::pin(async move { Ok(Self::draft(customer_name, context)) })
    }

    fn analyze_leads<'a>(&'a self, leads: &'a Value) -> GenerationFuture<'a, LeadPriorities> {
        Box::pin(async move { Ok(Self::rank(leads)) })
    }
}
