use crate::errors::{AppError, AppResult};
use crate::ids::IdGenerator;
use crate::models::{ChatMessage, ChatRole, ContactRecord, Customer, CustomerStatus};
use crate::views::secretary_insights;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Duration;

const RECENT_RECORD_LIMIT: usize = 5;
const TOP_LEAD_LIMIT: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuickQuestion {
    pub label: String,
    pub query: String,
}

pub fn quick_questions() -> Vec<QuickQuestion> {
    [
        ("요약", "오늘의 업무 현황을 요약해줘"),
        ("매물추천", "고객에게 추천할 매물을 찾아줘"),
        ("리드분석", "우선순위가 높은 리드를 분석해줘"),
        ("문자초안", "고객 안내 문자 초안을 작성해줘"),
    ]
    .into_iter()
    .map(|(label, query)| QuickQuestion {
        label: label.to_string(),
        query: query.to_string(),
    })
    .collect()
}

pub fn greeting(agent_name: &str, key_leads: usize) -> String {
    format!(
        "안녕하세요, {} 님. 오늘 분석할 데이터가 준비되었습니다. 현재 즉시 관리가 필요한 {}명의 핵심 리드가 있습니다. 어떻게 도와드릴까요?",
        agent_name, key_leads
    )
}

fn due_phrase(days: i32) -> String {
    match days {
        d if d > 0 => format!("+{}일", d),
        0 => "오늘".to_string(),
        d => format!("{}일 지남", d),
    }
}

/// Canned reply chosen by keyword, in priority order.
pub fn compose_reply(
    message: &str,
    customers: &[Customer],
    records: &[ContactRecord],
    agent_name: &str,
) -> String {
    let lower = message.to_lowercase();
    let mentions = |keywords: &[&str]| keywords.iter().any(|keyword| lower.contains(keyword));
    let insights = secretary_insights(customers, records);

    if mentions(&["요약", "현황"]) {
        return format!(
            "📊 오늘의 업무 현황입니다:\n\n• 전체 고객: {}명\n• 활성 고객: {}명\n• 긴급 후속관리 필요: {}명\n• 오늘 등록된 연락기록: {}건\n\n우선적으로 {}명의 미접촉 고객에게 연락하시는 것을 권장드립니다.",
            customers.len(),
            insights.active_leads,
            insights.urgent_customers,
            insights.contact_records,
            insights.urgent_customers
        );
    }

    if mentions(&["리드", "분석"]) {
        let leads = customers
            .iter()
            .filter(|customer| customer.tier.is_some())
            .take(TOP_LEAD_LIMIT)
            .enumerate()
            .map(|(index, customer)| {
                format!(
                    "{}. {} ({})\n   - 연락 도래: {}\n   - 상태: {}",
                    index + 1,
                    customer.name,
                    customer.tier.map(|tier| tier.as_str()).unwrap_or("일반"),
                    due_phrase(customer.contact_due_days),
                    customer.status.label()
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        return format!(
            "🎯 우선순위 높은 리드 분석:\n\n{}\n\n💡 Tip: 연락 도래일이 지난 고객부터 우선 연락하세요.",
            leads
        );
    }

    if mentions(&["매물", "추천"]) {
        return "🏠 고객 맞춤 매물 추천:\n\n고객 선호도 분석 결과:\n\n1. 강남구 선호 고객 - 3명\n   → 삼성동 타워팰리스 전세 추천\n\n2. 서초구 선호 고객 - 2명\n   → 반포자이 아파트 매매 추천\n\n3. 송파구 선호 고객 - 4명\n   → 잠실 엘스 전세 추천\n\n각 고객에게 맞춤 안내 문자를 보내시겠어요?".to_string();
    }

    if mentions(&["문자", "초안"]) {
        return format!(
            "📝 고객 안내 문자 초안:\n\n안녕하세요, {{고객명}}님.\nCentury 21 {} 에이전트입니다.\n\n관심 가지셨던 매물과 유사한 신규 물건이 등록되어 안내드립니다.\n\n📍 위치: 강남구 삼성동\n💰 가격: 전세 8억\n📐 면적: 84㎡ (25평형)\n\n자세한 정보가 필요하시면 언제든 연락주세요.\n감사합니다.\n\n---\n\n이 초안을 발송 대상에게 전송하시겠어요?",
            agent_name
        );
    }

    if mentions(&["연락", "기록"]) {
        let recent = records
            .iter()
            .take(RECENT_RECORD_LIMIT)
            .map(|record| {
                let name = customers
                    .iter()
                    .find(|customer| customer.id == record.customer_id)
                    .map(|customer| customer.name.as_str())
                    .unwrap_or("알 수 없음");
                format!(
                    "• {} ({})\n  - {}: {}",
                    name,
                    crate::dates::format_dotted(record.date),
                    record.kind.label(),
                    record.note
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        return format!(
            "📞 최근 연락 기록 요약:\n\n{}\n\n총 {}건의 연락 기록이 있습니다.",
            recent,
            records.len()
        );
    }

    if mentions(&["안녕", "하이"]) {
        return "안녕하세요! 무엇을 도와드릴까요? 😊\n\n다음과 같은 업무를 도와드릴 수 있어요:\n• 오늘의 업무 현황 요약\n• 우선순위 리드 분석\n• 고객 맞춤 매물 추천\n• 안내 문자 초안 작성\n\n궁금한 점이 있으시면 편하게 물어보세요!".to_string();
    }

    format!(
        "네, 말씀하신 \"{}\"에 대해 분석해드릴게요.\n\n현재 {}명의 고객 데이터를 바탕으로 살펴보면:\n\n• 활성 고객 중 {}명이 즉시 연락이 필요합니다.\n• 이번 주 예정된 미팅: 2건\n• 추천 드릴 신규 매물: 5건\n\n더 자세한 정보가 필요하시면 말씀해주세요!",
        message,
        customers.len(),
        insights.urgent_customers
    )
}

/// Simulated typing time before a reply: `base` plus up to `jitter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingDelay {
    pub base: Duration,
    pub jitter: Duration,
}

impl TypingDelay {
    pub fn new(base_ms: u64, jitter_ms: u64) -> Self {
        Self {
            base: Duration::from_millis(base_ms),
            jitter: Duration::from_millis(jitter_ms),
        }
    }

    pub fn sample(&self) -> Duration {
        let jitter_ms = self.jitter.as_millis() as u64;
        let extra = if jitter_ms == 0 {
            0
        } else {
            rand::rng().random_range(0..jitter_ms)
        };
        self.base + Duration::from_millis(extra)
    }
}

impl Default for TypingDelay {
    fn default() -> Self {
        Self::new(1_000, 1_000)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SecretaryTranscript {
    pub session_id: String,
    pub messages: Vec<ChatMessage>,
    pub typing: bool,
}

#[derive(Debug, Default)]
struct SecretarySession {
    messages: Vec<ChatMessage>,
    pending_replies: usize,
}

/// Chat transcripts for mounted secretary views. Detaching drops the
/// transcript; replies that arrive afterwards are discarded.
#[derive(Clone, Default)]
pub struct SecretarySessions {
    sessions: Arc<Mutex<HashMap<String, SecretarySession>>>,
    ids: IdGenerator,
}

impl SecretarySessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn attach(&self, greeting: String) -> SecretaryTranscript {
        let session_id = self.ids.next_id();
        let session = SecretarySession {
            messages: vec![ChatMessage {
                role: ChatRole::Ai,
                text: greeting,
            }],
            pending_replies: 0,
        };
        let transcript = SecretaryTranscript {
            session_id: session_id.clone(),
            messages: session.messages.clone(),
            typing: false,
        };
        self.sessions.lock().await.insert(session_id, session);
        transcript
    }

    pub async fn detach(&self, session_id: &str) -> bool {
        self.sessions.lock().await.remove(session_id).is_some()
    }

    pub async fn is_attached(&self, session_id: &str) -> bool {
        self.sessions.lock().await.contains_key(session_id)
    }

    pub async fn transcript(&self, session_id: &str) -> AppResult<SecretaryTranscript> {
        let sessions = self.sessions.lock().await;
        let Some(session) = sessions.get(session_id) else {
            return Err(AppError::NotFound(format!(
                "No secretary session {}",
                session_id
            )));
        };
        Ok(SecretaryTranscript {
            session_id: session_id.to_string(),
            messages: session.messages.clone(),
            typing: session.pending_replies > 0,
        })
    }

    /// Records the agent's message and marks a reply as pending.
    pub async fn push_user_message(&self, session_id: &str, text: &str) -> AppResult<String> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Validation("메시지를 입력해주세요.".to_string()));
        }
        let mut sessions = self.sessions.lock().await;
        let Some(session) = sessions.get_mut(session_id) else {
            return Err(AppError::NotFound(format!(
                "No secretary session {}",
                session_id
            )));
        };
        session.messages.push(ChatMessage {
            role: ChatRole::User,
            text: text.to_string(),
        });
        session.pending_replies += 1;
        Ok(text.to_string())
    }

    /// Appends a reply if the session is still attached.
    pub async fn deliver_reply(&self, session_id: &str, text: String) -> Option<ChatMessage> {
        let mut sessions = self.sessions.lock().await;
        let Some(session) = sessions.get_mut(session_id) else {
            tracing::debug!(session_id = %session_id, "secretary view detached; reply discarded");
            return None;
        };
        session.pending_replies = session.pending_replies.saturating_sub(1);
        let message = ChatMessage {
            role: ChatRole::Ai,
            text,
        };
        session.messages.push(message.clone());
        Some(message)
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

/// Customers that the greeting calls out as key leads.
pub fn key_lead_count(customers: &[Customer]) -> usize {
    customers
        .iter()
        .filter(|customer| customer.status == CustomerStatus::Active && customer.tier.is_some())
        .take(TOP_LEAD_LIMIT)
        .count()
}
