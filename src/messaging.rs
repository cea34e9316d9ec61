use crate::dates::format_dotted;
use crate::errors::{AppError, AppResult};
use crate::models::{Customer, CustomerStatus};
use crate::selection::SelectionTracker;
use serde::{Deserialize, Serialize};

pub const CUSTOMER_NAME_PLACEHOLDER: &str = "{고객명}";
pub const AGENT_NAME_PLACEHOLDER: &str = "{담당자}";
pub const PLACEHOLDERS: [&str; 4] = [CUSTOMER_NAME_PLACEHOLDER, AGENT_NAME_PLACEHOLDER, "{매물주소}", "{가격}"];
pub const PREVIEW_CUSTOMER_NAME: &str = "홍길동";
pub const TEST_SENT_MESSAGE: &str = "테스트 발송이 완료되었습니다.";
pub const SUGGESTION_APPLIED_MESSAGE: &str = "AI 추천 문구가 적용되었습니다.";

const NO_CONTACT_SUMMARY: &str = "연락 없음";

const SUGGESTIONS: [&str; 3] = [
    "안녕하세요 {고객명}님, 관심 가지셨던 지역에 새로운 매물이 등록되었습니다. 상세 정보가 필요하시면 연락주세요. - Century 21 이동현",
    "{고객명}님, 지난번 상담드린 조건에 딱 맞는 매물을 찾았습니다! 편하신 시간에 함께 방문해보시겠어요? - 이동현 드림",
    "좋은 아침입니다 {고객명}님! 주말 특별 매물 투어를 준비했습니다. 관심 있으시면 답장 부탁드려요. 🏠",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageChannel {
    Sms,
    Email,
    Kakao,
}

impl MessageChannel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Sms => "SMS",
            Self::Email => "이메일",
            Self::Kakao => "카카오톡 알림",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Sms => "sms",
            Self::Email => "mail",
            Self::Kakao => "chat",
        }
    }

    /// KakaoTalk limits characters; the other channels limit UTF-8 bytes.
    pub fn limit(self) -> usize {
        match self {
            Self::Sms => 2_000,
            Self::Email => 10_000,
            Self::Kakao => 1_000,
        }
    }

    pub fn measure(self, body: &str) -> usize {
        match self {
            Self::Kakao => body.chars().count(),
            Self::Sms | Self::Email => body.len(),
        }
    }

    /// Destination prefilled in the test-send dialog.
    pub fn default_test_destination(self) -> &'static str {
        match self {
            Self::Sms => "010-1234-5678",
            Self::Email => "test@century21.com",
            Self::Kakao => "century21_agent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageTemplate {
    NewListing,
    VisitThanks,
    FollowUp,
}

impl MessageTemplate {
    pub const ALL: [MessageTemplate; 3] = [Self::NewListing, Self::VisitThanks, Self::FollowUp];

    pub fn label(self) -> &'static str {
        match self {
            Self::NewListing => "신규 매물 안내",
            Self::VisitThanks => "방문 감사 인사",
            Self::FollowUp => "후속 연락",
        }
    }

    pub fn body(self) -> &'static str {
        match self {
            Self::NewListing => "안녕하세요 {고객명}님, Century 21 이동현 에이전트입니다. 요청하신 매물이 새로 등록되어 안내드립니다.",
            Self::VisitThanks => "안녕하세요 {고객명}님, 오늘 방문해주셔서 감사합니다. 추가 문의사항이 있으시면 언제든 연락주세요. - Century 21 이동현",
            Self::FollowUp => "{고객명}님 안녕하세요, 지난번 상담드린 매물 관련해서 진행 상황 여쭤보려 연락드립니다. 편하신 시간에 회신 부탁드립니다.",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateOption {
    pub template: MessageTemplate,
    pub label: String,
    pub body: String,
}

pub fn template_options() -> Vec<TemplateOption> {
    MessageTemplate::ALL
        .into_iter()
        .map(|template| TemplateOption {
            template,
            label: template.label().to_string(),
            body: template.body().to_string(),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ComposerOptions {
    pub templates: Vec<TemplateOption>,
    pub placeholders: Vec<String>,
    pub suggestions: Vec<String>,
}

pub fn composer_options() -> ComposerOptions {
    ComposerOptions {
        templates: template_options(),
        placeholders: PLACEHOLDERS.iter().map(|p| p.to_string()).collect(),
        suggestions: suggestions(),
    }
}

pub fn suggestions() -> Vec<String> {
    SUGGESTIONS.iter().map(|text| text.to_string()).collect()
}

pub fn suggestion(index: usize) -> AppResult<String> {
    SUGGESTIONS
        .get(index)
        .map(|text| text.to_string())
        .ok_or_else(|| AppError::NotFound(format!("추천 문구를 찾을 수 없습니다: {}", index)))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub recent: String,
}

impl Recipient {
    fn from_customer(customer: &Customer) -> Self {
        Self {
            id: customer.id.clone(),
            name: customer.name.clone(),
            phone: customer.phone.clone(),
            recent: match customer.last_contact {
                Some(date) => format!("최근 {}", format_dotted(date)),
                None => NO_CONTACT_SUMMARY.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecipientListResponse {
    pub search: String,
    pub recipients: Vec<Recipient>,
    pub selected_ids: Vec<String>,
    pub all_selected: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MessageLength {
    pub used: usize,
    pub limit: usize,
    pub over_limit: bool,
}

pub fn measure(channel: MessageChannel, body: &str) -> MessageLength {
    let used = channel.measure(body);
    let limit = channel.limit();
    MessageLength {
        used,
        limit,
        over_limit: used > limit,
    }
}

/// Fills the name placeholders. Property placeholders stay for the agent to edit.
pub fn render(body: &str, customer_name: &str, agent_name: &str) -> String {
    body.replace(CUSTOMER_NAME_PLACEHOLDER, customer_name)
        .replace(AGENT_NAME_PLACEHOLDER, agent_name)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OutboundMessage {
    pub channel: MessageChannel,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RenderedMessage {
    pub recipient_id: String,
    pub recipient_name: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SendReceipt {
    pub channel: MessageChannel,
    pub messages: Vec<RenderedMessage>,
}

fn validate_body(channel: MessageChannel, body: &str) -> AppResult<()> {
    if body.trim().is_empty() {
        return Err(AppError::Validation("메시지 내용을 입력해주세요.".to_string()));
    }
    let length = measure(channel, body);
    if length.over_limit {
        return Err(AppError::Validation(format!(
            "{} 메시지는 {}까지 보낼 수 있습니다. (현재 {})",
            channel.label(),
            length.limit,
            length.used
        )));
    }
    Ok(())
}

/// Recipient search and selection of the outreach screen. Only ACTIVE
/// customers are recipients.
#[derive(Debug, Clone, Default)]
pub struct MessagingDesk {
    search: String,
    selection: SelectionTracker,
}

impl MessagingDesk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_search(&mut self, search: &str) {
        self.search = search.trim().to_string();
    }

    pub fn toggle(&mut self, id: &str) -> bool {
        self.selection.toggle(id)
    }

    /// Header checkbox over the searched recipients: clears when as many are
    /// selected as listed, otherwise selects exactly the listed ones.
    pub fn toggle_all(&mut self, customers: &[Customer]) {
        let listed = self.recipients(customers);
        if self.selection.len() == listed.len() {
            self.selection.clear();
        } else {
            self.selection.select_all(listed.into_iter().map(|recipient| recipient.id));
        }
    }

    pub fn clear(&mut self) {
        self.selection.clear();
    }

    pub fn recipients(&self, customers: &[Customer]) -> Vec<Recipient> {
        customers
            .iter()
            .filter(|customer| customer.status == CustomerStatus::Active)
            .filter(|customer| {
                self.search.is_empty()
                    || customer.name.contains(&self.search)
                    || customer.phone.contains(&self.search)
            })
            .map(Recipient::from_customer)
            .collect()
    }

    pub fn listing(&self, customers: &[Customer]) -> RecipientListResponse {
        let recipients = self.recipients(customers);
        let all_selected = !recipients.is_empty() && self.selection.len() == recipients.len();
        RecipientListResponse {
            search: self.search.clone(),
            recipients,
            selected_ids: self.selection.ids().to_vec(),
            all_selected,
        }
    }

    /// Renders one message per selected, still-active customer and clears the
    /// selection. Nothing changes when validation fails.
    pub fn send(
        &mut self,
        customers: &[Customer],
        message: &OutboundMessage,
        agent_name: &str,
    ) -> AppResult<SendReceipt> {
        let targets = customers
            .iter()
            .filter(|customer| customer.status == CustomerStatus::Active)
            .filter(|customer| self.selection.contains(&customer.id))
            .collect::<Vec<_>>();
        if targets.is_empty() {
            return Err(AppError::Validation("발송 대상을 선택해주세요.".to_string()));
        }
        validate_body(message.channel, &message.body)?;

        let messages = targets
            .into_iter()
            .map(|customer| RenderedMessage {
                recipient_id: customer.id.clone(),
                recipient_name: customer.name.clone(),
                body: render(&message.body, &customer.name, agent_name),
            })
            .collect();
        self.selection.clear();
        Ok(SendReceipt {
            channel: message.channel,
            messages,
        })
    }
}

/// Checks a test send to the agent's own destination and returns the preview
/// text that would be delivered.
pub fn test_send(message: &OutboundMessage, destination: &str, agent_name: &str) -> AppResult<String> {
    if destination.trim().is_empty() {
        return Err(AppError::Validation("테스트 발송할 대상을 입력해주세요.".to_string()));
    }
    validate_body(message.channel, &message.body)?;
    Ok(render(&message.body, PREVIEW_CUSTOMER_NAME, agent_name))
}
