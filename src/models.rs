use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Conventional `contact_due_days` value for customers whose follow-up is not tracked.
pub const UNTRACKED_DUE_DAYS: i32 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomerStatus {
    Active,
    Inactive,
}

impl CustomerStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "활성",
            Self::Inactive => "비활성",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    #[serde(rename = "Platinum Elite")]
    PlatinumElite,
    #[serde(rename = "Gold Medal")]
    GoldMedal,
    #[serde(rename = "Silver Link")]
    SilverLink,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PlatinumElite => "Platinum Elite",
            Self::GoldMedal => "Gold Medal",
            Self::SilverLink => "Silver Link",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAttachment {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
    pub data_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAttachment {
    pub name: String,
    pub mime_type: String,
    pub data_base64: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub memo: Option<String>,
    pub photo: Option<String>,
    pub status: CustomerStatus,
    pub tier: Option<Tier>,
    #[serde(default, with = "crate::dates::dotted_or_marker")]
    pub last_contact: Option<NaiveDate>,
    #[serde(with = "crate::dates::dotted")]
    pub registration_date: NaiveDate,
    pub contact_due_days: i32,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<CustomerAttachment>,
}

impl Customer {
    pub fn from_new(id: String, new: NewCustomer) -> Self {
        Self {
            id,
            name: new.name.trim().to_string(),
            phone: new.phone.trim().to_string(),
            email: non_blank(new.email),
            address: non_blank(new.address),
            memo: non_blank(new.memo),
            photo: non_blank(new.photo),
            status: new.status,
            tier: new.tier,
            last_contact: new.last_contact,
            registration_date: new.registration_date,
            contact_due_days: new.contact_due_days,
            is_new: new.is_new,
            groups: new.groups,
            attachments: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    pub status: CustomerStatus,
    #[serde(default)]
    pub tier: Option<Tier>,
    #[serde(default, with = "crate::dates::dotted_or_marker")]
    pub last_contact: Option<NaiveDate>,
    #[serde(with = "crate::dates::dotted")]
    pub registration_date: NaiveDate,
    pub contact_due_days: i32,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub groups: Vec<String>,
}

impl NewCustomer {
    pub fn basic(name: impl Into<String>, phone: impl Into<String>, registered: NaiveDate) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            email: None,
            address: None,
            memo: None,
            photo: None,
            status: CustomerStatus::Active,
            tier: None,
            last_contact: None,
            registration_date: registered,
            contact_due_days: UNTRACKED_DUE_DAYS,
            is_new: true,
            groups: Vec::new(),
        }
    }
}

/// Partial update. For `tier` and `lastContact` an explicit `null` (or "-")
/// clears the value while an absent key leaves it alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub memo: Option<String>,
    pub photo: Option<String>,
    pub status: Option<CustomerStatus>,
    #[serde(default, deserialize_with = "present")]
    pub tier: Option<Option<Tier>>,
    #[serde(default, deserialize_with = "crate::dates::patch::dotted_or_marker")]
    pub last_contact: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "crate::dates::patch::dotted")]
    pub registration_date: Option<NaiveDate>,
    pub contact_due_days: Option<i32>,
    pub is_new: Option<bool>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl CustomerPatch {
    pub fn apply(self, customer: &mut Customer) {
        if let Some(name) = self.name {
            customer.name = name.trim().to_string();
        }
        if let Some(phone) = self.phone {
            customer.phone = phone.trim().to_string();
        }
        if let Some(email) = self.email {
            customer.email = non_blank(Some(email));
        }
        if let Some(address) = self.address {
            customer.address = non_blank(Some(address));
        }
        if let Some(memo) = self.memo {
            customer.memo = non_blank(Some(memo));
        }
        if let Some(photo) = self.photo {
            customer.photo = non_blank(Some(photo));
        }
        if let Some(status) = self.status {
            customer.status = status;
        }
        if let Some(tier) = self.tier {
            customer.tier = tier;
        }
        if let Some(last_contact) = self.last_contact {
            customer.last_contact = last_contact;
        }
        if let Some(registered) = self.registration_date {
            customer.registration_date = registered;
        }
        if let Some(days) = self.contact_due_days {
            customer.contact_due_days = days;
        }
        if let Some(is_new) = self.is_new {
            customer.is_new = is_new;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactType {
    Call,
    Visit,
    Message,
    Email,
}

impl ContactType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Call => "전화",
            Self::Visit => "방문",
            Self::Message => "문자",
            Self::Email => "이메일",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Visit => "directions_walk",
            Self::Message => "sms",
            Self::Email => "mail",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    pub id: String,
    pub customer_id: String,
    #[serde(with = "crate::dates::dotted")]
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: ContactType,
    pub note: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContactRecord {
    pub customer_id: String,
    #[serde(with = "crate::dates::dotted")]
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: ContactType,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Meeting,
    Visit,
    Task,
}

impl EventType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Meeting => "미팅",
            Self::Visit => "현장 방문",
            Self::Task => "업무",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Meeting => "groups",
            Self::Visit => "location_on",
            Self::Task => "task_alt",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEvent {
    pub id: String,
    pub date: NaiveDate,
    pub title: String,
    pub time: String,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub kind: EventType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewScheduleEvent {
    pub date: NaiveDate,
    pub title: String,
    pub time: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub kind: EventType,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerGroup {
    pub id: String,
    pub name: String,
    pub color: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomerGroup {
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerGroupPatch {
    pub name: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    Monthly,
    Quarterly,
    Yearly,
}

impl GoalType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Monthly => "월간",
            Self::Quarterly => "분기",
            Self::Yearly => "연간",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: GoalType,
    pub period: String,
    pub target_registrations: u32,
    pub target_contacts: u32,
    pub actual_registrations: Option<u32>,
    pub actual_contacts: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    #[serde(rename = "type")]
    pub kind: GoalType,
    pub period: String,
    pub target_registrations: u32,
    pub target_contacts: u32,
    #[serde(default)]
    pub actual_registrations: Option<u32>,
    #[serde(default)]
    pub actual_contacts: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPatch {
    pub target_registrations: Option<u32>,
    pub target_contacts: Option<u32>,
    pub actual_registrations: Option<u32>,
    pub actual_contacts: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub time: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTodo {
    pub title: String,
    pub time: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationSeverity {
    Info,
    Warning,
    Success,
}

impl NotificationSeverity {
    pub fn icon(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Success => "check_circle",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub time: String,
    pub read: bool,
    #[serde(rename = "type")]
    pub severity: NotificationSeverity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastSeverity {
    Success,
    Error,
    Info,
    Warning,
}

impl ToastSeverity {
    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "check_circle",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

/// Work a toast action performs when the agent clicks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToastCommand {
    RestoreLastDeletedTodo,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ToastAction {
    pub label: String,
    pub command: ToastCommand,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastRequest {
    pub message: String,
    pub severity: ToastSeverity,
    pub action: Option<ToastAction>,
}

impl ToastRequest {
    pub fn new(message: impl Into<String>, severity: ToastSeverity) -> Self {
        Self {
            message: message.into(),
            severity,
            action: None,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, ToastSeverity::Success)
    }

    pub fn with_action(mut self, label: impl Into<String>, command: ToastCommand) -> Self {
        self.action = Some(ToastAction {
            label: label.into(),
            command,
        });
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub id: String,
    pub message: String,
    #[serde(rename = "type")]
    pub severity: ToastSeverity,
    pub action: Option<ToastAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerFilter {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub date_from: Option<String>,
    #[serde(default)]
    pub date_to: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerListResponse {
    pub page: Page<Customer>,
    pub selected_ids: Vec<String>,
    pub all_on_page_selected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub contact_managed: usize,
    pub new_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityPeriod {
    Weekly,
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityBucket {
    pub name: String,
    pub registrations: u32,
    pub contacts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgressView {
    pub goal: Goal,
    pub period_label: String,
    pub registration_progress: u32,
    pub contact_progress: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedContactRecord {
    #[serde(flatten)]
    pub record: ContactRecord,
    pub customer_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SecretaryInsights {
    pub urgent_customers: usize,
    pub active_leads: usize,
    pub contact_records: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    Ai,
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeadPriority {
    pub name: String,
    pub reason: String,
    pub score: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeadPriorities {
    pub priorities: Vec<LeadPriority>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShareText {
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvImportPreview {
    pub customers: Vec<NewCustomer>,
    pub dropped_rows: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooleanResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountResponse {
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorSettings {
    pub enabled: bool,
    pub binary_path: String,
    pub model: Option<String>,
    pub timeout_secs: u64,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            binary_path: "claude".to_string(),
            model: None,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub page_size: usize,
    pub toast_duration_ms: u64,
    pub toast_action_duration_ms: u64,
    pub contact_cycle_days: i32,
    pub postpone_days: i32,
    pub typing_delay_ms: u64,
    pub typing_jitter_ms: u64,
    pub undo_capacity: usize,
    pub seed_demo_data: bool,
    pub agent_name: String,
    pub generator: GeneratorSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            page_size: 5,
            toast_duration_ms: 3_000,
            toast_action_duration_ms: 5_000,
            contact_cycle_days: 14,
            postpone_days: 7,
            typing_delay_ms: 1_000,
            typing_jitter_ms: 1_000,
            undo_capacity: 1,
            seed_demo_data: true,
            agent_name: "이동현".to_string(),
            generator: GeneratorSettings::default(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{
        ContactType, Customer, CustomerPatch, CustomerStatus, EventType, NewCustomer,
        NotificationSeverity, Tier, ToastSeverity, UNTRACKED_DUE_DAYS,
    };
    use chrono::NaiveDate;

    fn sample() -> Customer {
        let registered = NaiveDate::from_ymd_opt(2022, 5, 16).unwrap();
        Customer::from_new("c-1".to_string(), NewCustomer::basic("홍길동", "010-1234-5678", registered))
    }

    #[test]
    fn customer_wire_format_uses_dotted_dates_and_marker() {
        let customer = sample();
        let value = serde_json::to_value(&customer).expect("serialize");
        assert_eq!(value["registrationDate"], "2022.05.16");
        assert_eq!(value["lastContact"], "-");
        assert_eq!(value["status"], "ACTIVE");
        assert_eq!(value["contactDueDays"], UNTRACKED_DUE_DAYS);
    }

    #[test]
    fn customer_accepts_seed_style_json() {
        let customer: Customer = serde_json::from_value(serde_json::json!({
            "id": "1",
            "name": "홍길동",
            "phone": "010-1234-5678",
            "lastContact": "2024.05.15",
            "registrationDate": "2022.05.16",
            "status": "ACTIVE",
            "tier": "Platinum Elite",
            "contactDueDays": 3,
            "isNew": true
        }))
        .expect("deserialize");
        assert_eq!(customer.tier, Some(Tier::PlatinumElite));
        assert_eq!(customer.last_contact, NaiveDate::from_ymd_opt(2024, 5, 15));
        assert!(customer.groups.is_empty());
    }

    #[test]
    fn patch_only_touches_set_fields() {
        let mut customer = sample();
        CustomerPatch {
            memo: Some("  VIP 고객 ".to_string()),
            status: Some(CustomerStatus::Inactive),
            ..CustomerPatch::default()
        }
        .apply(&mut customer);
        assert_eq!(customer.memo.as_deref(), Some("VIP 고객"));
        assert_eq!(customer.status, CustomerStatus::Inactive);
        assert_eq!(customer.name, "홍길동");
        assert_eq!(customer.phone, "010-1234-5678");
    }

    #[test]
    fn patch_distinguishes_null_from_absent() {
        let mut customer = sample();
        customer.tier = Some(Tier::GoldMedal);
        customer.last_contact = NaiveDate::from_ymd_opt(2024, 5, 1);

        let keep: CustomerPatch = serde_json::from_value(serde_json::json!({ "memo": "메모" })).expect("patch");
        keep.apply(&mut customer);
        assert_eq!(customer.tier, Some(Tier::GoldMedal));
        assert!(customer.last_contact.is_some());

        let clear: CustomerPatch = serde_json::from_value(serde_json::json!({
            "tier": null,
            "lastContact": "-",
            "registrationDate": "2023.02.01"
        }))
        .expect("patch");
        clear.apply(&mut customer);
        assert_eq!(customer.tier, None);
        assert_eq!(customer.last_contact, None);
        assert_eq!(customer.registration_date, NaiveDate::from_ymd_opt(2023, 2, 1).unwrap());

        let set: CustomerPatch = serde_json::from_value(serde_json::json!({
            "tier": "Silver Link",
            "lastContact": "2024-05-20"
        }))
        .expect("patch");
        set.apply(&mut customer);
        assert_eq!(customer.tier, Some(Tier::SilverLink));
        assert_eq!(customer.last_contact, NaiveDate::from_ymd_opt(2024, 5, 20));
    }

    #[test]
    fn every_variant_has_a_label_and_icon() {
        let contact_icons = [ContactType::Call, ContactType::Visit, ContactType::Message, ContactType::Email]
            .map(ContactType::icon);
        assert_eq!(contact_icons, ["call", "directions_walk", "sms", "mail"]);
        assert!([ContactType::Call, ContactType::Visit, ContactType::Message, ContactType::Email]
            .iter()
            .all(|kind| !kind.label().is_empty()));

        let event_icons = [EventType::Meeting, EventType::Visit, EventType::Task].map(EventType::icon);
        assert_eq!(event_icons, ["groups", "location_on", "task_alt"]);
        assert!([EventType::Meeting, EventType::Visit, EventType::Task]
            .iter()
            .all(|kind| !kind.label().is_empty()));

        let notification_icons = [
            NotificationSeverity::Info,
            NotificationSeverity::Warning,
            NotificationSeverity::Success,
        ]
        .map(NotificationSeverity::icon);
        assert_eq!(notification_icons, ["info", "warning", "check_circle"]);

        let toast_icons = [
            ToastSeverity::Success,
            ToastSeverity::Error,
            ToastSeverity::Warning,
            ToastSeverity::Info,
        ]
        .map(ToastSeverity::icon);
        assert_eq!(toast_icons, ["check_circle", "error", "warning", "info"]);
    }
}
