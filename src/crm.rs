use crate::config::merge_settings;
use crate::csv_import::{customer_csv_template, parse_customer_csv};
use crate::errors::{AppError, AppResult};
use crate::generator::{build_generator, TextGenerator};
use crate::models::{
    ActivityBucket, ActivityPeriod, AppSettings, ChatMessage, ContactRecord, Customer,
    CustomerAttachment, CustomerFilter, CustomerGroup, CustomerGroupPatch, CustomerListResponse,
    CustomerPatch, CustomerSummary, CsvImportPreview, EnrichedContactRecord, Goal, GoalPatch,
    GoalProgressView, GoalType, LeadPriorities, NewAttachment, NewContactRecord, NewCustomer,
    NewCustomerGroup, NewGoal, NewScheduleEvent, NewTodo, Notification, ScheduleEvent,
    SecretaryInsights, ShareText, Toast, ToastCommand, ToastRequest, Todo,
};
use crate::messaging::{
    self, ComposerOptions, MessageChannel, MessageLength, OutboundMessage, RecipientListResponse,
    SendReceipt,
};
use crate::redaction::Redactor;
use crate::secretary::{
    compose_reply, greeting, key_lead_count, quick_questions, QuickQuestion, SecretarySessions,
    SecretaryTranscript, TypingDelay,
};
use crate::seed::demo_seed;
use crate::share::{share_text, COPIED_MESSAGE};
use crate::state::{CrmState, Effect, Outcome, StateRules, StateSeed};
use crate::toast::{ToastCenter, ToastDurations, ToastEvent};
use crate::views;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::{broadcast, Mutex};
use tokio::time::Duration;

pub const RECENT_CONTACT_LIMIT: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GroupWithCount {
    #[serde(flatten)]
    pub group: CustomerGroup,
    pub customer_count: usize,
}

fn toast_durations(settings: &AppSettings) -> ToastDurations {
    ToastDurations {
        plain: Duration::from_millis(settings.toast_duration_ms),
        with_action: Duration::from_millis(settings.toast_action_duration_ms),
    }
}

fn typing_delay(settings: &AppSettings) -> TypingDelay {
    TypingDelay::new(settings.typing_delay_ms, settings.typing_jitter_ms)
}

/// Session-wide CRM runtime: the state container, its toast center and the
/// collaborators the commands reach for.
///
/// Every mutating call locks the state once, so operations complete in the
/// order they are invoked and cross-store side effects are never observed
/// half-applied. Failures become a toast and are also returned to the caller.
#[derive(Clone)]
pub struct CrmCore {
    state: Arc<Mutex<CrmState>>,
    toasts: ToastCenter,
    settings: Arc<RwLock<AppSettings>>,
    generator: Arc<RwLock<Arc<dyn TextGenerator>>>,
    secretary: SecretarySessions,
    typing: Arc<RwLock<TypingDelay>>,
    redactor: Redactor,
    today: Option<NaiveDate>,
}

impl CrmCore {
    pub fn new(settings: AppSettings) -> Self {
        let seed = if settings.seed_demo_data {
            demo_seed()
        } else {
            StateSeed::default()
        };
        let state = CrmState::with_seed(StateRules::from(&settings), seed);
        Self::with_state(settings, state)
    }

    pub fn with_state(settings: AppSettings, state: CrmState) -> Self {
        let generator = build_generator(&settings.generator);
        tracing::info!(
            generator = generator.name(),
            customers = state.customers().len(),
            "crm core initialized"
        );
        Self {
            state: Arc::new(Mutex::new(state)),
            toasts: ToastCenter::new(toast_durations(&settings)),
            generator: Arc::new(RwLock::new(generator)),
            secretary: SecretarySessions::new(),
            typing: Arc::new(RwLock::new(typing_delay(&settings))),
            redactor: Redactor::new(true),
            settings: Arc::new(RwLock::new(settings)),
            today: None,
        }
    }

    pub fn with_generator(self, generator: Arc<dyn TextGenerator>) -> Self {
        *self
            .generator
            .write()
            .unwrap_or_else(PoisonError::into_inner) = generator;
        self
    }

    /// Fixes the date used for imports and statistics.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn toast_center(&self) -> &ToastCenter {
        &self.toasts
    }

    pub fn subscribe_toasts(&self) -> broadcast::Receiver<ToastEvent> {
        self.toasts.subscribe()
    }

    async fn apply<T>(
        &self,
        operation: &'static str,
        run: impl FnOnce(&mut CrmState) -> AppResult<Outcome<T>>,
    ) -> AppResult<T> {
        let result = {
            let mut state = self.state.lock().await;
            run(&mut state)
        };
        match result {
            Ok(outcome) => {
                tracing::debug!(operation, effects = outcome.effects.len(), "state operation applied");
                for effect in outcome.effects {
                    match effect {
                        Effect::Toast(request) => {
                            self.toasts.show(request);
                        }
                    }
                }
                Ok(outcome.value)
            }
            Err(error) => Err(self.report(operation, error)),
        }
    }

    fn report(&self, operation: &'static str, error: AppError) -> AppError {
        tracing::warn!(operation, error = %error, "operation rejected");
        self.toasts
            .show(ToastRequest::new(error.user_message(), error.toast_severity()));
        error
    }

    fn generator(&self) -> Arc<dyn TextGenerator> {
        self.generator
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // ---- settings ---------------------------------------------------------

    pub fn get_settings(&self) -> AppSettings {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub async fn update_settings(&self, update: Value) -> AppResult<AppSettings> {
        let current = self.get_settings();
        let updated = merge_settings(&current, update).map_err(|error| self.report("update_settings", error))?;

        self.state.lock().await.set_rules(StateRules::from(&updated));
        self.toasts.set_durations(toast_durations(&updated));
        *self.typing.write().unwrap_or_else(PoisonError::into_inner) = typing_delay(&updated);
        if updated.generator != current.generator {
            *self
                .generator
                .write()
                .unwrap_or_else(PoisonError::into_inner) = build_generator(&updated.generator);
        }
        *self.settings.write().unwrap_or_else(PoisonError::into_inner) = updated.clone();

        tracing::info!(page_size = updated.page_size, generator_enabled = updated.generator.enabled, "settings updated");
        self.toasts.show(ToastRequest::success("설정이 저장되었습니다."));
        Ok(updated)
    }

    // ---- customers --------------------------------------------------------

    pub async fn add_customer(&self, new: NewCustomer) -> AppResult<Customer> {
        self.apply("add_customer", |state| state.add_customer(new)).await
    }

    pub async fn add_customers(&self, batch: Vec<NewCustomer>) -> AppResult<Vec<Customer>> {
        self.apply("add_customers", |state| state.add_customers(batch)).await
    }

    pub async fn update_customer(&self, id: &str, patch: CustomerPatch) -> AppResult<Customer> {
        self.apply("update_customer", |state| state.update_customer(id, patch))
            .await
    }

    pub async fn delete_customer(&self, id: &str) -> AppResult<Customer> {
        self.apply("delete_customer", |state| state.delete_customer(id)).await
    }

    pub async fn get_customer(&self, id: &str) -> AppResult<Customer> {
        self.state
            .lock()
            .await
            .get_customer(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("고객을 찾을 수 없습니다: {}", id)))
    }

    pub async fn set_customer_groups(&self, customer_id: &str, group_ids: Vec<String>) -> AppResult<Customer> {
        self.apply("set_customer_groups", |state| {
            state.set_customer_groups(customer_id, group_ids)
        })
        .await
    }

    pub async fn add_attachment(
        &self,
        customer_id: &str,
        attachment: NewAttachment,
    ) -> AppResult<CustomerAttachment> {
        self.apply("add_attachment", |state| state.add_attachment(customer_id, attachment))
            .await
    }

    pub async fn delete_attachment(
        &self,
        customer_id: &str,
        attachment_id: &str,
    ) -> AppResult<CustomerAttachment> {
        self.apply("delete_attachment", |state| {
            state.delete_attachment(customer_id, attachment_id)
        })
        .await
    }

    pub async fn share_customer(&self, id: &str) -> AppResult<ShareText> {
        let customer = self
            .get_customer(id)
            .await
            .map_err(|error| self.report("share_customer", error))?;
        Ok(share_text(&customer))
    }

    /// Confirms a clipboard copy performed by the shell.
    pub fn notify_copied(&self) -> Toast {
        self.toasts.show(ToastRequest::success(COPIED_MESSAGE))
    }

    // ---- customer list, selection and bulk actions ------------------------

    pub async fn customer_list(&self) -> CustomerListResponse {
        self.state.lock().await.customer_list()
    }

    pub async fn set_customer_filter(&self, filter: CustomerFilter) -> CustomerListResponse {
        let mut state = self.state.lock().await;
        if state.set_customer_filter(filter) {
            tracing::debug!("customer filter changed; selection cleared");
        }
        state.customer_list()
    }

    pub async fn set_customer_page(&self, page: usize) -> CustomerListResponse {
        let mut state = self.state.lock().await;
        state.set_customer_page(page);
        state.customer_list()
    }

    pub async fn toggle_customer_selection(&self, id: &str) -> CustomerListResponse {
        let mut state = self.state.lock().await;
        state.toggle_selection(id);
        state.customer_list()
    }

    pub async fn toggle_select_page(&self) -> CustomerListResponse {
        self.state.lock().await.toggle_select_page()
    }

    pub async fn select_customers(&self, ids: Vec<String>) -> CustomerListResponse {
        let mut state = self.state.lock().await;
        state.select_all(ids);
        state.customer_list()
    }

    pub async fn clear_selection(&self) -> CustomerListResponse {
        let mut state = self.state.lock().await;
        state.clear_selection();
        state.customer_list()
    }

    pub async fn bulk_delete_selected(&self) -> AppResult<usize> {
        self.apply("bulk_delete_selected", |state| state.bulk_delete_selected())
            .await
    }

    pub async fn bulk_postpone_selected(&self) -> AppResult<usize> {
        self.apply("bulk_postpone_selected", |state| state.bulk_postpone_selected())
            .await
    }

    // ---- CSV import / export ---------------------------------------------

    pub fn preview_customer_csv(&self, text: &str) -> AppResult<CsvImportPreview> {
        parse_customer_csv(text)
            .map(|staged| staged.preview(self.today()))
            .map_err(|error| self.report("preview_customer_csv", error))
    }

    pub async fn import_customers_csv(&self, text: &str) -> AppResult<Vec<Customer>> {
        let today = self.today();
        self.apply("import_customers_csv", |state| {
            let staged = parse_customer_csv(text)?;
            state.add_customers(staged.into_customers(today))
        })
        .await
    }

    pub async fn import_customers_csv_bytes(&self, bytes: &[u8]) -> AppResult<Vec<Customer>> {
        match std::str::from_utf8(bytes) {
            Ok(text) => self.import_customers_csv(text).await,
            Err(error) => {
                tracing::warn!(error = %error, "uploaded csv is not valid utf-8");
                Err(self.report(
                    "import_customers_csv",
                    AppError::DataAbsence("파일 파싱 중 오류가 발생했습니다.".to_string()),
                ))
            }
        }
    }

    pub fn export_customer_csv_template(&self) -> Vec<u8> {
        self.toasts
            .show(ToastRequest::success("템플릿이 다운로드되었습니다."));
        customer_csv_template()
    }

    // ---- contact records and schedule -------------------------------------

    pub async fn add_contact_record(&self, new: NewContactRecord) -> AppResult<ContactRecord> {
        self.apply("add_contact_record", |state| state.add_contact_record(new))
            .await
    }

    pub async fn contact_records_for(&self, customer_id: &str) -> Vec<ContactRecord> {
        self.state.lock().await.contact_records_for(customer_id)
    }

    pub async fn recent_contact_records(&self) -> Vec<EnrichedContactRecord> {
        let state = self.state.lock().await;
        views::enriched_contact_records(
            state.contact_records(),
            state.customers(),
            RECENT_CONTACT_LIMIT,
        )
    }

    pub async fn add_schedule_event(&self, new: NewScheduleEvent) -> AppResult<ScheduleEvent> {
        self.apply("add_schedule_event", |state| state.add_schedule_event(new))
            .await
    }

    pub async fn delete_schedule_event(&self, id: &str) -> AppResult<ScheduleEvent> {
        self.apply("delete_schedule_event", |state| state.delete_schedule_event(id))
            .await
    }

    pub async fn schedule_events(&self) -> Vec<ScheduleEvent> {
        self.state.lock().await.schedule_events().to_vec()
    }

    pub async fn events_on(&self, date: NaiveDate) -> Vec<ScheduleEvent> {
        views::events_on(self.state.lock().await.schedule_events(), date)
    }

    pub async fn event_days_in_month(&self, year: i32, month: u32) -> Vec<u32> {
        views::event_days_in_month(self.state.lock().await.schedule_events(), year, month)
    }

    // ---- groups -----------------------------------------------------------

    pub async fn add_group(&self, new: NewCustomerGroup) -> AppResult<CustomerGroup> {
        self.apply("add_group", |state| state.add_group(new)).await
    }

    pub async fn update_group(&self, id: &str, patch: CustomerGroupPatch) -> AppResult<CustomerGroup> {
        self.apply("update_group", |state| state.update_group(id, patch)).await
    }

    pub async fn delete_group(&self, id: &str) -> AppResult<CustomerGroup> {
        self.apply("delete_group", |state| state.delete_group(id)).await
    }

    pub async fn groups(&self) -> Vec<GroupWithCount> {
        let state = self.state.lock().await;
        state
            .groups()
            .iter()
            .map(|group| GroupWithCount {
                customer_count: views::customer_count_by_group(state.customers(), &group.id),
                group: group.clone(),
            })
            .collect()
    }

    // ---- goals ------------------------------------------------------------

    pub async fn add_goal(&self, new: NewGoal) -> AppResult<Goal> {
        self.apply("add_goal", |state| state.add_goal(new)).await
    }

    pub async fn update_goal(&self, id: &str, patch: GoalPatch) -> AppResult<Goal> {
        self.apply("update_goal", |state| state.update_goal(id, patch)).await
    }

    pub async fn delete_goal(&self, id: &str) -> AppResult<Goal> {
        self.apply("delete_goal", |state| state.delete_goal(id)).await
    }

    pub async fn goal_progress(&self) -> Vec<GoalProgressView> {
        views::goal_progress_views(self.state.lock().await.goals())
    }

    pub fn current_goal_period(&self, kind: GoalType) -> String {
        views::current_period(kind, self.today())
    }

    // ---- todos ------------------------------------------------------------

    pub async fn todos(&self) -> Vec<Todo> {
        self.state.lock().await.todos().to_vec()
    }

    pub async fn add_todo(&self, new: NewTodo) -> AppResult<Todo> {
        self.apply("add_todo", |state| state.add_todo(new)).await
    }

    pub async fn toggle_todo(&self, id: &str) -> AppResult<Todo> {
        self.apply("toggle_todo", |state| state.toggle_todo(id)).await
    }

    pub async fn delete_todo(&self, id: &str) -> AppResult<Todo> {
        self.apply("delete_todo", |state| state.delete_todo(id)).await
    }

    pub async fn restore_last_deleted_todo(&self) -> AppResult<Todo> {
        self.apply("restore_last_deleted_todo", |state| {
            state.restore_last_deleted_todo()
        })
        .await
    }

    // ---- notifications ----------------------------------------------------

    pub async fn notifications(&self) -> Vec<Notification> {
        self.state.lock().await.notifications().to_vec()
    }

    pub async fn unread_notification_count(&self) -> usize {
        self.state.lock().await.unread_notification_count()
    }

    pub async fn mark_notification_read(&self, id: &str) -> AppResult<Notification> {
        self.apply("mark_notification_read", |state| state.mark_notification_read(id))
            .await
    }

    pub async fn clear_notifications(&self) -> AppResult<usize> {
        self.apply("clear_notifications", |state| state.clear_notifications())
            .await
    }

    // ---- toasts -----------------------------------------------------------

    pub fn visible_toasts(&self) -> Vec<Toast> {
        self.toasts.visible()
    }

    pub fn dismiss_toast(&self, id: &str) -> bool {
        self.toasts.dismiss(id)
    }

    pub fn close_toast(&self, id: &str) -> bool {
        self.toasts.close(id)
    }

    /// Runs the action attached to a toast, then removes the toast whether
    /// or not the action succeeded.
    pub async fn invoke_toast_action(&self, id: &str) -> AppResult<Value> {
        let Some(action) = self.toasts.claim_action(id) else {
            return Err(AppError::NotFound(format!("Toast {} has no pending action", id)));
        };
        tracing::info!(toast_id = %id, command = ?action.command, "toast action invoked");
        let result = match action.command {
            ToastCommand::RestoreLastDeletedTodo => self
                .restore_last_deleted_todo()
                .await
                .and_then(|todo| serde_json::to_value(todo).map_err(AppError::from)),
        };
        self.toasts.finish_action(id);
        result
    }

    // ---- statistics -------------------------------------------------------

    pub async fn customer_summary(&self) -> CustomerSummary {
        views::customer_summary(self.state.lock().await.customers())
    }

    pub async fn activity_series(&self, period: ActivityPeriod) -> Vec<ActivityBucket> {
        let anchor = self.today();
        let state = self.state.lock().await;
        views::activity_series(state.customers(), state.contact_records(), period, anchor)
    }

    pub async fn secretary_insights(&self) -> SecretaryInsights {
        let state = self.state.lock().await;
        views::secretary_insights(state.customers(), state.contact_records())
    }

    // ---- AI secretary -----------------------------------------------------

    pub async fn open_secretary(&self) -> SecretaryTranscript {
        let key_leads = key_lead_count(self.state.lock().await.customers());
        let agent_name = self.get_settings().agent_name;
        self.secretary.attach(greeting(&agent_name, key_leads)).await
    }

    pub async fn close_secretary(&self, session_id: &str) -> bool {
        self.secretary.detach(session_id).await
    }

    pub async fn secretary_transcript(&self, session_id: &str) -> AppResult<SecretaryTranscript> {
        self.secretary.transcript(session_id).await
    }

    pub fn secretary_quick_questions(&self) -> Vec<QuickQuestion> {
        quick_questions()
    }

    /// Records the agent's message, waits out the typing delay and answers.
    /// Returns `None` when the view was closed before the reply was ready.
    pub async fn send_secretary_message(
        &self,
        session_id: &str,
        text: &str,
    ) -> AppResult<Option<ChatMessage>> {
        let message = self
            .secretary
            .push_user_message(session_id, text)
            .await
            .map_err(|error| self.report("send_secretary_message", error))?;

        let delay = self
            .typing
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .sample();
        tokio::time::sleep(delay).await;

        if !self.secretary.is_attached(session_id).await {
            tracing::debug!(session_id = %session_id, "secretary closed during typing delay");
            return Ok(None);
        }
        let agent_name = self.get_settings().agent_name;
        let reply = {
            let state = self.state.lock().await;
            compose_reply(&message, state.customers(), state.contact_records(), &agent_name)
        };
        Ok(self.secretary.deliver_reply(session_id, reply).await)
    }

    // ---- bulk messaging ---------------------------------------------------

    pub async fn message_recipients(&self) -> RecipientListResponse {
        self.state.lock().await.message_recipients()
    }

    pub async fn set_recipient_search(&self, search: &str) -> RecipientListResponse {
        self.state.lock().await.set_recipient_search(search)
    }

    pub async fn toggle_recipient(&self, id: &str) -> RecipientListResponse {
        self.state.lock().await.toggle_recipient(id)
    }

    pub async fn toggle_all_recipients(&self) -> RecipientListResponse {
        self.state.lock().await.toggle_all_recipients()
    }

    pub async fn clear_recipients(&self) -> RecipientListResponse {
        self.state.lock().await.clear_recipients()
    }

    pub fn message_composer_options(&self) -> ComposerOptions {
        messaging::composer_options()
    }

    pub fn measure_message(&self, channel: MessageChannel, body: &str) -> MessageLength {
        messaging::measure(channel, body)
    }

    pub fn preview_message(&self, body: &str) -> String {
        messaging::render(body, messaging::PREVIEW_CUSTOMER_NAME, &self.get_settings().agent_name)
    }

    pub fn apply_message_suggestion(&self, index: usize) -> AppResult<String> {
        let text = messaging::suggestion(index)
            .map_err(|error| self.report("apply_message_suggestion", error))?;
        self.toasts
            .show(ToastRequest::success(messaging::SUGGESTION_APPLIED_MESSAGE));
        Ok(text)
    }

    /// Renders the message for every selected recipient. Delivery itself is
    /// outside this process; the receipt is what the shell hands off.
    pub async fn send_message(&self, message: OutboundMessage) -> AppResult<SendReceipt> {
        let agent_name = self.get_settings().agent_name;
        let receipt = self
            .apply("send_message", |state| state.send_message(&message, &agent_name))
            .await?;
        tracing::info!(
            channel = ?receipt.channel,
            recipients = receipt.messages.len(),
            "bulk message sent"
        );
        Ok(receipt)
    }

    pub fn send_test_message(&self, message: &OutboundMessage, destination: &str) -> AppResult<String> {
        let agent_name = self.get_settings().agent_name;
        let preview = messaging::test_send(message, destination, &agent_name)
            .map_err(|error| self.report("send_test_message", error))?;
        tracing::info!(
            channel = ?message.channel,
            destination = %self.redactor.mask(destination),
            "test message sent"
        );
        self.toasts.show(ToastRequest::success(messaging::TEST_SENT_MESSAGE));
        Ok(preview)
    }

    // ---- generative text --------------------------------------------------

    pub async fn draft_follow_up(&self, customer_id: &str, context: &str) -> AppResult<String> {
        let customer = self
            .get_customer(customer_id)
            .await
            .map_err(|error| self.report("draft_follow_up", error))?;
        tracing::info!(
            customer_id = %customer.id,
            context = %self.redactor.mask(context),
            "drafting follow-up"
        );
        let generator = self.generator();
        generator
            .draft_follow_up(&customer.name, context)
            .await
            .map_err(|error| self.report("draft_follow_up", error))
    }

    /// Ranks active customers. Phone numbers and emails are masked before
    /// the payload leaves the process.
    pub async fn analyze_leads(&self) -> AppResult<LeadPriorities> {
        let mut payload = {
            let state = self.state.lock().await;
            let leads = state
                .customers()
                .iter()
                .filter(|customer| customer.status == crate::models::CustomerStatus::Active)
                .map(|customer| {
                    serde_json::json!({
                        "name": customer.name,
                        "phone": customer.phone,
                        "email": customer.email,
                        "tier": customer.tier,
                        "status": customer.status,
                        "contactDueDays": customer.contact_due_days,
                        "lastContact": customer.last_contact.map(crate::dates::format_dotted),
                    })
                })
                .collect::<Vec<_>>();
            serde_json::json!({ "customers": leads })
        };
        let masked = self.redactor.redact_value(&mut payload);
        tracing::info!(masked, "analyzing leads");
        let generator = self.generator();
        generator
            .analyze_leads(&payload)
            .await
            .map_err(|error| self.report("analyze_leads", error))
    }
}
