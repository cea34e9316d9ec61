use crate::errors::{AppError, AppResult};
use crate::ids::IdGenerator;
use crate::models::{
    AppSettings, ContactRecord, Customer, CustomerAttachment, CustomerFilter, CustomerGroup,
    CustomerGroupPatch, CustomerListResponse, CustomerPatch, Goal, GoalPatch, NewAttachment,
    NewContactRecord, NewCustomer, NewCustomerGroup, NewGoal, NewScheduleEvent, NewTodo,
    Notification, ScheduleEvent, Todo, ToastCommand, ToastRequest, ToastSeverity,
};
use crate::messaging::{MessagingDesk, OutboundMessage, RecipientListResponse, SendReceipt};
use crate::selection::SelectionTracker;
use crate::store::{EntityStore, InsertOrder};
use crate::undo::UndoBuffer;
use crate::views::CustomerListView;
use base64::Engine;
use chrono::Utc;

/// Side effects a state operation asks the shell to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Toast(ToastRequest),
}

/// Result of a successful mutation plus the effects it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub value: T,
    pub effects: Vec<Effect>,
}

impl<T> Outcome<T> {
    fn toast(value: T, request: ToastRequest) -> Self {
        Self {
            value,
            effects: vec![Effect::Toast(request)],
        }
    }

    pub fn toasts(&self) -> impl Iterator<Item = &ToastRequest> {
        self.effects.iter().map(|effect| match effect {
            Effect::Toast(request) => request,
        })
    }
}

/// Tunables the state needs from `AppSettings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateRules {
    pub contact_cycle_days: i32,
    pub postpone_days: i32,
    pub page_size: usize,
    pub undo_capacity: usize,
}

impl From<&AppSettings> for StateRules {
    fn from(settings: &AppSettings) -> Self {
        Self {
            contact_cycle_days: settings.contact_cycle_days,
            postpone_days: settings.postpone_days,
            page_size: settings.page_size,
            undo_capacity: settings.undo_capacity,
        }
    }
}

impl Default for StateRules {
    fn default() -> Self {
        Self::from(&AppSettings::default())
    }
}

/// Initial collections, each already in listing order.
#[derive(Debug, Clone, Default)]
pub struct StateSeed {
    pub customers: Vec<Customer>,
    pub contact_records: Vec<ContactRecord>,
    pub schedule_events: Vec<ScheduleEvent>,
    pub groups: Vec<CustomerGroup>,
    pub goals: Vec<Goal>,
    pub todos: Vec<Todo>,
    pub notifications: Vec<Notification>,
}

/// Every collection of the session plus selection and undo state. Built per
/// session (or per test) and handed to whoever dispatches operations.
#[derive(Debug, Clone)]
pub struct CrmState {
    ids: IdGenerator,
    rules: StateRules,
    customers: EntityStore<Customer>,
    contact_records: EntityStore<ContactRecord>,
    schedule_events: EntityStore<ScheduleEvent>,
    groups: EntityStore<CustomerGroup>,
    goals: EntityStore<Goal>,
    todos: EntityStore<Todo>,
    notifications: EntityStore<Notification>,
    selection: SelectionTracker,
    customer_view: CustomerListView,
    deleted_todos: UndoBuffer<Todo>,
    messaging: MessagingDesk,
}

impl CrmState {
    pub fn new(rules: StateRules) -> Self {
        Self::with_seed(rules, StateSeed::default())
    }

    pub fn with_seed(rules: StateRules, seed: StateSeed) -> Self {
        Self {
            ids: IdGenerator::new(),
            rules,
            customers: EntityStore::with_items(InsertOrder::Prepend, seed.customers),
            contact_records: EntityStore::with_items(InsertOrder::Prepend, seed.contact_records),
            schedule_events: EntityStore::with_items(InsertOrder::Append, seed.schedule_events),
            groups: EntityStore::with_items(InsertOrder::Append, seed.groups),
            goals: EntityStore::with_items(InsertOrder::Append, seed.goals),
            todos: EntityStore::with_items(InsertOrder::Append, seed.todos),
            notifications: EntityStore::with_items(InsertOrder::Prepend, seed.notifications),
            selection: SelectionTracker::new(),
            customer_view: CustomerListView::new(rules.page_size),
            deleted_todos: UndoBuffer::new(rules.undo_capacity),
            messaging: MessagingDesk::new(),
        }
    }

    pub fn rules(&self) -> StateRules {
        self.rules
    }

    pub fn set_rules(&mut self, rules: StateRules) {
        if rules.page_size != self.rules.page_size {
            self.customer_view.set_page_size(rules.page_size);
        }
        if rules.undo_capacity != self.rules.undo_capacity {
            self.deleted_todos.set_capacity(rules.undo_capacity);
        }
        self.rules = rules;
    }

    pub fn customers(&self) -> &[Customer] {
        self.customers.list()
    }

    pub fn contact_records(&self) -> &[ContactRecord] {
        self.contact_records.list()
    }

    pub fn schedule_events(&self) -> &[ScheduleEvent] {
        self.schedule_events.list()
    }

    pub fn groups(&self) -> &[CustomerGroup] {
        self.groups.list()
    }

    pub fn goals(&self) -> &[Goal] {
        self.goals.list()
    }

    pub fn todos(&self) -> &[Todo] {
        self.todos.list()
    }

    pub fn notifications(&self) -> &[Notification] {
        self.notifications.list()
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    pub fn get_customer(&self, id: &str) -> Option<&Customer> {
        self.customers.get(id)
    }

    pub fn contact_records_for(&self, customer_id: &str) -> Vec<ContactRecord> {
        self.contact_records
            .list()
            .iter()
            .filter(|record| record.customer_id == customer_id)
            .cloned()
            .collect()
    }

    pub fn unread_notification_count(&self) -> usize {
        self.notifications.list().iter().filter(|n| !n.read).count()
    }

    pub fn last_deleted_todo(&self) -> Option<&Todo> {
        self.deleted_todos.peek()
    }

    // ---- customers -------------------------------------------------------

    pub fn add_customer(&mut self, new: NewCustomer) -> AppResult<Outcome<Customer>> {
        validate_name_and_phone(&new.name, &new.phone)?;
        let customer = Customer::from_new(self.ids.next_id(), new);
        self.customers.add(customer.clone());
        Ok(Outcome::toast(customer, ToastRequest::success("고객이 등록되었습니다.")))
    }

    /// Registers a batch with one aggregate confirmation.
    pub fn add_customers(&mut self, batch: Vec<NewCustomer>) -> AppResult<Outcome<Vec<Customer>>> {
        if batch.is_empty() {
            return Err(AppError::Validation("가져올 데이터가 없습니다.".to_string()));
        }
        for new in &batch {
            validate_name_and_phone(&new.name, &new.phone)?;
        }
        let customers = batch
            .into_iter()
            .map(|new| Customer::from_new(self.ids.next_id(), new))
            .collect::<Vec<_>>();
        let count = self.customers.add_batch(customers.clone());
        Ok(Outcome::toast(
            customers,
            ToastRequest::success(format!("{}명의 고객이 등록되었습니다.", count)),
        ))
    }

    pub fn update_customer(&mut self, id: &str, patch: CustomerPatch) -> AppResult<Outcome<Customer>> {
        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(AppError::Validation("고객명을 입력해주세요.".to_string()));
            }
        }
        if let Some(phone) = &patch.phone {
            if phone.trim().is_empty() {
                return Err(AppError::Validation("연락처를 입력해주세요.".to_string()));
            }
        }
        let customer = self.with_customer(id, |customer| patch.apply(customer))?;
        Ok(Outcome::toast(customer, ToastRequest::success("고객 정보가 수정되었습니다.")))
    }

    pub fn delete_customer(&mut self, id: &str) -> AppResult<Outcome<Customer>> {
        let removed = self
            .customers
            .remove(id)
            .ok_or_else(|| customer_not_found(id))?;
        Ok(Outcome::toast(removed, ToastRequest::success("고객이 삭제되었습니다.")))
    }

    pub fn set_customer_groups(
        &mut self,
        customer_id: &str,
        group_ids: Vec<String>,
    ) -> AppResult<Outcome<Customer>> {
        let mut known = Vec::with_capacity(group_ids.len());
        for group_id in group_ids {
            if self.groups.contains(&group_id) && !known.contains(&group_id) {
                known.push(group_id);
            }
        }
        let customer = self.with_customer(customer_id, |customer| customer.groups = known)?;
        Ok(Outcome::toast(customer, ToastRequest::success("고객 그룹이 변경되었습니다.")))
    }

    pub fn add_attachment(
        &mut self,
        customer_id: &str,
        new: NewAttachment,
    ) -> AppResult<Outcome<CustomerAttachment>> {
        if new.name.trim().is_empty() {
            return Err(AppError::Validation("파일 이름이 없습니다.".to_string()));
        }
        if !self.customers.contains(customer_id) {
            return Err(customer_not_found(customer_id));
        }
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(new.data_base64.trim())
            .map_err(|_| AppError::Validation("첨부 파일을 읽을 수 없습니다.".to_string()))?;
        let attachment = CustomerAttachment {
            id: self.ids.next_id(),
            name: new.name.trim().to_string(),
            size: bytes.len() as u64,
            uploaded_at: Utc::now(),
            data_url: format!("data:{};base64,{}", new.mime_type, new.data_base64.trim()),
            mime_type: new.mime_type,
        };
        let stored = attachment.clone();
        self.customers
            .update(customer_id, |customer| customer.attachments.push(stored));
        Ok(Outcome::toast(attachment, ToastRequest::success("파일이 첨부되었습니다.")))
    }

    pub fn delete_attachment(
        &mut self,
        customer_id: &str,
        attachment_id: &str,
    ) -> AppResult<Outcome<CustomerAttachment>> {
        let mut removed = None;
        let found = self.customers.update(customer_id, |customer| {
            if let Some(index) = customer.attachments.iter().position(|a| a.id == attachment_id) {
                removed = Some(customer.attachments.remove(index));
            }
        });
        if !found {
            return Err(customer_not_found(customer_id));
        }
        let removed = removed
            .ok_or_else(|| AppError::NotFound(format!("첨부 파일을 찾을 수 없습니다: {}", attachment_id)))?;
        Ok(Outcome::toast(removed, ToastRequest::success("첨부 파일이 삭제되었습니다.")))
    }

    // ---- contact records -------------------------------------------------

    /// Records a contact and refreshes the customer's follow-up cycle.
    /// The record is kept even when its customer is gone; only the customer
    /// side effect is skipped then.
    pub fn add_contact_record(&mut self, new: NewContactRecord) -> AppResult<Outcome<ContactRecord>> {
        let record = ContactRecord {
            id: self.ids.next_id(),
            customer_id: new.customer_id,
            date: new.date,
            kind: new.kind,
            note: new.note.trim().to_string(),
        };
        self.contact_records.add(record.clone());

        let cycle = self.rules.contact_cycle_days;
        let touched = self.customers.update(&record.customer_id, |customer| {
            customer.last_contact = Some(record.date);
            customer.contact_due_days = cycle;
        });
        if !touched {
            tracing::debug!(customer_id = %record.customer_id, "contact record references a missing customer");
        }
        Ok(Outcome::toast(record, ToastRequest::success("연락 기록이 저장되었습니다.")))
    }

    // ---- schedule --------------------------------------------------------

    pub fn add_schedule_event(&mut self, new: NewScheduleEvent) -> AppResult<Outcome<ScheduleEvent>> {
        if new.title.trim().is_empty() {
            return Err(AppError::Validation("일정 제목을 입력해주세요.".to_string()));
        }
        let event = ScheduleEvent {
            id: self.ids.next_id(),
            date: new.date,
            title: new.title.trim().to_string(),
            time: new.time,
            location: new
                .location
                .map(|location| location.trim().to_string())
                .filter(|location| !location.is_empty()),
            kind: new.kind,
        };
        self.schedule_events.add(event.clone());
        Ok(Outcome::toast(event, ToastRequest::success("일정이 추가되었습니다.")))
    }

    pub fn delete_schedule_event(&mut self, id: &str) -> AppResult<Outcome<ScheduleEvent>> {
        let removed = self
            .schedule_events
            .remove(id)
            .ok_or_else(|| AppError::NotFound(format!("일정을 찾을 수 없습니다: {}", id)))?;
        Ok(Outcome::toast(removed, ToastRequest::success("일정이 삭제되었습니다.")))
    }

    // ---- groups ----------------------------------------------------------

    pub fn add_group(&mut self, new: NewCustomerGroup) -> AppResult<Outcome<CustomerGroup>> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("그룹명을 입력해주세요.".to_string()));
        }
        let group = CustomerGroup {
            id: self.ids.next_id(),
            name: name.to_string(),
            color: new.color,
            description: new
                .description
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty()),
        };
        self.groups.add(group.clone());
        Ok(Outcome::toast(group, ToastRequest::success("그룹이 추가되었습니다.")))
    }

    pub fn update_group(&mut self, id: &str, patch: CustomerGroupPatch) -> AppResult<Outcome<CustomerGroup>> {
        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(AppError::Validation("그룹명을 입력해주세요.".to_string()));
            }
        }
        let mut updated = None;
        self.groups.update(id, |group| {
            if let Some(name) = patch.name {
                group.name = name.trim().to_string();
            }
            if let Some(color) = patch.color {
                group.color = color;
            }
            if let Some(description) = patch.description {
                let description = description.trim().to_string();
                group.description = (!description.is_empty()).then_some(description);
            }
            updated = Some(group.clone());
        });
        let group = updated.ok_or_else(|| group_not_found(id))?;
        Ok(Outcome::toast(group, ToastRequest::success("그룹이 수정되었습니다.")))
    }

    /// Removes the group and strips its id from every customer's memberships.
    pub fn delete_group(&mut self, id: &str) -> AppResult<Outcome<CustomerGroup>> {
        let removed = self.groups.remove(id).ok_or_else(|| group_not_found(id))?;
        for customer in self.customers.iter_mut() {
            customer.groups.retain(|group| group != id);
        }
        Ok(Outcome::toast(removed, ToastRequest::success("그룹이 삭제되었습니다.")))
    }

    // ---- goals -----------------------------------------------------------

    pub fn add_goal(&mut self, new: NewGoal) -> AppResult<Outcome<Goal>> {
        if new.period.trim().is_empty() {
            return Err(AppError::Validation("모든 필드를 입력해주세요.".to_string()));
        }
        let period = new.period.trim().to_string();
        let exists = self
            .goals
            .list()
            .iter()
            .any(|goal| goal.kind == new.kind && goal.period == period);
        if exists {
            return Err(AppError::Validation("해당 기간의 목표가 이미 존재합니다.".to_string()));
        }
        let goal = Goal {
            id: self.ids.next_id(),
            kind: new.kind,
            period,
            target_registrations: new.target_registrations,
            target_contacts: new.target_contacts,
            actual_registrations: new.actual_registrations,
            actual_contacts: new.actual_contacts,
        };
        self.goals.add(goal.clone());
        Ok(Outcome::toast(goal, ToastRequest::success("목표가 설정되었습니다.")))
    }

    pub fn update_goal(&mut self, id: &str, patch: GoalPatch) -> AppResult<Outcome<Goal>> {
        let mut updated = None;
        self.goals.update(id, |goal| {
            if let Some(value) = patch.target_registrations {
                goal.target_registrations = value;
            }
            if let Some(value) = patch.target_contacts {
                goal.target_contacts = value;
            }
            if let Some(value) = patch.actual_registrations {
                goal.actual_registrations = Some(value);
            }
            if let Some(value) = patch.actual_contacts {
                goal.actual_contacts = Some(value);
            }
            updated = Some(goal.clone());
        });
        let goal = updated.ok_or_else(|| goal_not_found(id))?;
        Ok(Outcome::toast(goal, ToastRequest::success("목표가 수정되었습니다.")))
    }

    pub fn delete_goal(&mut self, id: &str) -> AppResult<Outcome<Goal>> {
        let removed = self.goals.remove(id).ok_or_else(|| goal_not_found(id))?;
        Ok(Outcome::toast(removed, ToastRequest::success("목표가 삭제되었습니다.")))
    }

    // ---- todos -----------------------------------------------------------

    pub fn add_todo(&mut self, new: NewTodo) -> AppResult<Outcome<Todo>> {
        let title = new.title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("할 일을 입력해주세요.".to_string()));
        }
        let todo = Todo {
            id: self.ids.next_id(),
            title: title.to_string(),
            time: new.time,
            completed: new.completed,
        };
        self.todos.add(todo.clone());
        Ok(Outcome::toast(todo, ToastRequest::success("할 일이 추가되었습니다.")))
    }

    pub fn toggle_todo(&mut self, id: &str) -> AppResult<Outcome<Todo>> {
        let mut toggled = None;
        self.todos.update(id, |todo| {
            todo.completed = !todo.completed;
            toggled = Some(todo.clone());
        });
        let todo = toggled.ok_or_else(|| todo_not_found(id))?;
        let message = if todo.completed {
            "할 일을 완료했습니다."
        } else {
            "할 일을 다시 진행합니다."
        };
        Ok(Outcome::toast(todo, ToastRequest::new(message, ToastSeverity::Info)))
    }

    /// Deletes the todo and keeps it restorable until the next deletion.
    pub fn delete_todo(&mut self, id: &str) -> AppResult<Outcome<Todo>> {
        let removed = self.todos.remove(id).ok_or_else(|| todo_not_found(id))?;
        self.deleted_todos.push(removed.clone());
        Ok(Outcome::toast(
            removed,
            ToastRequest::new("할 일이 삭제되었습니다.", ToastSeverity::Info)
                .with_action("되돌리기", ToastCommand::RestoreLastDeletedTodo),
        ))
    }

    pub fn restore_last_deleted_todo(&mut self) -> AppResult<Outcome<Todo>> {
        let todo = self
            .deleted_todos
            .pop()
            .ok_or_else(|| AppError::Validation("되돌릴 항목이 없습니다.".to_string()))?;
        self.todos.add(todo.clone());
        Ok(Outcome::toast(todo, ToastRequest::success("할 일이 복구되었습니다.")))
    }

    // ---- notifications ---------------------------------------------------

    pub fn mark_notification_read(&mut self, id: &str) -> AppResult<Outcome<Notification>> {
        let mut marked = None;
        self.notifications.update(id, |notification| {
            notification.read = true;
            marked = Some(notification.clone());
        });
        let notification =
            marked.ok_or_else(|| AppError::NotFound(format!("알림을 찾을 수 없습니다: {}", id)))?;
        Ok(Outcome::toast(
            notification,
            ToastRequest::new("알림을 읽음 처리했습니다.", ToastSeverity::Info),
        ))
    }

    /// Marks everything read; nothing is deleted.
    pub fn clear_notifications(&mut self) -> AppResult<Outcome<usize>> {
        let mut changed = 0usize;
        for notification in self.notifications.iter_mut() {
            if !notification.read {
                notification.read = true;
                changed += 1;
            }
        }
        Ok(Outcome::toast(
            changed,
            ToastRequest::new("모든 알림을 읽음 처리했습니다.", ToastSeverity::Info),
        ))
    }

    // ---- selection and bulk actions --------------------------------------

    pub fn toggle_selection(&mut self, id: &str) -> bool {
        self.selection.toggle(id)
    }

    pub fn select_all(&mut self, ids: Vec<String>) {
        self.selection.select_all(ids);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// A changed filter resets the page and drops the selection.
    pub fn set_customer_filter(&mut self, filter: CustomerFilter) -> bool {
        let changed = self.customer_view.set_filter(filter);
        if changed {
            self.selection.clear();
        }
        changed
    }

    pub fn set_customer_page(&mut self, page: usize) {
        self.customer_view.set_page(page);
    }

    pub fn customer_list(&mut self) -> CustomerListResponse {
        let page = self.customer_view.render(self.customers.list());
        let all_on_page_selected =
            !page.items.is_empty() && page.items.iter().all(|c| self.selection.contains(&c.id));
        CustomerListResponse {
            page,
            selected_ids: self.selection.ids().to_vec(),
            all_on_page_selected,
        }
    }

    /// Header checkbox: selects the current page, or clears when it is
    /// already fully selected.
    pub fn toggle_select_page(&mut self) -> CustomerListResponse {
        let listing = self.customer_list();
        if listing.all_on_page_selected {
            self.selection.clear();
        } else {
            self.selection
                .select_all(listing.page.items.iter().map(|c| c.id.clone()));
        }
        self.customer_list()
    }

    pub fn bulk_delete_selected(&mut self) -> AppResult<Outcome<usize>> {
        if self.selection.is_empty() {
            return Err(AppError::Validation("삭제할 고객을 선택해주세요.".to_string()));
        }
        let selected = self.selection.take();
        let removed = self
            .customers
            .retain(|customer| !selected.iter().any(|id| id == &customer.id));
        Ok(Outcome::toast(
            removed,
            ToastRequest::success(format!("{}명의 고객이 삭제되었습니다.", removed)),
        ))
    }

    /// Resets the follow-up countdown of every selected customer.
    pub fn bulk_postpone_selected(&mut self) -> AppResult<Outcome<usize>> {
        if self.selection.is_empty() {
            return Err(AppError::Validation("미룰 고객을 선택해주세요.".to_string()));
        }
        let selected = self.selection.take();
        let days = self.rules.postpone_days;
        let mut postponed = 0usize;
        for customer in self.customers.iter_mut() {
            if selected.iter().any(|id| id == &customer.id) {
                customer.contact_due_days = days;
                postponed += 1;
            }
        }
        Ok(Outcome::toast(
            postponed,
            ToastRequest::success(format!("{}명의 연락이 {}일 미뤄졌습니다.", postponed, days)),
        ))
    }

    // ---- bulk messaging ----------------------------------------------------

    pub fn message_recipients(&self) -> RecipientListResponse {
        self.messaging.listing(self.customers.list())
    }

    pub fn set_recipient_search(&mut self, search: &str) -> RecipientListResponse {
        self.messaging.set_search(search);
        self.message_recipients()
    }

    pub fn toggle_recipient(&mut self, id: &str) -> RecipientListResponse {
        self.messaging.toggle(id);
        self.message_recipients()
    }

    pub fn toggle_all_recipients(&mut self) -> RecipientListResponse {
        self.messaging.toggle_all(self.customers.list());
        self.message_recipients()
    }

    pub fn clear_recipients(&mut self) -> RecipientListResponse {
        self.messaging.clear();
        self.message_recipients()
    }

    pub fn send_message(
        &mut self,
        message: &OutboundMessage,
        agent_name: &str,
    ) -> AppResult<Outcome<SendReceipt>> {
        let receipt = self.messaging.send(self.customers.list(), message, agent_name)?;
        let toast = ToastRequest::success(format!(
            "{}명에게 {}이 발송되었습니다.",
            receipt.messages.len(),
            receipt.channel.label()
        ));
        Ok(Outcome::toast(receipt, toast))
    }

    fn with_customer(&mut self, id: &str, apply: impl FnOnce(&mut Customer)) -> AppResult<Customer> {
        let mut updated = None;
        self.customers.update(id, |customer| {
            apply(customer);
            updated = Some(customer.clone());
        });
        updated.ok_or_else(|| customer_not_found(id))
    }
}

fn validate_name_and_phone(name: &str, phone: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("고객명을 입력해주세요.".to_string()));
    }
    if phone.trim().is_empty() {
        return Err(AppError::Validation("연락처를 입력해주세요.".to_string()));
    }
    Ok(())
}

fn customer_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("고객을 찾을 수 없습니다: {}", id))
}

fn group_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("그룹을 찾을 수 없습니다: {}", id))
}

fn goal_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("목표를 찾을 수 없습니다: {}", id))
}

fn todo_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("할 일을 찾을 수 없습니다: {}", id))
}

#[cfg(test)]
mod tests {
    use super::{CrmState, StateRules};
    use crate::errors::AppError;
    use crate::models::{
        ContactType, CustomerFilter, CustomerStatus, GoalType, NewAttachment, NewContactRecord,
        NewCustomer, NewCustomerGroup, NewGoal, NewTodo, ToastCommand, ToastSeverity,
    };
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn state() -> CrmState {
        CrmState::new(StateRules::default())
    }

    fn add(state: &mut CrmState, name: &str) -> String {
        state
            .add_customer(NewCustomer::basic(name, "010-0000-0000", date(2024, 5, 1)))
            .expect("add customer")
            .value
            .id
    }

    fn new_goal(kind: GoalType, period: &str) -> NewGoal {
        NewGoal {
            kind,
            period: period.to_string(),
            target_registrations: 10,
            target_contacts: 30,
            actual_registrations: Some(0),
            actual_contacts: Some(0),
        }
    }

    #[test]
    fn new_customer_is_listed_first_with_one_toast() {
        let mut state = state();
        add(&mut state, "홍길동");
        let outcome = state
            .add_customer(NewCustomer::basic("삼성동 건물주", "010-2345-6789", date(2024, 5, 2)))
            .expect("add");
        assert_eq!(state.customers().len(), 2);
        assert_eq!(state.customers()[0].id, outcome.value.id);
        assert_eq!(outcome.toasts().count(), 1);
        assert_eq!(outcome.toasts().next().map(|t| t.severity), Some(ToastSeverity::Success));
    }

    #[test]
    fn blank_phone_is_rejected_without_mutation() {
        let mut state = state();
        let error = state
            .add_customer(NewCustomer::basic("홍길동", "  ", date(2024, 5, 1)))
            .expect_err("blank phone");
        assert!(matches!(error, AppError::Validation(_)));
        assert!(state.customers().is_empty());
    }

    #[test]
    fn batch_is_prepended_in_order_with_aggregate_toast() {
        let mut state = state();
        let existing = add(&mut state, "기존");
        let outcome = state
            .add_customers(vec![
                NewCustomer::basic("가", "010-1", date(2024, 5, 1)),
                NewCustomer::basic("나", "010-2", date(2024, 5, 1)),
            ])
            .expect("batch");
        let names = state.customers().iter().map(|c| c.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["가", "나", "기존"]);
        assert_eq!(state.customers()[2].id, existing);
        let toasts = outcome.toasts().collect::<Vec<_>>();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].message, "2명의 고객이 등록되었습니다.");
    }

    #[test]
    fn contact_record_refreshes_customer_cycle() {
        let mut state = state();
        let id = add(&mut state, "홍길동");
        state
            .update_customer(&id, crate::models::CustomerPatch {
                contact_due_days: Some(-5),
                ..Default::default()
            })
            .expect("update");
        let outcome = state
            .add_contact_record(NewContactRecord {
                customer_id: id.clone(),
                date: date(2024, 5, 31),
                kind: ContactType::Message,
                note: "매물 정보 문자 발송".to_string(),
            })
            .expect("record");
        let customer = state.get_customer(&id).expect("customer");
        assert_eq!(customer.last_contact, Some(date(2024, 5, 31)));
        assert_eq!(customer.contact_due_days, 14);
        assert_eq!(state.contact_records()[0].id, outcome.value.id);
    }

    #[test]
    fn contact_record_for_deleted_customer_is_kept() {
        let mut state = state();
        let id = add(&mut state, "홍길동");
        state.delete_customer(&id).expect("delete");
        let outcome = state
            .add_contact_record(NewContactRecord {
                customer_id: id.clone(),
                date: date(2024, 5, 31),
                kind: ContactType::Call,
                note: String::new(),
            })
            .expect("record kept");
        assert_eq!(state.contact_records().len(), 1);
        assert_eq!(state.contact_records()[0].customer_id, id);
        assert!(state.customers().is_empty());
        assert_eq!(outcome.toasts().next().map(|t| t.severity), Some(ToastSeverity::Success));
    }

    #[test]
    fn deleting_group_cleans_memberships_only() {
        let mut state = state();
        let vip = state
            .add_group(NewCustomerGroup { name: "VIP".to_string(), color: "#8B5CF6".to_string(), description: None })
            .expect("group")
            .value
            .id;
        let investors = state
            .add_group(NewCustomerGroup { name: "투자자".to_string(), color: "#3B82F6".to_string(), description: None })
            .expect("group")
            .value
            .id;
        let id = add(&mut state, "홍길동");
        state
            .set_customer_groups(&id, vec![vip.clone(), investors.clone(), "unknown".to_string()])
            .expect("assign");
        let before = state.get_customer(&id).cloned().expect("customer");
        assert_eq!(before.groups, vec![vip.clone(), investors.clone()]);

        state.delete_group(&vip).expect("delete group");
        let after = state.get_customer(&id).cloned().expect("customer");
        assert_eq!(after.groups, vec![investors]);
        assert_eq!(after.name, before.name);
        assert_eq!(after.contact_due_days, before.contact_due_days);
        assert_eq!(state.groups().len(), 1);
    }

    #[test]
    fn duplicate_goal_period_is_rejected() {
        let mut state = state();
        state.add_goal(new_goal(GoalType::Monthly, "2024-05")).expect("first");
        let error = state
            .add_goal(new_goal(GoalType::Monthly, "2024-05"))
            .expect_err("duplicate");
        assert_eq!(error.toast_severity(), ToastSeverity::Warning);
        assert_eq!(state.goals().len(), 1);
        state
            .add_goal(new_goal(GoalType::Quarterly, "2024-05"))
            .expect("same period, other kind");
        assert_eq!(state.goals().len(), 2);
    }

    #[test]
    fn todo_undo_restores_only_last_deletion() {
        let mut state = state();
        let first = state
            .add_todo(NewTodo { title: "매물 홍보 전단지 검토".to_string(), time: "09:30".to_string(), completed: true })
            .expect("todo")
            .value;
        let second = state
            .add_todo(NewTodo { title: "TM 리스트 작성하기".to_string(), time: "10:00".to_string(), completed: false })
            .expect("todo")
            .value;

        let deleted = state.delete_todo(&first.id).expect("delete");
        let action = deleted.toasts().next().and_then(|t| t.action.clone()).expect("undo action");
        assert_eq!(action.command, ToastCommand::RestoreLastDeletedTodo);
        let restored = state.restore_last_deleted_todo().expect("restore").value;
        assert_eq!(restored, first);

        state.delete_todo(&first.id).expect("delete first");
        state.delete_todo(&second.id).expect("delete second");
        let restored = state.restore_last_deleted_todo().expect("restore").value;
        assert_eq!(restored, second);
        assert!(state.restore_last_deleted_todo().is_err());
        assert!(state.todos().iter().all(|todo| todo.id != first.id));
    }

    #[test]
    fn raised_undo_capacity_applies_to_later_deletions() {
        let mut state = state();
        let mut ids = Vec::new();
        for title in ["첫째", "둘째"] {
            let todo = state
                .add_todo(NewTodo { title: title.to_string(), time: "10:00".to_string(), completed: false })
                .expect("todo")
                .value;
            ids.push(todo.id);
        }
        state.set_rules(StateRules {
            undo_capacity: 2,
            ..state.rules()
        });
        for id in &ids {
            state.delete_todo(id).expect("delete");
        }
        assert_eq!(state.restore_last_deleted_todo().expect("second").value.id, ids[1]);
        assert_eq!(state.restore_last_deleted_todo().expect("first").value.id, ids[0]);

        state.set_rules(StateRules {
            undo_capacity: 1,
            ..state.rules()
        });
        for id in &ids {
            state.delete_todo(id).expect("delete");
        }
        state.restore_last_deleted_todo().expect("latest");
        assert!(state.restore_last_deleted_todo().is_err());
    }

    #[test]
    fn bulk_postpone_resets_selected_only() {
        let mut state = state();
        let a = add(&mut state, "가");
        let b = add(&mut state, "나");
        let c = add(&mut state, "다");
        state.toggle_selection(&a);
        state.toggle_selection(&c);
        let outcome = state.bulk_postpone_selected().expect("postpone");
        assert_eq!(outcome.value, 2);
        assert_eq!(state.get_customer(&a).map(|x| x.contact_due_days), Some(7));
        assert_eq!(state.get_customer(&c).map(|x| x.contact_due_days), Some(7));
        assert_eq!(state.get_customer(&b).map(|x| x.contact_due_days), Some(99));
        assert!(state.selection().is_empty());
    }

    #[test]
    fn bulk_actions_require_selection() {
        let mut state = state();
        add(&mut state, "가");
        assert!(matches!(state.bulk_delete_selected(), Err(AppError::Validation(_))));
        assert!(matches!(state.bulk_postpone_selected(), Err(AppError::Validation(_))));
        assert_eq!(state.customers().len(), 1);
    }

    #[test]
    fn bulk_delete_removes_selected_and_reports_count() {
        let mut state = state();
        let a = add(&mut state, "가");
        add(&mut state, "나");
        state.select_all(vec![a.clone(), "already-gone".to_string()]);
        let outcome = state.bulk_delete_selected().expect("delete");
        assert_eq!(outcome.value, 1);
        assert_eq!(state.customers().len(), 1);
        assert!(state.get_customer(&a).is_none());
    }

    #[test]
    fn filter_change_clears_selection_but_paging_does_not() {
        let mut state = state();
        for index in 0..7 {
            add(&mut state, &format!("고객{}", index));
        }
        let listing = state.toggle_select_page();
        assert_eq!(listing.selected_ids.len(), 5);
        assert!(listing.all_on_page_selected);

        state.set_customer_page(2);
        let second = state.customer_list();
        assert_eq!(second.page.items.len(), 2);
        assert_eq!(second.selected_ids.len(), 5);
        assert!(!second.all_on_page_selected);

        assert!(state.set_customer_filter(CustomerFilter {
            name: "고객1".to_string(),
            ..CustomerFilter::default()
        }));
        let filtered = state.customer_list();
        assert_eq!(filtered.page.page, 1);
        assert!(filtered.selected_ids.is_empty());
    }

    #[test]
    fn attachments_are_customer_scoped() {
        let mut state = state();
        let id = add(&mut state, "홍길동");
        let attachment = state
            .add_attachment(&id, NewAttachment {
                name: "계약서.pdf".to_string(),
                mime_type: "application/pdf".to_string(),
                data_base64: "aGVsbG8=".to_string(),
            })
            .expect("attach")
            .value;
        assert_eq!(attachment.size, 5);
        assert!(attachment.data_url.starts_with("data:application/pdf;base64,"));
        assert_eq!(state.get_customer(&id).map(|c| c.attachments.len()), Some(1));

        state.delete_attachment(&id, &attachment.id).expect("detach");
        assert_eq!(state.get_customer(&id).map(|c| c.attachments.len()), Some(0));
        assert!(matches!(
            state.delete_attachment(&id, &attachment.id),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn clearing_notifications_marks_read_without_deleting() {
        let mut state = CrmState::with_seed(StateRules::default(), crate::seed::demo_seed());
        let total = state.notifications().len();
        assert!(state.unread_notification_count() > 0);
        state.clear_notifications().expect("clear");
        assert_eq!(state.notifications().len(), total);
        assert_eq!(state.unread_notification_count(), 0);
    }

    #[test]
    fn status_update_keeps_identity() {
        let mut state = state();
        let id = add(&mut state, "고길동");
        let updated = state
            .update_customer(&id, crate::models::CustomerPatch {
                status: Some(CustomerStatus::Inactive),
                ..Default::default()
            })
            .expect("update")
            .value;
        assert_eq!(updated.id, id);
        assert_eq!(updated.status, CustomerStatus::Inactive);
        assert!(matches!(
            state.update_customer("missing", Default::default()),
            Err(AppError::NotFound(_))
        ));
    }
}
