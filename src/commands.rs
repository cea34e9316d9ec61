use crate::config::load_settings;
use crate::crm::{CrmCore, GroupWithCount};
use crate::models::{
    ActivityBucket, ActivityPeriod, AppSettings, BooleanResponse, ChatMessage, ContactRecord,
    CountResponse, Customer, CustomerAttachment, CustomerFilter, CustomerGroup,
    CustomerGroupPatch, CustomerListResponse, CustomerPatch, CustomerSummary, CsvImportPreview,
    EnrichedContactRecord, Goal, GoalPatch, GoalProgressView, GoalType, LeadPriorities,
    NewAttachment, NewContactRecord, NewCustomer, NewCustomerGroup, NewGoal, NewScheduleEvent,
    NewTodo, Notification, ScheduleEvent, SecretaryInsights, ShareText, Toast, Todo,
};
use crate::messaging::{
    ComposerOptions, MessageChannel, MessageLength, OutboundMessage, RecipientListResponse, SendReceipt,
};
use crate::secretary::{QuickQuestion, SecretaryTranscript};
use crate::{init_tracing, to_client_error};
use chrono::NaiveDate;
use tauri::{Emitter, Manager};
use tauri_plugin_clipboard_manager::ClipboardExt;
use tokio::sync::broadcast::error::RecvError;

pub const TOAST_EVENT: &str = "crm://toast";

#[derive(Clone)]
struct AppState {
    core: CrmCore,
}

// Every command is async: toast expiry timers are spawned on the runtime.

#[tauri::command]
async fn get_settings(state: tauri::State<'_, AppState>) -> Result<AppSettings, String> {
    Ok(state.core.get_settings())
}

#[tauri::command]
async fn update_settings(
    state: tauri::State<'_, AppState>,
    settings: serde_json::Value,
) -> Result<AppSettings, String> {
    state
        .core
        .update_settings(settings)
        .await
        .map_err(to_client_error)
}

#[tauri::command]
async fn list_customers(state: tauri::State<'_, AppState>) -> Result<CustomerListResponse, String> {
    Ok(state.core.customer_list().await)
}

#[tauri::command]
async fn get_customer(state: tauri::State<'_, AppState>, customer_id: String) -> Result<Customer, String> {
    state
        .core
        .get_customer(&customer_id)
        .await
        .map_err(to_client_error)
}

#[tauri::command]
async fn add_customer(state: tauri::State<'_, AppState>, customer: NewCustomer) -> Result<Customer, String> {
    state.core.add_customer(customer).await.map_err(to_client_error)
}

#[tauri::command]
async fn update_customer(
    state: tauri::State<'_, AppState>,
    customer_id: String,
    patch: CustomerPatch,
) -> Result<Customer, String> {
    state
        .core
        .update_customer(&customer_id, patch)
        .await
        .map_err(to_client_error)
}

#[tauri::command]
async fn delete_customer(state: tauri::State<'_, AppState>, customer_id: String) -> Result<Customer, String> {
    state
        .core
        .delete_customer(&customer_id)
        .await
        .map_err(to_client_error)
}

#[tauri::command]
async fn set_customer_groups(
    state: tauri::State<'_, AppState>,
    customer_id: String,
    group_ids: Vec<String>,
) -> Result<Customer, String> {
    state
        .core
        .set_customer_groups(&customer_id, group_ids)
        .await
        .map_err(to_client_error)
}

#[tauri::command]
async fn add_attachment(
    state: tauri::State<'_, AppState>,
    customer_id: String,
    attachment: NewAttachment,
) -> Result<CustomerAttachment, String> {
    state
        .core
        .add_attachment(&customer_id, attachment)
        .await
        .map_err(to_client_error)
}

#[tauri::command]
async fn delete_attachment(
    state: tauri::State<'_, AppState>,
    customer_id: String,
    attachment_id: String,
) -> Result<CustomerAttachment, String> {
    state
        .core
        .delete_attachment(&customer_id, &attachment_id)
        .await
        .map_err(to_client_error)
}

#[tauri::command]
async fn share_customer(state: tauri::State<'_, AppState>, customer_id: String) -> Result<ShareText, String> {
    state
        .core
        .share_customer(&customer_id)
        .await
        .map_err(to_client_error)
}

#[tauri::command]
async fn copy_customer_to_clipboard(
    app: tauri::AppHandle,
    state: tauri::State<'_, AppState>,
    customer_id: String,
) -> Result<BooleanResponse, String> {
    let shared = state
        .core
        .share_customer(&customer_id)
        .await
        .map_err(to_client_error)?;
    app.clipboard()
        .write_text(shared.text)
        .map_err(to_client_error)?;
    state.core.notify_copied();
    Ok(BooleanResponse { success: true })
}

#[tauri::command]
async fn set_customer_filter(
    state: tauri::State<'_, AppState>,
    filter: CustomerFilter,
) -> Result<CustomerListResponse, String> {
    Ok(state.core.set_customer_filter(filter).await)
}

#[tauri::command]
async fn set_customer_page(state: tauri::State<'_, AppState>, page: usize) -> Result<CustomerListResponse, String> {
    Ok(state.core.set_customer_page(page).await)
}

#[tauri::command]
async fn toggle_customer_selection(
    state: tauri::State<'_, AppState>,
    customer_id: String,
) -> Result<CustomerListResponse, String> {
    Ok(state.core.toggle_customer_selection(&customer_id).await)
}

#[tauri::command]
async fn toggle_select_page(state: tauri::State<'_, AppState>) -> Result<CustomerListResponse, String> {
    Ok(state.core.toggle_select_page().await)
}

#[tauri::command]
async fn clear_selection(state: tauri::State<'_, AppState>) -> Result<CustomerListResponse, String> {
    Ok(state.core.clear_selection().await)
}

#[tauri::command]
async fn bulk_delete_selected(state: tauri::State<'_, AppState>) -> Result<CountResponse, String> {
    state
        .core
        .bulk_delete_selected()
        .await
        .map(|count| CountResponse { count })
        .map_err(to_client_error)
}

#[tauri::command]
async fn bulk_postpone_selected(state: tauri::State<'_, AppState>) -> Result<CountResponse, String> {
    state
        .core
        .bulk_postpone_selected()
        .await
        .map(|count| CountResponse { count })
        .map_err(to_client_error)
}

#[tauri::command]
async fn preview_customer_csv(state: tauri::State<'_, AppState>, text: String) -> Result<CsvImportPreview, String> {
    state.core.preview_customer_csv(&text).map_err(to_client_error)
}

#[tauri::command]
async fn import_customers_csv(state: tauri::State<'_, AppState>, bytes: Vec<u8>) -> Result<Vec<Customer>, String> {
    state
        .core
        .import_customers_csv_bytes(&bytes)
        .await
        .map_err(to_client_error)
}

#[tauri::command]
async fn export_customer_csv_template(state: tauri::State<'_, AppState>) -> Result<Vec<u8>, String> {
    Ok(state.core.export_customer_csv_template())
}

#[tauri::command]
async fn add_contact_record(
    state: tauri::State<'_, AppState>,
    record: NewContactRecord,
) -> Result<ContactRecord, String> {
    state
        .core
        .add_contact_record(record)
        .await
        .map_err(to_client_error)
}

#[tauri::command]
async fn list_contact_records(
    state: tauri::State<'_, AppState>,
    customer_id: String,
) -> Result<Vec<ContactRecord>, String> {
    Ok(state.core.contact_records_for(&customer_id).await)
}

#[tauri::command]
async fn recent_contact_records(state: tauri::State<'_, AppState>) -> Result<Vec<EnrichedContactRecord>, String> {
    Ok(state.core.recent_contact_records().await)
}

#[tauri::command]
async fn list_schedule_events(state: tauri::State<'_, AppState>) -> Result<Vec<ScheduleEvent>, String> {
    Ok(state.core.schedule_events().await)
}

#[tauri::command]
async fn events_on(state: tauri::State<'_, AppState>, date: NaiveDate) -> Result<Vec<ScheduleEvent>, String> {
    Ok(state.core.events_on(date).await)
}

#[tauri::command]
async fn event_days_in_month(state: tauri::State<'_, AppState>, year: i32, month: u32) -> Result<Vec<u32>, String> {
    Ok(state.core.event_days_in_month(year, month).await)
}

#[tauri::command]
async fn add_schedule_event(
    state: tauri::State<'_, AppState>,
    event: NewScheduleEvent,
) -> Result<ScheduleEvent, String> {
    state
        .core
        .add_schedule_event(event)
        .await
        .map_err(to_client_error)
}

#[tauri::command]
async fn delete_schedule_event(state: tauri::State<'_, AppState>, event_id: String) -> Result<ScheduleEvent, String> {
    state
        .core
        .delete_schedule_event(&event_id)
        .await
        .map_err(to_client_error)
}

#[tauri::command]
async fn list_groups(state: tauri::State<'_, AppState>) -> Result<Vec<GroupWithCount>, String> {
    Ok(state.core.groups().await)
}

#[tauri::command]
async fn add_group(state: tauri::State<'_, AppState>, group: NewCustomerGroup) -> Result<CustomerGroup, String> {
    state.core.add_group(group).await.map_err(to_client_error)
}

#[tauri::command]
async fn update_group(
    state: tauri::State<'_, AppState>,
    group_id: String,
    patch: CustomerGroupPatch,
) -> Result<CustomerGroup, String> {
    state
        .core
        .update_group(&group_id, patch)
        .await
        .map_err(to_client_error)
}

#[tauri::command]
async fn delete_group(state: tauri::State<'_, AppState>, group_id: String) -> Result<CustomerGroup, String> {
    state.core.delete_group(&group_id).await.map_err(to_client_error)
}

#[tauri::command]
async fn list_goals(state: tauri::State<'_, AppState>) -> Result<Vec<GoalProgressView>, String> {
    Ok(state.core.goal_progress().await)
}

#[tauri::command]
async fn current_goal_period(state: tauri::State<'_, AppState>, kind: GoalType) -> Result<String, String> {
    Ok(state.core.current_goal_period(kind))
}

#[tauri::command]
async fn add_goal(state: tauri::State<'_, AppState>, goal: NewGoal) -> Result<Goal, String> {
    state.core.add_goal(goal).await.map_err(to_client_error)
}

#[tauri::command]
async fn update_goal(
    state: tauri::State<'_, AppState>,
    goal_id: String,
    patch: GoalPatch,
) -> Result<Goal, String> {
    state
        .core
        .update_goal(&goal_id, patch)
        .await
        .map_err(to_client_error)
}

#[tauri::command]
async fn delete_goal(state: tauri::State<'_, AppState>, goal_id: String) -> Result<Goal, String> {
    state.core.delete_goal(&goal_id).await.map_err(to_client_error)
}

#[tauri::command]
async fn list_todos(state: tauri::State<'_, AppState>) -> Result<Vec<Todo>, String> {
    Ok(state.core.todos().await)
}

#[tauri::command]
async fn add_todo(state: tauri::State<'_, AppState>, todo: NewTodo) -> Result<Todo, String> {
    state.core.add_todo(todo).await.map_err(to_client_error)
}

#[tauri::command]
async fn toggle_todo(state: tauri::State<'_, AppState>, todo_id: String) -> Result<Todo, String> {
    state.core.toggle_todo(&todo_id).await.map_err(to_client_error)
}

#[tauri::command]
async fn delete_todo(state: tauri::State<'_, AppState>, todo_id: String) -> Result<Todo, String> {
    state.core.delete_todo(&todo_id).await.map_err(to_client_error)
}

#[tauri::command]
async fn restore_last_deleted_todo(state: tauri::State<'_, AppState>) -> Result<Todo, String> {
    state
        .core
        .restore_last_deleted_todo()
        .await
        .map_err(to_client_error)
}

#[tauri::command]
async fn list_notifications(state: tauri::State<'_, AppState>) -> Result<Vec<Notification>, String> {
    Ok(state.core.notifications().await)
}

#[tauri::command]
async fn unread_notification_count(state: tauri::State<'_, AppState>) -> Result<CountResponse, String> {
    Ok(CountResponse {
        count: state.core.unread_notification_count().await,
    })
}

#[tauri::command]
async fn mark_notification_read(
    state: tauri::State<'_, AppState>,
    notification_id: String,
) -> Result<Notification, String> {
    state
        .core
        .mark_notification_read(&notification_id)
        .await
        .map_err(to_client_error)
}

#[tauri::command]
async fn clear_notifications(state: tauri::State<'_, AppState>) -> Result<CountResponse, String> {
    state
        .core
        .clear_notifications()
        .await
        .map(|count| CountResponse { count })
        .map_err(to_client_error)
}

#[tauri::command]
async fn list_toasts(state: tauri::State<'_, AppState>) -> Result<Vec<Toast>, String> {
    Ok(state.core.visible_toasts())
}

#[tauri::command]
async fn dismiss_toast(state: tauri::State<'_, AppState>, toast_id: String) -> Result<BooleanResponse, String> {
    Ok(BooleanResponse {
        success: state.core.dismiss_toast(&toast_id),
    })
}

#[tauri::command]
async fn close_toast(state: tauri::State<'_, AppState>, toast_id: String) -> Result<BooleanResponse, String> {
    Ok(BooleanResponse {
        success: state.core.close_toast(&toast_id),
    })
}

#[tauri::command]
async fn invoke_toast_action(
    state: tauri::State<'_, AppState>,
    toast_id: String,
) -> Result<serde_json::Value, String> {
    state
        .core
        .invoke_toast_action(&toast_id)
        .await
        .map_err(to_client_error)
}

#[tauri::command]
async fn customer_summary(state: tauri::State<'_, AppState>) -> Result<CustomerSummary, String> {
    Ok(state.core.customer_summary().await)
}

#[tauri::command]
async fn activity_series(
    state: tauri::State<'_, AppState>,
    period: ActivityPeriod,
) -> Result<Vec<ActivityBucket>, String> {
    Ok(state.core.activity_series(period).await)
}

#[tauri::command]
async fn secretary_insights(state: tauri::State<'_, AppState>) -> Result<SecretaryInsights, String> {
    Ok(state.core.secretary_insights().await)
}

#[tauri::command]
async fn open_secretary(state: tauri::State<'_, AppState>) -> Result<SecretaryTranscript, String> {
    Ok(state.core.open_secretary().await)
}

#[tauri::command]
async fn close_secretary(state: tauri::State<'_, AppState>, session_id: String) -> Result<BooleanResponse, String> {
    Ok(BooleanResponse {
        success: state.core.close_secretary(&session_id).await,
    })
}

#[tauri::command]
async fn secretary_quick_questions(state: tauri::State<'_, AppState>) -> Result<Vec<QuickQuestion>, String> {
    Ok(state.core.secretary_quick_questions())
}

#[tauri::command]
async fn send_secretary_message(
    state: tauri::State<'_, AppState>,
    session_id: String,
    text: String,
) -> Result<Option<ChatMessage>, String> {
    state
        .core
        .send_secretary_message(&session_id, &text)
        .await
        .map_err(to_client_error)
}

#[tauri::command]
async fn draft_follow_up(
    state: tauri::State<'_, AppState>,
    customer_id: String,
    context: String,
) -> Result<String, String> {
    state
        .core
        .draft_follow_up(&customer_id, &context)
        .await
        .map_err(to_client_error)
}

#[tauri::command]
async fn analyze_leads(state: tauri::State<'_, AppState>) -> Result<LeadPriorities, String> {
    state.core.analyze_leads().await.map_err(to_client_error)
}

#[tauri::command]
async fn message_recipients(state: tauri::State<'_, AppState>) -> Result<RecipientListResponse, String> {
    Ok(state.core.message_recipients().await)
}

#[tauri::command]
async fn set_recipient_search(
    state: tauri::State<'_, AppState>,
    search: String,
) -> Result<RecipientListResponse, String> {
    Ok(state.core.set_recipient_search(&search).await)
}

#[tauri::command]
async fn toggle_recipient(
    state: tauri::State<'_, AppState>,
    customer_id: String,
) -> Result<RecipientListResponse, String> {
    Ok(state.core.toggle_recipient(&customer_id).await)
}

#[tauri::command]
async fn toggle_all_recipients(state: tauri::State<'_, AppState>) -> Result<RecipientListResponse, String> {
    Ok(state.core.toggle_all_recipients().await)
}

#[tauri::command]
async fn clear_recipients(state: tauri::State<'_, AppState>) -> Result<RecipientListResponse, String> {
    Ok(state.core.clear_recipients().await)
}

#[tauri::command]
async fn message_composer_options(state: tauri::State<'_, AppState>) -> Result<ComposerOptions, String> {
    Ok(state.core.message_composer_options())
}

#[tauri::command]
async fn measure_message(
    state: tauri::State<'_, AppState>,
    channel: MessageChannel,
    body: String,
) -> Result<MessageLength, String> {
    Ok(state.core.measure_message(channel, &body))
}

#[tauri::command]
async fn preview_message(state: tauri::State<'_, AppState>, body: String) -> Result<String, String> {
    Ok(state.core.preview_message(&body))
}

#[tauri::command]
async fn apply_message_suggestion(state: tauri::State<'_, AppState>, index: usize) -> Result<String, String> {
    state.core.apply_message_suggestion(index).map_err(to_client_error)
}

#[tauri::command]
async fn send_message(state: tauri::State<'_, AppState>, message: OutboundMessage) -> Result<SendReceipt, String> {
    state.core.send_message(message).await.map_err(to_client_error)
}

#[tauri::command]
async fn send_test_message(
    state: tauri::State<'_, AppState>,
    message: OutboundMessage,
    destination: String,
) -> Result<String, String> {
    state
        .core
        .send_test_message(&message, &destination)
        .map_err(to_client_error)
}

pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_clipboard_manager::init())
        .setup(|app| {
            let app_data_dir = app.path().app_data_dir().map_err(|error| error.to_string())?;
            std::fs::create_dir_all(&app_data_dir).map_err(|error| error.to_string())?;
            init_tracing(&app_data_dir).map_err(|error| error.to_string())?;

            let config_dir = app.path().app_config_dir().map_err(|error| error.to_string())?;
            let settings = load_settings(&config_dir).map_err(|error| error.to_string())?;
            let core = CrmCore::new(settings);
            let handle = app.handle().clone();

            tauri::async_runtime::spawn({
                let mut events = core.subscribe_toasts();
                async move {
                    loop {
                        match events.recv().await {
                            Ok(event) => {
                                if let Err(error) = handle.emit(TOAST_EVENT, &event) {
                                    tracing::warn!(error = %error, "failed to forward toast event");
                                }
                            }
                            Err(RecvError::Lagged(skipped)) => {
                                tracing::warn!(skipped, "toast forwarder lagged");
                            }
                            Err(RecvError::Closed) => break,
                        }
                    }
                }
            });

            app.manage(AppState { core });
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            get_settings,
            update_settings,
            list_customers,
            get_customer,
            add_customer,
            update_customer,
            delete_customer,
            set_customer_groups,
            add_attachment,
            delete_attachment,
            share_customer,
            copy_customer_to_clipboard,
            set_customer_filter,
            set_customer_page,
            toggle_customer_selection,
            toggle_select_page,
            clear_selection,
            bulk_delete_selected,
            bulk_postpone_selected,
            preview_customer_csv,
            import_customers_csv,
            export_customer_csv_template,
            add_contact_record,
            list_contact_records,
            recent_contact_records,
            list_schedule_events,
            events_on,
            event_days_in_month,
            add_schedule_event,
            delete_schedule_event,
            list_groups,
            add_group,
            update_group,
            delete_group,
            list_goals,
            current_goal_period,
            add_goal,
            update_goal,
            delete_goal,
            list_todos,
            add_todo,
            toggle_todo,
            delete_todo,
            restore_last_deleted_todo,
            list_notifications,
            unread_notification_count,
            mark_notification_read,
            clear_notifications,
            list_toasts,
            dismiss_toast,
            close_toast,
            invoke_toast_action,
            customer_summary,
            activity_series,
            secretary_insights,
            open_secretary,
            close_secretary,
            secretary_quick_questions,
            send_secretary_message,
            draft_follow_up,
            analyze_leads,
            message_recipients,
            set_recipient_search,
            toggle_recipient,
            toggle_all_recipients,
            clear_recipients,
            message_composer_options,
            measure_message,
            preview_message,
            apply_message_suggestion,
            send_message,
            send_test_message,
        ])
        .run(tauri::generate_context!())
        .expect("failed to run tauri app");
}
