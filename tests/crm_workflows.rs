use chrono::NaiveDate;
use realty_crm_lib::errors::AppError;
use realty_crm_lib::messaging::{MessageChannel, MessageTemplate, OutboundMessage};
use realty_crm_lib::models::{
    AppSettings, ContactType, CustomerFilter, GeneratorSettings, GoalType, NewContactRecord,
    NewCustomer, NewCustomerGroup, NewGoal, NewTodo, ToastSeverity,
};
use realty_crm_lib::state::{CrmState, StateRules};
use realty_crm_lib::CrmCore;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 22).unwrap()
}

fn settings() -> AppSettings {
    AppSettings {
        generator: GeneratorSettings {
            enabled: false,
            ..GeneratorSettings::default()
        },
        ..AppSettings::default()
    }
}

fn seeded_core() -> CrmCore {
    CrmCore::new(settings()).with_today(today())
}

fn empty_core() -> CrmCore {
    let settings = AppSettings {
        seed_demo_data: false,
        ..settings()
    };
    let state = CrmState::new(StateRules::from(&settings));
    CrmCore::with_state(settings, state).with_today(today())
}

fn todo(title: &str) -> NewTodo {
    NewTodo {
        title: title.to_string(),
        time: "10:00".to_string(),
        completed: false,
    }
}

#[tokio::test]
async fn new_customer_is_listed_first() {
    let core = seeded_core();
    let before = core.customer_list().await.page.total_items;
    let created = core
        .add_customer(NewCustomer::basic("윤서연", "010-1111-2222", today()))
        .await
        .expect("add customer");

    let listing = core.customer_list().await;
    assert_eq!(listing.page.total_items, before + 1);
    assert_eq!(listing.page.items[0].id, created.id);
}

#[tokio::test]
async fn contact_record_resets_follow_up_cycle() {
    let core = seeded_core();
    let date = NaiveDate::from_ymd_opt(2024, 5, 21).unwrap();
    core.add_contact_record(NewContactRecord {
        customer_id: "10".to_string(),
        date,
        kind: ContactType::Visit,
        note: "현장 안내".to_string(),
    })
    .await
    .expect("record contact");

    let customer = core.get_customer("10").await.expect("customer");
    assert_eq!(customer.last_contact, Some(date));
    assert_eq!(customer.contact_due_days, 14);
    assert_eq!(core.contact_records_for("10").await.len(), 1);

    let missing = core
        .add_contact_record(NewContactRecord {
            customer_id: "missing".to_string(),
            date,
            kind: ContactType::Call,
            note: String::new(),
        })
        .await
        .expect("record for a missing customer");
    assert_eq!(missing.customer_id, "missing");
    assert_eq!(core.contact_records_for("missing").await.len(), 1);
    let toast = core.visible_toasts().pop().expect("toast");
    assert_eq!(toast.severity, ToastSeverity::Success);
    assert_eq!(toast.message, "연락 기록이 저장되었습니다.");
}

#[tokio::test]
async fn deleting_group_only_drops_membership() {
    let core = seeded_core();
    let before = core.get_customer("2").await.expect("customer");
    assert!(before.groups.iter().any(|group| group == "g1"));

    core.delete_group("g1").await.expect("delete group");

    let after = core.get_customer("2").await.expect("customer");
    assert_eq!(after.groups, vec!["g2".to_string()]);
    assert_eq!(after.name, before.name);
    assert_eq!(after.contact_due_days, before.contact_due_days);
    assert_eq!(after.last_contact, before.last_contact);
    assert!(core.groups().await.iter().all(|entry| entry.group.id != "g1"));
}

#[tokio::test]
async fn duplicate_goal_period_is_rejected_with_warning() {
    let core = seeded_core();
    let goals_before = core.goal_progress().await.len();
    let result = core
        .add_goal(NewGoal {
            kind: GoalType::Monthly,
            period: "2024-05".to_string(),
            target_registrations: 5,
            target_contacts: 20,
            actual_registrations: None,
            actual_contacts: None,
        })
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(core.goal_progress().await.len(), goals_before);
    let warning = core.visible_toasts().pop().expect("toast");
    assert_eq!(warning.severity, ToastSeverity::Warning);
    assert_eq!(warning.message, "해당 기간의 목표가 이미 존재합니다.");
}

#[tokio::test]
async fn zero_target_goal_shows_zero_progress() {
    let core = empty_core();
    core.add_goal(NewGoal {
        kind: GoalType::Quarterly,
        period: "2024-Q3".to_string(),
        target_registrations: 0,
        target_contacts: 10,
        actual_registrations: Some(4),
        actual_contacts: Some(25),
    })
    .await
    .expect("add goal");

    let views = core.goal_progress().await;
    assert_eq!(views[0].registration_progress, 0);
    assert_eq!(views[0].contact_progress, 100);
    assert_eq!(views[0].period_label, "2024년 Q3");
}

#[tokio::test]
async fn undo_restores_only_the_latest_deletion() {
    let core = empty_core();
    let first = core.add_todo(todo("첫 번째")).await.expect("add");
    let second = core.add_todo(todo("두 번째")).await.expect("add");

    core.delete_todo(&first.id).await.expect("delete first");
    core.delete_todo(&second.id).await.expect("delete second");
    let restored = core.restore_last_deleted_todo().await.expect("undo");

    assert_eq!(restored, second);
    let todos = core.todos().await;
    assert_eq!(todos, vec![second]);
    assert!(core.restore_last_deleted_todo().await.is_err());
}

#[tokio::test]
async fn csv_import_stages_valid_rows_only() {
    let core = empty_core();
    let imported = core
        .import_customers_csv("고객명,연락처,이메일\n홍길동,010-1234-5678,hong@email.com\n고길동,,go@email.com\n")
        .await
        .expect("import");

    assert_eq!(imported.len(), 1);
    assert_eq!(imported[0].name, "홍길동");
    assert_eq!(imported[0].registration_date, today());
    assert_eq!(core.customer_list().await.page.total_items, 1);
    let toast = core.visible_toasts().pop().expect("toast");
    assert_eq!(toast.message, "1명의 고객이 등록되었습니다.");
}

#[tokio::test]
async fn csv_without_required_columns_is_rejected_with_error_toast() {
    let core = empty_core();
    let result = core.import_customers_csv("주소,메모\n서울,VIP\n").await;

    assert!(matches!(result, Err(AppError::DataAbsence(_))));
    assert_eq!(core.customer_list().await.page.total_items, 0);
    let toast = core.visible_toasts().pop().expect("toast");
    assert_eq!(toast.severity, ToastSeverity::Error);
    assert_eq!(toast.message, "필수 컬럼(이름, 연락처)을 찾을 수 없습니다.");
}

#[tokio::test]
async fn bulk_postpone_touches_only_selected_customers() {
    let core = seeded_core();
    core.select_customers(vec!["3".to_string(), "9".to_string(), "10".to_string()])
        .await;
    let postponed = core.bulk_postpone_selected().await.expect("postpone");
    assert_eq!(postponed, 3);

    for id in ["3", "9", "10"] {
        assert_eq!(core.get_customer(id).await.expect("customer").contact_due_days, 7);
    }
    assert_eq!(core.get_customer("1").await.expect("customer").contact_due_days, 3);
    assert!(core.customer_list().await.selected_ids.is_empty());
}

#[tokio::test]
async fn narrowing_filter_resets_to_first_page() {
    let core = empty_core();
    for index in 0..6 {
        core.add_customer(NewCustomer::basic(
            format!("고객{}", index),
            format!("010-0000-000{}", index),
            today(),
        ))
        .await
        .expect("add");
    }

    let listing = core.set_customer_page(2).await;
    assert_eq!(listing.page.total_pages, 2);
    assert_eq!(listing.page.page, 2);
    assert_eq!(listing.page.items.len(), 1);

    let filtered = core
        .set_customer_filter(CustomerFilter {
            name: "고객3".to_string(),
            ..CustomerFilter::default()
        })
        .await;
    assert_eq!(filtered.page.page, 1);
    assert_eq!(filtered.page.total_pages, 1);
    assert_eq!(filtered.page.items.len(), 1);
}

#[tokio::test]
async fn filter_change_clears_selection_but_paging_keeps_it() {
    let core = seeded_core();
    let listing = core.toggle_select_page().await;
    assert!(listing.all_on_page_selected);
    assert_eq!(listing.selected_ids.len(), 5);

    let next_page = core.set_customer_page(2).await;
    assert_eq!(next_page.selected_ids.len(), 5);
    assert!(!next_page.all_on_page_selected);

    let filtered = core
        .set_customer_filter(CustomerFilter {
            phone: "010".to_string(),
            ..CustomerFilter::default()
        })
        .await;
    assert!(filtered.selected_ids.is_empty());
}

#[tokio::test]
async fn analyze_leads_degrades_to_canned_ranking() {
    let core = seeded_core();
    let priorities = core.analyze_leads().await.expect("ranking");
    assert_eq!(priorities.priorities.len(), 3);
    assert_eq!(priorities.priorities[0].name, "정마포");

    let draft = core.draft_follow_up("1", "잠실 전세").await.expect("draft");
    assert!(draft.contains("홍길동"));
}

#[tokio::test]
async fn group_counts_follow_membership() {
    let core = seeded_core();
    let group = core
        .add_group(NewCustomerGroup {
            name: "신규 문의".to_string(),
            color: "#10B981".to_string(),
            description: None,
        })
        .await
        .expect("add group");
    core.set_customer_groups("7", vec![group.id.clone(), "unknown".to_string()])
        .await
        .expect("assign");

    let groups = core.groups().await;
    let entry = groups
        .iter()
        .find(|entry| entry.group.id == group.id)
        .expect("group listed");
    assert_eq!(entry.customer_count, 1);
    assert_eq!(core.get_customer("7").await.expect("customer").groups, vec![group.id]);
}

#[tokio::test]
async fn bulk_message_reaches_every_selected_active_customer() {
    let core = seeded_core();
    let message = OutboundMessage {
        channel: MessageChannel::Sms,
        body: MessageTemplate::FollowUp.body().to_string(),
    };

    let empty = core.send_message(message.clone()).await;
    assert!(matches!(empty, Err(AppError::Validation(_))));
    let toast = core.visible_toasts().pop().expect("toast");
    assert_eq!(toast.severity, ToastSeverity::Warning);
    assert_eq!(toast.message, "발송 대상을 선택해주세요.");

    let listing = core.toggle_all_recipients().await;
    assert_eq!(listing.recipients.len(), 8);
    assert!(listing.all_selected);
    assert!(listing.recipients.iter().all(|recipient| recipient.id != "4" && recipient.id != "5"));

    let receipt = core.send_message(message).await.expect("send");
    assert_eq!(receipt.messages.len(), 8);
    assert!(receipt.messages.iter().all(|rendered| !rendered.body.contains("{고객명}")));
    let toast = core.visible_toasts().pop().expect("toast");
    assert_eq!(toast.severity, ToastSeverity::Success);
    assert_eq!(toast.message, "8명에게 SMS이 발송되었습니다.");
    assert!(core.message_recipients().await.selected_ids.is_empty());
}

#[tokio::test]
async fn recipient_search_narrows_select_all() {
    let core = seeded_core();
    let listing = core.set_recipient_search("홍길").await;
    assert_eq!(listing.recipients.len(), 2);

    let listing = core.toggle_all_recipients().await;
    assert_eq!(listing.selected_ids.len(), 2);
    let listing = core.toggle_all_recipients().await;
    assert!(listing.selected_ids.is_empty());
}
