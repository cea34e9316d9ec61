use crate::models::{
    ContactRecord, ContactType, Customer, CustomerGroup, CustomerStatus, EventType, Goal, GoalType,
    Notification, NotificationSeverity, ScheduleEvent, Tier, Todo, UNTRACKED_DUE_DAYS,
};
use crate::state::StateSeed;
use chrono::NaiveDate;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

struct CustomerRow {
    id: &'static str,
    name: &'static str,
    phone: &'static str,
    last_contact: Option<(i32, u32, u32)>,
    registered: (i32, u32, u32),
    status: CustomerStatus,
    due: i32,
    is_new: bool,
    tier: Option<Tier>,
    groups: &'static [&'static str],
}

impl CustomerRow {
    fn build(self) -> Customer {
        let (year, month, day) = self.registered;
        Customer {
            id: self.id.to_string(),
            name: self.name.to_string(),
            phone: self.phone.to_string(),
            email: None,
            address: None,
            memo: None,
            photo: None,
            status: self.status,
            tier: self.tier,
            last_contact: self.last_contact.map(|(y, m, d)| date(y, m, d)),
            registration_date: date(year, month, day),
            contact_due_days: self.due,
            is_new: self.is_new,
            groups: self.groups.iter().map(|id| id.to_string()).collect(),
            attachments: Vec::new(),
        }
    }
}

fn customers() -> Vec<Customer> {
    use CustomerStatus::{Active, Inactive};
    use Tier::{GoldMedal, PlatinumElite, SilverLink};

    [
        CustomerRow { id: "1", name: "홍길동", phone: "010-1234-5678", last_contact: Some((2024, 5, 15)), registered: (2022, 5, 16), status: Active, due: 3, is_new: true, tier: Some(PlatinumElite), groups: &["g1"] },
        CustomerRow { id: "2", name: "삼성동 건물주", phone: "010-2345-6789", last_contact: Some((2024, 5, 31)), registered: (2022, 1, 8), status: Active, due: 0, is_new: true, tier: Some(GoldMedal), groups: &["g1", "g2"] },
        CustomerRow { id: "3", name: "홍길준", phone: "010-3456-7890", last_contact: Some((2024, 4, 14)), registered: (2022, 4, 15), status: Active, due: -1, is_new: false, tier: Some(SilverLink), groups: &[] },
        CustomerRow { id: "4", name: "고길동", phone: "010-4567-8901", last_contact: None, registered: (2022, 9, 15), status: Inactive, due: UNTRACKED_DUE_DAYS, is_new: false, tier: None, groups: &[] },
        CustomerRow { id: "5", name: "고길순", phone: "02-555-0000", last_contact: None, registered: (2020, 9, 2), status: Inactive, due: UNTRACKED_DUE_DAYS, is_new: false, tier: None, groups: &[] },
        CustomerRow { id: "6", name: "김중앙", phone: "010-5678-9012", last_contact: Some((2024, 5, 10)), registered: (2023, 3, 20), status: Active, due: 5, is_new: false, tier: Some(GoldMedal), groups: &["g2"] },
        CustomerRow { id: "7", name: "박서초", phone: "010-6789-0123", last_contact: Some((2024, 5, 18)), registered: (2023, 6, 15), status: Active, due: 1, is_new: false, tier: Some(SilverLink), groups: &[] },
        CustomerRow { id: "8", name: "최강남", phone: "010-7890-1234", last_contact: Some((2024, 5, 20)), registered: (2024, 1, 10), status: Active, due: 0, is_new: true, tier: Some(PlatinumElite), groups: &["g2"] },
        CustomerRow { id: "9", name: "이송파", phone: "010-8901-2345", last_contact: Some((2024, 5, 5)), registered: (2022, 11, 25), status: Active, due: -3, is_new: false, tier: None, groups: &[] },
        CustomerRow { id: "10", name: "정마포", phone: "010-9012-3456", last_contact: Some((2024, 4, 28)), registered: (2021, 8, 30), status: Active, due: -7, is_new: false, tier: Some(GoldMedal), groups: &[] },
    ]
    .into_iter()
    .map(CustomerRow::build)
    .collect()
}

fn todos() -> Vec<Todo> {
    [
        ("1", "매물 홍보 전단지 검토", "09:30", true),
        ("2", "강남역 인근 신축 부지 확인", "14:00", false),
        ("3", "삼성동 주택 임대인 계약 검토", "16:30", false),
        ("4", "TM 리스트 작성하기", "10:00", true),
        ("5", "OO빌딩 인근 Farming 하기", "11:00", false),
        ("6", "전용 120평 오피스 물건 찾기", "15:00", false),
    ]
    .into_iter()
    .map(|(id, title, time, completed)| Todo {
        id: id.to_string(),
        title: title.to_string(),
        time: time.to_string(),
        completed,
    })
    .collect()
}

fn contact_records() -> Vec<ContactRecord> {
    [
        ("1", "1", date(2024, 5, 15), ContactType::Call, "전세 매물 문의. 강남 선호"),
        ("2", "1", date(2024, 5, 10), ContactType::Visit, "삼성동 오피스텔 방문"),
        ("3", "2", date(2024, 5, 31), ContactType::Message, "매물 정보 문자 발송"),
        ("4", "3", date(2024, 4, 14), ContactType::Call, "재계약 관련 상담"),
    ]
    .into_iter()
    .map(|(id, customer_id, date, kind, note)| ContactRecord {
        id: id.to_string(),
        customer_id: customer_id.to_string(),
        date,
        kind,
        note: note.to_string(),
    })
    .collect()
}

fn schedule_events() -> Vec<ScheduleEvent> {
    [
        ("1", date(2024, 5, 22), "OO빌딩 현장 실사", "10:00", Some("서울시 서초구 서초대로"), EventType::Visit),
        ("2", date(2024, 5, 22), "홍길동 고객 미팅", "14:00", Some("본사 2층 회의실"), EventType::Meeting),
        ("3", date(2024, 5, 16), "잠실 엘스 상담", "14:00", None, EventType::Meeting),
        ("4", date(2024, 5, 20), "역삼동 현장 방문", "11:00", None, EventType::Visit),
    ]
    .into_iter()
    .map(|(id, date, title, time, location, kind)| ScheduleEvent {
        id: id.to_string(),
        date,
        title: title.to_string(),
        time: time.to_string(),
        location: location.map(str::to_string),
        kind,
    })
    .collect()
}

fn notifications() -> Vec<Notification> {
    [
        ("1", "후속 관리 알림", "김중앙 고객 연락 기한이 3일 지났습니다.", "10분 전", false, NotificationSeverity::Warning),
        ("2", "신규 고객 등록", "최강남 고객이 새로 등록되었습니다.", "1시간 전", false, NotificationSeverity::Info),
        ("3", "일정 알림", "오후 2시 홍길동 고객 미팅이 있습니다.", "2시간 전", true, NotificationSeverity::Info),
    ]
    .into_iter()
    .map(|(id, title, message, time, read, severity)| Notification {
        id: id.to_string(),
        title: title.to_string(),
        message: message.to_string(),
        time: time.to_string(),
        read,
        severity,
    })
    .collect()
}

fn groups() -> Vec<CustomerGroup> {
    vec![
        CustomerGroup {
            id: "g1".to_string(),
            name: "VIP 고객".to_string(),
            color: "#8B5CF6".to_string(),
            description: Some("우선 관리 대상".to_string()),
        },
        CustomerGroup {
            id: "g2".to_string(),
            name: "강남 투자자".to_string(),
            color: "#3B82F6".to_string(),
            description: None,
        },
    ]
}

fn goals() -> Vec<Goal> {
    vec![
        Goal {
            id: "goal-1".to_string(),
            kind: GoalType::Monthly,
            period: "2024-05".to_string(),
            target_registrations: 10,
            target_contacts: 40,
            actual_registrations: Some(6),
            actual_contacts: Some(28),
        },
        Goal {
            id: "goal-2".to_string(),
            kind: GoalType::Quarterly,
            period: "2024-Q2".to_string(),
            target_registrations: 30,
            target_contacts: 120,
            actual_registrations: Some(14),
            actual_contacts: Some(75),
        },
    ]
}

/// Mock collections a fresh session starts with.
pub fn demo_seed() -> StateSeed {
    StateSeed {
        customers: customers(),
        contact_records: contact_records(),
        schedule_events: schedule_events(),
        groups: groups(),
        goals: goals(),
        todos: todos(),
        notifications: notifications(),
    }
}

#[cfg(test)]
mod tests {
    use super::demo_seed;
    use std::collections::HashSet;

    #[test]
    fn seed_references_are_consistent() {
        let seed = demo_seed();
        assert_eq!(seed.customers.len(), 10);
        assert_eq!(seed.todos.len(), 6);
        let customer_ids = seed.customers.iter().map(|c| c.id.as_str()).collect::<HashSet<_>>();
        assert!(seed
            .contact_records
            .iter()
            .all(|record| customer_ids.contains(record.customer_id.as_str())));
        let group_ids = seed.groups.iter().map(|g| g.id.as_str()).collect::<HashSet<_>>();
        assert!(seed
            .customers
            .iter()
            .flat_map(|c| c.groups.iter())
            .all(|group| group_ids.contains(group.as_str())));
        assert_eq!(seed.notifications.iter().filter(|n| !n.read).count(), 2);
    }
}
