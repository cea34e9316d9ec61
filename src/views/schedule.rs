use crate::models::{ContactRecord, Customer, EnrichedContactRecord, ScheduleEvent};
use chrono::{Datelike, NaiveDate};

const UNKNOWN_CUSTOMER: &str = "알 수 없음";

/// Events on `date`, earliest time first.
pub fn events_on(events: &[ScheduleEvent], date: NaiveDate) -> Vec<ScheduleEvent> {
    let mut found = events
        .iter()
        .filter(|event| event.date == date)
        .cloned()
        .collect::<Vec<_>>();
    found.sort_by(|a, b| a.time.cmp(&b.time));
    found
}

/// Days of the month that carry at least one event, for calendar dots.
pub fn event_days_in_month(events: &[ScheduleEvent], year: i32, month: u32) -> Vec<u32> {
    let mut days = events
        .iter()
        .filter(|event| event.date.year() == year && event.date.month() == month)
        .map(|event| event.date.day())
        .collect::<Vec<_>>();
    days.sort_unstable();
    days.dedup();
    days
}

pub fn enriched_contact_records(
    records: &[ContactRecord],
    customers: &[Customer],
    limit: usize,
) -> Vec<EnrichedContactRecord> {
    records
        .iter()
        .take(limit)
        .map(|record| EnrichedContactRecord {
            customer_name: customers
                .iter()
                .find(|customer| customer.id == record.customer_id)
                .map(|customer| customer.name.clone())
                .unwrap_or_else(|| UNKNOWN_CUSTOMER.to_string()),
            record: record.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{enriched_contact_records, event_days_in_month, events_on};
    use crate::models::{ContactRecord, ContactType, Customer, EventType, NewCustomer, ScheduleEvent};
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn event(id: &str, date: NaiveDate, time: &str) -> ScheduleEvent {
        ScheduleEvent {
            id: id.to_string(),
            date,
            title: format!("event {}", id),
            time: time.to_string(),
            location: None,
            kind: EventType::Meeting,
        }
    }

    #[test]
    fn events_for_a_day_are_time_ordered() {
        let events = vec![event("1", day(22), "14:00"), event("2", day(22), "10:00"), event("3", day(16), "09:00")];
        let ids = events_on(&events, day(22)).into_iter().map(|e| e.id).collect::<Vec<_>>();
        assert_eq!(ids, vec!["2".to_string(), "1".to_string()]);
    }

    #[test]
    fn month_days_are_unique_and_sorted() {
        let june = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let events = vec![event("1", day(22), "10:00"), event("2", day(16), "10:00"), event("3", day(22), "11:00"), event("4", june, "10:00")];
        assert_eq!(event_days_in_month(&events, 2024, 5), vec![16, 22]);
    }

    #[test]
    fn missing_customer_gets_placeholder_name() {
        let customers = vec![Customer::from_new(
            "1".to_string(),
            NewCustomer::basic("홍길동", "010-1234-5678", day(1)),
        )];
        let records = vec![
            ContactRecord { id: "r1".to_string(), customer_id: "1".to_string(), date: day(15), kind: ContactType::Call, note: String::new() },
            ContactRecord { id: "r2".to_string(), customer_id: "gone".to_string(), date: day(14), kind: ContactType::Visit, note: String::new() },
        ];
        let enriched = enriched_contact_records(&records, &customers, 10);
        assert_eq!(enriched[0].customer_name, "홍길동");
        assert_eq!(enriched[1].customer_name, "알 수 없음");
        assert_eq!(enriched_contact_records(&records, &customers, 1).len(), 1);
    }
}
