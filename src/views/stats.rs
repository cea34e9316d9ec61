use crate::models::{
    ActivityBucket, ActivityPeriod, ContactRecord, Customer, CustomerStatus, CustomerSummary,
    SecretaryInsights,
};
use chrono::{Datelike, Duration, NaiveDate};

const WEEKDAY_LABELS: [&str; 7] = ["월", "화", "수", "목", "금", "토", "일"];

pub fn customer_summary(customers: &[Customer]) -> CustomerSummary {
    CustomerSummary {
        total: customers.len(),
        active: customers.iter().filter(|c| c.status == CustomerStatus::Active).count(),
        inactive: customers.iter().filter(|c| c.status == CustomerStatus::Inactive).count(),
        contact_managed: customers.iter().filter(|c| c.contact_due_days <= 14).count(),
        new_count: customers.iter().filter(|c| c.is_new).count(),
    }
}

pub fn customer_count_by_group(customers: &[Customer], group_id: &str) -> usize {
    customers
        .iter()
        .filter(|customer| customer.groups.iter().any(|group| group == group_id))
        .count()
}

pub fn secretary_insights(customers: &[Customer], records: &[ContactRecord]) -> SecretaryInsights {
    SecretaryInsights {
        urgent_customers: customers
            .iter()
            .filter(|c| c.status == CustomerStatus::Active && c.contact_due_days <= 0)
            .count(),
        active_leads: customers.iter().filter(|c| c.status == CustomerStatus::Active).count(),
        contact_records: records.len(),
    }
}

/// Registrations and contacts bucketed for the statistics chart.
///
/// * weekly: Monday..Sunday of the week containing `anchor`
/// * monthly: 7-day slices of `anchor`'s month ("1주", "2주", ...)
/// * yearly: January up to `anchor`'s month
pub fn activity_series(
    customers: &[Customer],
    records: &[ContactRecord],
    period: ActivityPeriod,
    anchor: NaiveDate,
) -> Vec<ActivityBucket> {
    let buckets = bucket_labels(period, anchor);
    let mut series = buckets
        .iter()
        .map(|label| ActivityBucket {
            name: label.clone(),
            registrations: 0,
            contacts: 0,
        })
        .collect::<Vec<_>>();

    for customer in customers {
        if let Some(index) = bucket_index(period, anchor, customer.registration_date) {
            series[index].registrations += 1;
        }
    }
    for record in records {
        if let Some(index) = bucket_index(period, anchor, record.date) {
            series[index].contacts += 1;
        }
    }
    series
}

fn bucket_labels(period: ActivityPeriod, anchor: NaiveDate) -> Vec<String> {
    match period {
        ActivityPeriod::Weekly => WEEKDAY_LABELS.iter().map(|label| label.to_string()).collect(),
        ActivityPeriod::Monthly => {
            let weeks = days_in_month(anchor).div_ceil(7);
            (1..=weeks).map(|week| format!("{}주", week)).collect()
        }
        ActivityPeriod::Yearly => (1..=anchor.month()).map(|month| format!("{}월", month)).collect(),
    }
}

fn bucket_index(period: ActivityPeriod, anchor: NaiveDate, date: NaiveDate) -> Option<usize> {
    match period {
        ActivityPeriod::Weekly => {
            let monday = anchor - Duration::days(i64::from(anchor.weekday().num_days_from_monday()));
            let offset = (date - monday).num_days();
            (0..7).contains(&offset).then_some(offset as usize)
        }
        ActivityPeriod::Monthly => (date.year() == anchor.year() && date.month() == anchor.month())
            .then(|| ((date.day() - 1) / 7) as usize),
        ActivityPeriod::Yearly => (date.year() == anchor.year() && date.month() <= anchor.month())
            .then(|| date.month0() as usize),
    }
}

fn days_in_month(date: NaiveDate) -> u32 {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|next| next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

#[cfg(test)]
mod tests {
    use super::{activity_series, customer_count_by_group, customer_summary, secretary_insights};
    use crate::models::{
        ActivityPeriod, ContactRecord, ContactType, Customer, CustomerStatus, NewCustomer,
    };
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn customer(id: &str, registered: NaiveDate, due: i32, status: CustomerStatus) -> Customer {
        let mut new = NewCustomer::basic(format!("고객{}", id), "010", registered);
        new.contact_due_days = due;
        new.status = status;
        new.is_new = id == "1";
        Customer::from_new(id.to_string(), new)
    }

    fn record(id: &str, on: NaiveDate) -> ContactRecord {
        ContactRecord {
            id: id.to_string(),
            customer_id: "1".to_string(),
            date: on,
            kind: ContactType::Call,
            note: String::new(),
        }
    }

    #[test]
    fn summary_counts_each_bucket() {
        let customers = vec![
            customer("1", date(2024, 5, 1), 3, CustomerStatus::Active),
            customer("2", date(2024, 5, 2), -2, CustomerStatus::Active),
            customer("3", date(2024, 5, 3), 99, CustomerStatus::Inactive),
        ];
        let summary = customer_summary(&customers);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.active, 2);
        assert_eq!(summary.inactive, 1);
        assert_eq!(summary.contact_managed, 2);
        assert_eq!(summary.new_count, 1);

        let insights = secretary_insights(&customers, &[record("r", date(2024, 5, 1))]);
        assert_eq!(insights.urgent_customers, 1);
        assert_eq!(insights.active_leads, 2);
        assert_eq!(insights.contact_records, 1);
    }

    #[test]
    fn group_counts_follow_membership() {
        let mut first = customer("1", date(2024, 5, 1), 3, CustomerStatus::Active);
        first.groups = vec!["vip".to_string()];
        let second = customer("2", date(2024, 5, 1), 3, CustomerStatus::Active);
        assert_eq!(customer_count_by_group(&[first, second], "vip"), 1);
    }

    #[test]
    fn weekly_series_buckets_by_weekday() {
        // 2024-05-22 is a Wednesday.
        let anchor = date(2024, 5, 22);
        let customers = vec![
            customer("1", date(2024, 5, 20), 0, CustomerStatus::Active),
            customer("2", date(2024, 5, 26), 0, CustomerStatus::Active),
            customer("3", date(2024, 5, 27), 0, CustomerStatus::Active),
        ];
        let records = vec![record("a", date(2024, 5, 22)), record("b", date(2024, 5, 22))];
        let series = activity_series(&customers, &records, ActivityPeriod::Weekly, anchor);
        assert_eq!(series.len(), 7);
        assert_eq!(series[0].name, "월");
        assert_eq!(series[0].registrations, 1);
        assert_eq!(series[6].registrations, 1);
        assert_eq!(series[2].contacts, 2);
        assert_eq!(series.iter().map(|b| b.registrations).sum::<u32>(), 2);
    }

    #[test]
    fn monthly_and_yearly_series() {
        let anchor = date(2024, 5, 22);
        let customers = vec![
            customer("1", date(2024, 5, 1), 0, CustomerStatus::Active),
            customer("2", date(2024, 5, 31), 0, CustomerStatus::Active),
            customer("3", date(2024, 1, 10), 0, CustomerStatus::Active),
            customer("4", date(2023, 5, 10), 0, CustomerStatus::Active),
        ];
        let monthly = activity_series(&customers, &[], ActivityPeriod::Monthly, anchor);
        assert_eq!(monthly.len(), 5);
        assert_eq!(monthly[0].registrations, 1);
        assert_eq!(monthly[4].name, "5주");
        assert_eq!(monthly[4].registrations, 1);

        let yearly = activity_series(&customers, &[], ActivityPeriod::Yearly, anchor);
        assert_eq!(yearly.len(), 5);
        assert_eq!(yearly[0].registrations, 1);
        assert_eq!(yearly[4].registrations, 2);
    }
}
