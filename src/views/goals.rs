use crate::models::{Goal, GoalProgressView, GoalType};
use chrono::{Datelike, NaiveDate};

/// Percentage of `target` reached, capped at 100. A zero target reads as 0%.
pub fn goal_progress(actual: u32, target: u32) -> u32 {
    if target == 0 {
        return 0;
    }
    let percent = f64::from(actual) / f64::from(target) * 100.0;
    percent.min(100.0).round() as u32
}

/// Period key for the bucket containing `date`: "2024-05", "2024-Q2" or "2024".
pub fn current_period(kind: GoalType, date: NaiveDate) -> String {
    match kind {
        GoalType::Monthly => format!("{}-{:02}", date.year(), date.month()),
        GoalType::Quarterly => format!("{}-Q{}", date.year(), (date.month() + 2) / 3),
        GoalType::Yearly => date.year().to_string(),
    }
}

pub fn format_period(kind: GoalType, period: &str) -> String {
    let mut parts = period.splitn(2, '-');
    let year = parts.next().unwrap_or_default();
    let rest = parts.next();
    match (kind, rest) {
        (GoalType::Monthly, Some(month)) => match month.parse::<u32>() {
            Ok(month) => format!("{}년 {}월", year, month),
            Err(_) => period.to_string(),
        },
        (GoalType::Quarterly, Some(quarter)) => format!("{}년 {}", year, quarter),
        (GoalType::Yearly, None) => format!("{}년", year),
        _ => period.to_string(),
    }
}

/// Goals ordered by period key, most recent first.
pub fn sorted_goals(goals: &[Goal]) -> Vec<Goal> {
    let mut sorted = goals.to_vec();
    sorted.sort_by(|a, b| b.period.cmp(&a.period));
    sorted
}

pub fn goal_progress_views(goals: &[Goal]) -> Vec<GoalProgressView> {
    sorted_goals(goals)
        .into_iter()
        .map(|goal| GoalProgressView {
            period_label: format_period(goal.kind, &goal.period),
            registration_progress: goal_progress(
                goal.actual_registrations.unwrap_or(0),
                goal.target_registrations,
            ),
            contact_progress: goal_progress(goal.actual_contacts.unwrap_or(0), goal.target_contacts),
            goal,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{current_period, format_period, goal_progress, goal_progress_views};
    use crate::models::{Goal, GoalType};
    use chrono::NaiveDate;

    #[test]
    fn zero_target_is_zero_percent() {
        assert_eq!(goal_progress(5, 0), 0);
        assert_eq!(goal_progress(0, 0), 0);
    }

    #[test]
    fn progress_rounds_and_caps() {
        assert_eq!(goal_progress(1, 3), 33);
        assert_eq!(goal_progress(2, 3), 67);
        assert_eq!(goal_progress(30, 20), 100);
        assert_eq!(goal_progress(20, 20), 100);
    }

    #[test]
    fn period_keys() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 22).unwrap();
        assert_eq!(current_period(GoalType::Monthly, date), "2024-05");
        assert_eq!(current_period(GoalType::Quarterly, date), "2024-Q2");
        assert_eq!(current_period(GoalType::Yearly, date), "2024");
        let december = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        assert_eq!(current_period(GoalType::Quarterly, december), "2024-Q4");
    }

    #[test]
    fn period_labels() {
        assert_eq!(format_period(GoalType::Monthly, "2024-05"), "2024년 5월");
        assert_eq!(format_period(GoalType::Quarterly, "2024-Q2"), "2024년 Q2");
        assert_eq!(format_period(GoalType::Yearly, "2024"), "2024년");
        assert_eq!(format_period(GoalType::Monthly, "oops"), "oops");
    }

    #[test]
    fn progress_views_sort_newest_period_first() {
        let goal = |id: &str, period: &str, actual: Option<u32>| Goal {
            id: id.to_string(),
            kind: GoalType::Monthly,
            period: period.to_string(),
            target_registrations: 0,
            target_contacts: 10,
            actual_registrations: actual,
            actual_contacts: actual,
        };
        let views = goal_progress_views(&[goal("a", "2024-04", None), goal("b", "2024-05", Some(4))]);
        assert_eq!(views[0].goal.id, "b");
        assert_eq!(views[0].registration_progress, 0);
        assert_eq!(views[0].contact_progress, 40);
        assert_eq!(views[1].contact_progress, 0);
    }
}
