//! Pure computations over state snapshots. Nothing here mutates or caches.

pub mod customers;
pub mod goals;
pub mod schedule;
pub mod stats;

pub use customers::{contact_due_label, filter_customers, paginate, CustomerListView, CustomerMatcher};
pub use goals::{current_period, format_period, goal_progress, goal_progress_views, sorted_goals};
pub use schedule::{enriched_contact_records, event_days_in_month, events_on};
pub use stats::{activity_series, customer_count_by_group, customer_summary, secretary_insights};
