use crate::dates::parse_flexible;
use crate::models::{Customer, CustomerFilter, Page};
use chrono::NaiveDate;

/// A `CustomerFilter` with its date bounds parsed once.
#[derive(Debug, Clone)]
pub struct CustomerMatcher {
    name: String,
    phone: String,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
}

impl CustomerMatcher {
    pub fn new(filter: &CustomerFilter) -> Self {
        let bound = |raw: &Option<String>| {
            let raw = raw.as_deref()?;
            let parsed = parse_flexible(raw);
            if parsed.is_none() && !raw.trim().is_empty() {
                tracing::debug!(bound = raw, "ignoring unparseable registration date bound");
            }
            parsed
        };
        Self {
            name: filter.name.trim().to_lowercase(),
            phone: filter.phone.trim().to_string(),
            date_from: bound(&filter.date_from),
            date_to: bound(&filter.date_to),
        }
    }

    pub fn matches(&self, customer: &Customer) -> bool {
        if !customer.name.to_lowercase().contains(&self.name) {
            return false;
        }
        if !customer.phone.contains(&self.phone) {
            return false;
        }
        if let Some(from) = self.date_from {
            if customer.registration_date < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if customer.registration_date > to {
                return false;
            }
        }
        true
    }
}

pub fn filter_customers(customers: &[Customer], filter: &CustomerFilter) -> Vec<Customer> {
    let matcher = CustomerMatcher::new(filter);
    customers
        .iter()
        .filter(|customer| matcher.matches(customer))
        .cloned()
        .collect()
}

pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    total_items.div_ceil(page_size.max(1))
}

/// Slices one page out of `items`; `page` is 1-based and clamped into range.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_pages = total_pages(items.len(), page_size);
    let page = page.clamp(1, total_pages.max(1));
    let start = (page - 1) * page_size;
    Page {
        items: items.iter().skip(start).take(page_size).cloned().collect(),
        page,
        total_pages,
        total_items: items.len(),
    }
}

/// Filter and page index for the customer table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerListView {
    filter: CustomerFilter,
    page: usize,
    page_size: usize,
}

impl CustomerListView {
    pub fn new(page_size: usize) -> Self {
        Self {
            filter: CustomerFilter::default(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn filter(&self) -> &CustomerFilter {
        &self.filter
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Returns true when the filter actually changed; the page index then
    /// resets to 1.
    pub fn set_filter(&mut self, filter: CustomerFilter) -> bool {
        if self.filter == filter {
            return false;
        }
        self.filter = filter;
        self.page = 1;
        true
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    /// Renders the current page and stores the clamped index back.
    pub fn render(&mut self, customers: &[Customer]) -> Page<Customer> {
        let filtered = filter_customers(customers, &self.filter);
        let page = paginate(&filtered, self.page, self.page_size);
        self.page = page.page;
        page
    }
}

/// Short label for the "contact due" column.
pub fn contact_due_label(days: i32) -> String {
    match days {
        0 => "Today".to_string(),
        days if days > 90 => "-".to_string(),
        days if days > 0 => format!("+{}일", days),
        days => format!("{}일", days),
    }
}
