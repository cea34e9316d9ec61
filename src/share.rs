use crate::models::{Customer, ShareText};

pub const COPIED_MESSAGE: &str = "클립보드에 복사되었습니다.";

/// Name and phone as plain text for the clipboard or the native share sheet.
pub fn share_text(customer: &Customer) -> ShareText {
    ShareText {
        title: format!("{} 고객 정보", customer.name),
        text: format!("고객명: {}\n연락처: {}", customer.name, customer.phone),
    }
}
