use crate::errors::{AppError, AppResult};
use crate::models::{CsvImportPreview, CustomerStatus, NewCustomer};
use chrono::NaiveDate;

const BOM: char = '\u{feff}';
const TEMPLATE_HEADER: &str = "고객명,연락처,이메일,주소,메모";
const TEMPLATE_EXAMPLE_ROW: &str = "홍길동,010-1234-5678,hong@email.com,서울시 강남구,VIP 고객";

const NAME_SYNONYMS: &[&str] = &["이름", "name", "고객명"];
const PHONE_SYNONYMS: &[&str] = &["연락처", "phone", "전화"];
const EMAIL_SYNONYMS: &[&str] = &["이메일", "email"];
const ADDRESS_SYNONYMS: &[&str] = &["주소", "address"];
const MEMO_SYNONYMS: &[&str] = &["메모", "memo", "비고"];

pub const IMPORTED_CONTACT_CYCLE_DAYS: i32 = 14;

/// One customer row pulled out of the file, before it is stamped with dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedCustomer {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub memo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvImport {
    pub rows: Vec<StagedCustomer>,
    pub dropped_rows: usize,
}

impl CsvImport {
    /// New customers registered and last contacted `today`.
    pub fn into_customers(self, today: NaiveDate) -> Vec<NewCustomer> {
        self.rows
            .into_iter()
            .map(|row| NewCustomer {
                name: row.name,
                phone: row.phone,
                email: row.email,
                address: row.address,
                memo: row.memo,
                photo: None,
                status: CustomerStatus::Active,
                tier: None,
                last_contact: Some(today),
                registration_date: today,
                contact_due_days: IMPORTED_CONTACT_CYCLE_DAYS,
                is_new: true,
                groups: Vec::new(),
            })
            .collect()
    }

    pub fn preview(self, today: NaiveDate) -> CsvImportPreview {
        let dropped_rows = self.dropped_rows;
        CsvImportPreview {
            customers: self.into_customers(today),
            dropped_rows,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    name: usize,
    phone: usize,
    email: Option<usize>,
    address: Option<usize>,
    memo: Option<usize>,
}

/// Parses an uploaded customer list. The first non-blank line is the header;
/// rows without a name or phone are skipped.
pub fn parse_customer_csv(text: &str) -> AppResult<CsvImport> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let lines = split_lines(text)
        .into_iter()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>();
    if lines.len() < 2 {
        return Err(AppError::DataAbsence("파일에 데이터가 없습니다.".to_string()));
    }

    let header = lines[0]
        .split(',')
        .map(|cell| cell.trim().trim_matches('"').trim().to_lowercase())
        .collect::<Vec<_>>();
    let columns = resolve_columns(&header)?;

    let mut rows = Vec::new();
    let mut dropped_rows = 0usize;
    for line in &lines[1..] {
        let cells = parse_csv_line(line);
        let cell = |index: usize| {
            cells
                .get(index)
                .map(|value| value.trim().to_string())
                .unwrap_or_default()
        };
        let optional = |index: Option<usize>| {
            index
                .map(cell)
                .filter(|value| !value.is_empty())
        };

        let name = cell(columns.name);
        let phone = cell(columns.phone);
        if name.is_empty() || phone.is_empty() {
            dropped_rows += 1;
            continue;
        }
        rows.push(StagedCustomer {
            name,
            phone,
            email: optional(columns.email),
            address: optional(columns.address),
            memo: optional(columns.memo),
        });
    }

    tracing::info!(staged = rows.len(), dropped = dropped_rows, "parsed customer csv");
    Ok(CsvImport { rows, dropped_rows })
}

fn resolve_columns(header: &[String]) -> AppResult<ColumnMap> {
    let find = |synonyms: &[&str]| {
        header
            .iter()
            .position(|cell| synonyms.iter().any(|synonym| cell.contains(synonym)))
    };
    match (find(NAME_SYNONYMS), find(PHONE_SYNONYMS)) {
        (Some(name), Some(phone)) => Ok(ColumnMap {
            name,
            phone,
            email: find(EMAIL_SYNONYMS),
            address: find(ADDRESS_SYNONYMS),
            memo: find(MEMO_SYNONYMS),
        }),
        _ => Err(AppError::DataAbsence(
            "필수 컬럼(이름, 연락처)을 찾을 수 없습니다.".to_string(),
        )),
    }
}

fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;
    loop {
        let Some(index) = rest.find(['\n', '\r']) else {
            break;
        };
        lines.push(&rest[..index]);
        let advance = if rest[index..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[index + advance..];
    }
    lines.push(rest);
    lines
}

/// Splits one line on commas, treating double quotes as field delimiters
/// that may enclose commas.
pub fn parse_csv_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => cells.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    cells.push(current);
    cells
}

/// Template offered for download: BOM, header row and one example row.
pub fn customer_csv_template() -> Vec<u8> {
    let mut content = String::new();
    content.push(BOM);
    content.push_str(TEMPLATE_HEADER);
    content.push('\n');
    content.push_str(TEMPLATE_EXAMPLE_ROW);
    content.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::{customer_csv_template, parse_csv_line, parse_customer_csv, split_lines};
    use crate::errors::AppError;
    use chrono::NaiveDate;

    #[test]
    fn stages_row_with_name_and_phone() {
        let import = parse_customer_csv("고객명,연락처,이메일\n홍길동,010-1234-5678,hong@email.com\n")
            .expect("parse");
        assert_eq!(import.rows.len(), 1);
        assert_eq!(import.rows[0].name, "홍길동");
        assert_eq!(import.rows[0].email.as_deref(), Some("hong@email.com"));
        assert_eq!(import.rows[0].address, None);
    }

    #[test]
    fn drops_rows_missing_phone() {
        let import = parse_customer_csv("고객명,연락처,이메일\n홍길동,010-1234-5678,\n고길동,,go@email.com\n")
            .expect("parse");
        assert_eq!(import.rows.len(), 1);
        assert_eq!(import.dropped_rows, 1);
        assert!(import.rows.iter().all(|row| row.name != "고길동"));
    }

    #[test]
    fn rejects_header_without_required_columns() {
        let error = parse_customer_csv("주소,메모\n서울,VIP\n").expect_err("no required columns");
        assert!(matches!(error, AppError::DataAbsence(_)));
        let error = parse_customer_csv("name,email\nKim,kim@x.com\n").expect_err("no phone column");
        assert!(matches!(error, AppError::DataAbsence(_)));
    }

    #[test]
    fn rejects_header_only_file() {
        let error = parse_customer_csv("고객명,연락처\n\n  \n").expect_err("no rows");
        assert_eq!(error.user_message(), "파일에 데이터가 없습니다.");
    }

    #[test]
    fn header_matching_is_case_insensitive_and_by_substring() {
        let import = parse_customer_csv("Customer Name,Mobile Phone,E-Mail Address,비고\r\nKim,010-9,k@x.com,memo\r\n")
            .expect("parse");
        assert_eq!(import.rows[0].name, "Kim");
        assert_eq!(import.rows[0].phone, "010-9");
        assert_eq!(import.rows[0].memo.as_deref(), Some("memo"));
    }

    #[test]
    fn quoted_fields_may_contain_commas() {
        assert_eq!(
            parse_csv_line("홍길동,\"서울시 강남구, 삼성동\",\"a\""),
            vec!["홍길동".to_string(), "서울시 강남구, 삼성동".to_string(), "a".to_string()]
        );
        let import = parse_customer_csv("이름,주소,전화\n홍길동,\"서울, 강남\",010-1\n").expect("parse");
        assert_eq!(import.rows[0].address.as_deref(), Some("서울, 강남"));
        assert_eq!(import.rows[0].phone, "010-1");
    }

    #[test]
    fn splits_mixed_newlines() {
        assert_eq!(split_lines("a\nb\r\nc\rd"), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn imported_customers_are_stamped_with_today() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 22).unwrap();
        let customers = parse_customer_csv("\u{feff}고객명,연락처\n홍길동,010-1234-5678")
            .expect("parse")
            .into_customers(today);
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].registration_date, today);
        assert_eq!(customers[0].last_contact, Some(today));
        assert_eq!(customers[0].contact_due_days, 14);
        assert!(customers[0].is_new);
    }

    #[test]
    fn template_round_trips_through_parser() {
        let bytes = customer_csv_template();
        assert_eq!(&bytes[..3], &[0xEF, 0xBB, 0xBF]);
        let text = String::from_utf8(bytes).expect("utf8");
        let import = parse_customer_csv(&text).expect("parse template");
        assert_eq!(import.rows.len(), 1);
        assert_eq!(import.rows[0].memo.as_deref(), Some("VIP 고객"));
    }
}
