use chrono::NaiveDate;

pub const DOTTED_FORMAT: &str = "%Y.%m.%d";
pub const NO_CONTACT_MARKER: &str = "-";

const ACCEPTED_FORMATS: [&str; 3] = [DOTTED_FORMAT, "%Y-%m-%d", "%Y/%m/%d"];

/// Parses the dotted form used on customer cards as well as the ISO form
/// produced by date pickers.
pub fn parse_flexible(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    ACCEPTED_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

pub fn format_dotted(date: NaiveDate) -> String {
    date.format(DOTTED_FORMAT).to_string()
}

pub mod dotted {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_dotted(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_flexible(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", raw)))
    }
}

/// `Option<NaiveDate>` where `None` travels as the "-" marker.
pub mod dotted_or_marker {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.serialize_str(&super::format_dotted(*date)),
            None => serializer.serialize_str(super::NO_CONTACT_MARKER),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == super::NO_CONTACT_MARKER {
            return Ok(None);
        }
        super::parse_flexible(trimmed)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", raw)))
    }
}

/// Partial-update fields: a present key yields `Some`, so callers can tell
/// an explicit clear from an omitted field.
pub mod patch {
    use chrono::NaiveDate;
    use serde::Deserializer;

    pub fn dotted<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        super::dotted::deserialize(deserializer).map(Some)
    }

    pub fn dotted_or_marker<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Option<NaiveDate>>, D::Error> {
        super::dotted_or_marker::deserialize(deserializer).map(Some)
    }
}
