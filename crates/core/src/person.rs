//! Attendee records.

use serde::{Deserialize, Serialize};

/// One attendee, as read from the spreadsheet or posted by a client.
///
/// Missing fields deserialise as empty strings and render as empty text; nothing here enforces
/// that `name` or `organization` are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl PersonRecord {
    pub fn new(name: impl Into<String>, organization: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            organization: organization.into(),
            email: None,
            phone: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_deserialise_as_empty() {
        let person: PersonRecord = serde_json::from_str(r#"{"name":"Kim Tae"}"#).unwrap();
        assert_eq!(person.name, "Kim Tae");
        assert_eq!(person.organization, "");
        assert_eq!(person.email, None);
    }

    #[test]
    fn contact_fields_are_omitted_when_absent() {
        let json = serde_json::to_value(PersonRecord::new("A", "B")).unwrap();
        assert_eq!(json, serde_json::json!({"name": "A", "organization": "B"}));
    }
}
