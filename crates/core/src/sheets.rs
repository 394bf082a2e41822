//! Spreadsheet source configuration and row mapping.
//!
//! Fetching from Google Sheets is not implemented; this module holds the settings the fetch will
//! need and the mapping from a row of cells to a [`PersonRecord`].

use crate::person::PersonRecord;
use serde::Serialize;

pub const DEFAULT_RANGE: &str = "Sheet1!A:D";
pub const DEFAULT_SERVICE_ACCOUNT_KEY: &str = "./config/credentials.json";
pub const SPREADSHEETS_READONLY_SCOPE: &str =
    "https://www.googleapis.com/auth/spreadsheets.readonly";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub service_account_key: String,
    pub client_id: String,
    pub scopes: Vec<String>,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            service_account_key: DEFAULT_SERVICE_ACCOUNT_KEY.into(),
            client_id: String::new(),
            scopes: vec![SPREADSHEETS_READONLY_SCOPE.into()],
        }
    }
}

/// Zero-based column index of each person field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DataMapping {
    pub name: usize,
    pub email: usize,
    pub phone: usize,
    pub organization: usize,
}

impl Default for DataMapping {
    fn default() -> Self {
        Self {
            name: 0,
            email: 1,
            phone: 2,
            organization: 3,
        }
    }
}

impl DataMapping {
    /// Map one spreadsheet row. Absent name/organization cells become empty strings, absent or
    /// blank contact cells become `None`.
    pub fn person_from_row<S: AsRef<str>>(&self, row: &[S]) -> PersonRecord {
        let cell = |idx: usize| row.get(idx).map(|c| c.as_ref().trim().to_string());
        let optional = |idx: usize| cell(idx).filter(|c| !c.is_empty());

        PersonRecord {
            name: cell(self.name).unwrap_or_default(),
            organization: cell(self.organization).unwrap_or_default(),
            email: optional(self.email),
            phone: optional(self.phone),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetSettings {
    pub has_header: bool,
    pub max_rows: usize,
    pub cache_timeout_ms: u64,
}

impl Default for SheetSettings {
    fn default() -> Self {
        Self {
            has_header: true,
            max_rows: 1000,
            cache_timeout_ms: 300_000,
        }
    }
}

/// Deployment environment whose sheet overrides apply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetsEnvironment {
    #[default]
    Development,
    Production,
}

impl SheetsEnvironment {
    pub fn as_str(&self) -> &'static str {
        match self {
            SheetsEnvironment::Development => "development",
            SheetsEnvironment::Production => "production",
        }
    }

    /// Suffix of the override variables for this environment, as in `GOOGLE_API_KEY_PRODUCTION`.
    pub fn var_suffix(&self) -> &'static str {
        match self {
            SheetsEnvironment::Development => "DEVELOPMENT",
            SheetsEnvironment::Production => "PRODUCTION",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SheetsConfig {
    pub environment: SheetsEnvironment,
    pub api_key: String,
    pub spreadsheet_id: String,
    pub range: String,
    pub credentials: Credentials,
    pub data_mapping: DataMapping,
    pub sheet_settings: SheetSettings,
}

impl SheetsConfig {
    pub fn new(
        api_key: Option<String>,
        spreadsheet_id: Option<String>,
        environment: SheetsEnvironment,
    ) -> Self {
        Self {
            environment,
            api_key: api_key.unwrap_or_default().trim().to_string(),
            spreadsheet_id: spreadsheet_id.unwrap_or_default().trim().to_string(),
            range: DEFAULT_RANGE.into(),
            ..Self::default()
        }
    }

    /// Apply the selected environment's settings on top of the base ones. Blank overrides are
    /// ignored.
    pub fn with_overrides(
        mut self,
        api_key: Option<String>,
        spreadsheet_id: Option<String>,
    ) -> Self {
        let non_blank =
            |v: Option<String>| v.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        if let Some(key) = non_blank(api_key) {
            self.api_key = key;
        }
        if let Some(id) = non_blank(spreadsheet_id) {
            self.spreadsheet_id = id;
        }
        self
    }

    /// Names of required settings that are empty.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.api_key.is_empty() {
            missing.push("apiKey");
        }
        if self.spreadsheet_id.is_empty() {
            missing.push("spreadsheetId");
        }
        missing
    }

    /// Map fetched rows to people, skipping the header row when configured and capping at
    /// `max_rows` data rows. Rows without any non-blank cell are dropped.
    pub fn people_from_rows<S: AsRef<str>>(&self, rows: &[Vec<S>]) -> Vec<PersonRecord> {
        let skip = usize::from(self.sheet_settings.has_header);
        rows.iter()
            .skip(skip)
            .filter(|row| row.iter().any(|c| !c.as_ref().trim().is_empty()))
            .take(self.sheet_settings.max_rows)
            .map(|row| self.data_mapping.person_from_row(row))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_lists_blank_keys() {
        let cfg = SheetsConfig::new(Some("  ".into()), None, SheetsEnvironment::Development);
        assert_eq!(cfg.missing_required(), vec!["apiKey", "spreadsheetId"]);

        let cfg = SheetsConfig::new(
            Some("key".into()),
            Some("sheet".into()),
            SheetsEnvironment::Development,
        );
        assert!(cfg.missing_required().is_empty());
        assert_eq!(cfg.range, DEFAULT_RANGE);
    }

    #[test]
    fn environment_overrides_replace_base_settings() {
        let cfg = SheetsConfig::new(
            Some("base-key".into()),
            Some("base-sheet".into()),
            SheetsEnvironment::Production,
        )
        .with_overrides(Some("prod-key".into()), Some("   ".into()));

        assert_eq!(cfg.environment, SheetsEnvironment::Production);
        assert_eq!(cfg.api_key, "prod-key");
        assert_eq!(cfg.spreadsheet_id, "base-sheet");

        let cfg = SheetsConfig::new(None, None, SheetsEnvironment::Development)
            .with_overrides(None, Some("dev-sheet".into()));
        assert_eq!(cfg.missing_required(), vec!["apiKey"]);
        assert_eq!(SheetsEnvironment::Production.var_suffix(), "PRODUCTION");
    }

    #[test]
    fn row_mapping_uses_column_indices() {
        let mapping = DataMapping::default();
        let person = mapping.person_from_row(&["Kim Tae", "kim@example.com", "", "Geryong"]);
        assert_eq!(person.name, "Kim Tae");
        assert_eq!(person.organization, "Geryong");
        assert_eq!(person.email.as_deref(), Some("kim@example.com"));
        assert_eq!(person.phone, None);
    }

    #[test]
    fn short_rows_leave_fields_empty() {
        let person = DataMapping::default().person_from_row(&["Lee"]);
        assert_eq!(person.name, "Lee");
        assert_eq!(person.organization, "");
    }

    #[test]
    fn header_is_skipped_and_rows_are_capped() {
        let mut cfg = SheetsConfig::default();
        cfg.sheet_settings.max_rows = 2;
        let rows = vec![
            vec!["Name", "Email", "Phone", "Organization"],
            vec!["A", "", "", "Org A"],
            vec!["", " ", "", ""],
            vec!["B", "", "", "Org B"],
            vec!["C", "", "", "Org C"],
        ];

        let people = cfg.people_from_rows(&rows);
        let names: Vec<_> = people.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
