//! Request and response bodies.

use badge_core::PersonRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SheetQuery {
    /// A1-notation range, e.g. `Sheet1!A:D`.
    pub range: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SheetRes {
    pub success: bool,
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<Value>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Printer {
    pub name: String,
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateBadgesReq {
    #[serde(default)]
    #[schema(value_type = Object)]
    pub data: Value,
    pub template: Option<String>,
    pub size: Option<String>,
    pub quantity: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateBadgesRes {
    pub success: bool,
    pub message: String,
    #[schema(value_type = Object)]
    pub badges: Value,
}

/// Wire shape of an attendee.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PersonReq {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub organization: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl From<PersonReq> for PersonRecord {
    fn from(p: PersonReq) -> Self {
        PersonRecord {
            name: p.name,
            organization: p.organization,
            email: p.email,
            phone: p.phone,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GeneratePdfReq {
    pub person: Option<PersonReq>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePdfRes {
    pub success: bool,
    pub message: String,
    pub file_name: String,
    pub file_path: String,
    pub is_html: bool,
    pub organization_font_size: u32,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrintReq {
    #[serde(default)]
    #[schema(value_type = Object)]
    pub badges: Value,
    pub printer_id: Option<String>,
    pub quantity: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageRes {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoogleSheetsView {
    pub environment: String,
    /// Masked; only reveals whether a key is configured.
    pub api_key: String,
    pub spreadsheet_id: String,
    pub range: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BadgeOptionsView {
    pub templates: Vec<String>,
    pub sizes: Vec<String>,
    pub footer_primary: String,
    pub footer_secondary: String,
    pub output_format: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrinterView {
    pub default_printer: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRes {
    pub google_sheets: GoogleSheetsView,
    pub badge: BadgeOptionsView,
    pub printer: PrinterView,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveConfigReq {
    #[serde(default)]
    #[schema(value_type = Object)]
    pub config: Value,
}
