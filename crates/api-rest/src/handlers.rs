//! Route handlers.

use crate::error::{ApiError, NOT_FOUND_MESSAGE};
use crate::models::{
    BadgeOptionsView, ConfigRes, GenerateBadgesReq, GenerateBadgesRes, GeneratePdfReq,
    GeneratePdfRes, GoogleSheetsView, HealthRes, MessageRes, Printer, PrintReq, PrinterView,
    SaveConfigReq, SheetQuery, SheetRes,
};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use badge_core::{ArtifactKind, BadgeError, PersonRecord};
use std::time::Duration;

/// Extra time given to the blocking export task beyond the exporter's own budget, so the core's
/// timeout error normally wins the race.
const EXPORT_GRACE: Duration = Duration::from_secs(2);

const DEFAULT_PRINTER_NAME: &str = "Microsoft Print to PDF";

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
#[axum::debug_handler]
pub async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Badge API is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/api/sheets/{spreadsheetId}",
    params(
        ("spreadsheetId" = String, Path, description = "Spreadsheet identifier"),
        SheetQuery
    ),
    responses(
        (status = 200, description = "Spreadsheet rows (always empty until the integration exists)", body = SheetRes)
    )
)]
/// Fetch attendee rows from a spreadsheet.
///
/// Not implemented: always succeeds with no data.
#[axum::debug_handler]
pub async fn get_sheet(
    Path(spreadsheet_id): Path<String>,
    Query(query): Query<SheetQuery>,
) -> Json<SheetRes> {
    tracing::info!(
        "sheets fetch requested for {spreadsheet_id} (range {:?}); integration not configured",
        query.range
    );
    Json(SheetRes {
        success: true,
        data: Vec::new(),
        message: "Google Sheets integration is not configured".into(),
    })
}

/// The fixed printer list.
pub fn printers() -> Vec<Printer> {
    [
        (DEFAULT_PRINTER_NAME, "pdf", "pdf"),
        ("Default printer", "default", "system"),
        ("Show on screen", "preview", "preview"),
    ]
    .into_iter()
    .map(|(name, id, kind)| Printer {
        name: name.into(),
        id: id.into(),
        kind: kind.into(),
    })
    .collect()
}

#[utoipa::path(
    get,
    path = "/api/printers",
    responses(
        (status = 200, description = "Available printers", body = [Printer])
    )
)]
#[axum::debug_handler]
pub async fn list_printers() -> Json<Vec<Printer>> {
    Json(printers())
}

#[utoipa::path(
    post,
    path = "/api/generate-badges",
    request_body = GenerateBadgesReq,
    responses(
        (status = 200, description = "Badge data echoed back", body = GenerateBadgesRes),
        (status = 400, description = "Malformed body", body = ErrorRes)
    )
)]
/// Accept a batch of badge data. Nothing is rendered or stored; the data is echoed back.
#[axum::debug_handler]
pub async fn generate_badges(
    payload: Result<Json<GenerateBadgesReq>, JsonRejection>,
) -> Result<Json<GenerateBadgesRes>, ApiError> {
    let Json(req) = payload?;
    tracing::info!(
        "generate-badges: template={:?} size={:?} quantity={:?}",
        req.template,
        req.size,
        req.quantity
    );
    Ok(Json(GenerateBadgesRes {
        success: true,
        message: "Badges generated".into(),
        badges: req.data,
    }))
}

#[utoipa::path(
    post,
    path = "/api/generate-pdf",
    request_body = GeneratePdfReq,
    responses(
        (status = 200, description = "Badge artifact written", body = GeneratePdfRes),
        (status = 400, description = "Missing person", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Render one badge and write it to the output directory.
///
/// Produces a PDF when the process has a PDF exporter, otherwise a standalone HTML file that
/// must be printed by hand (`isHtml: true`).
///
/// # Errors
/// Returns `400 Bad Request` if the body is malformed or `person` is missing.
/// Returns `500 Internal Server Error` if export or writing fails or the export budget runs out.
#[axum::debug_handler]
pub async fn generate_pdf(
    State(state): State<AppState>,
    payload: Result<Json<GeneratePdfReq>, JsonRejection>,
) -> Result<Json<GeneratePdfRes>, ApiError> {
    let Json(req) = payload?;
    let person: PersonRecord = req
        .person
        .ok_or_else(|| ApiError::BadRequest("person is required".into()))?
        .into();

    let materializer = state.materializer.clone();
    let budget = materializer.export_timeout();
    let task = tokio::task::spawn_blocking(move || materializer.materialize(&person));

    let doc = match tokio::time::timeout(budget + EXPORT_GRACE, task).await {
        Ok(Ok(result)) => result?,
        Ok(Err(join_error)) => {
            return Err(ApiError::Internal(format!("export task failed: {join_error}")))
        }
        Err(_) => return Err(BadgeError::ExportTimedOut(budget).into()),
    };

    let message = if doc.is_html() {
        "HTML badge generated; open it in a browser and print to PDF"
    } else {
        "PDF badge generated"
    };

    Ok(Json(GeneratePdfRes {
        success: true,
        message: message.into(),
        file_path: doc.file_path.display().to_string(),
        is_html: doc.is_html(),
        organization_font_size: doc.organization_font_size,
        file_name: doc.file_name,
    }))
}

/// `attachment` disposition with an ASCII fallback name and an RFC 5987 UTF-8 name.
fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() || c == ' ') && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let mut encoded = String::with_capacity(file_name.len());
    for byte in file_name.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'-' | b'_' | b'~') {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }

    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}

#[utoipa::path(
    get,
    path = "/api/download-pdf/{fileName}",
    params(
        ("fileName" = String, Path, description = "Artifact file name returned by generate-pdf")
    ),
    responses(
        (status = 200, description = "Artifact bytes"),
        (status = 404, description = "No such artifact", body = ErrorRes)
    )
)]
/// Download a previously generated artifact as an attachment.
#[axum::debug_handler]
pub async fn download_pdf(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Result<Response, ApiError> {
    let path = state
        .materializer
        .artifact_path(&file_name)
        .ok_or_else(|| ApiError::NotFound("File not found".into()))?;

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::NotFound("File not found".into()))
        }
        Err(e) => return Err(ApiError::Internal(format!("failed to read artifact: {e}"))),
    };

    let content_type = ArtifactKind::from_file_name(&file_name)
        .map(|k| k.content_type())
        .unwrap_or("application/octet-stream");

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(&file_name)),
        ],
        bytes,
    )
        .into_response())
}

#[utoipa::path(
    post,
    path = "/api/print",
    request_body = PrintReq,
    responses(
        (status = 200, description = "Print accepted", body = MessageRes),
        (status = 400, description = "Malformed body", body = ErrorRes)
    )
)]
/// Send badges to a printer.
///
/// Not implemented: always succeeds without printing anything.
#[axum::debug_handler]
pub async fn print(
    payload: Result<Json<PrintReq>, JsonRejection>,
) -> Result<Json<MessageRes>, ApiError> {
    let Json(req) = payload?;
    tracing::info!(
        "print requested: printer={:?} quantity={:?}; printing is not implemented",
        req.printer_id,
        req.quantity
    );
    Ok(Json(MessageRes {
        success: true,
        message: "Print completed".into(),
    }))
}

fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        String::new()
    } else {
        "********".into()
    }
}

#[utoipa::path(
    get,
    path = "/api/config",
    responses(
        (status = 200, description = "Current configuration", body = ConfigRes)
    )
)]
#[axum::debug_handler]
pub async fn get_config(State(state): State<AppState>) -> Json<ConfigRes> {
    let sheets = state.config.sheets();
    let footer = state.config.footer();

    Json(ConfigRes {
        google_sheets: GoogleSheetsView {
            environment: sheets.environment.as_str().into(),
            api_key: mask_secret(&sheets.api_key),
            spreadsheet_id: sheets.spreadsheet_id.clone(),
            range: sheets.range.clone(),
        },
        badge: BadgeOptionsView {
            templates: vec!["default".into(), "modern".into(), "classic".into()],
            sizes: vec!["a4".into(), "business".into(), "custom".into()],
            footer_primary: footer.primary().into(),
            footer_secondary: footer.secondary().into(),
            output_format: state.materializer.kind().extension().into(),
        },
        printer: PrinterView {
            default_printer: DEFAULT_PRINTER_NAME.into(),
        },
    })
}

#[utoipa::path(
    post,
    path = "/api/config",
    request_body = SaveConfigReq,
    responses(
        (status = 200, description = "Configuration accepted", body = MessageRes),
        (status = 400, description = "Malformed body", body = ErrorRes)
    )
)]
/// Accept a configuration update. Nothing is persisted.
#[axum::debug_handler]
pub async fn save_config(
    payload: Result<Json<SaveConfigReq>, JsonRejection>,
) -> Result<Json<MessageRes>, ApiError> {
    let Json(req) = payload?;
    tracing::info!(
        "config save requested ({} top-level keys); persistence is not implemented",
        req.config.as_object().map_or(0, |o| o.len())
    );
    Ok(Json(MessageRes {
        success: true,
        message: "Configuration saved".into(),
    }))
}

/// JSON 404 for anything no route or static file matched.
pub async fn not_found() -> ApiError {
    ApiError::NotFound(NOT_FOUND_MESSAGE.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_disposition_ascii_name() {
        assert_eq!(
            content_disposition("badge_Kim_Tae_1.pdf"),
            "attachment; filename=\"badge_Kim_Tae_1.pdf\"; filename*=UTF-8''badge_Kim_Tae_1.pdf"
        );
    }

    #[test]
    fn content_disposition_non_ascii_name() {
        let value = content_disposition("badge_홍_1.pdf");
        assert!(value.starts_with("attachment; filename=\"badge___1.pdf\";"));
        assert!(value.ends_with("filename*=UTF-8''badge_%ED%99%8D_1.pdf"));
    }

    #[test]
    fn secrets_are_masked() {
        assert_eq!(mask_secret(""), "");
        assert_eq!(mask_secret("AIza-secret"), "********");
    }

    #[test]
    fn printer_list_is_static() {
        let ids: Vec<_> = printers().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["pdf", "default", "preview"]);
    }
}
