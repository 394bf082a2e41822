//! Badge HTML rendering.
//!
//! Turns a [`PersonRecord`] into a self-contained HTML document for a fixed-size card. The
//! organization line is sized from its character count, since the card cannot measure rendered
//! text width; `text-overflow: ellipsis` covers whatever still overflows.
//!
//! All person-supplied text is HTML-escaped before interpolation. Spreadsheet data is untrusted.

use crate::config::FooterLabels;
use crate::constants::{CARD_HEIGHT_PX, CARD_WIDTH_PX};
use crate::person::PersonRecord;
use crate::{BadgeError, BadgeResult};
use base64::Engine as _;
use std::path::Path;

const BUILTIN_LOGO_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="120" height="40" viewBox="0 0 120 40"><rect width="120" height="40" rx="8" fill="#1f3a93"/><text x="60" y="26" font-family="Arial, sans-serif" font-size="16" font-weight="bold" fill="#ffffff" text-anchor="middle">BADGE</text></svg>"##;

/// Organization font size in pixels, stepped by character count.
///
/// `0..=10` → 32, `11..=15` → 28, `16..=20` → 22, `21..` → 18.
pub fn organization_font_size(organization: &str) -> u32 {
    match organization.chars().count() {
        n if n > 20 => 18,
        n if n > 15 => 22,
        n if n > 10 => 28,
        _ => 32,
    }
}

/// Entity-encode text for use in element content and quoted attribute values.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// The header image, already encoded as a `data:` URI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Logo {
    data_uri: String,
}

impl Logo {
    pub fn builtin() -> Self {
        Self::from_bytes("image/svg+xml", BUILTIN_LOGO_SVG.as_bytes())
    }

    pub fn from_bytes(media_type: &str, bytes: &[u8]) -> Self {
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        Self {
            data_uri: format!("data:{media_type};base64,{encoded}"),
        }
    }

    /// Read an image file. The media type is taken from the extension.
    pub fn from_file(path: &Path) -> BadgeResult<Self> {
        let media_type = match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("svg") => "image/svg+xml",
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            _ => {
                return Err(BadgeError::InvalidConfig(format!(
                    "unsupported logo file type: {}",
                    path.display()
                )))
            }
        };

        let bytes = std::fs::read(path).map_err(BadgeError::LogoRead)?;
        Ok(Self::from_bytes(media_type, &bytes))
    }

    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }
}

impl Default for Logo {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Which document shell wraps the card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BadgeTemplate {
    /// Opened directly in a browser and printed by hand; carries a `<title>`.
    Standalone,
    /// Fed to the PDF exporter, which supplies its own page boundaries.
    Printable,
}

/// A rendered badge document and what was derived while rendering it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedBadge {
    pub html: String,
    pub organization_font_size: u32,
}

#[derive(Clone, Debug, Default)]
pub struct BadgeRenderer {
    footer: FooterLabels,
    logo: Logo,
}

impl BadgeRenderer {
    pub fn new(footer: FooterLabels, logo: Logo) -> Self {
        Self { footer, logo }
    }

    /// Render `person` into a complete HTML document. Pure; no I/O.
    pub fn render(&self, person: &PersonRecord, template: BadgeTemplate) -> RenderedBadge {
        let font_size = organization_font_size(&person.organization);
        let name = escape_html(&person.name);
        let organization = escape_html(&person.organization);

        let title = match template {
            BadgeTemplate::Standalone => format!("\n    <title>Badge - {name}</title>"),
            BadgeTemplate::Printable => String::new(),
        };

        let html = format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">{title}
    <style>
        * {{ box-sizing: border-box; margin: 0; padding: 0; }}
        body {{
            font-family: 'Noto Sans KR', 'Malgun Gothic', Arial, sans-serif;
            display: flex;
            justify-content: center;
            align-items: flex-start;
            background: #ffffff;
        }}
        .badge {{
            width: {width}px;
            height: {height}px;
            border: 2px solid #1f3a93;
            border-radius: 12px;
            overflow: hidden;
            display: flex;
            flex-direction: column;
            align-items: center;
            background: linear-gradient(180deg, #f4f7ff 0%, #ffffff 60%);
            page-break-inside: avoid;
            break-inside: avoid;
        }}
        .badge-header {{
            width: 100%;
            height: 80px;
            display: flex;
            align-items: center;
            justify-content: center;
            background: #1f3a93;
        }}
        .badge-header img {{ max-height: 56px; max-width: 240px; }}
        .badge-body {{
            flex: 1;
            width: 100%;
            padding: 24px 16px;
            display: flex;
            flex-direction: column;
            align-items: center;
            justify-content: center;
            text-align: center;
        }}
        .badge-name {{
            font-size: 40px;
            font-weight: 700;
            color: #111111;
            max-width: 100%;
            white-space: nowrap;
            overflow: hidden;
            text-overflow: ellipsis;
        }}
        .badge-organization {{
            margin-top: 16px;
            font-size: {font_size}px;
            color: #333333;
            max-width: 100%;
            white-space: nowrap;
            overflow: hidden;
            text-overflow: ellipsis;
        }}
        .badge-footer {{
            width: 100%;
            padding: 12px 16px;
            display: flex;
            justify-content: space-between;
        }}
        .badge-tag {{
            padding: 4px 10px;
            border-radius: 999px;
            font-size: 12px;
            font-weight: 700;
            color: #ffffff;
            background: #1f3a93;
        }}
        .badge-tag.secondary {{ background: #e67e22; }}
        @media print {{
            body {{ -webkit-print-color-adjust: exact; print-color-adjust: exact; }}
            .badge {{ margin: 0; }}
        }}
    </style>
</head>
<body>
    <div class="badge">
        <div class="badge-header"><img src="{logo}" alt="logo"></div>
        <div class="badge-body">
            <div class="badge-name">{name}</div>
            <div class="badge-organization">{organization}</div>
        </div>
        <div class="badge-footer">
            <span class="badge-tag">{footer_primary}</span>
            <span class="badge-tag secondary">{footer_secondary}</span>
        </div>
    </div>
</body>
</html>
"#,
            width = CARD_WIDTH_PX,
            height = CARD_HEIGHT_PX,
            logo = self.logo.data_uri(),
            footer_primary = escape_html(self.footer.primary()),
            footer_secondary = escape_html(self.footer.secondary()),
        );

        RenderedBadge {
            html,
            organization_font_size: font_size,
        }
    }
}
