//! Document exporters.
//!
//! The output format is chosen once at startup by picking a [`DocumentExporter`]:
//! [`HtmlExporter`] always works, [`PdfExporter`] (feature `pdf`) needs a Chrome or Chromium
//! executable on the host.

use crate::constants::{A4_HEIGHT_IN, A4_WIDTH_IN, CSS_PX_PER_INCH, PDF_MARGIN_PX};
use crate::naming::ArtifactKind;
use crate::BadgeResult;
use std::time::Duration;

#[cfg(feature = "pdf")]
mod pdf;

#[cfg(feature = "pdf")]
pub use pdf::PdfExporter;

/// Turns a rendered badge document into artifact bytes.
pub trait DocumentExporter: Send + Sync {
    fn kind(&self) -> ArtifactKind;

    /// Export `html`, finishing within `budget` or failing.
    fn export(&self, html: &str, budget: Duration) -> BadgeResult<Vec<u8>>;
}

/// Writes the document as-is. The user prints it to PDF by hand.
#[derive(Clone, Copy, Debug, Default)]
pub struct HtmlExporter;

impl DocumentExporter for HtmlExporter {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Html
    }

    fn export(&self, html: &str, _budget: Duration) -> BadgeResult<Vec<u8>> {
        Ok(html.as_bytes().to_vec())
    }
}

/// Page setup handed to the PDF printer. Lengths are in inches.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PdfPageOptions {
    pub paper_width: f64,
    pub paper_height: f64,
    pub margin: f64,
    pub print_background: bool,
}

impl PdfPageOptions {
    /// A4 portrait, backgrounds on, 20px on every side.
    pub fn a4() -> Self {
        Self {
            paper_width: A4_WIDTH_IN,
            paper_height: A4_HEIGHT_IN,
            margin: PDF_MARGIN_PX / CSS_PX_PER_INCH,
            print_background: true,
        }
    }
}

impl Default for PdfPageOptions {
    fn default() -> Self {
        Self::a4()
    }
}

/// Pick the exporter for this process.
///
/// Falls back to [`HtmlExporter`] when PDF output is disabled, not compiled in, or no browser
/// executable can be found.
pub fn select_exporter(pdf_enabled: bool) -> Box<dyn DocumentExporter> {
    if !pdf_enabled {
        tracing::info!("PDF export disabled; badges will be written as HTML");
        return Box::new(HtmlExporter);
    }

    detect_pdf_exporter().unwrap_or_else(|| Box::new(HtmlExporter))
}

#[cfg(feature = "pdf")]
fn detect_pdf_exporter() -> Option<Box<dyn DocumentExporter>> {
    match PdfExporter::detect() {
        Ok(exporter) => Some(Box::new(exporter)),
        Err(e) => {
            tracing::warn!("PDF export unavailable ({e}); badges will be written as HTML");
            None
        }
    }
}

#[cfg(not(feature = "pdf"))]
fn detect_pdf_exporter() -> Option<Box<dyn DocumentExporter>> {
    tracing::warn!("built without the `pdf` feature; badges will be written as HTML");
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_exporter_passes_document_through() {
        let bytes = HtmlExporter
            .export("<p>hi</p>", Duration::from_secs(1))
            .unwrap();
        assert_eq!(bytes, b"<p>hi</p>");
        assert_eq!(HtmlExporter.kind(), ArtifactKind::Html);
    }

    #[test]
    fn a4_page_with_twenty_pixel_margins() {
        let opts = PdfPageOptions::a4();
        assert!((opts.paper_width - 8.2677).abs() < 1e-3);
        assert!((opts.paper_height - 11.6929).abs() < 1e-3);
        assert!((opts.margin * CSS_PX_PER_INCH - 20.0).abs() < 1e-9);
        assert!(opts.print_background);
    }

    #[test]
    fn disabled_pdf_selects_html() {
        assert_eq!(select_exporter(false).kind(), ArtifactKind::Html);
    }
}
