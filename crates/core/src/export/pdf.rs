//! PDF export through headless Chrome (`headless_chrome` crate).
//!
//! Every export launches its own browser. The browser and tab live in a [`BrowserSession`] whose
//! `Drop` closes the tab; dropping the `Browser` kills the child process, so teardown happens on
//! every exit path including errors and panics.

use super::{DocumentExporter, PdfPageOptions};
use crate::naming::ArtifactKind;
use crate::{BadgeError, BadgeResult};
use base64::Engine as _;
use headless_chrome::browser::tab::Tab;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
pub struct PdfExporter {
    executable: PathBuf,
    page: PdfPageOptions,
}

impl PdfExporter {
    pub fn new(executable: PathBuf) -> Self {
        Self {
            executable,
            page: PdfPageOptions::a4(),
        }
    }

    /// Locate a Chrome/Chromium executable on this host.
    pub fn detect() -> BadgeResult<Self> {
        let executable =
            headless_chrome::browser::default_executable().map_err(BadgeError::ExporterUnavailable)?;
        tracing::info!("PDF export using browser at {}", executable.display());
        Ok(Self::new(executable))
    }

    fn print_options(&self) -> PrintToPdfOptions {
        PrintToPdfOptions {
            landscape: Some(false),
            print_background: Some(self.page.print_background),
            paper_width: Some(self.page.paper_width),
            paper_height: Some(self.page.paper_height),
            margin_top: Some(self.page.margin),
            margin_bottom: Some(self.page.margin),
            margin_left: Some(self.page.margin),
            margin_right: Some(self.page.margin),
            ..Default::default()
        }
    }
}

struct BrowserSession {
    tab: Arc<Tab>,
    _browser: Browser,
}

impl BrowserSession {
    fn launch(executable: &Path, budget: Duration) -> BadgeResult<Self> {
        let options = LaunchOptions::default_builder()
            .headless(true)
            .path(Some(executable.to_path_buf()))
            .idle_browser_timeout(budget)
            .build()
            .map_err(|e| BadgeError::ExportFailed(format!("invalid launch options: {e}")))?;

        let browser = Browser::new(options)
            .map_err(|e| BadgeError::ExportFailed(format!("failed to launch browser: {e}")))?;
        let tab = browser
            .new_tab()
            .map_err(|e| BadgeError::ExportFailed(format!("failed to open tab: {e}")))?;
        tab.set_default_timeout(budget);

        Ok(Self {
            tab,
            _browser: browser,
        })
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if let Err(e) = self.tab.close(false) {
            tracing::debug!("closing export tab failed: {e}");
        }
        tracing::debug!("headless browser session torn down");
    }
}

impl DocumentExporter for PdfExporter {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Pdf
    }

    fn export(&self, html: &str, budget: Duration) -> BadgeResult<Vec<u8>> {
        let started = Instant::now();
        let session = BrowserSession::launch(&self.executable, budget)?;

        let url = format!(
            "data:text/html;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(html)
        );
        session
            .tab
            .navigate_to(&url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| BadgeError::ExportFailed(format!("failed to load document: {e}")))?;

        if started.elapsed() > budget {
            return Err(BadgeError::ExportTimedOut(budget));
        }

        let pdf = session
            .tab
            .print_to_pdf(Some(self.print_options()))
            .map_err(|e| BadgeError::ExportFailed(format!("failed to print PDF: {e}")))?;

        tracing::debug!(
            "exported {} byte PDF in {:?}",
            pdf.len(),
            started.elapsed()
        );
        Ok(pdf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_options_use_a4_and_uniform_margins() {
        let exporter = PdfExporter::new(PathBuf::from("/usr/bin/chromium"));
        let opts = exporter.print_options();

        assert_eq!(opts.print_background, Some(true));
        assert_eq!(opts.paper_width, Some(PdfPageOptions::a4().paper_width));
        assert_eq!(opts.paper_height, Some(PdfPageOptions::a4().paper_height));
        let margin = PdfPageOptions::a4().margin;
        assert_eq!(opts.margin_top, Some(margin));
        assert_eq!(opts.margin_bottom, Some(margin));
        assert_eq!(opts.margin_left, Some(margin));
        assert_eq!(opts.margin_right, Some(margin));
        assert_eq!(exporter.kind(), ArtifactKind::Pdf);
    }
}
