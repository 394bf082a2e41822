//! Constants used throughout the badge core crate.
//!
//! Defaults for configuration values and the fixed geometry of the badge card live here so the
//! renderer, the exporters and the startup code agree on them.

/// Default directory for generated artifacts, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Default directory served as static files.
pub const DEFAULT_STATIC_DIR: &str = "public";

/// Default listening port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default per-request budget for the PDF exporter, in seconds.
pub const DEFAULT_EXPORT_TIMEOUT_SECS: u64 = 30;

/// Footer labels used when none are configured.
pub const DEFAULT_FOOTER_PRIMARY: &str = "ATTENDEE";
pub const DEFAULT_FOOTER_SECONDARY: &str = "EVENT PASS";

/// Prefix of every artifact file name.
pub const ARTIFACT_PREFIX: &str = "badge";

/// Card geometry in CSS pixels.
pub const CARD_WIDTH_PX: u32 = 300;
pub const CARD_HEIGHT_PX: u32 = 400;

/// A4 paper size in inches, as expected by the DevTools print API.
pub const A4_WIDTH_IN: f64 = 210.0 / 25.4;
pub const A4_HEIGHT_IN: f64 = 297.0 / 25.4;

/// Uniform PDF page margin in CSS pixels.
pub const PDF_MARGIN_PX: f64 = 20.0;

/// CSS pixels per inch.
pub const CSS_PX_PER_INCH: f64 = 96.0;
