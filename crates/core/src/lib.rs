//! # Badge Core
//!
//! Core logic for the badge generation system.
//!
//! This crate contains the pure rendering and file operations:
//! - Badge HTML rendering with length-driven organization font sizing
//! - Materialisation of badges as HTML or PDF artifacts under the output directory
//! - Exporter selection (`HtmlExporter` / `PdfExporter`)
//! - Startup configuration, including the spreadsheet source settings
//!
//! **No API concerns**: HTTP routing and response envelopes belong in `api-rest`.

pub mod config;
pub mod constants;
mod error;
pub mod export;
pub mod materialize;
pub mod naming;
pub mod person;
pub mod render;
pub mod sheets;

pub use config::{BadgeConfig, FooterLabels};
pub use error::{BadgeError, BadgeResult};
pub use export::{select_exporter, DocumentExporter, HtmlExporter};
#[cfg(feature = "pdf")]
pub use export::PdfExporter;
pub use materialize::{DocumentMaterializer, RenderedDocument};
pub use naming::ArtifactKind;
pub use person::PersonRecord;
pub use render::{BadgeRenderer, BadgeTemplate, Logo};
pub use sheets::{SheetsConfig, SheetsEnvironment};
