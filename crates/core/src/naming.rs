//! Artifact naming.
//!
//! Artifacts are named `badge_<sanitized-name>_<timestamp>.<ext>`, where the timestamp is a
//! wall-clock millisecond value taken when the artifact is created.

use crate::constants::ARTIFACT_PREFIX;
use crate::render::BadgeTemplate;
use serde::Serialize;
use std::sync::atomic::{AtomicI64, Ordering};

/// The file format of an artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Html,
    Pdf,
}

impl ArtifactKind {
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactKind::Html => "html",
            ArtifactKind::Pdf => "pdf",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ArtifactKind::Html => "text/html; charset=utf-8",
            ArtifactKind::Pdf => "application/pdf",
        }
    }

    /// The document shell the renderer should use for this format.
    pub fn template(&self) -> BadgeTemplate {
        match self {
            ArtifactKind::Html => BadgeTemplate::Standalone,
            ArtifactKind::Pdf => BadgeTemplate::Printable,
        }
    }

    /// Infer the kind from a file name's extension.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, ext) = file_name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "html" => Some(ArtifactKind::Html),
            "pdf" => Some(ArtifactKind::Pdf),
            _ => None,
        }
    }
}

fn is_separator(c: char) -> bool {
    c.is_whitespace()
        || c.is_control()
        || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
}

/// Replace every maximal run of whitespace with a single underscore.
///
/// Path separators and characters that are invalid in file names are folded into the same runs,
/// so a name can never escape the output directory.
pub fn sanitize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_run = false;
    for c in name.chars() {
        if is_separator(c) {
            if !in_run {
                out.push('_');
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

/// Longest file name most filesystems accept, in bytes.
pub const MAX_FILE_NAME_BYTES: usize = 255;

fn truncate_at_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Build the artifact file name. The sanitized name is shortened on a character boundary so the
/// whole name fits in [`MAX_FILE_NAME_BYTES`].
pub fn artifact_file_name(name: &str, timestamp_ms: i64, kind: ArtifactKind) -> String {
    let suffix = format!("_{timestamp_ms}.{}", kind.extension());
    let budget = MAX_FILE_NAME_BYTES - ARTIFACT_PREFIX.len() - 1 - suffix.len();
    let sanitized = sanitize_name(name);
    format!(
        "{ARTIFACT_PREFIX}_{}{suffix}",
        truncate_at_char_boundary(&sanitized, budget)
    )
}

/// Whether `file_name` is a plain file name that stays inside the output directory.
pub fn is_safe_file_name(file_name: &str) -> bool {
    !file_name.is_empty()
        && file_name != "."
        && file_name != ".."
        && !file_name.contains(['/', '\\'])
        && !file_name.chars().any(|c| c.is_control())
}

/// Whether `file_name` can name a finished artifact: a safe, visible file with an artifact
/// extension. In-progress `.part` files never qualify.
pub fn is_artifact_file_name(file_name: &str) -> bool {
    is_safe_file_name(file_name)
        && !file_name.starts_with('.')
        && ArtifactKind::from_file_name(file_name).is_some()
}

/// Millisecond wall clock that never repeats a value within the process.
///
/// Two artifacts created in the same millisecond get consecutive timestamps instead of the same
/// file name.
#[derive(Debug, Default)]
pub struct ArtifactClock {
    last: AtomicI64,
}

impl ArtifactClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_millis(&self) -> i64 {
        self.next_after(chrono::Utc::now().timestamp_millis())
    }

    fn next_after(&self, now: i64) -> i64 {
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self.last.compare_exchange_weak(
                prev,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }
}
