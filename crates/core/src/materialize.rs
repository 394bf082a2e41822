//! Document materialisation.
//!
//! Renders a badge, runs it through the configured [`DocumentExporter`] and writes the result into
//! the output directory. Artifacts are written to a temporary file in the same directory and then
//! persisted under their final name without clobbering, so a failed export or write never leaves
//! a partial artifact behind.

use crate::export::DocumentExporter;
use crate::naming::{artifact_file_name, is_artifact_file_name, ArtifactClock, ArtifactKind};
use crate::person::PersonRecord;
use crate::render::BadgeRenderer;
use crate::{BadgeError, BadgeResult};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A badge written to the output directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedDocument {
    pub file_name: String,
    pub file_path: PathBuf,
    pub kind: ArtifactKind,
    pub organization_font_size: u32,
}

impl RenderedDocument {
    /// True when the artifact is HTML and must be printed to PDF by hand.
    pub fn is_html(&self) -> bool {
        self.kind == ArtifactKind::Html
    }
}

pub struct DocumentMaterializer {
    output_dir: PathBuf,
    renderer: BadgeRenderer,
    exporter: Arc<dyn DocumentExporter>,
    export_timeout: Duration,
    clock: ArtifactClock,
}

impl std::fmt::Debug for DocumentMaterializer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentMaterializer")
            .field("output_dir", &self.output_dir)
            .field("kind", &self.exporter.kind())
            .field("export_timeout", &self.export_timeout)
            .finish()
    }
}

impl DocumentMaterializer {
    pub fn new(
        output_dir: PathBuf,
        renderer: BadgeRenderer,
        exporter: Arc<dyn DocumentExporter>,
        export_timeout: Duration,
    ) -> Self {
        Self {
            output_dir,
            renderer,
            exporter,
            export_timeout,
            clock: ArtifactClock::new(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn kind(&self) -> ArtifactKind {
        self.exporter.kind()
    }

    pub fn export_timeout(&self) -> Duration {
        self.export_timeout
    }

    /// Create the output directory if it is missing. Safe to call repeatedly.
    pub fn ensure_output_dir(&self) -> BadgeResult<()> {
        fs::create_dir_all(&self.output_dir).map_err(BadgeError::OutputDirCreation)
    }

    /// Render, export and persist one badge.
    ///
    /// Blocks for the duration of the export; async callers should run it on a blocking thread.
    ///
    /// # Errors
    ///
    /// Returns `BadgeError` if:
    /// - the output directory cannot be created,
    /// - the exporter fails or exceeds the export budget,
    /// - the artifact cannot be written or persisted.
    pub fn materialize(&self, person: &PersonRecord) -> BadgeResult<RenderedDocument> {
        self.ensure_output_dir()?;

        let kind = self.exporter.kind();
        let badge = self.renderer.render(person, kind.template());

        let started = Instant::now();
        let bytes = self.exporter.export(&badge.html, self.export_timeout)?;
        if started.elapsed() > self.export_timeout {
            return Err(BadgeError::ExportTimedOut(self.export_timeout));
        }

        let file_name = artifact_file_name(&person.name, self.clock.next_millis(), kind);
        let file_path = self.output_dir.join(&file_name);
        self.write_artifact(&file_path, &bytes)?;

        tracing::info!(
            "wrote {} badge {} ({} bytes)",
            kind.extension(),
            file_path.display(),
            bytes.len()
        );

        Ok(RenderedDocument {
            file_name,
            file_path,
            kind,
            organization_font_size: badge.organization_font_size,
        })
    }

    fn write_artifact(&self, path: &Path, bytes: &[u8]) -> BadgeResult<()> {
        let mut tmp = tempfile::Builder::new()
            .prefix(".badge-")
            .suffix(".part")
            .tempfile_in(&self.output_dir)
            .map_err(BadgeError::FileWrite)?;
        tmp.write_all(bytes).map_err(BadgeError::FileWrite)?;
        tmp.as_file().sync_all().map_err(BadgeError::FileWrite)?;

        tmp.persist_noclobber(path)
            .map_err(|e| BadgeError::ArtifactPersist {
                path: path.to_path_buf(),
                source: e.error,
            })?;
        Ok(())
    }

    /// Resolve a previously written artifact by file name.
    ///
    /// Returns `None` for names that are not finished artifacts (including in-progress temp files)
    /// or do not exist.
    pub fn artifact_path(&self, file_name: &str) -> Option<PathBuf> {
        if !is_artifact_file_name(file_name) {
            return None;
        }
        let path = self.output_dir.join(file_name);
        path.is_file().then_some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::HtmlExporter;
    use tempfile::TempDir;

    struct FakePdf;

    impl DocumentExporter for FakePdf {
        fn kind(&self) -> ArtifactKind {
            ArtifactKind::Pdf
        }

        fn export(&self, html: &str, _budget: Duration) -> BadgeResult<Vec<u8>> {
            assert!(!html.contains("<title>"));
            Ok(b"%PDF-1.7 fake".to_vec())
        }
    }

    struct Broken;

    impl DocumentExporter for Broken {
        fn kind(&self) -> ArtifactKind {
            ArtifactKind::Pdf
        }

        fn export(&self, _html: &str, _budget: Duration) -> BadgeResult<Vec<u8>> {
            Err(BadgeError::ExportFailed("failed to launch browser".into()))
        }
    }

    struct Slow;

    impl DocumentExporter for Slow {
        fn kind(&self) -> ArtifactKind {
            ArtifactKind::Pdf
        }

        fn export(&self, _html: &str, budget: Duration) -> BadgeResult<Vec<u8>> {
            std::thread::sleep(budget + Duration::from_millis(20));
            Ok(b"late".to_vec())
        }
    }

    fn materializer(dir: &Path, exporter: Arc<dyn DocumentExporter>) -> DocumentMaterializer {
        DocumentMaterializer::new(
            dir.join("output"),
            BadgeRenderer::default(),
            exporter,
            Duration::from_millis(50),
        )
    }

    fn entries(dir: &Path) -> Vec<String> {
        match fs::read_dir(dir) {
            Ok(it) => it
                .flatten()
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    #[test]
    fn html_artifact_is_written_with_title() {
        let temp = TempDir::new().unwrap();
        let m = materializer(temp.path(), Arc::new(HtmlExporter));

        let doc = m
            .materialize(&PersonRecord::new("Jane   Doe", "DevOps"))
            .unwrap();

        assert!(doc.is_html());
        assert!(doc.file_name.starts_with("badge_Jane_Doe_"));
        assert!(doc.file_name.ends_with(".html"));
        assert_eq!(doc.organization_font_size, 32);
        assert_eq!(doc.file_path, m.output_dir().join(&doc.file_name));

        let html = fs::read_to_string(&doc.file_path).unwrap();
        assert!(html.contains("<title>Badge - Jane   Doe</title>"));
        assert_eq!(entries(m.output_dir()), vec![doc.file_name.clone()]);
    }

    #[test]
    fn pdf_artifact_uses_printable_template() {
        let temp = TempDir::new().unwrap();
        let m = materializer(temp.path(), Arc::new(FakePdf));

        let doc = m
            .materialize(&PersonRecord::new("Kim Tae", "Geryong Research Institute"))
            .unwrap();

        assert!(!doc.is_html());
        assert!(doc.file_name.starts_with("badge_Kim_Tae_"));
        assert!(doc.file_name.ends_with(".pdf"));
        assert_eq!(doc.organization_font_size, 18);
        assert_eq!(fs::read(&doc.file_path).unwrap(), b"%PDF-1.7 fake");
    }

    #[test]
    fn output_dir_creation_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let m = materializer(temp.path(), Arc::new(HtmlExporter));

        m.ensure_output_dir().unwrap();
        m.ensure_output_dir().unwrap();
        assert!(m.output_dir().is_dir());
    }

    #[test]
    fn failed_export_leaves_no_files() {
        let temp = TempDir::new().unwrap();
        let m = materializer(temp.path(), Arc::new(Broken));

        let err = m.materialize(&PersonRecord::new("A", "B")).unwrap_err();
        assert!(matches!(err, BadgeError::ExportFailed(_)));
        assert!(entries(m.output_dir()).is_empty());
    }

    #[test]
    fn export_over_budget_is_rejected_without_writing() {
        let temp = TempDir::new().unwrap();
        let m = materializer(temp.path(), Arc::new(Slow));

        let err = m.materialize(&PersonRecord::new("A", "B")).unwrap_err();
        assert!(matches!(err, BadgeError::ExportTimedOut(_)));
        assert!(entries(m.output_dir()).is_empty());
    }

    #[test]
    fn same_name_back_to_back_gets_distinct_files() {
        let temp = TempDir::new().unwrap();
        let m = materializer(temp.path(), Arc::new(HtmlExporter));
        let person = PersonRecord::new("Same Name", "Org");

        let a = m.materialize(&person).unwrap();
        let b = m.materialize(&person).unwrap();
        assert_ne!(a.file_name, b.file_name);
        assert_eq!(entries(m.output_dir()).len(), 2);
    }

    #[test]
    fn artifact_lookup() {
        let temp = TempDir::new().unwrap();
        let m = materializer(temp.path(), Arc::new(HtmlExporter));
        let doc = m.materialize(&PersonRecord::new("A", "B")).unwrap();

        assert_eq!(m.artifact_path(&doc.file_name), Some(doc.file_path));
        assert_eq!(m.artifact_path("badge_missing_1.pdf"), None);
        assert_eq!(m.artifact_path("../output"), None);
        assert_eq!(m.artifact_path(".."), None);

        fs::write(m.output_dir().join(".badge-abc.part"), b"partial").unwrap();
        assert_eq!(m.artifact_path(".badge-abc.part"), None);
    }

    #[test]
    fn long_hangul_name_is_written() {
        let temp = TempDir::new().unwrap();
        let m = materializer(temp.path(), Arc::new(FakePdf));

        let doc = m
            .materialize(&PersonRecord::new("홍".repeat(90), "Geryong"))
            .unwrap();
        assert!(doc.file_name.len() <= crate::naming::MAX_FILE_NAME_BYTES);
        assert!(doc.file_path.is_file());
    }
}
