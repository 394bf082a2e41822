use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum BadgeError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to create output directory: {0}")]
    OutputDirCreation(std::io::Error),
    #[error("failed to write artifact: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to persist artifact {path}: {source}", path = path.display())]
    ArtifactPersist {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read logo file: {0}")]
    LogoRead(std::io::Error),
    #[error("document exporter unavailable: {0}")]
    ExporterUnavailable(String),
    #[error("document export failed: {0}")]
    ExportFailed(String),
    #[error("document export exceeded its budget of {0:?}")]
    ExportTimedOut(Duration),
}

pub type BadgeResult<T> = std::result::Result<T, BadgeError>;
