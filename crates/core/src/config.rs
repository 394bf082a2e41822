//! Badge runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the services. Request
//! handling never reads process-wide environment variables; the `*_from_env_value` helpers take
//! the raw optional strings so the binary owns the environment lookups and tests do not have to
//! mutate it.

use crate::constants::{
    DEFAULT_EXPORT_TIMEOUT_SECS, DEFAULT_FOOTER_PRIMARY, DEFAULT_FOOTER_SECONDARY,
    DEFAULT_OUTPUT_DIR, DEFAULT_PORT, DEFAULT_STATIC_DIR,
};
use crate::sheets::{SheetsConfig, SheetsEnvironment};
use crate::{BadgeError, BadgeResult};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The two static labels printed at the bottom of every badge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FooterLabels {
    primary: String,
    secondary: String,
}

impl FooterLabels {
    /// Blank or missing labels fall back to the defaults.
    pub fn new(primary: Option<String>, secondary: Option<String>) -> Self {
        fn or_default(value: Option<String>, default: &str) -> String {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        }

        Self {
            primary: or_default(primary, DEFAULT_FOOTER_PRIMARY),
            secondary: or_default(secondary, DEFAULT_FOOTER_SECONDARY),
        }
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    pub fn secondary(&self) -> &str {
        &self.secondary
    }
}

impl Default for FooterLabels {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Badge configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct BadgeConfig {
    port: u16,
    output_dir: PathBuf,
    static_dir: PathBuf,
    footer: FooterLabels,
    logo_path: Option<PathBuf>,
    pdf_enabled: bool,
    export_timeout: Duration,
    sheets: SheetsConfig,
}

impl BadgeConfig {
    /// Create a new `BadgeConfig`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        port: u16,
        output_dir: PathBuf,
        static_dir: PathBuf,
        footer: FooterLabels,
        logo_path: Option<PathBuf>,
        pdf_enabled: bool,
        export_timeout: Duration,
        sheets: SheetsConfig,
    ) -> BadgeResult<Self> {
        if output_dir.as_os_str().is_empty() {
            return Err(BadgeError::InvalidConfig(
                "output directory cannot be empty".into(),
            ));
        }
        if export_timeout.is_zero() {
            return Err(BadgeError::InvalidConfig(
                "export timeout must be greater than zero".into(),
            ));
        }

        Ok(Self {
            port,
            output_dir,
            static_dir,
            footer,
            logo_path,
            pdf_enabled,
            export_timeout,
            sheets,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }

    pub fn footer(&self) -> &FooterLabels {
        &self.footer
    }

    pub fn logo_path(&self) -> Option<&Path> {
        self.logo_path.as_deref()
    }

    pub fn pdf_enabled(&self) -> bool {
        self.pdf_enabled
    }

    pub fn export_timeout(&self) -> Duration {
        self.export_timeout
    }

    pub fn sheets(&self) -> &SheetsConfig {
        &self.sheets
    }
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            footer: FooterLabels::default(),
            logo_path: None,
            pdf_enabled: true,
            export_timeout: Duration::from_secs(DEFAULT_EXPORT_TIMEOUT_SECS),
            sheets: SheetsConfig::default(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the listening port. Missing or blank values yield the default port.
pub fn port_from_env_value(value: Option<String>) -> BadgeResult<u16> {
    match non_blank(value) {
        None => Ok(DEFAULT_PORT),
        Some(v) => v
            .parse::<u16>()
            .map_err(|_| BadgeError::InvalidConfig(format!("PORT is not a valid port: {v}"))),
    }
}

/// Parse a boolean flag such as `BADGE_PDF_ENABLED`.
///
/// Accepts `true/false`, `1/0`, `yes/no` and `on/off` in any case.
pub fn flag_from_env_value(key: &str, value: Option<String>, default: bool) -> BadgeResult<bool> {
    let Some(v) = non_blank(value) else {
        return Ok(default);
    };

    match v.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(BadgeError::InvalidConfig(format!(
            "{key} is not a boolean: {v}"
        ))),
    }
}

/// Parse the export budget in whole seconds. Zero is rejected.
pub fn export_timeout_from_env_value(value: Option<String>) -> BadgeResult<Duration> {
    let Some(v) = non_blank(value) else {
        return Ok(Duration::from_secs(DEFAULT_EXPORT_TIMEOUT_SECS));
    };

    match v.parse::<u64>() {
        Ok(0) | Err(_) => Err(BadgeError::InvalidConfig(format!(
            "BADGE_PDF_TIMEOUT_SECS must be a positive number of seconds: {v}"
        ))),
        Ok(secs) => Ok(Duration::from_secs(secs)),
    }
}

/// Parse `BADGE_ENV`, which selects the spreadsheet overrides. Defaults to development.
pub fn sheets_environment_from_env_value(
    value: Option<String>,
) -> BadgeResult<SheetsEnvironment> {
    let Some(v) = non_blank(value) else {
        return Ok(SheetsEnvironment::default());
    };

    match v.to_ascii_lowercase().as_str() {
        "development" | "dev" => Ok(SheetsEnvironment::Development),
        "production" | "prod" => Ok(SheetsEnvironment::Production),
        _ => Err(BadgeError::InvalidConfig(format!(
            "BADGE_ENV must be development or production: {v}"
        ))),
    }
}

/// Resolve a directory path, falling back to `default` when unset.
pub fn dir_from_env_value(value: Option<String>, default: &str) -> PathBuf {
    PathBuf::from(non_blank(value).unwrap_or_else(|| default.to_string()))
}

/// Resolve an optional file path; blank values count as unset.
pub fn optional_path_from_env_value(value: Option<String>) -> Option<PathBuf> {
    non_blank(value).map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footer_labels_fall_back_to_defaults() {
        let labels = FooterLabels::new(Some("   ".into()), None);
        assert_eq!(labels.primary(), DEFAULT_FOOTER_PRIMARY);
        assert_eq!(labels.secondary(), DEFAULT_FOOTER_SECONDARY);

        let labels = FooterLabels::new(Some(" SPEAKER ".into()), Some("DAY 2".into()));
        assert_eq!(labels.primary(), "SPEAKER");
        assert_eq!(labels.secondary(), "DAY 2");
    }

    #[test]
    fn port_parsing() {
        assert_eq!(port_from_env_value(None).unwrap(), DEFAULT_PORT);
        assert_eq!(port_from_env_value(Some("8080".into())).unwrap(), 8080);
        assert!(matches!(
            port_from_env_value(Some("http".into())),
            Err(BadgeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn flag_parsing() {
        assert!(flag_from_env_value("X", None, true).unwrap());
        assert!(!flag_from_env_value("X", Some("OFF".into()), true).unwrap());
        assert!(flag_from_env_value("X", Some("1".into()), false).unwrap());
        assert!(flag_from_env_value("X", Some("maybe".into()), false).is_err());
    }

    #[test]
    fn export_timeout_rejects_zero() {
        assert_eq!(
            export_timeout_from_env_value(None).unwrap(),
            Duration::from_secs(DEFAULT_EXPORT_TIMEOUT_SECS)
        );
        assert_eq!(
            export_timeout_from_env_value(Some("5".into())).unwrap(),
            Duration::from_secs(5)
        );
        assert!(export_timeout_from_env_value(Some("0".into())).is_err());
        assert!(export_timeout_from_env_value(Some("-1".into())).is_err());
    }

    #[test]
    fn sheets_environment_parsing() {
        assert_eq!(
            sheets_environment_from_env_value(None).unwrap(),
            SheetsEnvironment::Development
        );
        assert_eq!(
            sheets_environment_from_env_value(Some(" Production ".into())).unwrap(),
            SheetsEnvironment::Production
        );
        assert!(matches!(
            sheets_environment_from_env_value(Some("staging".into())),
            Err(BadgeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn config_rejects_empty_output_dir() {
        let result = BadgeConfig::new(
            DEFAULT_PORT,
            PathBuf::new(),
            PathBuf::from(DEFAULT_STATIC_DIR),
            FooterLabels::default(),
            None,
            false,
            Duration::from_secs(1),
            SheetsConfig::default(),
        );
        assert!(matches!(result, Err(BadgeError::InvalidConfig(_))));
    }

    #[test]
    fn paths_default_when_blank() {
        assert_eq!(
            dir_from_env_value(Some(" ".into()), DEFAULT_OUTPUT_DIR),
            PathBuf::from("output")
        );
        assert_eq!(optional_path_from_env_value(Some(String::new())), None);
        assert_eq!(
            optional_path_from_env_value(Some("logo.png".into())),
            Some(PathBuf::from("logo.png"))
        );
    }
}
