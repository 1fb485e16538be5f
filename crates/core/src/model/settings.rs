use thiserror::Error;
use url::Url;

pub const DEFAULT_SUBJECT: &str = "general";
pub const DEFAULT_LEVEL: &str = "adaptive";

/// Validated tutor configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TutorSettings {
    ask_base_url: Option<String>,
    subject: String,
    level: String,
}

#[derive(Clone, Debug, Default)]
pub struct TutorSettingsDraft {
    pub ask_base_url: Option<String>,
    pub subject: Option<String>,
    pub level: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TutorSettingsError {
    #[error("invalid answering service URL: {0}")]
    InvalidBaseUrl(String),
}

impl TutorSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and normalize the draft.
    ///
    /// Blank values fall back to defaults; a trailing slash on the URL is dropped.
    ///
    /// # Errors
    ///
    /// Returns `TutorSettingsError::InvalidBaseUrl` if the URL is present but not
    /// an absolute http(s) URL.
    pub fn validate(self) -> Result<TutorSettings, TutorSettingsError> {
        let ask_base_url = normalize_optional(self.ask_base_url)
            .map(|raw| {
                let parsed = Url::parse(&raw)
                    .map_err(|_| TutorSettingsError::InvalidBaseUrl(raw.clone()))?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(TutorSettingsError::InvalidBaseUrl(raw));
                }
                Ok(raw.trim_end_matches('/').to_string())
            })
            .transpose()?;

        Ok(TutorSettings {
            ask_base_url,
            subject: normalize_optional(self.subject).unwrap_or_else(|| DEFAULT_SUBJECT.into()),
            level: normalize_optional(self.level).unwrap_or_else(|| DEFAULT_LEVEL.into()),
        })
    }
}

impl TutorSettings {
    /// Base URL of a remote answering endpoint, if one is configured.
    #[must_use]
    pub fn ask_base_url(&self) -> Option<&str> {
        self.ask_base_url.as_deref()
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn level(&self) -> &str {
        &self.level
    }
}

impl Default for TutorSettings {
    fn default() -> Self {
        Self {
            ask_base_url: None,
            subject: DEFAULT_SUBJECT.into(),
            level: DEFAULT_LEVEL.into(),
        }
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_fall_back_to_defaults() {
        let settings = TutorSettingsDraft {
            ask_base_url: Some("  ".into()),
            subject: Some(String::new()),
            level: None,
        }
        .validate()
        .unwrap();
        assert_eq!(settings, TutorSettings::default());
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let settings = TutorSettingsDraft {
            ask_base_url: Some("http://localhost:3000/".into()),
            ..TutorSettingsDraft::new()
        }
        .validate()
        .unwrap();
        assert_eq!(settings.ask_base_url(), Some("http://localhost:3000"));
    }

    #[test]
    fn rejects_non_http_urls() {
        for raw in ["not a url", "ftp://example.com"] {
            let err = TutorSettingsDraft {
                ask_base_url: Some(raw.into()),
                ..TutorSettingsDraft::new()
            }
            .validate()
            .unwrap_err();
            assert_eq!(err, TutorSettingsError::InvalidBaseUrl(raw.into()));
        }
    }
}
