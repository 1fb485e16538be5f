use std::env;

use edu_core::model::{TutorSettings, TutorSettingsDraft, TutorSettingsError};

pub const ENV_ASK_BASE_URL: &str = "EDU_ASK_BASE_URL";
pub const ENV_TUTOR_SUBJECT: &str = "EDU_TUTOR_SUBJECT";
pub const ENV_TUTOR_LEVEL: &str = "EDU_TUTOR_LEVEL";

/// Read tutor settings from the process environment.
///
/// # Errors
///
/// Returns `TutorSettingsError` if `EDU_ASK_BASE_URL` is set but invalid.
pub fn settings_from_env() -> Result<TutorSettings, TutorSettingsError> {
    settings_from_lookup(|key| env::var(key).ok())
}

/// Build tutor settings from an arbitrary key lookup.
///
/// # Errors
///
/// Returns `TutorSettingsError` if the base URL is set but invalid.
pub fn settings_from_lookup(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<TutorSettings, TutorSettingsError> {
    TutorSettingsDraft {
        ask_base_url: lookup(ENV_ASK_BASE_URL),
        subject: lookup(ENV_TUTOR_SUBJECT),
        level: lookup(ENV_TUTOR_LEVEL),
    }
    .validate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn lookup_feeds_the_draft() {
        let vars = HashMap::from([
            (ENV_ASK_BASE_URL, "http://tutor.local/"),
            (ENV_TUTOR_SUBJECT, "physics"),
        ]);
        let settings =
            settings_from_lookup(|key| vars.get(key).map(|v| (*v).to_string())).unwrap();

        assert_eq!(settings.ask_base_url(), Some("http://tutor.local"));
        assert_eq!(settings.subject(), "physics");
        assert_eq!(settings.level(), "adaptive");
    }

    #[test]
    fn invalid_url_is_reported() {
        let err = settings_from_lookup(|key| {
            (key == ENV_ASK_BASE_URL).then(|| "localhost without scheme".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, TutorSettingsError::InvalidBaseUrl(_)));
    }
}
