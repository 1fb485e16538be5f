use thiserror::Error;

use crate::model::{ItemError, ItemSourceError, SessionError, TutorSettingsError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Item(#[from] ItemError),
    #[error(transparent)]
    ItemSource(#[from] ItemSourceError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    TutorSettings(#[from] TutorSettingsError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Session, TutorSettingsDraft};
    use crate::time::fixed_now;

    #[test]
    fn domain_errors_convert_with_question_mark() {
        fn start_empty() -> Result<Session, Error> {
            Ok(Session::start(Vec::new(), fixed_now())?)
        }
        assert!(matches!(start_empty().unwrap_err(), Error::Session(_)));

        let draft = TutorSettingsDraft {
            ask_base_url: Some("ftp://tutor".into()),
            ..TutorSettingsDraft::default()
        };
        let err: Error = draft.validate().unwrap_err().into();
        assert_eq!(err.to_string(), "invalid answering service URL: ftp://tutor");
    }
}
