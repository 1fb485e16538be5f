mod ask;
mod ids;
mod item;
mod outcome;
mod session;
mod settings;
mod source;
mod summary;

pub use ask::{AskRequest, AskResponse};
pub use ids::{ItemId, ParseSourceIdError, SourceId};
pub use item::{CardFaces, Item, ItemError, ItemPayload, Question};
pub use outcome::{Outcome, SessionKind};
pub use session::{ItemReview, RecordedOutcome, Session, SessionError, SessionProgress};
pub use settings::{
    DEFAULT_LEVEL, DEFAULT_SUBJECT, TutorSettings, TutorSettingsDraft, TutorSettingsError,
};
pub use source::{ItemSource, ItemSourceError};
pub use summary::{SessionSummary, SessionSummaryError};
