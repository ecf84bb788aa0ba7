//! Assessor Core - Assessment test authoring model
//!
//! Entity types, the editable working copy with its validation rules, the
//! three-step wizard, the browse-list query engine and the persistence
//! collaborator contract. No terminal or network code lives here.

mod entities;
mod enums;
mod error;
mod identity;

pub mod browse;
pub mod form;
pub mod query;
pub mod session;
pub mod store;
pub mod wizard;

pub use entities::*;
pub use enums::*;
pub use error::*;
pub use identity::*;

pub use browse::{ListSummary, TestBrowser};
pub use form::{EditableQuestion, EditableTest, Field, FieldError, FieldPath};
pub use query::ListQuery;
pub use session::{AuthoringSession, SessionExit, SessionMode, SessionPhase, SubmitRequest};
pub use store::AssessmentStore;
pub use wizard::{Wizard, WizardStep};
