//! Authoring session: one create or edit flow from open to close.
//!
//! The session owns the wizard (and through it the working copy). Store
//! calls are split into a `begin_*` step that yields the request and a
//! `complete_*` step that applies the response, so an event loop can run the
//! request elsewhere and feed the result back. [`AuthoringSession::load`] and
//! [`AuthoringSession::submit`] compose both halves for direct callers.

use crate::{
    AssessmentStore, AssessmentTest, EditableTest, SessionError, StoreError, TestId, TestPayload,
    UpdateTestPayload, Wizard,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionMode {
    Create,
    Edit(TestId),
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionExit {
    Saved(AssessmentTest),
    Cancelled,
    NotFound(TestId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionPhase {
    /// Waiting for the test being edited. Edits are refused.
    Loading,
    Editing,
    /// A create or update is in flight. Edits are refused.
    Saving,
    Closed(SessionExit),
}

impl SessionPhase {
    pub fn name(&self) -> &'static str {
        match self {
            SessionPhase::Loading => "loading",
            SessionPhase::Editing => "editing",
            SessionPhase::Saving => "saving",
            SessionPhase::Closed(_) => "closed",
        }
    }
}

/// The store call a submit resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitRequest {
    Create(TestPayload),
    Update(UpdateTestPayload),
}

impl SubmitRequest {
    pub async fn send(&self, store: &dyn AssessmentStore) -> Result<AssessmentTest, StoreError> {
        match self {
            SubmitRequest::Create(payload) => store.create(payload).await,
            SubmitRequest::Update(payload) => store.update(payload).await,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthoringSession {
    mode: SessionMode,
    phase: SessionPhase,
    wizard: Wizard,
}

impl AuthoringSession {
    /// New test from the blank template; editable immediately.
    pub fn create() -> Self {
        Self {
            mode: SessionMode::Create,
            phase: SessionPhase::Editing,
            wizard: Wizard::default(),
        }
    }

    /// Edit an existing test; editable once the load completes.
    pub fn edit(id: TestId) -> Self {
        Self {
            mode: SessionMode::Edit(id),
            phase: SessionPhase::Loading,
            wizard: Wizard::default(),
        }
    }

    pub fn mode(&self) -> &SessionMode {
        &self.mode
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    pub fn is_editable(&self) -> bool {
        self.phase == SessionPhase::Editing
    }

    pub fn exit(&self) -> Option<&SessionExit> {
        match &self.phase {
            SessionPhase::Closed(exit) => Some(exit),
            _ => None,
        }
    }

    /// Mutable access to the wizard, only while editing.
    pub fn wizard_mut(&mut self) -> Result<&mut Wizard, SessionError> {
        if self.phase != SessionPhase::Editing {
            return Err(SessionError::NotEditable {
                phase: self.phase.name(),
            });
        }
        Ok(&mut self.wizard)
    }

    // ------------------------------------------------------------------------
    // Load
    // ------------------------------------------------------------------------

    /// Id to fetch, while an edit session is waiting for its test.
    pub fn pending_load(&self) -> Option<&TestId> {
        match (&self.mode, &self.phase) {
            (SessionMode::Edit(id), SessionPhase::Loading) => Some(id),
            _ => None,
        }
    }

    /// Apply the result of fetching `fetched`. The working copy is rebuilt
    /// from the fetched test. `NotFound` closes the session; a transport
    /// failure leaves it loading so the fetch can be retried.
    ///
    /// A result for any id other than the one this session waits for is
    /// refused with `StaleLoad` and leaves the session untouched.
    pub fn complete_load(
        &mut self,
        fetched: &TestId,
        result: Result<AssessmentTest, StoreError>,
    ) -> Result<(), SessionError> {
        let Some(id) = self.pending_load().cloned() else {
            return Err(SessionError::NotEditable {
                phase: self.phase.name(),
            });
        };
        if *fetched != id {
            tracing::debug!(test_id = %id, fetched = %fetched, "Ignoring fetch for another session");
            return Err(SessionError::StaleLoad { id: fetched.clone() });
        }
        match result {
            Ok(test) if test.id != id => {
                tracing::warn!(test_id = %id, returned = %test.id, "Store returned a different test");
                Err(SessionError::StaleLoad { id: test.id })
            }
            Ok(test) => {
                tracing::info!(test_id = %id, questions = test.question_count(), "Loaded assessment test for editing");
                self.wizard = Wizard::new(EditableTest::from_test(&test));
                self.phase = SessionPhase::Editing;
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                tracing::warn!(test_id = %id, "Assessment test no longer exists");
                self.phase = SessionPhase::Closed(SessionExit::NotFound(id));
                Err(e.into())
            }
            Err(e) => {
                tracing::error!(test_id = %id, error = %e, "Failed to load assessment test");
                Err(e.into())
            }
        }
    }

    /// Fetch the test being edited. A no-op for create sessions.
    pub async fn load(&mut self, store: &dyn AssessmentStore) -> Result<(), SessionError> {
        let Some(id) = self.pending_load().cloned() else {
            return Ok(());
        };
        let result = store.get(&id).await;
        self.complete_load(&id, result)
    }

    // ------------------------------------------------------------------------
    // Submit
    // ------------------------------------------------------------------------

    /// Gate the submit through the wizard and move to `Saving`.
    pub fn begin_submit(&mut self) -> Result<SubmitRequest, SessionError> {
        let wizard = self.wizard_mut()?;
        let payload = wizard.submit()?;
        let request = match &self.mode {
            SessionMode::Create => SubmitRequest::Create(payload),
            SessionMode::Edit(id) => {
                SubmitRequest::Update(UpdateTestPayload::new(id.clone(), payload))
            }
        };
        self.phase = SessionPhase::Saving;
        Ok(request)
    }

    /// Apply the store's answer. Success closes the session; failure goes
    /// back to editing with the working copy untouched.
    pub fn complete_submit(
        &mut self,
        result: Result<AssessmentTest, StoreError>,
    ) -> Result<AssessmentTest, SessionError> {
        if self.phase != SessionPhase::Saving {
            return Err(SessionError::NotEditable {
                phase: self.phase.name(),
            });
        }
        match result {
            Ok(test) => {
                tracing::info!(test_id = %test.id, questions = test.question_count(), "Saved assessment test");
                self.phase = SessionPhase::Closed(SessionExit::Saved(test.clone()));
                Ok(test)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to save assessment test");
                self.phase = SessionPhase::Editing;
                Err(e.into())
            }
        }
    }

    /// Submit from Review and dispatch create or update.
    pub async fn submit(
        &mut self,
        store: &dyn AssessmentStore,
    ) -> Result<AssessmentTest, SessionError> {
        let request = self.begin_submit()?;
        let result = request.send(store).await;
        self.complete_submit(result)
    }

    /// Discard the working copy. Refused while a save is in flight.
    pub fn cancel(&mut self) -> bool {
        match self.phase {
            SessionPhase::Loading | SessionPhase::Editing => {
                self.phase = SessionPhase::Closed(SessionExit::Cancelled);
                true
            }
            SessionPhase::Saving | SessionPhase::Closed(_) => false,
        }
    }
}
