//! Event and command types for the TUI event loop.
//!
//! State transitions never await. When one needs the store it returns a
//! [`Command`]; the loop runs it with [`execute`] and feeds the resulting
//! [`TuiEvent`] back, so each handler runs to completion on its own.

use assessor_core::{AssessmentStore, AssessmentTest, StoreError, SubmitRequest, TestId};
use crossterm::event::KeyEvent;

#[derive(Debug, Clone)]
pub enum TuiEvent {
    Input(KeyEvent),
    Tick,
    Resize { width: u16, height: u16 },
    TestsLoaded(Result<Vec<AssessmentTest>, StoreError>),
    TestFetched {
        id: TestId,
        result: Result<AssessmentTest, StoreError>,
    },
    TestSaved(Result<AssessmentTest, StoreError>),
    TestDeleted {
        id: TestId,
        result: Result<(), StoreError>,
    },
}

/// A store call requested by a state transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    LoadTests,
    FetchTest(TestId),
    Submit(SubmitRequest),
    Delete(TestId),
}

/// Run one command against the store and wrap the answer as an event.
pub async fn execute(store: &dyn AssessmentStore, command: Command) -> TuiEvent {
    match command {
        Command::LoadTests => TuiEvent::TestsLoaded(store.list().await),
        Command::FetchTest(id) => {
            let result = store.get(&id).await;
            TuiEvent::TestFetched { id, result }
        }
        Command::Submit(request) => TuiEvent::TestSaved(request.send(store).await),
        Command::Delete(id) => {
            let result = store.delete(&id).await;
            TuiEvent::TestDeleted { id, result }
        }
    }
}
