//! Browse list driver: snapshot, query parameters and loading state.

use crate::query::{self, ListQuery};
use crate::{AssessmentStore, AssessmentTest, SortKey, StoreError, Subject, SubjectFacet, TestId};
use std::fmt;

/// Counts and active filters for the summary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSummary {
    pub filtered: usize,
    pub total: usize,
    pub subject: SubjectFacet,
    pub level_ceiling: Option<i64>,
}

impl fmt::Display for ListSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Showing {} of {} tests", self.filtered, self.total)?;
        if let SubjectFacet::Only(subject) = self.subject {
            write!(f, " · Subject: {}", subject)?;
        }
        if let Some(ceiling) = self.level_ceiling {
            write!(f, " · Level ≤ {}", ceiling)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct TestBrowser {
    tests: Vec<AssessmentTest>,
    query: ListQuery,
    reloads_in_flight: usize,
    deletes_in_flight: usize,
    /// Ids deleted while a reload was in flight; filtered out of the
    /// snapshots those reloads bring back.
    deleted_during_reload: Vec<TestId>,
}

impl TestBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unfiltered snapshot in store order.
    pub fn tests(&self) -> &[AssessmentTest] {
        &self.tests
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    /// True while any reload or delete is outstanding.
    pub fn is_loading(&self) -> bool {
        self.reloads_in_flight > 0 || self.deletes_in_flight > 0
    }

    /// Filtered and sorted view of the snapshot.
    pub fn view(&self) -> Vec<&AssessmentTest> {
        query::apply(&self.tests, &self.query)
    }

    /// True when there is nothing to show and nothing on the way.
    pub fn shows_empty_state(&self) -> bool {
        !self.is_loading() && self.view().is_empty()
    }

    pub fn summary(&self) -> ListSummary {
        ListSummary {
            filtered: self.view().len(),
            total: self.tests.len(),
            subject: self.query.subject,
            level_ceiling: self.query.level_ceiling,
        }
    }

    pub fn find(&self, id: &TestId) -> Option<&AssessmentTest> {
        self.tests.iter().find(|t| &t.id == id)
    }

    // ------------------------------------------------------------------------
    // Query parameters
    // ------------------------------------------------------------------------

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.query.text = text.into();
    }

    pub fn set_subject(&mut self, subject: SubjectFacet) {
        self.query.subject = subject;
    }

    pub fn cycle_subject(&mut self) -> SubjectFacet {
        self.query.subject = self.query.subject.cycle_next();
        self.query.subject
    }

    pub fn cycle_sort(&mut self) -> SortKey {
        self.query.sort = self.query.sort.cycle_next();
        self.query.sort
    }

    /// See [`ListQuery::set_level_ceiling_input`].
    pub fn set_level_ceiling_input(&mut self, input: &str) -> bool {
        self.query.set_level_ceiling_input(input)
    }

    pub fn clear_filters(&mut self) {
        self.query.clear();
    }

    // ------------------------------------------------------------------------
    // Snapshot maintenance
    // ------------------------------------------------------------------------

    /// Replace or append one test, keyed by id.
    pub fn upsert(&mut self, test: AssessmentTest) {
        if let Some(existing) = self.tests.iter_mut().find(|t| t.id == test.id) {
            *existing = test;
        } else {
            self.tests.push(test);
        }
    }

    pub fn begin_reload(&mut self) {
        self.reloads_in_flight += 1;
    }

    /// Install the fetched snapshot. A failure installs an empty snapshot and
    /// hands the error back for the caller to surface. This reload stops
    /// counting as loading either way.
    ///
    /// Tests deleted while the reload was in flight stay deleted.
    pub fn complete_reload(
        &mut self,
        result: Result<Vec<AssessmentTest>, StoreError>,
    ) -> Result<usize, StoreError> {
        self.reloads_in_flight = self.reloads_in_flight.saturating_sub(1);
        let deleted = if self.reloads_in_flight == 0 {
            std::mem::take(&mut self.deleted_during_reload)
        } else {
            self.deleted_during_reload.clone()
        };
        match result {
            Ok(mut tests) => {
                tests.retain(|t| !deleted.contains(&t.id));
                tracing::info!(count = tests.len(), "Loaded assessment tests");
                self.tests = tests;
                Ok(self.tests.len())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load assessment tests");
                self.tests.clear();
                Err(e)
            }
        }
    }

    pub async fn reload(&mut self, store: &dyn AssessmentStore) -> Result<usize, StoreError> {
        self.begin_reload();
        let result = store.list().await;
        self.complete_reload(result)
    }

    pub fn begin_delete(&mut self) {
        self.deletes_in_flight += 1;
    }

    /// Remove `id` once the store has confirmed. On failure the snapshot is
    /// left exactly as it was.
    pub fn complete_delete(
        &mut self,
        id: &TestId,
        result: Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        self.deletes_in_flight = self.deletes_in_flight.saturating_sub(1);
        match result {
            Ok(()) => {
                tracing::info!(test_id = %id, "Deleted assessment test");
                self.tests.retain(|t| &t.id != id);
                if self.reloads_in_flight > 0 {
                    self.deleted_during_reload.push(id.clone());
                }
                Ok(())
            }
            Err(e) => {
                tracing::error!(test_id = %id, error = %e, "Failed to delete assessment test");
                Err(e)
            }
        }
    }

    pub async fn delete(
        &mut self,
        store: &dyn AssessmentStore,
        id: &TestId,
    ) -> Result<(), StoreError> {
        self.begin_delete();
        let result = store.delete(id).await;
        self.complete_delete(id, result)
    }

    /// Number of tests per subject in the snapshot.
    pub fn subject_counts(&self) -> [(Subject, usize); 3] {
        Subject::ALL.map(|s| (s, self.tests.iter().filter(|t| t.subject == s).count()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test(id: &str, subject: Subject, level: i64) -> AssessmentTest {
        AssessmentTest {
            id: TestId::new(id),
            name: format!("Test {}", id),
            subject,
            level,
            test_questions: Vec::new(),
            last_updated: Utc::now(),
        }
    }

    fn browser() -> TestBrowser {
        let mut browser = TestBrowser::new();
        browser
            .complete_reload(Ok(vec![
                test("1", Subject::Angular, 1),
                test("2", Subject::RxJs, 4),
                test("3", Subject::RxJs, 2),
            ]))
            .unwrap();
        browser
    }

    #[test]
    fn test_summary_line() {
        let mut browser = browser();
        assert_eq!(browser.summary().to_string(), "Showing 3 of 3 tests");
        browser.set_subject(SubjectFacet::Only(Subject::RxJs));
        browser.set_level_ceiling_input("3");
        let summary = browser.summary();
        assert_eq!(summary.filtered, 1);
        assert_eq!(
            summary.to_string(),
            "Showing 1 of 3 tests · Subject: RXJS · Level ≤ 3"
        );
    }

    #[test]
    fn test_failed_reload_substitutes_empty_snapshot() {
        let mut browser = browser();
        browser.begin_reload();
        assert!(browser.is_loading());
        assert!(browser
            .complete_reload(Err(StoreError::transport("down")))
            .is_err());
        assert!(!browser.is_loading());
        assert!(browser.tests().is_empty());
        assert!(browser.shows_empty_state());
    }

    #[test]
    fn test_failed_delete_keeps_snapshot() {
        let mut browser = browser();
        let before = browser.tests().to_vec();
        browser.begin_delete();
        assert!(browser
            .complete_delete(&TestId::new("2"), Err(StoreError::transport("500")))
            .is_err());
        assert_eq!(browser.tests(), before.as_slice());
        assert!(!browser.is_loading());
    }

    #[test]
    fn test_successful_delete_removes_only_that_id() {
        let mut browser = browser();
        browser.complete_delete(&TestId::new("2"), Ok(())).unwrap();
        let ids: Vec<&str> = browser.tests().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_reload_finishing_first_keeps_delete_loading() {
        let mut browser = browser();
        browser.begin_delete();
        browser.begin_reload();
        browser.complete_reload(Ok(vec![test("1", Subject::Angular, 1)])).unwrap();
        assert!(browser.is_loading());
        assert!(!browser.shows_empty_state());
        browser.complete_delete(&TestId::new("1"), Ok(())).unwrap();
        assert!(!browser.is_loading());
        assert!(browser.shows_empty_state());
    }

    #[test]
    fn test_snapshot_from_before_delete_does_not_restore_row() {
        let mut browser = browser();
        browser.begin_reload();
        browser.begin_delete();
        browser.complete_delete(&TestId::new("2"), Ok(())).unwrap();
        browser
            .complete_reload(Ok(vec![
                test("1", Subject::Angular, 1),
                test("2", Subject::RxJs, 4),
                test("3", Subject::RxJs, 2),
            ]))
            .unwrap();
        assert!(browser.find(&TestId::new("2")).is_none());
        assert_eq!(browser.tests().len(), 2);
        assert!(!browser.is_loading());

        // Later reloads are not filtered.
        browser.begin_reload();
        browser
            .complete_reload(Ok(vec![test("2", Subject::RxJs, 4)]))
            .unwrap();
        assert!(browser.find(&TestId::new("2")).is_some());
    }

    #[test]
    fn test_upsert_replaces_by_id() {
        let mut browser = browser();
        let mut changed = test("3", Subject::NestJs, 5);
        changed.name = "Renamed".to_string();
        browser.upsert(changed);
        assert_eq!(browser.tests().len(), 3);
        assert_eq!(browser.find(&TestId::new("3")).map(|t| t.level), Some(5));
        browser.upsert(test("4", Subject::Angular, 1));
        assert_eq!(browser.tests().len(), 4);
    }

    #[test]
    fn test_cycle_and_clear_filters() {
        let mut browser = browser();
        assert_eq!(browser.cycle_subject(), SubjectFacet::Only(Subject::Angular));
        assert_eq!(browser.cycle_sort(), SortKey::Name);
        browser.set_search_text("test");
        browser.clear_filters();
        assert_eq!(browser.query(), &ListQuery::default());
    }

    #[test]
    fn test_subject_counts() {
        let counts = browser().subject_counts();
        assert_eq!(
            counts,
            [(Subject::Angular, 1), (Subject::NestJs, 0), (Subject::RxJs, 2)]
        );
    }
}
